//! Search, filter and sort over the loaded catalogue.
//!
//! [`FilterState`] is a plain value: every transition returns a new state and
//! [`apply_filters`] never touches the records it is given.

use serde::{Deserialize, Serialize};

use crate::catalogue::{GameRecord, GenreSelection};

/// Which record fields take part in text search. At least one is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchScope {
    name: bool,
    app_id: bool,
}

impl SearchScope {
    pub const BOTH: SearchScope = SearchScope {
        name: true,
        app_id: true,
    };

    /// Build a scope; asking for neither field falls back to name matching.
    pub fn new(name: bool, app_id: bool) -> Self {
        Self {
            name: name || !app_id,
            app_id,
        }
    }

    pub fn name(&self) -> bool {
        self.name
    }

    pub fn app_id(&self) -> bool {
        self.app_id
    }

    pub fn with_name(self, enabled: bool) -> Self {
        Self::new(enabled, self.app_id)
    }

    pub fn with_app_id(self, enabled: bool) -> Self {
        Self::new(self.name, enabled)
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Support-flag preset. Independent of [`FilterMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportMode {
    #[default]
    All,
    Online,
    Bypass,
}

impl SupportMode {
    pub fn parse(support: &str) -> Option<Self> {
        match support.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(SupportMode::All),
            "online" => Some(SupportMode::Online),
            "bypass" => Some(SupportMode::Bypass),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SupportMode::All => "all",
            SupportMode::Online => "online",
            SupportMode::Bypass => "bypass",
        }
    }
}

/// Category preset: genre, download sort and Denuvo exclude each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Genre(GenreSelection),
    MostDownloaded,
    RequiresMembership,
}

impl FilterMode {
    /// Parse the identifiers used on the command line and by the web API.
    /// `genre` needs a label to resolve against the taxonomy.
    pub fn parse(mode: &str, genre: Option<&str>) -> Option<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(FilterMode::All),
            "most_downloaded" | "most-downloaded" | "downloads" => {
                Some(FilterMode::MostDownloaded)
            }
            "denuvo" | "requires_membership" => Some(FilterMode::RequiresMembership),
            "genre" => genre.and_then(GenreSelection::for_label).map(FilterMode::Genre),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Genre(_) => "genre",
            FilterMode::MostDownloaded => "most_downloaded",
            FilterMode::RequiresMembership => "denuvo",
        }
    }
}

/// Complete search/filter/sort input for [`apply_filters`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    search_query: String,
    pub search_scope: SearchScope,
    pub online_only: bool,
    pub bypass_only: bool,
    pub requires_membership_only: bool,
    pub genre: Option<GenreSelection>,
    pub sort_by_downloads: bool,
}

impl FilterState {
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Replace the query; it is stored lower-cased and trimmed.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.search_query = normalize_query(raw);
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    /// Apply a category preset, clearing the fields a competing category
    /// preset would set. Search text, scope and support flags are kept.
    pub fn with_mode(self, mode: FilterMode) -> Self {
        let mut next = FilterState {
            requires_membership_only: false,
            genre: None,
            sort_by_downloads: false,
            ..self
        };
        match mode {
            FilterMode::All => {}
            FilterMode::Genre(selection) => next.genre = Some(selection),
            FilterMode::MostDownloaded => next.sort_by_downloads = true,
            FilterMode::RequiresMembership => next.requires_membership_only = true,
        }
        next
    }

    /// Apply a support preset; only the online and bypass flags change.
    pub fn with_support(mut self, support: SupportMode) -> Self {
        self.online_only = support == SupportMode::Online;
        self.bypass_only = support == SupportMode::Bypass;
        self
    }

    fn matches(&self, record: &GameRecord) -> bool {
        if !self.search_query.is_empty() {
            let query = self.search_query.as_str();
            let name_hit =
                self.search_scope.name() && record.name.to_lowercase().contains(query);
            let app_id_hit = self.search_scope.app_id() && record.appid.contains(query);
            if !name_hit && !app_id_hit {
                return false;
            }
        }
        if self.online_only && !record.is_online_supported() {
            return false;
        }
        if self.bypass_only && !record.is_bypass_supported() {
            return false;
        }
        if self.requires_membership_only && !record.requires_membership {
            return false;
        }
        if let Some(selection) = &self.genre {
            if !selection.contains(record.genre_id()) {
                return false;
            }
        }
        true
    }
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Produce the view set: matching records in fetch order, or by downloads
/// (descending, ties in fetch order) when sorting is on.
pub fn apply_filters<'a>(records: &'a [GameRecord], state: &FilterState) -> Vec<&'a GameRecord> {
    view_indices(records, state)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// Same as [`apply_filters`], as positions into `records`.
pub fn view_indices(records: &[GameRecord], state: &FilterState) -> Vec<usize> {
    let mut view: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| state.matches(record))
        .map(|(idx, _)| idx)
        .collect();
    if state.sort_by_downloads {
        // Stable sort keeps fetch order among equal counts.
        view.sort_by(|&a, &b| records[b].downloads.cmp(&records[a].downloads));
    }
    view
}

/// Scope selector used by the CLI and web API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScopeArg {
    Name,
    AppId,
    Both,
}

impl From<ScopeArg> for SearchScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Name => SearchScope::new(true, false),
            ScopeArg::AppId => SearchScope::new(false, true),
            ScopeArg::Both => SearchScope::BOTH,
        }
    }
}
