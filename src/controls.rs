//! Filter controls
//!
//! Builds the two rows of filter buttons from the genre taxonomy and
//! reconciles them with the loaded catalogue. The support row and the
//! category row each have exactly one active control, and picking a control
//! in one row leaves the other row alone.

use serde::Serialize;

use crate::browse::{FilterMode, SupportMode};
use crate::catalogue::{genres, GameRecord, GenreSelection};
use crate::render::Profile;

/// Inert placeholders shown in the category row until the catalogue arrives.
pub const SKELETON_COUNT: usize = 16;

pub const MOST_DOWNLOADED_LABEL: &str = "⬇ Most Downloaded ⬇";
pub const DENUVO_LABEL: &str = "Denuvo";

/// Genre after which the Denuvo control is placed.
const DENUVO_ANCHOR: &str = "Casual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlGroup {
    Support,
    Category,
}

/// What activating a control applies to the filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    Support(SupportMode),
    Category(FilterMode),
}

impl FilterChoice {
    fn key(&self) -> &'static str {
        match self {
            FilterChoice::Support(support) => support.key(),
            FilterChoice::Category(mode) => mode.key(),
        }
    }

    fn group(&self) -> ControlGroup {
        match self {
            FilterChoice::Support(_) => ControlGroup::Support,
            FilterChoice::Category(_) => ControlGroup::Category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub label: String,
    /// Identifier as accepted by [`SupportMode::parse`] or [`FilterMode::parse`]
    pub key: &'static str,
    pub group: ControlGroup,
    pub active: bool,
    #[serde(skip)]
    choice: FilterChoice,
    /// Hidden until the catalogue has loaded
    #[serde(skip)]
    deferred: bool,
}

impl FilterControl {
    fn new(label: &str, choice: FilterChoice, deferred: bool) -> Self {
        Self {
            label: label.to_string(),
            key: choice.key(),
            group: choice.group(),
            active: false,
            choice,
            deferred,
        }
    }

    fn support(label: &str, support: SupportMode) -> Self {
        Self::new(label, FilterChoice::Support(support), false)
    }

    fn category(label: &str, mode: FilterMode, deferred: bool) -> Self {
        Self::new(label, FilterChoice::Category(mode), deferred)
    }

    pub fn choice(&self) -> &FilterChoice {
        &self.choice
    }

    fn mode(&self) -> Option<&FilterMode> {
        match &self.choice {
            FilterChoice::Category(mode) => Some(mode),
            FilterChoice::Support(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterControls {
    controls: Vec<FilterControl>,
    loaded: bool,
}

impl FilterControls {
    /// Full control list before any data is known: genre and special
    /// controls stay hidden behind skeletons until [`reconcile`](Self::reconcile).
    pub fn new(profile: Profile) -> Self {
        let mut controls = vec![
            FilterControl::support("All", SupportMode::All),
            FilterControl::support("Online Supported", SupportMode::Online),
            FilterControl::support("Bypass Supported", SupportMode::Bypass),
            FilterControl::category("All", FilterMode::All, false),
            FilterControl::category(MOST_DOWNLOADED_LABEL, FilterMode::MostDownloaded, true),
        ];
        let denuvo = FilterControl::category(DENUVO_LABEL, FilterMode::RequiresMembership, true);

        if profile.shows_genres() {
            for group in genres::genre_groups() {
                let label = group.label.clone();
                let is_anchor = label == DENUVO_ANCHOR;
                controls.push(FilterControl::category(&label, FilterMode::Genre(group), true));
                if is_anchor {
                    controls.push(denuvo.clone());
                }
            }
        } else {
            controls.push(denuvo);
        }

        let mut built = Self {
            controls,
            loaded: false,
        };
        built.ensure_active();
        built
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Skeleton placeholders to draw after the category row.
    pub fn skeletons(&self) -> usize {
        if self.loaded {
            0
        } else {
            SKELETON_COUNT
        }
    }

    /// Drop the skeletons, reveal the special controls and keep only genre
    /// controls with at least one matching record.
    pub fn reconcile(&mut self, records: &[GameRecord]) {
        let present = genres::present_labels(records);
        let had_anchor = self.controls.iter().any(is_anchor);

        self.controls.retain(|control| match control.mode() {
            Some(FilterMode::Genre(selection)) => present.contains(selection.label.as_str()),
            _ => true,
        });

        if had_anchor && !self.controls.iter().any(is_anchor) {
            if let Some(pos) = self
                .controls
                .iter()
                .position(|c| c.mode() == Some(&FilterMode::RequiresMembership))
            {
                let denuvo = self.controls.remove(pos);
                self.controls.push(denuvo);
            }
        }

        for control in &mut self.controls {
            control.deferred = false;
        }
        self.ensure_active();
        self.loaded = true;
        tracing::debug!(
            controls = self.controls.len(),
            genres = present.len(),
            "filter controls reconciled"
        );
    }

    /// Controls currently shown, support row first.
    pub fn visible(&self) -> Vec<&FilterControl> {
        self.controls.iter().filter(|c| !c.deferred).collect()
    }

    /// Visible controls of one row.
    pub fn row(&self, group: ControlGroup) -> Vec<&FilterControl> {
        self.controls
            .iter()
            .filter(|c| !c.deferred && c.group == group)
            .collect()
    }

    pub fn active(&self, group: ControlGroup) -> Option<&FilterControl> {
        self.controls.iter().find(|c| c.active && c.group == group)
    }

    /// Active support preset and category preset.
    pub fn selection(&self) -> (SupportMode, FilterMode) {
        let support = match self.active(ControlGroup::Support).map(FilterControl::choice) {
            Some(FilterChoice::Support(support)) => *support,
            _ => SupportMode::All,
        };
        let mode = self
            .active(ControlGroup::Category)
            .and_then(FilterControl::mode)
            .cloned()
            .unwrap_or_default();
        (support, mode)
    }

    /// Activate the `index`-th visible control and return what it applies.
    pub fn activate(&mut self, index: usize) -> Option<FilterChoice> {
        let target = self
            .controls
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.deferred)
            .nth(index)
            .map(|(pos, _)| pos)?;
        Some(self.activate_at(target))
    }

    /// Activate the visible category control whose mode equals `mode`.
    pub fn activate_mode(&mut self, mode: &FilterMode) -> Option<FilterMode> {
        let target = self
            .controls
            .iter()
            .position(|c| !c.deferred && c.mode() == Some(mode))?;
        self.activate_at(target);
        Some(mode.clone())
    }

    pub fn activate_support(&mut self, support: SupportMode) {
        let wanted = FilterChoice::Support(support);
        if let Some(target) = self.controls.iter().position(|c| c.choice == wanted) {
            self.activate_at(target);
        }
    }

    fn activate_at(&mut self, target: usize) -> FilterChoice {
        let group = self.controls[target].group;
        for (pos, control) in self.controls.iter_mut().enumerate() {
            if control.group == group {
                control.active = pos == target;
            }
        }
        tracing::debug!(label = %self.controls[target].label, "filter control activated");
        self.controls[target].choice.clone()
    }

    fn ensure_active(&mut self) {
        for group in [ControlGroup::Support, ControlGroup::Category] {
            if self.active(group).is_some() {
                continue;
            }
            if let Some(first) = self.controls.iter_mut().find(|c| c.group == group) {
                first.active = true;
            }
        }
    }
}

fn is_anchor(control: &FilterControl) -> bool {
    matches!(control.mode(), Some(FilterMode::Genre(GenreSelection { label, .. })) if label == DENUVO_ANCHOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(controls: &FilterControls, group: ControlGroup) -> Vec<String> {
        controls.row(group).iter().map(|c| c.label.clone()).collect()
    }

    fn active_label(controls: &FilterControls, group: ControlGroup) -> Option<&str> {
        controls.active(group).map(|c| c.label.as_str())
    }

    fn with_genre(appid: &str, genre: Option<&str>) -> GameRecord {
        let mut record = GameRecord::sample(appid, appid);
        record.primary_genre = genre.map(str::to_string);
        record
    }

    #[test]
    fn skeletons_hide_genre_and_special_controls_before_load() {
        let controls = FilterControls::new(Profile::Full);
        assert!(!controls.is_loaded());
        assert_eq!(controls.skeletons(), SKELETON_COUNT);
        assert_eq!(
            labels(&controls, ControlGroup::Support),
            vec!["All", "Online Supported", "Bypass Supported"]
        );
        assert_eq!(labels(&controls, ControlGroup::Category), vec!["All"]);
        assert_eq!(active_label(&controls, ControlGroup::Support), Some("All"));
        assert_eq!(active_label(&controls, ControlGroup::Category), Some("All"));
    }

    #[test]
    fn reconcile_prunes_absent_genres_and_places_denuvo_after_casual() {
        let mut controls = FilterControls::new(Profile::Full);
        controls.reconcile(&[
            with_genre("1", Some("1")),
            with_genre("2", Some("4")),
            with_genre("3", Some("23")),
            with_genre("4", None),
        ]);

        assert_eq!(controls.skeletons(), 0);
        assert_eq!(
            labels(&controls, ControlGroup::Category),
            vec![
                "All",
                MOST_DOWNLOADED_LABEL,
                "Action",
                "Casual",
                DENUVO_LABEL,
                "Indie",
                "Unknown Genre",
            ]
        );
        assert_eq!(labels(&controls, ControlGroup::Support).len(), 3);
    }

    #[test]
    fn denuvo_goes_last_when_casual_is_pruned() {
        let mut controls = FilterControls::new(Profile::Full);
        controls.reconcile(&[with_genre("1", Some("1")), with_genre("2", Some("70"))]);
        let shown = labels(&controls, ControlGroup::Category);
        assert_eq!(shown.last().map(String::as_str), Some(DENUVO_LABEL));
        assert!(!shown.iter().any(|l| l == "Casual"));
    }

    #[test]
    fn compact_profile_has_no_genre_controls() {
        let mut controls = FilterControls::new(Profile::Compact);
        controls.reconcile(&[with_genre("1", Some("1"))]);
        assert_eq!(
            labels(&controls, ControlGroup::Category),
            vec!["All", MOST_DOWNLOADED_LABEL, DENUVO_LABEL]
        );
    }

    #[test]
    fn activation_is_exclusive_within_a_row() {
        let mut controls = FilterControls::new(Profile::Full);
        controls.reconcile(&[with_genre("1", Some("23"))]);

        assert_eq!(
            controls.activate(1),
            Some(FilterChoice::Support(SupportMode::Online))
        );
        // Support row is 0..3, category row starts with All, Most Downloaded, Indie.
        match controls.activate(5) {
            Some(FilterChoice::Category(FilterMode::Genre(selection))) => {
                assert_eq!(selection.label, "Indie")
            }
            other => panic!("unexpected choice {other:?}"),
        }
        assert_eq!(
            controls.row(ControlGroup::Category).iter().filter(|c| c.active).count(),
            1
        );
        assert_eq!(
            active_label(&controls, ControlGroup::Support),
            Some("Online Supported")
        );

        assert_eq!(
            controls.activate_mode(&FilterMode::MostDownloaded),
            Some(FilterMode::MostDownloaded)
        );
        assert_eq!(
            controls.selection(),
            (SupportMode::Online, FilterMode::MostDownloaded)
        );
        assert!(controls.activate(99).is_none());
    }

    #[test]
    fn support_activation_leaves_category_alone() {
        let mut controls = FilterControls::new(Profile::Compact);
        controls.reconcile(&[]);
        controls.activate_mode(&FilterMode::RequiresMembership);
        controls.activate_support(SupportMode::Bypass);
        assert_eq!(
            controls.selection(),
            (SupportMode::Bypass, FilterMode::RequiresMembership)
        );
    }

    #[test]
    fn deferred_controls_cannot_be_activated_before_load() {
        let mut controls = FilterControls::new(Profile::Full);
        assert!(controls.activate_mode(&FilterMode::MostDownloaded).is_none());
        assert_eq!(
            controls.activate(1),
            Some(FilterChoice::Support(SupportMode::Online))
        );
        assert_eq!(
            controls.activate(3),
            Some(FilterChoice::Category(FilterMode::All))
        );
        assert!(controls.activate(4).is_none());
    }
}
