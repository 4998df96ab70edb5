//! The live browse state shared by every front-end.
//!
//! A session owns the loaded catalogue, the current [`FilterState`] and the
//! current page. Filter transitions reset to page 1; page requests outside the
//! view set leave the current page alone.

use std::sync::Arc;

use crate::catalogue::GameRecord;

use super::filter::{view_indices, FilterMode, FilterState, SearchScope, SupportMode};
use super::paginate::{self, PageError, PaginationControls};

#[derive(Debug, Clone)]
pub struct BrowseSession {
    records: Arc<Vec<GameRecord>>,
    state: FilterState,
    page_size: usize,
    current_page: usize,
    /// Indices into `records`, in view order.
    view: Vec<usize>,
}

impl BrowseSession {
    pub fn new(records: Arc<Vec<GameRecord>>, page_size: usize) -> Self {
        Self::with_state(records, page_size, FilterState::default())
    }

    pub fn with_state(records: Arc<Vec<GameRecord>>, page_size: usize, state: FilterState) -> Self {
        let mut session = Self {
            records,
            state,
            page_size: page_size.max(1),
            current_page: 1,
            view: Vec::new(),
        };
        session.refresh();
        session
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_matches(&self) -> usize {
        self.view.len()
    }

    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.view.len(), self.page_size)
    }

    /// Swap in a new filter state and go back to page 1.
    pub fn set_state(&mut self, state: FilterState) {
        if state == self.state {
            return;
        }
        self.state = state;
        self.refresh();
    }

    pub fn set_query(&mut self, raw: &str) {
        let next = self.state.clone().with_query(raw);
        self.set_state(next);
    }

    pub fn set_scope(&mut self, scope: SearchScope) {
        let next = self.state.clone().with_scope(scope);
        self.set_state(next);
    }

    pub fn select_mode(&mut self, mode: FilterMode) {
        tracing::debug!(mode = mode.key(), "filter mode selected");
        let next = self.state.clone().with_mode(mode);
        self.set_state(next);
    }

    pub fn select_support(&mut self, support: SupportMode) {
        tracing::debug!(support = support.key(), "support filter selected");
        let next = self.state.clone().with_support(support);
        self.set_state(next);
    }

    /// Move to `page`. Out-of-range requests are rejected and the current
    /// page stays as it was.
    pub fn go_to_page(&mut self, page: usize) -> Result<usize, PageError> {
        let total = self.total_pages();
        if page < 1 || page > total {
            tracing::debug!(requested = page, total, "page request ignored");
            return Err(PageError::OutOfRange {
                requested: page,
                total_pages: total,
            });
        }
        self.current_page = page;
        Ok(page)
    }

    pub fn next_page(&mut self) -> Result<usize, PageError> {
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> Result<usize, PageError> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Result<usize, PageError> {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> Result<usize, PageError> {
        self.go_to_page(self.total_pages())
    }

    /// Records on the current page; empty when nothing matches.
    pub fn page_records(&self) -> Vec<&GameRecord> {
        match paginate::paginate(&self.view, self.current_page, self.page_size) {
            Ok(page) => page.items.iter().map(|&idx| &self.records[idx]).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Whole view set in order.
    pub fn view_records(&self) -> Vec<&GameRecord> {
        self.view.iter().map(|&idx| &self.records[idx]).collect()
    }

    pub fn pagination(&self) -> Option<PaginationControls> {
        PaginationControls::build(self.current_page, self.total_pages())
    }

    fn refresh(&mut self) {
        self.view = view_indices(&self.records, &self.state);
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::GenreSelection;

    fn numbered(count: usize) -> Arc<Vec<GameRecord>> {
        Arc::new(
            (0..count)
                .map(|i| {
                    let mut record = GameRecord::sample(&format!("{}", 1000 + i), &format!("Game {i}"));
                    record.downloads = i as u64;
                    record
                })
                .collect(),
        )
    }

    #[test]
    fn out_of_range_page_keeps_current_page() {
        let mut session = BrowseSession::new(numbered(120), 50);
        assert_eq!(session.total_pages(), 3);
        session.go_to_page(2).unwrap();

        assert!(session.go_to_page(4).is_err());
        assert_eq!(session.current_page(), 2);
        assert!(session.go_to_page(0).is_err());
        assert_eq!(session.current_page(), 2);
        assert_eq!(session.page_records()[0].appid, "1050");
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut session = BrowseSession::new(numbered(120), 50);
        session.last_page().unwrap();
        assert_eq!(session.current_page(), 3);

        session.select_mode(FilterMode::MostDownloaded);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.page_records()[0].appid, "1119");
    }

    #[test]
    fn online_survives_a_genre_pick() {
        let mut online = GameRecord::sample("1", "Online Indie");
        online.primary_genre = Some("23".to_string());
        online.online_supported = "Yes".to_string();
        let mut offline = GameRecord::sample("2", "Offline Indie");
        offline.primary_genre = Some("23".to_string());
        let mut session = BrowseSession::new(Arc::new(vec![online, offline]), 50);

        session.select_support(SupportMode::Online);
        session.select_mode(FilterMode::Genre(
            GenreSelection::for_label("Indie").unwrap(),
        ));
        assert!(session.state().online_only);
        assert_eq!(session.total_matches(), 1);
        assert_eq!(session.page_records()[0].appid, "1");

        session.select_support(SupportMode::All);
        assert_eq!(session.total_matches(), 2);
    }

    #[test]
    fn unchanged_state_does_not_reset_page() {
        let mut session = BrowseSession::new(numbered(120), 50);
        session.go_to_page(2).unwrap();
        session.set_query("   ");
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn empty_result_has_no_page_records_or_controls() {
        let mut session = BrowseSession::new(numbered(10), 50);
        session.select_mode(FilterMode::Genre(
            GenreSelection::for_label("Racing").unwrap(),
        ));
        assert_eq!(session.total_matches(), 0);
        assert!(session.page_records().is_empty());
        assert!(session.pagination().is_none());
        assert!(session.next_page().is_err());
    }

    #[test]
    fn prev_and_next_walk_within_bounds() {
        let mut session = BrowseSession::new(numbered(75), 50);
        assert!(session.prev_page().is_err());
        assert_eq!(session.next_page(), Ok(2));
        assert!(session.next_page().is_err());
        assert_eq!(session.current_page(), 2);
        assert_eq!(session.page_records().len(), 25);
        assert_eq!(session.first_page(), Ok(1));
    }

    #[test]
    fn scope_change_refilters() {
        let mut session = BrowseSession::new(numbered(20), 50);
        session.set_query("100");
        // App-id "1000".."1009" match, names do not contain "100".
        assert_eq!(session.total_matches(), 10);
        session.set_scope(SearchScope::new(true, false));
        assert_eq!(session.total_matches(), 0);
        assert_eq!(session.view_records().len(), 0);
    }
}
