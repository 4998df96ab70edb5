//! TUI application state types.

use std::cell::Cell;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use crate::browse::{BrowseSession, SearchScope};
use crate::catalogue::GameRecord;
use crate::config::Config;
use crate::controls::FilterControls;
use crate::navigation::Navigator;
use crate::purchase::PurchaseTracker;
use crate::render::{CardView, CopyFeedback, CoverResolution, Profile};
use crate::storage::{ClientStore, LocalStorage, MemoryStore};

/// Skeleton cards drawn while the catalogue loads.
pub(crate) const SKELETON_CARDS: usize = 24;

/// Which widget receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Grid,
    Search,
    Filters,
    Jump,
    Receipt,
}

#[derive(Debug)]
pub(crate) struct LoadState {
    pub started_at: Instant,
    pub rx: mpsc::Receiver<Vec<GameRecord>>,
}

#[derive(Debug)]
pub(crate) struct CoverLookup {
    pub appid: String,
    pub rx: mpsc::Receiver<CoverResolution>,
}

#[derive(Debug, Clone)]
pub(crate) struct ModalState {
    pub title: String,
    pub message: String,
    pub kind: ModalKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModalKind {
    Error,
    Info,
}

pub(crate) struct AnimationState {
    pub tick: u64,
}

impl AnimationState {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        FRAMES[(self.tick as usize / 6) % FRAMES.len()]
    }
}

pub(crate) struct App {
    pub config: Config,
    pub profile: Profile,
    pub page_size: usize,
    pub navigator: Navigator,
    pub controls: FilterControls,
    /// `None` until the catalogue has arrived
    pub session: Option<BrowseSession>,
    pub load: Option<LoadState>,
    pub focus: Focus,
    pub search_input: String,
    /// Scope edits made before the catalogue arrives
    pub pending_scope: SearchScope,
    pub filter_cursor: usize,
    /// Index of the highlighted card on the current page
    pub selected: usize,
    /// Card columns of the last drawn grid
    pub grid_cols: Cell<usize>,
    pub jump_input: String,
    pub copy_feedback: CopyFeedback,
    pub cover: Option<(String, CoverResolution)>,
    pub cover_lookup: Option<CoverLookup>,
    pub tracker: PurchaseTracker<Box<dyn ClientStore>>,
    pub plan_cursor: usize,
    pub receipt_input: String,
    pub modal: Option<ModalState>,
    pub status: Option<String>,
    pub last_tick: Instant,
    pub animation: AnimationState,
}

impl App {
    pub fn new(config: Config, profile: Profile, page_size: usize) -> Self {
        let store: Box<dyn ClientStore> = match LocalStorage::new() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                tracing::warn!(error = %err, "local storage unavailable, purchase state will not persist");
                Box::new(MemoryStore::default())
            }
        };
        Self::with_store(config, profile, page_size, store)
    }

    pub fn with_store(
        config: Config,
        profile: Profile,
        page_size: usize,
        store: Box<dyn ClientStore>,
    ) -> Self {
        let tracker = PurchaseTracker::new(store, config.purchase.contact_base_url.clone());
        Self {
            profile,
            page_size: page_size.max(1),
            navigator: Navigator::default(),
            controls: FilterControls::new(profile),
            session: None,
            load: None,
            focus: Focus::Grid,
            search_input: String::new(),
            pending_scope: SearchScope::default(),
            filter_cursor: 0,
            selected: 0,
            grid_cols: Cell::new(1),
            jump_input: String::new(),
            copy_feedback: CopyFeedback::default(),
            cover: None,
            cover_lookup: None,
            tracker,
            plan_cursor: 0,
            receipt_input: String::new(),
            modal: None,
            status: None,
            last_tick: Instant::now(),
            animation: AnimationState::new(),
            config,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_none()
    }

    /// Install the fetched catalogue and render page 1.
    pub fn finish_load(&mut self, records: Vec<GameRecord>) {
        self.load = None;
        self.controls.reconcile(&records);
        self.filter_cursor = 0;

        let mut session = BrowseSession::new(Arc::new(records), self.page_size);
        session.set_scope(self.pending_scope);
        session.set_query(&self.search_input);
        let (support, mode) = self.controls.selection();
        session.select_support(support);
        session.select_mode(mode);
        self.session = Some(session);
        self.selected = 0;
    }

    pub fn search_scope(&self) -> SearchScope {
        self.session
            .as_ref()
            .map(|s| s.state().search_scope)
            .unwrap_or(self.pending_scope)
    }

    pub fn set_search_scope(&mut self, scope: SearchScope) {
        self.pending_scope = scope;
        if let Some(session) = self.session.as_mut() {
            session.set_scope(scope);
        }
        self.selected = 0;
    }

    /// Re-run the search with the current input.
    pub fn apply_search(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let before = session.current_page();
            session.set_query(&self.search_input);
            if session.current_page() != before || self.selected >= session.page_records().len() {
                self.selected = 0;
            }
        }
    }

    /// Card view models for the current page.
    pub fn page_cards(&self) -> Vec<CardView> {
        match &self.session {
            Some(session) => {
                CardView::project_page(&session.page_records(), self.profile, &self.config.images)
            }
            None => Vec::new(),
        }
    }

    pub fn selected_card(&self) -> Option<CardView> {
        self.page_cards().into_iter().nth(self.selected)
    }

    pub fn set_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.modal = Some(ModalState {
            title: title.into(),
            message: message.into(),
            kind: ModalKind::Error,
        });
    }

    pub fn set_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.modal = Some(ModalState {
            title: title.into(),
            message: message.into(),
            kind: ModalKind::Info,
        });
    }

    /// Show the receipt reminder if it is due.
    pub fn maybe_prompt_receipt(&mut self) {
        match self.tracker.take_receipt_prompt() {
            Ok(true) => self.set_info(
                "Add your receipt",
                "You picked a plan but no payment receipt is saved yet.\n\nOpen Plans, press R and paste the receipt or transaction id so we can match your payment.",
            ),
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %err, "could not record receipt prompt"),
        }
    }
}
