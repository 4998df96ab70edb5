//! Browse engine
//!
//! Filtering, sorting and pagination over the in-memory catalogue, plus the
//! session that holds the live state for a front-end.

pub mod filter;
pub mod paginate;
mod session;

pub use filter::{apply_filters, FilterMode, FilterState, ScopeArg, SearchScope, SupportMode};
pub use paginate::{PageError, PaginationControls};
pub use session::BrowseSession;
