//! Reusable TUI widget components.

pub(crate) mod card;
pub(crate) mod filters;
pub(crate) mod footer;
pub(crate) mod header;
pub(crate) mod nav;
pub(crate) mod pagination;
pub(crate) mod sidebar;
