//! Screen drawing, one module per view.

pub(crate) mod catalogue;
pub(crate) mod guide;
pub(crate) mod modal;
pub(crate) mod plans;
