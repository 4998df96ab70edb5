//! Catalogue module
//!
//! Game records as delivered by the catalogue API, the genre taxonomy used to
//! label and group them, and the HTTP client that fetches them.

mod client;
pub mod genres;
mod record;

pub use client::{CatalogueClient, CatalogueError};
pub use genres::GenreSelection;
pub use record::{GameRecord, UNKNOWN_GENRE_ID};
