//! Presentation layer shared by the terminal and web front-ends.
//!
//! Turns a page of records into card view models and owns the cover image
//! fallback chain.

mod card;
mod cover;

use serde::{Deserialize, Serialize};

pub use card::{Badge, CardView, CopyFeedback, COPIED_LABEL, COPY_FEEDBACK_DURATION, NO_GAMES_MESSAGE};
pub use cover::{CoverResolution, CoverResolver, CoverSource, CoverState, CoverUrls};

/// Which of the two presentations to use. Both run on the same engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Genre filters and badges, size badge, sidebar list
    #[default]
    Full,
    /// Download-count badge only
    Compact,
}

impl Profile {
    pub fn shows_genres(self) -> bool {
        self == Profile::Full
    }

    pub fn shows_size(self) -> bool {
        self == Profile::Full
    }

    pub fn shows_sidebar(self) -> bool {
        self == Profile::Full
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::Compact => "compact",
        }
    }
}
