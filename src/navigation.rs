//! Top-level view switching.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Catalogue,
    Plans,
    Guide,
}

impl View {
    pub const ALL: [View; 3] = [View::Catalogue, View::Plans, View::Guide];

    pub fn title(self) -> &'static str {
        match self {
            View::Catalogue => "Catalogue",
            View::Plans => "Plans",
            View::Guide => "Guide",
        }
    }
}

/// Exactly one view is active; pagination only shows on the catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    active: View,
}

impl Navigator {
    pub fn active(&self) -> View {
        self.active
    }

    pub fn activate(&mut self, view: View) {
        if self.active != view {
            tracing::debug!(from = ?self.active, to = ?view, "view changed");
        }
        self.active = view;
    }

    /// Cycle to the next view, wrapping around.
    pub fn next(&mut self) {
        let idx = View::ALL.iter().position(|v| *v == self.active).unwrap_or(0);
        self.activate(View::ALL[(idx + 1) % View::ALL.len()]);
    }

    pub fn pagination_visible(&self) -> bool {
        self.active == View::Catalogue
    }
}
