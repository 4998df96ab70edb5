//! TUI color theme.

use ratatui::style::Color;

use crate::render::Badge;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    // Primary palette
    pub accent: Color,
    pub online: Color,
    pub bypass: Color,
    pub denuvo: Color,
    pub fresh: Color,

    // UI chrome
    pub border: Color,
    pub muted: Color,
    pub text: Color,
    pub text_dim: Color,
    pub skeleton: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 212, 255),
            online: Color::Rgb(163, 230, 53),
            bypass: Color::Rgb(167, 139, 250),
            denuvo: Color::Rgb(255, 68, 85),
            fresh: Color::Rgb(251, 191, 36),
            border: Color::Gray,
            muted: Color::DarkGray,
            text: Color::White,
            text_dim: Color::Gray,
            skeleton: Color::Rgb(55, 55, 65),
        }
    }
}

impl Theme {
    pub fn badge_color(&self, badge: &Badge) -> Color {
        match badge {
            Badge::Genre(_) => self.accent,
            Badge::Online => self.online,
            Badge::Bypass => self.bypass,
            Badge::New => self.fresh,
            Badge::Size(_) | Badge::Downloads(_) => self.text_dim,
        }
    }
}
