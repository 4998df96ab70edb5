//! View tabs.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::navigation::{Navigator, View};
use crate::tui::theme::Theme;

pub(crate) fn draw_nav(area: Rect, f: &mut ratatui::Frame, theme: &Theme, navigator: &Navigator) {
    let mut spans = Vec::new();
    for (i, view) in View::ALL.iter().enumerate() {
        let style = if *view == navigator.active() {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text_dim)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.title()), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
