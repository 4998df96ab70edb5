//! Pagination bar.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::browse::PaginationControls;
use crate::tui::theme::Theme;

pub(crate) fn draw_pagination(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    controls: &PaginationControls,
    jump_input: Option<&str>,
) {
    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.muted)
        };
        Span::styled(format!("[{label}]"), style)
    };

    let mut spans = vec![
        button("First", controls.first_enabled),
        Span::raw(" "),
        button("Prev", controls.prev_enabled),
        Span::raw("  "),
    ];
    for page in &controls.window {
        let style = if *page == controls.current {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text_dim)
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::raw("  "));
    spans.push(button("Next", controls.next_enabled));
    spans.push(Span::raw(" "));
    spans.push(button("Last", controls.last_enabled));

    let (jump_text, jump_style) = match jump_input {
        Some(input) => (
            format!("  Page: {input}▏ "),
            Style::default().fg(theme.accent),
        ),
        None => (
            format!("  Page: {} ", controls.current),
            Style::default().fg(theme.text_dim),
        ),
    };
    spans.push(Span::styled(jump_text, jump_style));
    spans.push(Span::styled(controls.jump_label.as_str(), Style::default().fg(theme.muted)));

    f.render_widget(Paragraph::new(Line::from(spans)).centered(), area);
}
