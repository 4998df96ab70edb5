//! Filter control panel.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::controls::{ControlGroup, FilterControls};
use crate::tui::theme::Theme;

/// Draw the support row, then the category row and its skeletons. `cursor`
/// indexes [`FilterControls::visible`], which lists the support row first.
pub(crate) fn draw_filters(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    controls: &FilterControls,
    cursor: Option<usize>,
) {
    let mut lines = Vec::new();
    let mut idx = 0;
    for (group, heading) in [
        (ControlGroup::Support, "Support"),
        (ControlGroup::Category, "Category"),
    ] {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            heading,
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )));
        for control in controls.row(group) {
            let focused = cursor == Some(idx);
            idx += 1;
            let mut style = if control.active {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let marker = if control.active { "● " } else { "  " };
            lines.push(Line::from(Span::styled(format!("{marker}{}", control.label), style)));
        }
    }

    let width = area.width.saturating_sub(6).max(4) as usize;
    for i in 0..controls.skeletons() {
        let len = width - (i % 3) * width / 4;
        lines.push(Line::from(Span::styled(
            format!("  {}", "▒".repeat(len)),
            Style::default().fg(theme.skeleton),
        )));
    }

    let border = if cursor.is_some() { theme.accent } else { theme.border };
    let block = Block::default()
        .title(Span::styled(" Filters ", Style::default().fg(theme.text_dim)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
