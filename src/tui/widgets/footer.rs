//! Key hints for the focused widget, with the search scope on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::browse::SearchScope;
use crate::tui::theme::Theme;

fn scope_label(scope: SearchScope) -> &'static str {
    match (scope.name(), scope.app_id()) {
        (true, true) => "name + app id",
        (true, false) => "name",
        _ => "app id",
    }
}

pub(crate) fn draw_footer(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    hints: &[(&str, &str)],
    scope: SearchScope,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!("[{key}]"), Style::default().fg(theme.accent)),
                Span::styled(format!(" {action}  "), Style::default().fg(theme.muted)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    let scope = Line::from(vec![
        Span::styled("search: ", Style::default().fg(theme.muted)),
        Span::styled(scope_label(scope), Style::default().fg(theme.text_dim)),
    ])
    .right_aligned();
    f.render_widget(Paragraph::new(scope), cols[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_label_names_enabled_fields() {
        assert_eq!(scope_label(SearchScope::BOTH), "name + app id");
        assert_eq!(scope_label(SearchScope::new(false, true)), "app id");
        assert_eq!(scope_label(SearchScope::new(false, false)), "name");
    }
}
