//! Title bar: catalogue totals on the left, profile and active filters on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::controls::ControlGroup;
use crate::tui::state::App;
use crate::tui::theme::Theme;

pub(crate) fn draw_header(area: Rect, f: &mut ratatui::Frame, theme: &Theme, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(52)])
        .split(rows[0]);

    let totals = match &app.session {
        Some(session) => Span::styled(
            format!(
                "  //  {} GAMES  //  {} MATCHES  //  PAGE {}/{}",
                session.records().len(),
                session.total_matches(),
                session.current_page(),
                session.total_pages().max(1)
            ),
            Style::default().fg(theme.text_dim),
        ),
        None => Span::styled(
            format!("  //  {} LOADING", app.animation.spinner_char()),
            Style::default().fg(theme.muted),
        ),
    };
    let title = Line::from(vec![
        Span::styled(
            "CATALOGUE BROWSER",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        totals,
    ]);
    f.render_widget(Paragraph::new(title), cols[0]);

    let filter = [ControlGroup::Support, ControlGroup::Category]
        .into_iter()
        .filter_map(|group| app.controls.active(group))
        .map(|control| control.label.as_str())
        .collect::<Vec<_>>()
        .join(" · ");
    let tags = Line::from(vec![
        Span::styled(filter, Style::default().fg(theme.text)),
        Span::styled(
            format!("  [{}]", app.profile.as_str()),
            Style::default().fg(theme.muted),
        ),
    ])
    .right_aligned();
    f.render_widget(Paragraph::new(tags), cols[1]);

    let rule = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(theme.border),
    ));
    f.render_widget(Paragraph::new(rule), rows[1]);
}
