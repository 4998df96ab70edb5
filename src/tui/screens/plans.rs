//! Plans view: plan picker, receipt entry and contact link.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap};

use crate::tui::state::{App, Focus};
use crate::tui::theme::Theme;

pub(crate) fn draw_plans(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let current_plan = app.tracker.plan();
    let items: Vec<ListItem> = app
        .config
        .purchase
        .plans
        .iter()
        .enumerate()
        .map(|(idx, plan)| {
            let selected = idx == app.plan_cursor;
            let chosen = current_plan.as_deref() == Some(plan.as_str());
            let style = if selected {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(if selected { " › " } else { "   " }, style),
                Span::styled(plan.as_str(), style),
                Span::styled(
                    if chosen { "  (chosen)" } else { "" },
                    Style::default().fg(theme.online),
                ),
            ]))
        })
        .collect();

    let plans = List::new(items).block(
        Block::default()
            .title(Span::styled(" Plans ", Style::default().fg(theme.text_dim)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(plans, layout[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(layout[1]);

    let editing = app.focus == Focus::Receipt;
    let receipt_text = if editing {
        format!("{}▏", app.receipt_input)
    } else {
        app.tracker
            .receipt()
            .unwrap_or_else(|| "Press R to paste your receipt".to_string())
    };
    let receipt = Paragraph::new(Span::styled(
        receipt_text,
        Style::default().fg(if editing { theme.text } else { theme.text_dim }),
    ))
    .block(
        Block::default()
            .title(Span::styled(" Receipt ", Style::default().fg(theme.text_dim)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if editing { theme.accent } else { theme.border })),
    );
    f.render_widget(receipt, right[0]);

    let link = app
        .tracker
        .contact_link()
        .unwrap_or_else(|err| format!("Contact link unavailable: {err}"));
    let mut lines = vec![
        Line::from(Span::styled(
            "Pick a plan with Enter, pay, then save the receipt here.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled("Contact link (O to open):", Style::default().fg(theme.text_dim))),
        Line::from(Span::styled(link, Style::default().fg(theme.accent))),
    ];
    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status.as_str(), Style::default().fg(theme.online))));
    }
    let body = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, right[1]);
}
