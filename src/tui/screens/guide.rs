//! Guide view.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::tui::state::App;
use crate::tui::theme::Theme;

const STEPS: &[(&str, &str)] = &[
    ("Find a game", "Type / to search by name or app id. Toggle the fields with N and A."),
    ("Narrow it down", "Press F and pick a filter: online or bypass support, a genre, Denuvo, or most downloaded."),
    ("Copy the app id", "Highlight a card and press Enter. The badge shows \"Copied!\" for a second."),
    ("Check the cover", "Press I to see which image host serves the card's cover."),
    ("Get access", "Open Plans (2), choose a plan, pay, then save your receipt and message us."),
];

pub(crate) fn draw_guide(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let mut lines = vec![Line::from("")];
    for (idx, (title, body)) in STEPS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. ", idx + 1), Style::default().fg(theme.accent)),
            Span::styled(*title, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {body}"),
            Style::default().fg(theme.text_dim),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("  Profile: {}   Page size: {}", app.profile.as_str(), app.page_size),
        Style::default().fg(theme.muted),
    )));

    let para = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(Span::styled(" Guide ", Style::default().fg(theme.text_dim)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}
