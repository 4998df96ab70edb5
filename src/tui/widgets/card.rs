//! Game card tile.

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::render::{Badge, CardView, CopyFeedback};
use crate::tui::theme::Theme;

/// Rows one card occupies, borders included.
pub(crate) const CARD_HEIGHT: u16 = 7;
pub(crate) const CARD_MIN_WIDTH: u16 = 26;

pub(crate) fn draw_card(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    card: &CardView,
    selected: bool,
    feedback: &CopyFeedback,
    now: Instant,
) {
    let border_color = if selected { theme.accent } else { theme.border };

    let copied = feedback.is_showing(&card.appid, now);
    let appid_style = if copied {
        Style::default().fg(theme.online).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_dim)
    };
    let appid_badge = Span::styled(
        format!(" {} ", feedback.badge_label(&card.appid, now)),
        appid_style,
    );

    let mut lines = vec![Line::from(Span::styled(
        card.title.as_str(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))];

    let mut badge_spans = Vec::new();
    for badge in &card.badges {
        if !badge_spans.is_empty() {
            badge_spans.push(Span::raw(" "));
        }
        badge_spans.push(badge_span(theme, badge));
    }
    if !badge_spans.is_empty() {
        lines.push(Line::from(badge_spans));
    }

    let mut overlay = Vec::new();
    if card.denuvo {
        overlay.push(Span::styled(
            "DENUVO",
            Style::default().fg(theme.denuvo).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(downloaded) = &card.downloaded {
        if !overlay.is_empty() {
            overlay.push(Span::raw("  "));
        }
        overlay.push(Span::styled(downloaded.as_str(), Style::default().fg(theme.muted)));
    }
    if !overlay.is_empty() {
        lines.push(Line::from(overlay));
    }

    let block = Block::default()
        .title_bottom(Line::from(appid_badge).right_aligned())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let para = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

pub(crate) fn draw_skeleton_card(area: Rect, f: &mut ratatui::Frame, theme: &Theme) {
    let width = area.width.saturating_sub(4) as usize;
    let bar = |len: usize| Line::from(Span::styled("░".repeat(len), Style::default().fg(theme.skeleton)));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.skeleton));
    let para = Paragraph::new(vec![bar(width), bar(width / 2), Line::from(""), bar(width / 3)]).block(block);
    f.render_widget(para, area);
}

fn badge_span<'a>(theme: &Theme, badge: &Badge) -> Span<'a> {
    Span::styled(
        format!("[{}]", badge.text()),
        Style::default().fg(theme.badge_color(badge)),
    )
}
