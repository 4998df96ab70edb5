//! Sidebar list of the current page.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem};

use crate::render::CardView;
use crate::tui::theme::Theme;

pub(crate) fn draw_sidebar(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    cards: &[CardView],
    selected: usize,
) {
    let items: Vec<ListItem> = cards
        .iter()
        .enumerate()
        .map(|(idx, card)| list_item(card, idx == selected, theme))
        .collect();

    let block = Block::default()
        .title(Span::styled(" This page ", Style::default().fg(theme.text_dim)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    f.render_widget(List::new(items).block(block), area);
}

fn list_item<'a>(card: &'a CardView, selected: bool, theme: &Theme) -> ListItem<'a> {
    let name_style = if selected {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let marker = if card.denuvo { theme.denuvo } else { theme.muted };

    ListItem::new(Line::from(vec![
        Span::styled("▌", Style::default().fg(marker)),
        Span::styled(if selected { " › " } else { "   " }, name_style),
        Span::styled(card.title.as_str(), name_style),
        Span::styled(format!("  {}", card.appid), Style::default().fg(theme.muted)),
    ]))
}
