//! Catalogue view: search bar, filter panel, card grid and sidebar.

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::render::{CardView, NO_GAMES_MESSAGE};
use crate::tui::state::{App, Focus, SKELETON_CARDS};
use crate::tui::theme::Theme;
use crate::tui::widgets::card::{draw_card, draw_skeleton_card, CARD_HEIGHT, CARD_MIN_WIDTH};
use crate::tui::widgets::filters::draw_filters;
use crate::tui::widgets::sidebar::draw_sidebar;

const FILTER_PANEL_WIDTH: u16 = 26;
const SIDEBAR_WIDTH: u16 = 34;

pub(crate) fn draw_catalogue(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Min(0),    // body
            Constraint::Length(1), // detail line
        ])
        .split(area);

    draw_search(layout[0], f, app, &theme);

    let show_sidebar = app.profile.shows_sidebar() && area.width >= 110;
    let mut columns = vec![Constraint::Length(FILTER_PANEL_WIDTH), Constraint::Min(0)];
    if show_sidebar {
        columns.push(Constraint::Length(SIDEBAR_WIDTH));
    }
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(layout[1]);

    let cursor = (app.focus == Focus::Filters).then_some(app.filter_cursor);
    draw_filters(body[0], f, &theme, &app.controls, cursor);

    let cards = app.page_cards();
    if app.is_loading() {
        draw_skeleton_grid(body[1], f, &theme);
    } else if cards.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            NO_GAMES_MESSAGE,
            Style::default().fg(theme.text),
        )))
        .block(Block::default().borders(Borders::NONE));
        f.render_widget(para, inset(body[1]));
    } else {
        draw_grid(body[1], f, app, &theme, &cards);
    }

    if show_sidebar {
        draw_sidebar(body[2], f, &theme, &cards, app.selected);
    }

    draw_detail(layout[2], f, app, &theme);
}

fn draw_search(area: Rect, f: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let focused = app.focus == Focus::Search;
    let scope = app.search_scope();
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let mut spans = vec![Span::styled(
        app.search_input.as_str(),
        Style::default().fg(theme.text),
    )];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled(
            "Search games... (/)",
            Style::default().fg(theme.muted),
        ));
    }

    let scope_line = format!(
        " {} Name (n)  {} App ID (a) ",
        check(scope.name()),
        check(scope.app_id())
    );
    let block = Block::default()
        .title(Span::styled(" Search ", Style::default().fg(theme.text_dim)))
        .title(Line::from(Span::styled(scope_line, Style::default().fg(theme.text_dim))).right_aligned())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { theme.accent } else { theme.border }));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Columns and visible rows for a grid of `area`.
pub(crate) fn grid_shape(area: Rect) -> (usize, usize) {
    let cols = (area.width / CARD_MIN_WIDTH).max(1) as usize;
    let rows = (area.height / CARD_HEIGHT).max(1) as usize;
    (cols, rows)
}

fn draw_grid(area: Rect, f: &mut ratatui::Frame, app: &App, theme: &Theme, cards: &[CardView]) {
    let (cols, rows) = grid_shape(area);
    app.grid_cols.set(cols);
    let selected_row = app.selected / cols;
    let first_row = (selected_row + 1).saturating_sub(rows);
    let card_width = area.width / cols as u16;
    let now = Instant::now();

    for (idx, card) in cards.iter().enumerate().skip(first_row * cols) {
        let row = idx / cols - first_row;
        if row >= rows {
            break;
        }
        let col = idx % cols;
        let rect = Rect {
            x: area.x + col as u16 * card_width,
            y: area.y + row as u16 * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT,
        };
        draw_card(rect, f, theme, card, idx == app.selected, &app.copy_feedback, now);
    }
}

fn draw_skeleton_grid(area: Rect, f: &mut ratatui::Frame, theme: &Theme) {
    let (cols, rows) = grid_shape(area);
    let card_width = area.width / cols as u16;
    for idx in 0..SKELETON_CARDS.min(cols * rows) {
        let rect = Rect {
            x: area.x + (idx % cols) as u16 * card_width,
            y: area.y + (idx / cols) as u16 * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT,
        };
        draw_skeleton_card(rect, f, theme);
    }
}

fn draw_detail(area: Rect, f: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let line = if let Some(load) = &app.load {
        Line::from(Span::styled(
            format!(
                "{} Loading catalogue... {}s",
                app.animation.spinner_char(),
                load.started_at.elapsed().as_secs()
            ),
            Style::default().fg(theme.accent),
        ))
    } else if let Some(lookup) = &app.cover_lookup {
        Line::from(Span::styled(
            format!("{} Resolving cover for {}...", app.animation.spinner_char(), lookup.appid),
            Style::default().fg(theme.text_dim),
        ))
    } else if let Some((appid, resolution)) = &app.cover {
        Line::from(vec![
            Span::styled(format!("Cover {appid}: "), Style::default().fg(theme.text_dim)),
            Span::styled(
                format!("{:?}", resolution.source).to_lowercase(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", resolution.url), Style::default().fg(theme.muted)),
        ])
    } else if let Some(session) = &app.session {
        Line::from(Span::styled(
            format!(
                "{} of {} games",
                session.total_matches(),
                session.records().len()
            ),
            Style::default().fg(theme.text_dim),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(1),
    }
}
