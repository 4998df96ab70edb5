//! Fullscreen terminal UI (TUI).
//!
//! Drives a [`BrowseSession`](crate::browse::BrowseSession) from the keyboard.
//! Network work runs on worker threads and reports back over channels that
//! the draw loop polls.

pub(crate) mod clipboard;
pub(crate) mod input;
pub(crate) mod screens;
pub(crate) mod state;
pub(crate) mod theme;
pub(crate) mod widgets;

use std::io;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Terminal;

use crate::catalogue::CatalogueClient;
use crate::config::Config;
use crate::navigation::View;
use crate::render::Profile;

use state::*;
use theme::Theme;

const FRAME_TIME: Duration = Duration::from_millis(16);

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub(crate) fn run_tui(
    rt: &tokio::runtime::Runtime,
    config: Config,
    profile: Profile,
    page_size: usize,
) -> Result<()> {
    let client = CatalogueClient::from_config(&config);
    let mut app = App::new(config, profile, page_size);
    start_load(rt, &mut app, client);
    app.maybe_prompt_receipt();

    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|f| draw(f.area(), f, &app))?;

        if let Some(load) = app.load.as_ref() {
            match load.rx.try_recv() {
                Ok(records) => {
                    app.finish_load(records);
                    continue;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    // Same outcome as a failed fetch: nothing to browse.
                    app.finish_load(Vec::new());
                    app.set_error(
                        "Load failed",
                        "Catalogue worker stopped unexpectedly.".to_string(),
                    );
                    continue;
                }
            }
        }

        if let Some(lookup) = app.cover_lookup.as_ref() {
            match lookup.rx.try_recv() {
                Ok(resolution) => {
                    let appid = lookup.appid.clone();
                    app.cover_lookup = None;
                    app.cover = Some((appid, resolution));
                    continue;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    app.cover_lookup = None;
                }
            }
        }

        let timeout = FRAME_TIME.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if input::handle_key(rt, &mut app, key)? {
                    break;
                }
            }
        }

        if app.last_tick.elapsed() >= FRAME_TIME {
            app.last_tick = Instant::now();
            app.animation.advance();
            app.copy_feedback.tick(app.last_tick);
        }
    }

    Ok(())
}

fn start_load(rt: &tokio::runtime::Runtime, app: &mut App, client: CatalogueClient) {
    let (tx, rx) = mpsc::channel();
    app.load = Some(LoadState {
        started_at: Instant::now(),
        rx,
    });

    let handle = rt.handle().clone();
    std::thread::spawn(move || {
        let records = handle.block_on(client.fetch_catalogue());
        let _ = tx.send(records);
    });
}

fn draw(area: Rect, f: &mut ratatui::Frame, app: &App) {
    let theme = Theme::default();
    let pagination = if app.navigator.pagination_visible() {
        app.session.as_ref().and_then(|s| s.pagination())
    } else {
        None
    };

    let outer_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(1), // view tabs
            Constraint::Min(0),    // content
            Constraint::Length(if pagination.is_some() { 1 } else { 0 }),
            Constraint::Length(1), // footer
        ])
        .split(area);

    widgets::header::draw_header(outer_layout[0], f, &theme, app);
    widgets::nav::draw_nav(outer_layout[1], f, &theme, &app.navigator);

    let inner = outer_layout[2];
    match app.navigator.active() {
        View::Catalogue => screens::catalogue::draw_catalogue(inner, f, app, theme),
        View::Plans => screens::plans::draw_plans(inner, f, app, theme),
        View::Guide => screens::guide::draw_guide(inner, f, app, theme),
    }

    if let Some(controls) = &pagination {
        let jump = (app.focus == Focus::Jump).then_some(app.jump_input.as_str());
        widgets::pagination::draw_pagination(outer_layout[3], f, &theme, controls, jump);
    }

    widgets::footer::draw_footer(
        outer_layout[4],
        f,
        &theme,
        footer_hints(app),
        app.search_scope(),
    );

    if app.modal.is_some() {
        screens::modal::draw_modal(inner, f, app, theme);
    }
}

fn footer_hints(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.modal.is_some() {
        return &[("Enter", "Close")];
    }
    match app.focus {
        Focus::Search => &[("Type", "Search"), ("Enter/Esc", "Done")],
        Focus::Jump => &[("0-9", "Page"), ("Enter", "Go"), ("Esc", "Cancel")],
        Focus::Receipt => &[("Type", "Receipt"), ("Enter", "Save"), ("Esc", "Cancel")],
        Focus::Filters => &[("↑/↓", "Move"), ("Enter", "Apply"), ("Esc", "Back")],
        Focus::Grid => match app.navigator.active() {
            View::Catalogue => &[
                ("/", "Search"),
                ("F", "Filters"),
                ("N/A", "Scope"),
                ("Arrows", "Move"),
                ("Enter", "Copy ID"),
                ("[ ]", "Page"),
                ("P", "Jump"),
                ("I", "Cover"),
                ("Tab", "View"),
                ("Q", "Quit"),
            ],
            View::Plans => &[
                ("↑/↓", "Plan"),
                ("Enter", "Choose"),
                ("R", "Receipt"),
                ("O", "Open link"),
                ("Tab", "View"),
                ("Q", "Quit"),
            ],
            View::Guide => &[("Tab", "View"), ("Q", "Quit")],
        },
    }
}
