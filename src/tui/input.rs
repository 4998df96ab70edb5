//! TUI keyboard input handling.

use std::sync::mpsc;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::browse::{paginate, BrowseSession, PageError};
use crate::controls::FilterChoice;
use crate::navigation::View;
use crate::render::CoverResolver;

use super::clipboard;
use super::state::*;

pub(crate) fn handle_key(
    rt: &tokio::runtime::Runtime,
    app: &mut App,
    key: KeyEvent,
) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return Ok(true);
    }

    if app.modal.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.modal = None;
        }
        return Ok(false);
    }

    match app.focus {
        Focus::Search => handle_search_key(app, key),
        Focus::Jump => handle_jump_key(app, key),
        Focus::Receipt => handle_receipt_key(app, key),
        Focus::Filters => handle_filters_key(app, key),
        Focus::Grid => handle_grid_key(rt, app, key),
    }
}

fn handle_grid_key(rt: &tokio::runtime::Runtime, app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Tab => {
            app.navigator.next();
            app.status = None;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            app.navigator.activate(View::ALL[idx]);
            app.status = None;
            return Ok(false);
        }
        _ => {}
    }

    match app.navigator.active() {
        View::Catalogue => handle_catalogue_key(rt, app, key),
        View::Plans => handle_plans_key(app, key),
        View::Guide => Ok(false),
    }
}

fn handle_catalogue_key(
    rt: &tokio::runtime::Runtime,
    app: &mut App,
    key: KeyEvent,
) -> Result<bool> {
    let cols = app.grid_cols.get().max(1);
    match key.code {
        KeyCode::Char('/') => app.focus = Focus::Search,
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.filter_cursor = app
                .controls
                .visible()
                .iter()
                .position(|c| c.active)
                .unwrap_or(0);
            app.focus = Focus::Filters;
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            let scope = app.search_scope();
            app.set_search_scope(scope.with_name(!scope.name()));
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let scope = app.search_scope();
            app.set_search_scope(scope.with_app_id(!scope.app_id()));
        }
        KeyCode::Left => move_selection(app, -1),
        KeyCode::Right => move_selection(app, 1),
        KeyCode::Up => move_selection(app, -(cols as isize)),
        KeyCode::Down => move_selection(app, cols as isize),
        KeyCode::Enter | KeyCode::Char('c') => copy_selected(app),
        KeyCode::PageDown | KeyCode::Char(']') => change_page(app, BrowseSession::next_page),
        KeyCode::PageUp | KeyCode::Char('[') => change_page(app, BrowseSession::prev_page),
        KeyCode::Home => change_page(app, BrowseSession::first_page),
        KeyCode::End => change_page(app, BrowseSession::last_page),
        KeyCode::Char('p') | KeyCode::Char(':') => {
            if app.session.as_ref().and_then(|s| s.pagination()).is_some() {
                app.jump_input.clear();
                app.focus = Focus::Jump;
            }
        }
        KeyCode::Char('i') | KeyCode::Char('I') => start_cover_lookup(rt, app),
        _ => {}
    }
    Ok(false)
}

fn handle_plans_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let plan_count = app.config.purchase.plans.len();
    match key.code {
        KeyCode::Up => app.plan_cursor = app.plan_cursor.saturating_sub(1),
        KeyCode::Down => {
            if app.plan_cursor + 1 < plan_count {
                app.plan_cursor += 1;
            }
        }
        KeyCode::Enter => {
            let plan = app
                .config
                .purchase
                .plans
                .get(app.plan_cursor)
                .cloned()
                .unwrap_or_default();
            if let Err(err) = app.tracker.select_plan(&plan) {
                app.set_error("Could not save plan", err.to_string());
                return Ok(false);
            }
            app.status = app.tracker.plan().map(|p| format!("Plan saved: {p}"));
            app.maybe_prompt_receipt();
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.receipt_input.clear();
            app.focus = Focus::Receipt;
        }
        KeyCode::Char('o') | KeyCode::Char('O') => match app.tracker.contact_link() {
            Ok(link) => {
                if let Err(err) = open::that(&link) {
                    app.set_error("Could not open browser", format!("{err}\n\n{link}"));
                }
            }
            Err(err) => app.set_error("Contact link unavailable", err.to_string()),
        },
        _ => {}
    }
    Ok(false)
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => app.focus = Focus::Grid,
        KeyCode::Backspace => {
            app.search_input.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.apply_search();
        }
        _ => {}
    }
    Ok(false)
}

fn handle_jump_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.jump_input.clear();
            app.focus = Focus::Grid;
        }
        KeyCode::Enter => {
            let total = app.session.as_ref().map_or(0, |s| s.total_pages());
            if let Some(page) = paginate::parse_jump(&app.jump_input, total) {
                change_page(app, |session| session.go_to_page(page));
            }
            app.jump_input.clear();
            app.focus = Focus::Grid;
        }
        KeyCode::Backspace => {
            app.jump_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() && app.jump_input.len() < 6 => {
            app.jump_input.push(c);
        }
        _ => {}
    }
    Ok(false)
}

fn handle_receipt_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Grid,
        KeyCode::Enter => {
            match app.tracker.save_receipt(&app.receipt_input) {
                Ok(true) => {
                    app.status = Some("Receipt saved".to_string());
                    app.receipt_input.clear();
                    app.focus = Focus::Grid;
                }
                Ok(false) => {}
                Err(err) => app.set_error("Could not save receipt", err.to_string()),
            }
        }
        KeyCode::Backspace => {
            app.receipt_input.pop();
        }
        KeyCode::Char(c) => app.receipt_input.push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_filters_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let count = app.controls.visible().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('F') => app.focus = Focus::Grid,
        KeyCode::Up | KeyCode::Left => app.filter_cursor = app.filter_cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Right => {
            if app.filter_cursor + 1 < count {
                app.filter_cursor += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(choice) = app.controls.activate(app.filter_cursor) {
                if let Some(session) = app.session.as_mut() {
                    match choice {
                        FilterChoice::Support(support) => session.select_support(support),
                        FilterChoice::Category(mode) => session.select_mode(mode),
                    }
                }
                app.selected = 0;
                app.cover = None;
            }
            app.focus = Focus::Grid;
        }
        _ => {}
    }
    Ok(false)
}

fn move_selection(app: &mut App, delta: isize) {
    let len = app.session.as_ref().map_or(0, |s| s.page_records().len());
    if len == 0 {
        return;
    }
    let next = app.selected as isize + delta;
    if (0..len as isize).contains(&next) {
        app.selected = next as usize;
    }
}

fn change_page(app: &mut App, step: impl FnOnce(&mut BrowseSession) -> Result<usize, PageError>) {
    let Some(session) = app.session.as_mut() else {
        return;
    };
    if step(session).is_ok() {
        app.selected = 0;
        app.cover = None;
    }
}

fn copy_selected(app: &mut App) {
    let Some(card) = app.selected_card() else {
        return;
    };
    if let Err(err) = clipboard::copy(&card.appid) {
        tracing::warn!(error = %err, "clipboard write failed");
        return;
    }
    app.copy_feedback.record_copy(&card.appid, Instant::now());
}

fn start_cover_lookup(rt: &tokio::runtime::Runtime, app: &mut App) {
    if app.cover_lookup.is_some() {
        return;
    }
    let Some(card) = app.selected_card() else {
        return;
    };

    let (tx, rx) = mpsc::channel();
    let resolver = CoverResolver::new(&app.config.images);
    let handle = rt.handle().clone();
    let appid = card.appid.clone();
    std::thread::spawn(move || {
        let resolution = handle.block_on(resolver.resolve(&appid));
        let _ = tx.send(resolution);
    });
    app.cover_lookup = Some(CoverLookup {
        appid: card.appid,
        rx,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::GameRecord;
    use crate::config::Config;
    use crate::render::Profile;
    use crate::storage::MemoryStore;

    fn press(rt: &tokio::runtime::Runtime, app: &mut App, code: KeyCode) -> bool {
        handle_key(rt, app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(rt: &tokio::runtime::Runtime, app: &mut App, text: &str) {
        for c in text.chars() {
            press(rt, app, KeyCode::Char(c));
        }
    }

    fn records(count: usize) -> Vec<GameRecord> {
        (0..count)
            .map(|i| {
                let mut record = GameRecord::sample(&format!("{}", 500 + i), &format!("Game {i}"));
                record.downloads = i as u64;
                record
            })
            .collect()
    }

    fn loaded_app(count: usize, page_size: usize) -> App {
        let mut app = App::with_store(
            Config::default(),
            Profile::Full,
            page_size,
            Box::new(MemoryStore::default()),
        );
        app.finish_load(records(count));
        app
    }

    #[test]
    fn typing_in_search_filters_and_resets_page() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(30, 10);
        press(&rt, &mut app, KeyCode::PageDown);
        assert_eq!(app.session.as_ref().unwrap().current_page(), 2);

        press(&rt, &mut app, KeyCode::Char('/'));
        type_text(&rt, &mut app, "game 2");
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.current_page(), 1);
        // "game 2" and "game 20".."game 29"
        assert_eq!(session.total_matches(), 11);

        assert!(!press(&rt, &mut app, KeyCode::Esc));
        assert_eq!(app.focus, Focus::Grid);
        assert!(press(&rt, &mut app, KeyCode::Esc));
    }

    #[test]
    fn jump_ignores_out_of_range_pages() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(30, 10);

        press(&rt, &mut app, KeyCode::Char('p'));
        type_text(&rt, &mut app, "4");
        press(&rt, &mut app, KeyCode::Enter);
        assert_eq!(app.session.as_ref().unwrap().current_page(), 1);

        press(&rt, &mut app, KeyCode::Char('p'));
        type_text(&rt, &mut app, "3");
        press(&rt, &mut app, KeyCode::Enter);
        assert_eq!(app.session.as_ref().unwrap().current_page(), 3);
        assert_eq!(app.focus, Focus::Grid);
    }

    #[test]
    fn filter_chosen_while_loading_applies_after_load() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::with_store(
            Config::default(),
            Profile::Full,
            10,
            Box::new(MemoryStore::default()),
        );
        press(&rt, &mut app, KeyCode::Char('f'));
        press(&rt, &mut app, KeyCode::Down);
        press(&rt, &mut app, KeyCode::Enter);

        let mut data = records(3);
        data[1].online_supported = "Yes".to_string();
        app.finish_load(data);

        let session = app.session.as_ref().unwrap();
        assert!(session.state().online_only);
        assert_eq!(session.total_matches(), 1);
    }

    #[test]
    fn selecting_a_plan_prompts_for_receipt_once() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(1, 10);
        press(&rt, &mut app, KeyCode::Char('2'));
        press(&rt, &mut app, KeyCode::Down);
        press(&rt, &mut app, KeyCode::Enter);

        assert_eq!(app.tracker.plan().as_deref(), Some("Yearly"));
        assert!(app.modal.is_some());
        press(&rt, &mut app, KeyCode::Enter);
        assert!(app.modal.is_none());

        press(&rt, &mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
    }

    #[test]
    fn receipt_entry_is_trimmed_and_blank_is_ignored() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(1, 10);
        press(&rt, &mut app, KeyCode::Char('2'));

        press(&rt, &mut app, KeyCode::Char('r'));
        type_text(&rt, &mut app, "   ");
        press(&rt, &mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Receipt);
        assert_eq!(app.tracker.receipt(), None);

        app.receipt_input.clear();
        type_text(&rt, &mut app, " TX-9 ");
        press(&rt, &mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Grid);
        assert_eq!(app.tracker.receipt().as_deref(), Some("TX-9"));
    }

    #[test]
    fn scope_toggles_never_disable_both() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(3, 10);
        press(&rt, &mut app, KeyCode::Char('a'));
        press(&rt, &mut app, KeyCode::Char('n'));
        let scope = app.search_scope();
        assert!(scope.name());
        assert!(!scope.app_id());
    }
}
