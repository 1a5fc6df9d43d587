use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
        AppEvent::InputClosed => {
            log::info!("Closing form, terminal input ended");
            app.should_quit = true;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.picker.is_some() {
        handle_picker(app, key);
    } else {
        handle_form(app, key);
    }
}

fn handle_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_picker(),
        KeyCode::Enter => app.picker_confirm(),
        KeyCode::Down | KeyCode::Tab => app.picker_nav_down(),
        KeyCode::Up | KeyCode::BackTab => app.picker_nav_up(),
        KeyCode::Home => app.picker_first(),
        KeyCode::End => app.picker_last(),
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.picker_nav_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.picker_nav_up();
            }
        }
        // Letters and digits jump, so j/k are not navigation here
        KeyCode::Char(c) if c.is_alphanumeric() => app.picker_jump(c),
        _ => {}
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.focus_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.focus_prev(),

        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('s') => app.submit(),

        KeyCode::Esc => app.cancel(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Backspace | KeyCode::Delete => app.clear_focused(),

        KeyCode::PageDown => app.scroll_results_down(app.result_height.max(1)),
        KeyCode::PageUp => app.scroll_results_up(app.result_height.max(1)),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_results_down(app.result_height / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_results_up(app.result_height / 2);
        }

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_results = app
        .results_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if app.picker.is_some() => app.picker_nav_down(),
        MouseEventKind::ScrollUp if app.picker.is_some() => app.picker_nav_up(),
        MouseEventKind::ScrollDown if in_results => app.scroll_results_down(3),
        MouseEventKind::ScrollUp if in_results => app.scroll_results_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Focus;
    use biblehub_scraper::{Catalog, Field, FormController, SimulatedBackend};
    use std::sync::Arc;

    fn app() -> App {
        App::new(FormController::new(
            Arc::new(Catalog::default()),
            Arc::new(SimulatedBackend::default()),
        ))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_keyboard_selection_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_some());
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.selection().book, "Ruth");

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.focus, Focus::Field(Field::Chapter));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.selection().chapter, "2");
    }

    #[test]
    fn test_escape_closes_picker_without_selecting() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Esc);
        assert!(app.picker.is_none());
        assert_eq!(app.controller.selection().book, "");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = self::app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_lost_input_quits_even_with_picker_open() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_some());

        handle_event(&mut app, AppEvent::Tick).unwrap();
        assert!(!app.should_quit);
        handle_event(&mut app, AppEvent::InputClosed).unwrap();
        assert!(app.should_quit);
    }
}
