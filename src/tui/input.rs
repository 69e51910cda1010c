use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Pane;

use super::app::App;

/// Handle a key event. While the keyboard engine holds a column the
/// event goes straight to it; otherwise the host's list navigation and
/// bulk commands apply.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if app.show_help {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc => app.show_help = false,
            _ => {}
        }
        return;
    }

    app.status_message = None;
    app.status_is_error = false;

    if app.editor.keyboard().is_active() {
        let focus = app.focused();
        app.editor.handle_key(key, focus.as_ref());
        app.clamp_cursors();
        app.pull_announcements();
        return;
    }

    match (key.modifiers, key.code) {
        // Quit
        (m, KeyCode::Char('q')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }

        (_, KeyCode::Char('?')) => {
            app.show_help = true;
        }

        // List navigation
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
            let cursor = app.cursor_mut(app.focus_pane);
            *cursor = cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
            let len = app.editor.arrangement().pane_len(app.focus_pane);
            let cursor = app.cursor_mut(app.focus_pane);
            *cursor = (*cursor + 1).min(len.saturating_sub(1));
        }
        (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
            *app.cursor_mut(app.focus_pane) = 0;
        }
        (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
            let len = app.editor.arrangement().pane_len(app.focus_pane);
            *app.cursor_mut(app.focus_pane) = len.saturating_sub(1);
        }

        // Pane focus
        (_, KeyCode::Tab | KeyCode::BackTab) => {
            app.focus_pane = app.focus_pane.opposite();
        }
        (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h')) => {
            app.focus_pane = Pane::Available;
        }
        (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l')) => {
            app.focus_pane = Pane::Selected;
        }

        // Mark toggle
        (KeyModifiers::NONE, KeyCode::Char('x')) => {
            if let Some(focus) = app.focused() {
                app.editor
                    .selection_mut()
                    .toggle(focus.pane, &focus.column_key);
            }
        }

        // Bulk commands over the current marks
        (KeyModifiers::NONE, KeyCode::Char('a')) => {
            let outcome = app.editor.add_marked();
            report_bulk(app, &outcome);
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            let outcome = app.editor.remove_marked();
            report_bulk(app, &outcome);
        }
        (KeyModifiers::SHIFT, KeyCode::Char('A')) => {
            let outcome = app.editor.select_all_columns();
            report_bulk(app, &outcome);
        }
        (KeyModifiers::SHIFT, KeyCode::Char('D')) => {
            let outcome = app.editor.clear_columns();
            report_bulk(app, &outcome);
        }
        // Category select from the focused column's category
        (KeyModifiers::NONE, KeyCode::Char('c')) => {
            let category = app.focused().and_then(|f| {
                app.editor
                    .catalog()
                    .get(&f.column_key)
                    .and_then(|c| c.category.clone())
            });
            match category {
                Some(cat) => {
                    let outcome = app.editor.category_select(&cat);
                    report_bulk(app, &outcome);
                }
                None => {
                    app.status_message = Some("focused column has no category".to_string());
                }
            }
        }

        // Undo / redo
        (KeyModifiers::NONE, KeyCode::Char('u')) => {
            if !app.editor.undo() {
                app.status_message = Some("nothing to undo".to_string());
            }
            app.clamp_cursors();
            app.pull_announcements();
        }
        (KeyModifiers::SHIFT, KeyCode::Char('U')) | (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            if !app.editor.redo() {
                app.status_message = Some("nothing to redo".to_string());
            }
            app.clamp_cursors();
            app.pull_announcements();
        }

        // Pick up the focused column (keyboard engine)
        (_, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            let focus = app.focused();
            app.editor.handle_key(key, focus.as_ref());
            app.pull_announcements();
        }

        _ => {}
    }
}

fn report_bulk(app: &mut App, outcome: &crate::ops::bulk::BulkOutcome) {
    app.clamp_cursors();
    if !outcome.errors.is_empty() {
        app.status_is_error = true;
        app.status_message = Some(outcome.errors.join("; "));
    } else if !outcome.warnings.is_empty() {
        app.status_message = Some(outcome.warnings.join("; "));
    } else if outcome.affected.is_empty() {
        app.status_message = Some(format!("{}: nothing to do", outcome.operation.label()));
    } else {
        app.status_message = Some(format!(
            "{}: {} columns",
            outcome.operation.label(),
            outcome.affected.len()
        ));
    }
    // Drop any queued a11y texts so the richer report above wins
    let _ = app.editor.drain_announcements();
}
