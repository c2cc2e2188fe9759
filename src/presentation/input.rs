use crate::application::{App, AppMode};
use crate::infrastructure::ResultExporter;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key, modifiers),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => {
                    app.submit();
                    return;
                }
                KeyCode::Char('e') => {
                    app.start_csv_export();
                    return;
                }
                KeyCode::Char('n') => {
                    app.reset_form();
                    return;
                }
                _ => {}
            }
        }

        // A pending calculation owns the status line until it completes
        if !app.form.is_loading() {
            app.status_message = None;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                app.focus_previous();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                app.focus_next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                app.cycle_choice(false);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                app.cycle_choice(true);
            }
            KeyCode::Enter | KeyCode::F(2) => {
                app.activate();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            // Ctrl+R keeps the half-typed value and submits; other chords are not text
            if key == KeyCode::Char('r') {
                app.finish_editing();
                app.submit();
            }
            return;
        }

        match key {
            KeyCode::Enter | KeyCode::Tab => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                app.delete_before_cursor();
            }
            KeyCode::Delete => {
                app.delete_at_cursor();
            }
            KeyCode::Left => {
                app.move_cursor_left();
            }
            KeyCode::Right => {
                app.move_cursor_right();
            }
            KeyCode::Home => {
                app.move_cursor_home();
            }
            KeyCode::End => {
                app.move_cursor_end();
            }
            KeyCode::Char(c) => {
                app.insert_char(c);
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match key {
            KeyCode::Enter => {
                let filename = app.get_csv_export_filename();
                match app.form.result() {
                    Some(result) => {
                        let outcome = ResultExporter::export_to_csv(result, &filename);
                        app.set_csv_export_result(outcome);
                    }
                    None => app.set_csv_export_result::<&str>(Err("no result to export")),
                }
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                app.delete_before_cursor();
            }
            KeyCode::Delete => {
                app.delete_at_cursor();
            }
            KeyCode::Left => {
                app.move_cursor_left();
            }
            KeyCode::Right => {
                app.move_cursor_right();
            }
            KeyCode::Home => {
                app.move_cursor_home();
            }
            KeyCode::End => {
                app.move_cursor_end();
            }
            KeyCode::Char(c) => {
                app.insert_char(c);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::form::tests::{sample_response, StubService};
    use crate::application::Focus;
    use crate::domain::Field;
    use std::sync::Arc;

    fn app() -> App {
        App::new(Arc::new(StubService::ok(sample_response())))
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_fill_and_submit_with_keyboard() {
        let mut app = app();

        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.field(Field::LoanType), "Fixed");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "300000");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Field(Field::Term));

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.field(Field::CreditScore), "Good");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Submit);

        press(&mut app, KeyCode::Enter);
        app.wait_for_pending();

        assert_eq!(app.header_payment.get(), Some(1896.2));
    }

    #[test]
    fn test_ctrl_r_submits_from_any_field() {
        let mut app = app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.form.errors().len(), 5);
    }

    #[test]
    fn test_ctrl_n_clears_form() {
        let mut app = app();
        app.form.update_field(Field::Term, "12");
        app.focus = Focus::Submit;

        InputHandler::handle_key_event(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);

        assert_eq!(app.form.field(Field::Term), "");
        assert_eq!(app.focus, Focus::Field(Field::LoanType));
    }

    #[test]
    fn test_editing_keys() {
        let mut app = app();
        app.focus = Focus::Field(Field::LoanAmount);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);

        type_text(&mut app, "1234");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "23");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form.field(Field::LoanAmount), "");
    }

    #[test]
    fn test_typing_q_while_editing_is_text() {
        let mut app = app();
        app.focus = Focus::Field(Field::HouseAge);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.input, "q");
        assert_eq!(app.mode, AppMode::Editing);
    }

    #[test]
    fn test_ctrl_chords_while_editing_are_not_text() {
        let mut app = app();
        app.focus = Focus::Field(Field::LoanAmount);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "300000");

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);

        assert_eq!(app.input, "300000");
        assert_eq!(app.mode, AppMode::Editing);
    }

    #[test]
    fn test_ctrl_r_while_editing_commits_and_submits() {
        let mut app = app();
        app.form.update_field(Field::LoanType, "Fixed");
        app.form.update_field(Field::Term, "30");
        app.form.update_field(Field::CreditScore, "Good");
        app.form.update_field(Field::HouseAge, "5");

        app.focus = Focus::Field(Field::LoanAmount);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "300000");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form.field(Field::LoanAmount), "300000");
        assert!(app.has_pending());

        app.wait_for_pending();
        assert_eq!(app.header_payment.get(), Some(1896.2));
    }

    #[test]
    fn test_ctrl_chords_in_export_prompt_are_ignored() {
        let mut app = app();
        app.mode = AppMode::ExportCsv;
        app.filename_input = "out.csv".to_string();
        app.cursor_position = 7;

        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert_eq!(app.filename_input, "out.csv");
        assert_eq!(app.mode, AppMode::ExportCsv);
    }

    #[test]
    fn test_help_toggle_and_scroll() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 4);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_export_flow_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");

        let mut app = app();
        app.form.update_field(Field::LoanType, "Fixed");
        app.form.update_field(Field::LoanAmount, "300000");
        app.form.update_field(Field::Term, "30");
        app.form.update_field(Field::CreditScore, "Good");
        app.form.update_field(Field::HouseAge, "5");
        app.submit();
        app.wait_for_pending();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportCsv);

        app.filename_input.clear();
        app.cursor_position = 0;
        type_text(&mut app, path.to_str().unwrap());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(path.exists());
        assert_eq!(
            app.status_message.as_deref(),
            Some(format!("Exported to {}", path.display()).as_str())
        );
    }

    #[test]
    fn test_export_cancel() {
        let mut app = app();
        app.mode = AppMode::ExportCsv;
        app.filename_input = "x.csv".to_string();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.filename_input.is_empty());
    }
}
