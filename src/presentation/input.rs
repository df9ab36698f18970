use crate::application::{App, AppMode, AuthMode};
use crate::domain::FormSection;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        // Input is ignored while a request is in flight.
        if app.has_pending() {
            return;
        }
        if app.active_notice().is_some() {
            Self::handle_notice(app, key);
            return;
        }
        match app.mode() {
            AppMode::Landing => Self::handle_landing(app, key),
            AppMode::Wizard => Self::handle_wizard(app, key, modifiers),
            AppMode::Auth => Self::handle_auth(app, key, modifiers),
            AppMode::Applications => Self::handle_applications(app, key),
        }
    }

    fn handle_notice(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
    }

    fn handle_landing(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('a') | KeyCode::Enter => app.open_application_form(),
            KeyCode::Char('l') => app.show_auth_modal(),
            KeyCode::Char('m') => app.show_applications(),
            KeyCode::Char('o') if app.session.is_logged_in() => app.logout(),
            _ => {}
        }
    }

    fn handle_wizard(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('n') => app.next_step(),
                KeyCode::Char('p') => app.prev_step(),
                KeyCode::Char('s') => app.begin_submit(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => app.close_application_form(),
            KeyCode::Enter => {
                if app.wizard.is_last_step() {
                    app.begin_submit();
                } else {
                    app.next_step();
                }
            }
            _ => {
                if let Some(section) = app.wizard.active_section_mut() {
                    Self::edit_section(section, key);
                }
            }
        }
    }

    fn handle_auth(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('l') => app.auth.switch_mode(AuthMode::Login),
                KeyCode::Char('r') => app.auth.switch_mode(AuthMode::Register),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => app.close_auth_modal(),
            KeyCode::Enter => app.begin_auth_submit(),
            KeyCode::Left | KeyCode::Right => app.auth.toggle_mode(),
            _ => Self::edit_section(app.auth.active_form_mut(), key),
        }
    }

    fn handle_applications(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_applications();
        }
    }

    fn edit_section(section: &mut FormSection, key: KeyCode) {
        match key {
            KeyCode::Tab | KeyCode::Down => section.focus_next(),
            KeyCode::BackTab | KeyCode::Up => section.focus_previous(),
            KeyCode::Backspace => section.backspace(),
            KeyCode::Char(' ') if section.focused().is_some_and(|f| f.spec.kind.is_checkbox()) => {
                section.toggle_focused();
            }
            KeyCode::Char(c) => section.insert_char(c),
            _ => {}
        }
    }
}
