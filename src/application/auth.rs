//! Login / register modal and the session transitions it drives.

use super::state::{App, NoticeKind, PendingAction, LOGGED_IN_CTA, LOGGED_OUT_CTA};
use crate::domain::{ApiResult, AuthSession, FormSection, RegisterRequest, User, LOGIN_FIELDS, REGISTER_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// The modal is built once; showing it again keeps whatever was typed.
#[derive(Debug, Clone)]
pub struct AuthModal {
    visible: bool,
    mode: AuthMode,
    pub login: FormSection,
    pub register: FormSection,
    /// Set while a login or register call is outstanding.
    pub busy: bool,
}

impl Default for AuthModal {
    fn default() -> Self {
        Self {
            visible: false,
            mode: AuthMode::Login,
            login: FormSection::new(LOGIN_FIELDS),
            register: FormSection::new(REGISTER_FIELDS),
            busy: false,
        }
    }
}

impl AuthModal {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    pub fn active_form(&self) -> &FormSection {
        match self.mode {
            AuthMode::Login => &self.login,
            AuthMode::Register => &self.register,
        }
    }

    pub fn active_form_mut(&mut self) -> &mut FormSection {
        match self.mode {
            AuthMode::Login => &mut self.login,
            AuthMode::Register => &mut self.register,
        }
    }
}

impl App {
    pub fn show_auth_modal(&mut self) {
        self.auth.show();
    }

    pub fn close_auth_modal(&mut self) {
        self.auth.hide();
    }

    /// Validates the visible auth form and queues the matching call.
    pub fn begin_auth_submit(&mut self) {
        if self.auth.busy || self.has_pending() {
            return;
        }
        if !self.auth.active_form_mut().flag_missing() {
            self.push_notice(NoticeKind::Error, "Missing fields", "Please fill in all required fields.");
            return;
        }
        let action = match self.auth.mode() {
            AuthMode::Login => {
                let request = self.auth.login.to_login_request();
                PendingAction::Login {
                    email: request.email,
                    password: request.password,
                }
            }
            AuthMode::Register => PendingAction::Register(self.auth.register.to_register_request()),
        };
        self.auth.busy = true;
        self.pending = Some(action);
    }

    pub fn submit_login(&mut self, email: &str, password: &str) -> bool {
        tracing::info!("logging in");
        let result = self.api.login(&self.session, email, password);
        self.auth.busy = false;
        self.complete_auth(result, "Login", "Welcome back")
    }

    pub fn submit_register(&mut self, data: &RegisterRequest) -> bool {
        tracing::info!("registering");
        let result = self.api.register(&self.session, data);
        self.auth.busy = false;
        self.complete_auth(result, "Registration", "Welcome")
    }

    fn complete_auth(&mut self, result: ApiResult<AuthSession>, action: &str, greeting: &str) -> bool {
        match result {
            ApiResult::Success(AuthSession { token, user }) => {
                if let Err(e) = self.session.set_auth(&token, &user) {
                    tracing::warn!(error = %e, "could not persist session");
                    self.push_notice(NoticeKind::Error, format!("{} failed", action), e.to_string());
                    return false;
                }
                self.auth.hide();
                self.push_notice(
                    NoticeKind::Success,
                    format!("{} successful", action),
                    format!("{}, {}", greeting, user.full_name),
                );
                self.reflect_logged_in(user);
                true
            }
            ApiResult::Failure { message } => {
                self.push_notice(NoticeKind::Error, format!("{} failed", action), message);
                false
            }
        }
    }

    /// Puts the landing screen into its logged-in shape.
    pub fn reflect_logged_in(&mut self, user: User) {
        tracing::info!(user = %user.full_name, "user logged in");
        self.cta_label = LOGGED_IN_CTA;
        self.current_user = Some(user);
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "could not clear session");
            self.push_notice(NoticeKind::Error, "Logout failed", e.to_string());
            return;
        }
        self.wizard.finish_submission();
        self.auth.hide();
        self.applications = None;
        self.current_user = None;
        self.cta_label = LOGGED_OUT_CTA;
        tracing::info!("user logged out");
        self.push_notice(NoticeKind::Info, "Logged out", "You have been logged out.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::tests::{app_with, logged_in_app};
    use crate::application::AppMode;
    use crate::infrastructure::mock::MockTransport;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_modal_defaults_to_login() {
        let modal = AuthModal::default();
        assert!(!modal.is_visible());
        assert_eq!(modal.mode(), AuthMode::Login);
        assert_eq!(modal.active_form().fields.len(), 2);
    }

    #[test]
    fn test_switch_mode_shows_one_form() {
        let mut modal = AuthModal::default();
        modal.switch_mode(AuthMode::Register);
        assert_eq!(modal.mode(), AuthMode::Register);
        assert_eq!(modal.active_form().fields[0].spec.name, "fullName");

        modal.toggle_mode();
        assert_eq!(modal.mode(), AuthMode::Login);
    }

    #[test]
    fn test_reopening_keeps_typed_values() {
        let mut modal = AuthModal::default();
        modal.show();
        modal.login.set_value("email", "a@b.com");
        modal.hide();
        modal.show();
        assert_eq!(modal.login.value("email"), "a@b.com");
    }

    #[test]
    fn test_login_persists_session_and_relabels() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": true, "token": "T", "user": {"fullName": "Amy"}}));
        let mut app = app_with(&transport);
        app.show_auth_modal();

        assert!(app.submit_login("a@b.com", "secret"));

        let session = app.session.get();
        assert_eq!(session.token.as_deref(), Some("T"));
        assert_eq!(session.user.unwrap().full_name, "Amy");
        assert!(!app.auth.is_visible());
        assert_eq!(app.cta_label, LOGGED_IN_CTA);
        assert_eq!(app.current_user.as_ref().unwrap().full_name, "Amy");
        assert_eq!(app.active_notice().unwrap().body, "Welcome back, Amy");
    }

    #[test]
    fn test_failed_login_keeps_modal_open() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": false, "message": "Invalid credentials"}));
        let mut app = app_with(&transport);
        app.show_auth_modal();

        assert!(!app.submit_login("a@b.com", "wrong"));
        assert!(app.auth.is_visible());
        assert!(!app.session.is_logged_in());
        let notice = app.active_notice().unwrap();
        assert_eq!(notice.title, "Login failed");
        assert_eq!(notice.body, "Invalid credentials");
    }

    #[test]
    fn test_register_through_pending_action() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": true, "token": "R", "user": {"fullName": "Bo"}}));
        let mut app = app_with(&transport);
        app.show_auth_modal();
        app.auth.switch_mode(AuthMode::Register);
        for (name, value) in [
            ("fullName", "Bo"),
            ("email", "bo@b.com"),
            ("password", "secret"),
            ("phone", "123"),
            ("location", "Pune"),
        ] {
            app.auth.register.set_value(name, value);
        }

        app.begin_auth_submit();
        assert!(app.auth.busy);
        assert!(app.has_pending());

        app.process_pending();
        assert!(!app.auth.busy);
        assert_eq!(app.session.token().as_deref(), Some("R"));
        assert_eq!(transport.paths(), vec!["/auth/register"]);
        assert_eq!(transport.requests()[0].body.as_ref().unwrap()["fullName"], "Bo");
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_auth_attempts_keep_email_out_of_log() {
        let transport = MockTransport::default();
        transport
            .respond(json!({"success": false, "message": "Invalid credentials"}))
            .respond(json!({"success": false, "message": "User already exists"}));
        let mut app = app_with(&transport);
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            app.submit_login("amy@example.com", "secret");
            app.submit_register(&RegisterRequest {
                full_name: "Amy".to_string(),
                email: "amy@example.com".to_string(),
                password: "secret".to_string(),
                phone: "1".to_string(),
                location: "Pune".to_string(),
            });
        });

        let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("logging in"));
        assert!(text.contains("registering"));
        assert!(!text.contains("amy@example.com"));
    }

    #[test]
    fn test_incomplete_auth_form_is_not_sent() {
        let transport = MockTransport::default();
        let mut app = app_with(&transport);
        app.show_auth_modal();
        app.auth.login.set_value("email", "a@b.com");

        app.begin_auth_submit();
        assert!(!app.has_pending());
        assert!(app.auth.login.fields[1].flagged);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_logout_clears_everything() {
        let transport = MockTransport::default();
        let mut app = logged_in_app(&transport);
        app.open_application_form();
        assert_eq!(app.mode(), AppMode::Wizard);

        app.logout();
        assert!(!app.session.is_logged_in());
        assert!(app.session.get().user.is_none());
        assert_eq!(app.cta_label, LOGGED_OUT_CTA);
        assert!(app.current_user.is_none());
        assert_eq!(app.mode(), AppMode::Landing);
    }
}
