//! Application state for the intake client.
//!
//! [`App`] owns the wizard, the auth modal, the session and the API client,
//! and queues [`Notice`]s where a browser page would have raised an alert.
//! Network-bound actions run in two phases: a key handler records a
//! [`PendingAction`] and marks the control busy, then the event loop redraws
//! and calls [`App::process_pending`].

use super::auth::AuthModal;
use crate::domain::{payment_reference, Advance, ApiResult, Application, ApplicationRequest, RegisterRequest, User, Wizard};
use crate::infrastructure::{ApiClient, SessionStore};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

pub const LOGGED_OUT_CTA: &str = "Apply Now";
pub const LOGGED_IN_CTA: &str = "Submit Application";
pub const MISSING_FIELDS: &str = "Please fill in all required fields before proceeding.";
pub const LOGIN_REQUIRED: &str = "Please login or register first to submit an application";
pub const SUBMITTED_NOTICE: &str = "Application submitted successfully!\n\nThe admin has been notified.\n\nYou will now complete the \u{20b9}999 registration fee.";
pub const PAYMENT_RECORDED_NOTICE: &str = "Thank you! Your application has been submitted and payment recorded.\n\nYou will receive a confirmation email shortly.";

/// Which screen currently receives input, from the top-most overlay down.
///
/// The mode is derived from what is visible rather than stored, so the auth
/// modal opened over the wizard takes input until it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Landing screen with the call-to-action; no overlay open
    Landing,
    /// Application wizard is open on one of its steps
    Wizard,
    /// Login / register modal is open
    Auth,
    /// "My applications" table is shown
    Applications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A message the user has to acknowledge before continuing.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

/// A network call recorded by a key handler and run on the next loop turn.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Log in with the credentials from the login form
    Login { email: String, password: String },
    /// Create an account from the register form
    Register(RegisterRequest),
    /// Send the assembled application, then record its payment
    Submit(ApplicationRequest),
    /// Fetch the logged-in founder's applications
    LoadApplications,
}

/// Main application state: the overlays, the session and the API client.
///
/// Rendering reads it, key handlers mutate it, and every server outcome ends
/// up either in the session or in the notice queue.
///
/// # Examples
///
/// ```
/// use founders_fuel::application::{App, AppMode, LOGGED_OUT_CTA};
/// use founders_fuel::infrastructure::{ApiClient, HttpTransport, MemoryStore, SessionStore};
/// use std::time::Duration;
///
/// let transport = HttpTransport::new("http://localhost:5000/api", Duration::from_secs(5)).unwrap();
/// let session = SessionStore::new(Box::new(MemoryStore::default()));
/// let app = App::new(ApiClient::new(Box::new(transport)), session);
///
/// assert_eq!(app.mode(), AppMode::Landing);
/// assert_eq!(app.cta_label, LOGGED_OUT_CTA);
/// assert!(app.active_notice().is_none());
/// ```
pub struct App {
    /// The five-step application form
    pub wizard: Wizard,
    /// Login / register modal, built once per run
    pub auth: AuthModal,
    /// Stored token and cached profile
    pub session: SessionStore,
    pub(super) api: ApiClient,
    pub(super) pending: Option<PendingAction>,
    /// Messages waiting to be acknowledged, oldest first
    pub notices: VecDeque<Notice>,
    /// Profile shown in the header while logged in
    pub current_user: Option<User>,
    /// Label of the landing screen's call-to-action.
    pub cta_label: &'static str,
    /// True while an application submission is in flight.
    pub submitting: bool,
    /// Loaded "my applications" list; `Some` while that view is shown.
    pub applications: Option<Vec<Application>>,
}

impl App {
    /// Builds the app and rehydrates the logged-in UI from the cached profile.
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        let mut app = Self {
            wizard: Wizard::default(),
            auth: AuthModal::default(),
            session,
            api,
            pending: None,
            notices: VecDeque::new(),
            current_user: None,
            cta_label: LOGGED_OUT_CTA,
            submitting: false,
            applications: None,
        };
        if let Some(user) = app.session.user() {
            app.reflect_logged_in(user);
        }
        app
    }

    pub fn mode(&self) -> AppMode {
        if self.auth.is_visible() {
            AppMode::Auth
        } else if self.applications.is_some() {
            AppMode::Applications
        } else if self.wizard.is_open() {
            AppMode::Wizard
        } else {
            AppMode::Landing
        }
    }

    /// Re-reads the profile behind the stored token. Failures are only logged;
    /// the server will reject a stale token on the next real action.
    pub fn refresh_current_user(&mut self) {
        if !self.session.is_logged_in() {
            return;
        }
        match self.api.fetch_current_user(&mut self.session) {
            ApiResult::Success(user) => self.reflect_logged_in(user),
            ApiResult::Failure { message } => {
                tracing::info!(%message, "could not refresh current user");
            }
        }
    }

    pub fn push_notice(&mut self, kind: NoticeKind, title: impl Into<String>, body: impl Into<String>) {
        self.notices.push_back(Notice {
            kind,
            title: title.into(),
            body: body.into(),
        });
    }

    pub fn active_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs the action recorded by the last key handler, if any.
    pub fn process_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::Login { email, password } => {
                self.submit_login(&email, &password);
            }
            PendingAction::Register(request) => {
                self.submit_register(&request);
            }
            PendingAction::Submit(request) => {
                self.submit_application(&request);
            }
            PendingAction::LoadApplications => self.load_applications(),
        }
    }

    pub fn open_application_form(&mut self) {
        if !self.wizard.open(self.session.is_logged_in()) {
            tracing::info!("application form requested while logged out");
            self.push_notice(NoticeKind::Info, "Login required", LOGIN_REQUIRED);
            self.show_auth_modal();
            return;
        }
        tracing::debug!("application form opened");
    }

    pub fn close_application_form(&mut self) {
        self.wizard.close();
    }

    pub fn next_step(&mut self) {
        match self.wizard.next() {
            Advance::Moved(step) => tracing::debug!(step, "advanced"),
            Advance::AtLastStep => {}
            Advance::Blocked(missing) => {
                tracing::debug!(step = self.wizard.current_step(), ?missing, "step incomplete");
                self.push_notice(NoticeKind::Error, "Missing fields", MISSING_FIELDS);
            }
        }
    }

    pub fn prev_step(&mut self) {
        self.wizard.prev();
    }

    /// Validates the last step and queues the submission.
    pub fn begin_submit(&mut self) {
        if self.submitting || self.has_pending() {
            return;
        }
        if !self.wizard.is_open() || !self.wizard.is_last_step() {
            return;
        }
        match self.wizard.prepare_submission() {
            Some(request) => {
                self.submitting = true;
                self.pending = Some(PendingAction::Submit(request));
            }
            None => self.push_notice(NoticeKind::Error, "Missing fields", MISSING_FIELDS),
        }
    }

    /// Sends the application and, once it is accepted, records the payment.
    ///
    /// The payment call is only made after the submission succeeded. On any
    /// outcome the submit control is released.
    pub fn submit_application(&mut self, request: &ApplicationRequest) -> bool {
        self.submitting = true;
        let result = self.api.submit_application(&self.session, request);
        let accepted = match result {
            ApiResult::Success(application) => {
                tracing::info!(application = %application.id, "application submitted");
                self.push_notice(NoticeKind::Success, "Application submitted", SUBMITTED_NOTICE);
                let payment_id = payment_reference(unix_millis());
                let payment = self
                    .api
                    .update_payment_status(&self.session, &application.id, &payment_id);
                self.wizard.finish_submission();
                match payment {
                    ApiResult::Success(_) => {
                        tracing::info!(application = %application.id, %payment_id, "payment recorded");
                        self.push_notice(
                            NoticeKind::Success,
                            "Payment recorded",
                            PAYMENT_RECORDED_NOTICE,
                        );
                    }
                    ApiResult::Failure { message } => {
                        tracing::warn!(application = %application.id, %message, "payment not recorded");
                        self.push_notice(
                            NoticeKind::Info,
                            "Payment not recorded",
                            format!("Your application has been submitted, but the payment could not be recorded: {}", message),
                        );
                    }
                }
                true
            }
            ApiResult::Failure { message } => {
                self.push_notice(NoticeKind::Error, "Error submitting application", message);
                false
            }
        };
        self.submitting = false;
        accepted
    }

    pub fn show_applications(&mut self) {
        if !self.session.is_logged_in() {
            self.push_notice(NoticeKind::Info, "Login required", "Please login to see your applications");
            self.show_auth_modal();
            return;
        }
        if !self.has_pending() {
            self.pending = Some(PendingAction::LoadApplications);
        }
    }

    pub fn close_applications(&mut self) {
        self.applications = None;
    }

    fn load_applications(&mut self) {
        match self.api.my_applications(&self.session) {
            ApiResult::Success(applications) => {
                tracing::debug!(count = applications.len(), "applications loaded");
                self.applications = Some(applications);
            }
            ApiResult::Failure { message } => {
                self.push_notice(NoticeKind::Error, "Could not load applications", message);
            }
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{WizardState, NOT_AUTHENTICATED, PAYMENT_REFERENCE_PREFIX, TOTAL_STEPS};
    use crate::infrastructure::mock::MockTransport;
    use crate::infrastructure::MemoryStore;
    use serde_json::json;

    pub(crate) fn app_with(transport: &MockTransport) -> App {
        let api = ApiClient::new(Box::new(transport.clone()));
        App::new(api, SessionStore::new(Box::new(MemoryStore::default())))
    }

    pub(crate) fn logged_in_app(transport: &MockTransport) -> App {
        let mut app = app_with(transport);
        let user = User {
            full_name: "Amy".to_string(),
            ..Default::default()
        };
        app.session.set_auth("T", &user).unwrap();
        app.reflect_logged_in(user);
        app
    }

    fn fill_step(app: &mut App, step: usize) {
        let section = app.wizard.form.section_mut(step).unwrap();
        for field in &mut section.fields {
            field.text = format!("{}-value", field.spec.name);
            field.checked = true;
        }
    }

    fn app_on_last_step(transport: &MockTransport) -> App {
        let mut app = logged_in_app(transport);
        app.open_application_form();
        for step in 1..=TOTAL_STEPS {
            fill_step(&mut app, step);
        }
        for _ in 1..TOTAL_STEPS {
            app.next_step();
        }
        assert_eq!(app.wizard.state(), WizardState::Step(TOTAL_STEPS));
        app
    }

    #[test]
    fn test_new_app_logged_out() {
        let transport = MockTransport::default();
        let app = app_with(&transport);

        assert_eq!(app.mode(), AppMode::Landing);
        assert_eq!(app.cta_label, LOGGED_OUT_CTA);
        assert!(app.current_user.is_none());
        assert!(app.active_notice().is_none());
        assert!(!app.submitting);
    }

    #[test]
    fn test_new_app_rehydrates_cached_user() {
        let transport = MockTransport::default();
        let mut store = MemoryStore::default();
        {
            use crate::infrastructure::KeyValueStore;
            store.set("authToken", "T").unwrap();
            store.set("user", r#"{"fullName":"Amy","email":"a@b.com"}"#).unwrap();
        }
        let app = App::new(
            ApiClient::new(Box::new(transport.clone())),
            SessionStore::new(Box::new(store)),
        );

        assert_eq!(app.cta_label, LOGGED_IN_CTA);
        assert_eq!(app.current_user.as_ref().unwrap().full_name, "Amy");
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_refresh_current_user() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": true, "user": {"fullName": "Amy Updated"}}));
        let mut app = logged_in_app(&transport);

        app.refresh_current_user();
        assert_eq!(app.current_user.as_ref().unwrap().full_name, "Amy Updated");
        assert_eq!(app.session.user().unwrap().full_name, "Amy Updated");
    }

    #[test]
    fn test_refresh_failure_is_silent() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": false, "message": "jwt expired"}));
        let mut app = logged_in_app(&transport);

        app.refresh_current_user();
        assert!(app.active_notice().is_none());
        assert_eq!(app.current_user.as_ref().unwrap().full_name, "Amy");
    }

    #[test]
    fn test_open_while_logged_out_shows_auth() {
        let transport = MockTransport::default();
        let mut app = app_with(&transport);

        app.open_application_form();
        assert_eq!(app.wizard.state(), WizardState::Closed);
        assert!(app.auth.is_visible());
        assert_eq!(app.mode(), AppMode::Auth);
        assert_eq!(app.active_notice().unwrap().body, LOGIN_REQUIRED);
    }

    #[test]
    fn test_open_and_close() {
        let transport = MockTransport::default();
        let mut app = logged_in_app(&transport);

        app.open_application_form();
        assert_eq!(app.wizard.state(), WizardState::Step(1));
        assert_eq!(app.mode(), AppMode::Wizard);

        app.close_application_form();
        assert_eq!(app.wizard.state(), WizardState::Closed);
        assert_eq!(app.mode(), AppMode::Landing);
    }

    #[test]
    fn test_next_step_blocked_raises_notice() {
        let transport = MockTransport::default();
        let mut app = logged_in_app(&transport);
        app.open_application_form();

        app.next_step();
        assert_eq!(app.wizard.current_step(), 1);
        assert_eq!(app.active_notice().unwrap().body, MISSING_FIELDS);

        app.dismiss_notice();
        fill_step(&mut app, 1);
        app.next_step();
        assert_eq!(app.wizard.current_step(), 2);
        assert!(app.active_notice().is_none());

        app.prev_step();
        assert_eq!(app.wizard.current_step(), 1);
    }

    #[test]
    fn test_successful_submit_cycle() {
        let transport = MockTransport::default();
        transport
            .respond(json!({"success": true, "application": {"id": "app-1"}}))
            .respond(json!({"success": true, "application": {"id": "app-1", "paymentStatus": "completed"}}));
        let mut app = app_on_last_step(&transport);

        app.begin_submit();
        assert!(app.submitting);
        app.process_pending();

        assert!(!app.submitting);
        assert_eq!(app.wizard.state(), WizardState::Closed);
        assert_eq!(app.wizard.current_step(), 1);
        assert_eq!(app.wizard.form.to_request().full_name, "");
        assert_eq!(app.mode(), AppMode::Landing);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path(), "/application/submit");
        assert_eq!(requests[0].body.as_ref().unwrap()["fullName"], "fullName-value");
        assert_eq!(requests[1].path(), "/application/app-1/payment");
        let payment_id = requests[1].body.as_ref().unwrap()["paymentId"].as_str().unwrap().to_string();
        assert!(payment_id.starts_with(PAYMENT_REFERENCE_PREFIX));
        let notices: Vec<&str> = app.notices.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(notices, vec![SUBMITTED_NOTICE, PAYMENT_RECORDED_NOTICE]);
        assert!(app.notices.iter().all(|n| n.kind == NoticeKind::Success));
        app.notices.clear();

        app.open_application_form();
        assert_eq!(app.wizard.state(), WizardState::Step(1));
    }

    #[test]
    fn test_rejected_submit_never_records_payment() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": false, "message": "duplicate"}));
        let mut app = app_on_last_step(&transport);

        app.begin_submit();
        app.process_pending();

        assert_eq!(transport.paths(), vec!["/application/submit"]);
        let notice = app.active_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.body, "duplicate");
        assert_eq!(app.wizard.state(), WizardState::Step(TOTAL_STEPS));
        assert!(!app.submitting);
    }

    #[test]
    fn test_payment_failure_still_closes_wizard() {
        let transport = MockTransport::default();
        transport
            .respond(json!({"success": true, "application": {"id": "app-1"}}))
            .respond(json!({"success": false, "message": "Application not found"}));
        let mut app = app_on_last_step(&transport);

        app.begin_submit();
        app.process_pending();

        assert_eq!(app.wizard.state(), WizardState::Closed);
        assert_eq!(app.active_notice().unwrap().body, SUBMITTED_NOTICE);
        app.dismiss_notice();
        let notice = app.active_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.body.contains("Application not found"));
    }

    #[test]
    fn test_submit_accepts_application_with_both_id_keys() {
        let transport = MockTransport::default();
        transport
            .respond(json!({"success": true, "application": {"_id": "app-1", "id": "app-1"}}))
            .respond(json!({"success": true, "application": {"_id": "app-1", "id": "app-1", "paymentStatus": "completed"}}));
        let mut app = app_on_last_step(&transport);

        app.begin_submit();
        app.process_pending();

        assert_eq!(transport.paths(), vec!["/application/submit", "/application/app-1/payment"]);
        assert_eq!(app.wizard.state(), WizardState::Closed);
        assert!(app.notices.iter().all(|n| n.kind == NoticeKind::Success));
    }

    #[test]
    fn test_submit_blocked_by_missing_last_step_field() {
        let transport = MockTransport::default();
        let mut app = app_on_last_step(&transport);
        app.wizard.form.section_mut(TOTAL_STEPS).unwrap().set_checked("commitment2", false);

        app.begin_submit();
        assert!(!app.has_pending());
        assert!(!app.submitting);
        assert_eq!(app.active_notice().unwrap().body, MISSING_FIELDS);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_submit_only_from_last_step() {
        let transport = MockTransport::default();
        let mut app = logged_in_app(&transport);
        app.open_application_form();
        fill_step(&mut app, 1);

        app.begin_submit();
        assert!(!app.has_pending());
    }

    #[test]
    fn test_submit_after_session_lost() {
        let transport = MockTransport::default();
        let mut app = app_on_last_step(&transport);
        app.session.clear().unwrap();

        app.begin_submit();
        app.process_pending();

        assert!(transport.requests().is_empty());
        assert_eq!(app.active_notice().unwrap().body, NOT_AUTHENTICATED);
        assert_eq!(app.wizard.state(), WizardState::Step(TOTAL_STEPS));
    }

    #[test]
    fn test_show_applications() {
        let transport = MockTransport::default();
        transport.respond(json!({"success": true, "applications": [{"_id": "a1", "paymentStatus": "completed"}]}));
        let mut app = logged_in_app(&transport);

        app.show_applications();
        app.process_pending();
        assert_eq!(app.mode(), AppMode::Applications);
        assert_eq!(app.applications.as_ref().unwrap()[0].id, "a1");

        app.close_applications();
        assert_eq!(app.mode(), AppMode::Landing);
    }

    #[test]
    fn test_show_applications_requires_login() {
        let transport = MockTransport::default();
        let mut app = app_with(&transport);

        app.show_applications();
        assert!(!app.has_pending());
        assert!(app.auth.is_visible());
    }

    #[test]
    fn test_notice_queue_order() {
        let transport = MockTransport::default();
        let mut app = app_with(&transport);
        app.push_notice(NoticeKind::Info, "one", "1");
        app.push_notice(NoticeKind::Error, "two", "2");

        assert_eq!(app.active_notice().unwrap().title, "one");
        app.dismiss_notice();
        assert_eq!(app.active_notice().unwrap().title, "two");
        app.dismiss_notice();
        assert!(app.active_notice().is_none());
    }
}
