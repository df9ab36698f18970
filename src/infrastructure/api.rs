//! Client for the intake service's JSON API.
//!
//! Every response carries `{ "success": bool, ... }`. The client turns that
//! envelope into an [`ApiResult`]; anything that never produced a usable
//! envelope collapses into the generic network failure.

use super::session::SessionStore;
use crate::domain::{
    ApiResult, Application, ApplicationRequest, AuthSession, LoginRequest, PaymentUpdate,
    RegisterRequest, TransportError, TransportResult, User, NETWORK_ERROR, NOT_AUTHENTICATED,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const REJECTED_WITHOUT_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// One call against the API. `segments` are raw path components below the
/// base URL; the transport percent-encodes each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Unencoded path, for logs and assertions.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Sends one request and returns the decoded JSON body, whatever the status.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> TransportResult<Value>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Request(format!("invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Request(format!("API URL {} cannot carry a path", base_url)));
        }
        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &ApiRequest) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Request(format!("API URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> TransportResult<Value> {
        let url = self.url_for(request)?;
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
        };
        builder = builder.header(CONTENT_TYPE, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status();
        response
            .json::<Value>()
            .map_err(|e| TransportError::Decode(format!("{} (status {})", e, status)))
    }
}

pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates an account. The caller persists the returned token and user.
    pub fn register(&self, session: &SessionStore, data: &RegisterRequest) -> ApiResult<AuthSession> {
        let Some(body) = to_body("register", data) else {
            return ApiResult::failure(NETWORK_ERROR);
        };
        self.call("register", Method::Post, &["auth", "register"], session.token(), Some(body), None)
    }

    /// Logs in. The caller persists the returned token and user.
    pub fn login(&self, session: &SessionStore, email: &str, password: &str) -> ApiResult<AuthSession> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let Some(body) = to_body("login", &request) else {
            return ApiResult::failure(NETWORK_ERROR);
        };
        self.call("login", Method::Post, &["auth", "login"], session.token(), Some(body), None)
    }

    /// Fetches the profile behind the stored token and refreshes the cache.
    pub fn fetch_current_user(&self, session: &mut SessionStore) -> ApiResult<User> {
        let Some(token) = session.token() else {
            return ApiResult::failure(NOT_AUTHENTICATED);
        };
        let result: ApiResult<User> =
            self.call("current user", Method::Get, &["auth", "me"], Some(token), None, Some("user"));
        if let ApiResult::Success(user) = &result {
            if let Err(e) = session.set_user(user) {
                tracing::warn!(error = %e, "could not cache refreshed user");
            }
        }
        result
    }

    pub fn submit_application(
        &self,
        session: &SessionStore,
        data: &ApplicationRequest,
    ) -> ApiResult<Application> {
        let Some(token) = session.token() else {
            return ApiResult::failure(NOT_AUTHENTICATED);
        };
        let Some(body) = to_body("submit application", data) else {
            return ApiResult::failure(NETWORK_ERROR);
        };
        self.call(
            "submit application",
            Method::Post,
            &["application", "submit"],
            Some(token),
            Some(body),
            Some("application"),
        )
    }

    /// Marks the payment of an application as completed.
    pub fn update_payment_status(
        &self,
        session: &SessionStore,
        application_id: &str,
        payment_id: &str,
    ) -> ApiResult<Application> {
        let Some(token) = session.token() else {
            return ApiResult::failure(NOT_AUTHENTICATED);
        };
        let Some(body) = to_body("update payment", &PaymentUpdate::completed(payment_id)) else {
            return ApiResult::failure(NETWORK_ERROR);
        };
        self.call(
            "update payment",
            Method::Put,
            &["application", application_id, "payment"],
            Some(token),
            Some(body),
            Some("application"),
        )
    }

    pub fn my_applications(&self, session: &SessionStore) -> ApiResult<Vec<Application>> {
        let Some(token) = session.token() else {
            return ApiResult::failure(NOT_AUTHENTICATED);
        };
        self.call(
            "my applications",
            Method::Get,
            &["application", "my-applications"],
            Some(token),
            None,
            Some("applications"),
        )
    }

    fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        bearer: Option<String>,
        body: Option<Value>,
        payload_field: Option<&str>,
    ) -> ApiResult<T> {
        let request = ApiRequest {
            method,
            segments: segments.iter().map(|segment| segment.to_string()).collect(),
            bearer,
            body,
        };
        tracing::debug!(operation, path = %request.path(), authenticated = request.bearer.is_some(), "sending request");

        match self.transport.send(&request) {
            Ok(envelope) => interpret(operation, envelope, payload_field),
            Err(e) => {
                tracing::warn!(operation, error = %e, "transport failure");
                ApiResult::failure(NETWORK_ERROR)
            }
        }
    }
}

fn to_body<T: Serialize>(operation: &'static str, data: &T) -> Option<Value> {
    match serde_json::to_value(data) {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::warn!(operation, error = %e, "could not encode request body");
            None
        }
    }
}

fn interpret<T: DeserializeOwned>(
    operation: &'static str,
    envelope: Value,
    payload_field: Option<&str>,
) -> ApiResult<T> {
    let success = envelope.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(REJECTED_WITHOUT_MESSAGE)
            .to_string();
        tracing::info!(operation, %message, "request rejected");
        return ApiResult::Failure { message };
    }

    let payload = match payload_field {
        Some(field) => envelope.get(field).cloned().unwrap_or(Value::Null),
        None => envelope,
    };
    match serde_json::from_value(payload) {
        Ok(payload) => ApiResult::Success(payload),
        Err(e) => {
            tracing::warn!(operation, error = %e, "unexpected response payload");
            ApiResult::failure(NETWORK_ERROR)
        }
    }
}
