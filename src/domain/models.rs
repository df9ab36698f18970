use serde::{Deserialize, Serialize};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const PAYMENT_COMPLETED: &str = "completed";
pub const PAYMENT_REFERENCE_PREFIX: &str = "pay_demo_";

/// Profile of the logged-in founder as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "UserWire")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Documents arrive with `_id`, and also with `id` when the server serializes
/// virtuals. Either key is accepted; `id` wins when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.id.or(wire.mongo_id),
            full_name: wire.full_name,
            email: wire.email,
            phone: wire.phone,
            location: wire.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token and profile handed back by register and login.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// What the client keeps between runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ApplicationWire")]
pub struct Application {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    startup_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    payment_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl TryFrom<ApplicationWire> for Application {
    type Error = String;

    fn try_from(wire: ApplicationWire) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.mongo_id)
            .ok_or_else(|| "application without `id` or `_id`".to_string())?;
        Ok(Self {
            id,
            startup_name: wire.startup_name,
            status: wire.status,
            payment_status: wire.payment_status,
            payment_id: wire.payment_id,
            created_at: wire.created_at,
        })
    }
}

/// Body of `POST /application/submit`, assembled from the wizard right
/// before it is sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<u32>,
    pub location: String,
    pub linkedin: String,
    pub co_founders: String,
    pub team_size: Option<u32>,
    pub startup_name: String,
    pub website: String,
    pub sector: String,
    pub one_liner: String,
    pub problem_statement: String,
    pub solution: String,
    pub target_users: String,
    pub impact: String,
    pub stage: String,
    pub funding: String,
    pub pitch_link: String,
    pub commitment1: bool,
    pub commitment2: bool,
    pub commitment3: bool,
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub payment_id: String,
    pub payment_status: String,
}

impl PaymentUpdate {
    pub fn completed(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            payment_status: PAYMENT_COMPLETED.to_string(),
        }
    }
}

/// Placeholder payment identifier; there is no real payment handshake.
///
/// ```
/// use founders_fuel::domain::payment_reference;
///
/// assert_eq!(payment_reference(1700000000000), "pay_demo_1700000000000");
/// ```
pub fn payment_reference(unix_millis: u128) -> String {
    format!("{}{}", PAYMENT_REFERENCE_PREFIX, unix_millis)
}

/// Outcome of every API client operation.
///
/// Callers must branch on the variant before touching the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Failure { message: String },
}

impl<T> ApiResult<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        ApiResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResult::Success(_) => None,
            ApiResult::Failure { message } => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Success(payload) => ApiResult::Success(f(payload)),
            ApiResult::Failure { message } => ApiResult::Failure { message },
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            ApiResult::Success(payload) => Some(payload),
            ApiResult::Failure { .. } => None,
        }
    }
}
