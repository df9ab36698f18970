//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and the infrastructure
//! layer: the wizard flow, the auth modal and the notices shown to the user.

pub mod auth;
pub mod state;

pub use auth::*;
pub use state::*;
