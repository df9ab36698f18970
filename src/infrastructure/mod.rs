//! Infrastructure layer providing external service integrations.
//!
//! Session persistence, the HTTP client for the intake API, command-line
//! configuration and log setup.

pub mod api;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod session;

pub use api::*;
pub use config::*;
pub use logging::*;
pub use persistence::*;
pub use session::*;
