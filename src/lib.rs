//! Founders Fuel - application intake client
//!
//! A terminal client for the Founders Fuel startup programme: account login
//! and registration, a five-step application wizard, and submission to the
//! intake API.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
