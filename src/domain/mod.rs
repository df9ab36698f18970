pub mod models;
pub mod form;
pub mod wizard;
pub mod errors;

pub use models::*;
pub use form::*;
pub use wizard::*;
pub use errors::*;
