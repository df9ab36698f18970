//! Presentation layer handling terminal UI and user input.
//!
//! Renders the landing screen, the wizard, the auth modal and notices with
//! ratatui, and maps crossterm key events onto application actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
