//! Interactive terminal form (ratatui + crossterm).

pub mod app;
pub mod draw;
pub mod form;
pub mod theme;

pub use app::{run, App};
pub use form::{Field, FormAction, FormState};
