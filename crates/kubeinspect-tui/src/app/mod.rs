//! Application state and actions

mod action;
mod menu;
mod state;

pub use action::Action;
pub use menu::{ConfirmChoice, MenuItem};
pub use state::{AppState, Screen, UiState};
