//! TUI components for kubeinspect
//!
//! This crate provides the terminal user interface for kubeinspect,
//! including state management, keybindings, event handling, and screens.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, ConfirmChoice, MenuItem, Screen, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{
    Header, HelpOverlay, ListSelector, ListSelectorExt, Popup, StatusBar, list_nav_hints,
};
pub use ui::screens::{
    ActionMenuScreen, ContextConfirmScreen, ContextSelectScreen, LogViewerScreen,
    NamespaceSelectScreen, ReportViewScreen, WorkloadSelectScreen,
};
pub use ui::{Layout, Theme};
