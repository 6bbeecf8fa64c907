mod header;
mod help_overlay;
mod list_selector;
mod popup;
mod status_bar;

pub use header::Header;
pub use help_overlay::HelpOverlay;
pub use list_selector::{ListSelector, ListSelectorExt};
pub use popup::Popup;
pub use status_bar::{StatusBar, list_nav_hints};
