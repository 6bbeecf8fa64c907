//! Screen implementations

mod action_menu;
mod context_confirm;
mod context_select;
mod log_viewer;
mod namespace_select;
mod report_view;
mod workload_select;

pub use action_menu::ActionMenuScreen;
pub use context_confirm::ContextConfirmScreen;
pub use context_select::ContextSelectScreen;
pub use log_viewer::LogViewerScreen;
pub use namespace_select::NamespaceSelectScreen;
pub use report_view::ReportViewScreen;
pub use workload_select::WorkloadSelectScreen;
