use super::{ConfirmChoice, MenuItem};

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // Selection
    ConfirmContext(ConfirmChoice),
    SelectContext(String),
    ChooseMenuItem(MenuItem),
    SelectNamespace(String),
    SelectWorkload(String),

    // List navigation
    ListUp,
    ListDown,
    ListSelect,

    // Report and log scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    // Log viewer
    ToggleTimestamps,
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ApplyFilter,
    ClearFilter,
    ToggleCaseSensitive,

    // Re-run the report or log fetch on screen
    Refresh,

    // UI toggles
    ToggleHelp,

    // Error handling
    DismissError,
}
