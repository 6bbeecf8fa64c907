use ratatui::widgets::{ListState, TableState};
use tokio::sync::mpsc;

use kubeinspect_core::Report;
use kubeinspect_logs::LogFilter;
use kubeinspect_types::{ContextInfo, LogLine, NamespaceInfo, WorkloadSummary};

use super::{Action, ConfirmChoice, MenuItem};

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    ContextConfirm,
    ContextSelect,
    ActionMenu,
    NamespaceSelect,
    WorkloadSelect,
    ReportView,
    LogViewer,
}

/// UI-specific transient state
pub struct UiState {
    /// Is search/filter bar active?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// List state for selection screens
    pub list_state: ListState,

    /// Row selection in the report table
    pub table_state: TableState,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Shown while a cluster request is in flight
    pub loading: Option<String>,

    // Log viewer specific state
    /// Scroll position in log viewer
    pub log_scroll: usize,

    /// Show timestamps in log viewer?
    pub show_timestamps: bool,

    /// Currently active filter (None = show all)
    pub active_filter: Option<LogFilter>,

    /// Filter input error message (e.g., invalid regex)
    pub filter_error: Option<String>,

    /// Case insensitive search?
    pub filter_case_insensitive: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            search_active: false,
            search_input: String::new(),
            help_visible: false,
            list_state: ListState::default(),
            table_state: TableState::default(),
            error_message: None,
            loading: None,
            log_scroll: 0,
            show_timestamps: true,
            active_filter: None,
            filter_error: None,
            filter_case_insensitive: true,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Available Kubernetes contexts
    pub contexts: Vec<ContextInfo>,

    /// Context the shell is connected to
    pub selected_context: Option<String>,

    /// Available namespaces
    pub namespaces: Vec<NamespaceInfo>,

    /// Selected namespace
    pub selected_namespace: Option<String>,

    /// Menu entry the namespace pick belongs to
    pub pending_item: Option<MenuItem>,

    /// Workloads of the selected namespace (for logs)
    pub workloads: Vec<WorkloadSummary>,

    /// Selected workload
    pub selected_workload: Option<String>,

    /// Report on screen
    pub report: Option<Report>,

    /// Fetched log lines, oldest first
    pub logs: Vec<LogLine>,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for async actions
    pub action_tx: mpsc::UnboundedSender<Action>,
}

impl AppState {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));

        Self {
            current_screen: Screen::ContextConfirm,
            screen_stack: Vec::new(),
            contexts: Vec::new(),
            selected_context: None,
            namespaces: Vec::new(),
            selected_namespace: None,
            pending_item: None,
            workloads: Vec::new(),
            selected_workload: None,
            report: None,
            logs: Vec::new(),
            ui_state,
            should_quit: false,
            action_tx,
        }
    }

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
        self.reset_selection();
    }

    /// Replace the whole navigation history with a single screen
    pub fn reset_to(&mut self, screen: Screen) {
        self.screen_stack.clear();
        self.current_screen = screen;
        self.reset_selection();
    }

    /// Go back to previous screen
    pub fn go_back(&mut self) -> bool {
        if let Some(prev_screen) = self.screen_stack.pop() {
            self.current_screen = prev_screen;
            self.reset_selection();
            true
        } else {
            false
        }
    }

    fn reset_selection(&mut self) {
        self.ui_state.list_state.select(Some(0));
        self.ui_state.table_state.select(Some(0));
        self.ui_state.log_scroll = 0;
    }

    /// Get the current list length based on screen
    pub fn current_list_len(&self) -> usize {
        match self.current_screen {
            Screen::ContextConfirm => ConfirmChoice::ALL.len(),
            Screen::ContextSelect => self.contexts.len(),
            Screen::ActionMenu => MenuItem::ALL.len(),
            Screen::NamespaceSelect => self.namespaces.len(),
            Screen::WorkloadSelect => self.workloads.len(),
            Screen::ReportView => self.report.as_ref().map_or(0, |r| r.rows.len()),
            Screen::LogViewer => 0,
        }
    }

    fn selection_mut(&mut self) -> (Option<usize>, bool) {
        match self.current_screen {
            Screen::ReportView => (self.ui_state.table_state.selected(), true),
            _ => (self.ui_state.list_state.selected(), false),
        }
    }

    fn select(&mut self, index: usize, table: bool) {
        if table {
            self.ui_state.table_state.select(Some(index));
        } else {
            self.ui_state.list_state.select(Some(index));
        }
    }

    /// Move selection up, wrapping to the bottom
    pub fn list_up(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let (selected, table) = self.selection_mut();
        let i = match selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(i, table);
    }

    /// Move selection down, wrapping to the top
    pub fn list_down(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let (selected, table) = self.selection_mut();
        let i = match selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(i, table);
    }

    /// Get currently selected index
    pub fn selected_index(&self) -> Option<usize> {
        self.ui_state.list_state.selected()
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.loading = None;
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    /// Log lines passing the active filter
    pub fn filtered_logs(&self) -> Vec<&LogLine> {
        match &self.ui_state.active_filter {
            Some(filter) => self.logs.iter().filter(|l| filter.matches(l)).collect(),
            None => self.logs.iter().collect(),
        }
    }

    /// Start search/filter input mode
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
    }

    /// Cancel search/filter input and clear filter
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.search_input.clear();
        self.ui_state.active_filter = None;
        self.ui_state.filter_error = None;
    }

    /// Apply the current search input as a filter
    pub fn apply_filter(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.filter_error = None;
        self.ui_state.log_scroll = 0;

        if self.ui_state.search_input.is_empty() {
            self.ui_state.active_filter = None;
            return;
        }

        let result = if self.ui_state.filter_case_insensitive {
            LogFilter::new_case_insensitive(&self.ui_state.search_input)
        } else {
            LogFilter::new(&self.ui_state.search_input)
        };

        match result {
            Ok(filter) => {
                self.ui_state.active_filter = Some(filter);
            }
            Err(e) => {
                self.ui_state.filter_error = Some(format!("Invalid regex: {}", e));
                self.ui_state.search_active = true; // Keep input open to fix
            }
        }
    }

    /// Clear the active filter
    pub fn clear_filter(&mut self) {
        self.ui_state.active_filter = None;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
    }

    /// Forget everything fetched for the previous context
    pub fn clear_cluster_data(&mut self) {
        self.namespaces.clear();
        self.selected_namespace = None;
        self.pending_item = None;
        self.workloads.clear();
        self.selected_workload = None;
        self.report = None;
        self.logs.clear();
        self.clear_filter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeinspect_types::{LogLevel, NamespaceInfo};

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(tx)
    }

    fn log(message: &str) -> LogLine {
        LogLine {
            pod: "web-0".to_string(),
            container: "app".to_string(),
            timestamp: None,
            level: LogLevel::Unknown,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_starts_on_context_confirm() {
        let state = state();
        assert_eq!(state.current_screen, Screen::ContextConfirm);
        assert_eq!(state.current_list_len(), 3);
    }

    #[test]
    fn test_navigation_stack() {
        let mut state = state();
        state.navigate_to(Screen::ActionMenu);
        state.navigate_to(Screen::NamespaceSelect);

        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::ActionMenu);
        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::ContextConfirm);
        assert!(!state.go_back());
    }

    #[test]
    fn test_reset_to_clears_history() {
        let mut state = state();
        state.navigate_to(Screen::ActionMenu);
        state.navigate_to(Screen::NamespaceSelect);
        state.reset_to(Screen::ActionMenu);

        assert!(state.screen_stack.is_empty());
        assert!(!state.go_back());
    }

    #[test]
    fn test_list_wraps() {
        let mut state = state();
        state.navigate_to(Screen::NamespaceSelect);
        state.namespaces = vec![
            NamespaceInfo::new("default".to_string(), "Active".to_string()),
            NamespaceInfo::new("shop".to_string(), "Active".to_string()),
        ];

        state.list_up();
        assert_eq!(state.selected_index(), Some(1));
        state.list_down();
        assert_eq!(state.selected_index(), Some(0));
        state.list_down();
        assert_eq!(state.selected_index(), Some(1));
    }

    #[test]
    fn test_empty_list_does_not_move() {
        let mut state = state();
        state.navigate_to(Screen::NamespaceSelect);
        state.list_down();
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_filter_logs() {
        let mut state = state();
        state.logs = vec![log("request failed"), log("request ok"), log("FAILED again")];

        state.start_search();
        state.ui_state.search_input.push_str("failed");
        state.apply_filter();

        assert!(!state.ui_state.search_active);
        assert_eq!(state.filtered_logs().len(), 2);

        state.clear_filter();
        assert_eq!(state.filtered_logs().len(), 3);
    }

    #[test]
    fn test_invalid_filter_keeps_input_open() {
        let mut state = state();
        state.start_search();
        state.ui_state.search_input.push_str("(oops");
        state.apply_filter();

        assert!(state.ui_state.search_active);
        assert!(state.ui_state.filter_error.is_some());
        assert!(state.ui_state.active_filter.is_none());
    }
}
