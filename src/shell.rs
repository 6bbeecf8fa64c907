//! Interactive shell: confirm context, pick an action, then a namespace

use anyhow::Result;
use tokio::sync::mpsc;

use kubeinspect_core::{Report, ReportKind, ResourceAggregator};
use kubeinspect_k8s::KubeClient;
use kubeinspect_tui::{
    Action, ActionMenuScreen, AppState, ConfirmChoice, ContextConfirmScreen, ContextSelectScreen,
    Event, EventHandler, HelpOverlay, KeyBindings, KeyContext, LogViewerScreen, MenuItem,
    NamespaceSelectScreen, Popup, ReportViewScreen, Screen, Tui, WorkloadSelectScreen,
};
use kubeinspect_types::{LogLine, NamespaceInfo, WorkloadSummary};

use crate::config::Settings;
use crate::reports;

/// Lines moved by PageUp/PageDown in the log viewer
const PAGE_SIZE: usize = 20;

const NOT_CONNECTED: &str = "Not connected to a cluster; pick a context first";

/// Internal actions for async operations
enum InternalAction {
    Connect(String),
    LoadNamespaces,
    LoadReport(String, ReportKind),
    LoadWorkloads(String),
    LoadLogs(String, String),
    Connected,
    NamespacesLoaded(Vec<NamespaceInfo>),
    ReportLoaded(Report),
    WorkloadsLoaded(Vec<WorkloadSummary>),
    LogsLoaded(Vec<LogLine>),
    Error(String),
}

impl InternalAction {
    /// Message shown while the fetch runs
    fn loading_message(&self) -> Option<&'static str> {
        match self {
            Self::Connect(_) => Some("Connecting"),
            Self::LoadNamespaces => Some("Listing namespaces"),
            Self::LoadReport(..) => Some("Fetching report"),
            Self::LoadWorkloads(_) => Some("Listing workloads"),
            Self::LoadLogs(..) => Some("Fetching logs"),
            _ => None,
        }
    }
}

pub async fn run(kube: KubeClient, context: Option<String>, settings: Settings) -> Result<()> {
    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(action_tx.clone());
    state.contexts = kube.get_contexts();

    if let Some(name) = &context {
        if !state.contexts.iter().any(|c| &c.name == name) {
            anyhow::bail!("Context '{}' not found in kubeconfig", name);
        }
    }
    state.selected_context = context.or_else(|| kube.current_context().map(str::to_string));

    // Nothing to confirm without a current context
    if state.selected_context.is_none() {
        state.reset_to(Screen::ContextSelect);
    }

    let aggregator = ResourceAggregator::new(settings.aggregator.clone());
    let mut active_client: Option<kube::Client> = None;

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new();
    let keybindings = KeyBindings::new();

    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        if state.ui_state.error_message.is_some() {
                            let _ = action_tx.send(Action::DismissError);
                        } else if state.ui_state.search_active && state.current_screen == Screen::LogViewer {
                            if let Some(action) = keybindings.get_filter_input_action(&key) {
                                let _ = action_tx.send(action);
                            }
                        } else if let Some(action) = keybindings.get_action(key_context(&state.current_screen), &key) {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Resize(_, _) => {}
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
            }

            Some(internal) = internal_rx.recv() => {
                // Show the loading box before blocking on the cluster
                let fetching = internal.loading_message().is_some();
                if let Some(message) = internal.loading_message() {
                    state.ui_state.loading = Some(message.to_string());
                    render(&mut tui, &mut state)?;
                }

                match internal {
                    InternalAction::Connect(context_name) => {
                        match kube.client_for_context(&context_name).await {
                            Ok(client) => {
                                active_client = Some(client);
                                let _ = internal_tx.send(InternalAction::Connected);
                            }
                            Err(e) => {
                                active_client = None;
                                send_error(&internal_tx, "Failed to connect to cluster", e);
                            }
                        }
                    }

                    InternalAction::LoadNamespaces => {
                        if let Some(client) = &active_client {
                            match kube.get_namespaces(client).await {
                                Ok(namespaces) => {
                                    let _ = internal_tx.send(InternalAction::NamespacesLoaded(namespaces));
                                }
                                Err(e) => send_error(&internal_tx, "Failed to load namespaces", e),
                            }
                        } else {
                            state.show_error(NOT_CONNECTED.to_string());
                        }
                    }

                    InternalAction::LoadReport(namespace, kind) => {
                        if let Some(client) = &active_client {
                            match reports::build_report(&kube, client, &namespace, kind, &aggregator).await {
                                Ok(report) => {
                                    let _ = internal_tx.send(InternalAction::ReportLoaded(report));
                                }
                                Err(e) => send_error(&internal_tx, "Failed to build report", e),
                            }
                        } else {
                            state.show_error(NOT_CONNECTED.to_string());
                        }
                    }

                    InternalAction::LoadWorkloads(namespace) => {
                        if let Some(client) = &active_client {
                            match reports::list_workloads(&kube, client, &namespace).await {
                                Ok(workloads) => {
                                    let _ = internal_tx.send(InternalAction::WorkloadsLoaded(workloads));
                                }
                                Err(e) => send_error(&internal_tx, "Failed to load workloads", e),
                            }
                        } else {
                            state.show_error(NOT_CONNECTED.to_string());
                        }
                    }

                    InternalAction::LoadLogs(namespace, workload) => {
                        if let Some(client) = &active_client {
                            match reports::workload_logs(
                                &kube,
                                client,
                                &namespace,
                                &workload,
                                settings.tail_lines,
                                &aggregator,
                            )
                            .await
                            {
                                Ok(lines) => {
                                    let _ = internal_tx.send(InternalAction::LogsLoaded(lines));
                                }
                                Err(e) => send_error(&internal_tx, "Failed to fetch logs", e),
                            }
                        } else {
                            state.show_error(NOT_CONNECTED.to_string());
                        }
                    }

                    InternalAction::Connected => {
                        state.ui_state.loading = None;
                        state.reset_to(Screen::ActionMenu);
                    }

                    InternalAction::NamespacesLoaded(namespaces) => {
                        state.ui_state.loading = None;
                        state.namespaces = namespaces;
                        state.navigate_to(Screen::NamespaceSelect);
                    }

                    InternalAction::ReportLoaded(report) => {
                        state.ui_state.loading = None;
                        state.report = Some(report);
                        // A refresh replaces the table in place
                        if state.current_screen != Screen::ReportView {
                            state.navigate_to(Screen::ReportView);
                        }
                    }

                    InternalAction::WorkloadsLoaded(workloads) => {
                        state.ui_state.loading = None;
                        state.workloads = workloads;
                        state.navigate_to(Screen::WorkloadSelect);
                    }

                    InternalAction::LogsLoaded(lines) => {
                        state.ui_state.loading = None;
                        state.logs = lines;
                        if state.current_screen == Screen::LogViewer {
                            state.ui_state.log_scroll = usize::MAX;
                        } else {
                            state.navigate_to(Screen::LogViewer);
                        }
                    }

                    InternalAction::Error(msg) => {
                        state.show_error(msg);
                    }
                }

                if fetching {
                    let dropped = events.discard_pending();
                    if dropped > 0 {
                        tracing::debug!(dropped, "discarded keys typed during fetch");
                    }
                }
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state)?;
    }

    // Cleanup
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn key_context(screen: &Screen) -> KeyContext {
    match screen {
        Screen::ContextConfirm
        | Screen::ContextSelect
        | Screen::ActionMenu
        | Screen::NamespaceSelect
        | Screen::WorkloadSelect => KeyContext::ListNavigation,
        Screen::ReportView => KeyContext::ReportView,
        Screen::LogViewer => KeyContext::LogViewer,
    }
}

fn send_error(
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    what: &str,
    err: anyhow::Error,
) {
    tracing::warn!(error = %err, "{}", what);
    let _ = internal_tx.send(InternalAction::Error(format!("{}: {:#}", what, err)));
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            if state.ui_state.help_visible {
                state.ui_state.help_visible = false;
                return;
            }
            if state.current_screen == Screen::LogViewer {
                state.clear_filter();
            }
            if !state.go_back() {
                state.should_quit = true;
            }
        }
        Action::ListUp => {
            state.list_up();
        }
        Action::ListDown => {
            state.list_down();
        }
        Action::ListSelect => {
            handle_list_select(state);
        }

        Action::ConfirmContext(choice) => match choice {
            ConfirmChoice::Yes => {
                if let Some(name) = state.selected_context.clone() {
                    let _ = internal_tx.send(InternalAction::Connect(name));
                }
            }
            ConfirmChoice::No => state.navigate_to(Screen::ContextSelect),
            ConfirmChoice::Exit => state.should_quit = true,
        },
        Action::SelectContext(name) => {
            state.clear_cluster_data();
            state.selected_context = Some(name.clone());
            let _ = internal_tx.send(InternalAction::Connect(name));
        }
        Action::ChooseMenuItem(item) if item.needs_namespace() => {
            state.pending_item = Some(item);
            let _ = internal_tx.send(InternalAction::LoadNamespaces);
        }
        Action::ChooseMenuItem(MenuItem::SwitchContext) => {
            state.navigate_to(Screen::ContextSelect);
        }
        Action::ChooseMenuItem(_) => {
            state.should_quit = true;
        }
        Action::SelectNamespace(name) => {
            state.selected_namespace = Some(name.clone());
            match state.pending_item {
                Some(MenuItem::Report(kind)) => {
                    let _ = internal_tx.send(InternalAction::LoadReport(name, kind));
                }
                Some(MenuItem::Logs) => {
                    let _ = internal_tx.send(InternalAction::LoadWorkloads(name));
                }
                _ => {}
            }
        }
        Action::SelectWorkload(name) => {
            state.selected_workload = Some(name.clone());
            state.clear_filter();
            if let Some(namespace) = state.selected_namespace.clone() {
                let _ = internal_tx.send(InternalAction::LoadLogs(namespace, name));
            }
        }

        Action::Refresh => {
            let Some(namespace) = state.selected_namespace.clone() else {
                return;
            };
            match (&state.current_screen, state.pending_item) {
                (Screen::ReportView, Some(MenuItem::Report(kind))) => {
                    let _ = internal_tx.send(InternalAction::LoadReport(namespace, kind));
                }
                (Screen::LogViewer, _) => {
                    if let Some(workload) = state.selected_workload.clone() {
                        let _ = internal_tx.send(InternalAction::LoadLogs(namespace, workload));
                    }
                }
                _ => {}
            }
        }

        // Log viewer scrolling; render clamps to the filtered line count
        Action::ScrollUp(n) => {
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_sub(n);
        }
        Action::ScrollDown(n) => {
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_add(n);
        }
        Action::PageUp => {
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_sub(PAGE_SIZE);
        }
        Action::PageDown => {
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_add(PAGE_SIZE);
        }
        Action::ScrollToTop => {
            state.ui_state.log_scroll = 0;
        }
        Action::ScrollToBottom => {
            state.ui_state.log_scroll = usize::MAX;
        }
        Action::ToggleTimestamps => {
            state.ui_state.show_timestamps = !state.ui_state.show_timestamps;
        }

        // Filter/Search actions
        Action::OpenSearch => {
            state.start_search();
        }
        Action::CloseSearch => {
            state.cancel_search();
        }
        Action::SearchInput(c) => {
            state.ui_state.search_input.push(c);
        }
        Action::SearchBackspace => {
            state.ui_state.search_input.pop();
        }
        Action::SearchClear => {
            state.ui_state.search_input.clear();
        }
        Action::ApplyFilter => {
            state.apply_filter();
        }
        Action::ClearFilter => {
            state.clear_filter();
        }
        Action::ToggleCaseSensitive => {
            state.ui_state.filter_case_insensitive = !state.ui_state.filter_case_insensitive;
            // Re-apply filter with new case sensitivity if active
            if let Some(filter) = &state.ui_state.active_filter {
                state.ui_state.search_input = filter.pattern().to_string();
                state.apply_filter();
            }
        }

        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }
        Action::DismissError => {
            state.dismiss_error();
        }
    }
}

fn handle_list_select(state: &mut AppState) {
    let Some(idx) = state.selected_index() else {
        return;
    };

    let action = match state.current_screen {
        Screen::ContextConfirm => ConfirmChoice::ALL.get(idx).copied().map(Action::ConfirmContext),
        Screen::ContextSelect => state
            .contexts
            .get(idx)
            .map(|ctx| Action::SelectContext(ctx.name.clone())),
        Screen::ActionMenu => MenuItem::ALL.get(idx).copied().map(Action::ChooseMenuItem),
        Screen::NamespaceSelect => state
            .namespaces
            .get(idx)
            .map(|ns| Action::SelectNamespace(ns.name.clone())),
        Screen::WorkloadSelect => state
            .workloads
            .get(idx)
            .map(|w| Action::SelectWorkload(w.name.clone())),
        // Tables and logs have no selection action
        Screen::ReportView | Screen::LogViewer => None,
    };

    if let Some(action) = action {
        let _ = state.action_tx.send(action);
    }
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal().draw(|frame| {
        match state.current_screen {
            Screen::ContextConfirm => ContextConfirmScreen::render(frame, state),
            Screen::ContextSelect => ContextSelectScreen::render(frame, state),
            Screen::ActionMenu => ActionMenuScreen::render(frame, state),
            Screen::NamespaceSelect => NamespaceSelectScreen::render(frame, state),
            Screen::WorkloadSelect => WorkloadSelectScreen::render(frame, state),
            Screen::ReportView => ReportViewScreen::render(frame, state),
            Screen::LogViewer => LogViewerScreen::render(frame, state),
        }

        if state.ui_state.help_visible {
            HelpOverlay::render(frame, &state.current_screen);
        }
        if let Some(message) = &state.ui_state.loading {
            Popup::loading(frame, message);
        }
        if let Some(message) = &state.ui_state.error_message {
            Popup::error(frame, message);
        }
    })?;
    Ok(())
}
