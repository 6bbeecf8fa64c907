use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{Header, ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// Workload selection screen for the log viewer
pub struct WorkloadSelectScreen;

impl WorkloadSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        frame.render_widget(
            Header::new("Select Workload")
                .context(state.selected_context.as_deref())
                .namespace(state.selected_namespace.as_deref()),
            header_area,
        );

        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let items: Vec<(String, bool)> = state
            .workloads
            .iter()
            .map(|w| {
                let replicas = w.replicas();
                let display = format!(
                    "{}/{} ({}/{})",
                    w.kind,
                    w.name,
                    replicas.ready_display(),
                    replicas.desired
                );
                // Highlight if all replicas are ready
                (display, replicas.is_healthy())
            })
            .collect();

        let selector = ListSelector::new(" Workloads ").mark_suffix("").items(items);

        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let status = StatusBar::new()
            .hints(list_nav_hints())
            .count(state.workloads.len(), "workload");

        frame.render_widget(status, area);
    }
}
