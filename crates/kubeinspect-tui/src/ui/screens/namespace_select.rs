use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{Header, ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// Namespace selection screen
pub struct NamespaceSelectScreen;

impl NamespaceSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        let title = state
            .pending_item
            .map(|item| item.label())
            .unwrap_or("Select Namespace");
        frame.render_widget(
            Header::new(title).context(state.selected_context.as_deref()),
            header_area,
        );

        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        // Namespaces that are not Active (e.g. Terminating) get their phase shown
        let items: Vec<(String, bool)> = state
            .namespaces
            .iter()
            .map(|ns| {
                let display = if ns.status == "Active" {
                    ns.name.clone()
                } else {
                    format!("{} [{}]", ns.name, ns.status)
                };
                (display, false)
            })
            .collect();

        let selector = ListSelector::new(" Namespaces ").items(items);

        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let status = StatusBar::new()
            .hints(list_nav_hints())
            .count(state.namespaces.len(), "namespace");

        frame.render_widget(status, area);
    }
}
