use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{Header, ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// Context selection screen
pub struct ContextSelectScreen;

impl ContextSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        frame.render_widget(Header::new("Select Context"), header_area);

        // Render context list
        Self::render_list(frame, content_area, state);

        // Render status bar
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let items: Vec<(String, bool)> = state
            .contexts
            .iter()
            .map(|ctx| {
                let display = if let Some(ns) = &ctx.namespace {
                    format!("{} (namespace: {})", ctx.name, ns)
                } else {
                    ctx.name.clone()
                };
                (display, ctx.is_current)
            })
            .collect();

        let selector = ListSelector::new(" Kubernetes Contexts ").items(items);

        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let status = StatusBar::new()
            .hints(list_nav_hints())
            .count(state.contexts.len(), "context");

        frame.render_widget(status, area);
    }
}
