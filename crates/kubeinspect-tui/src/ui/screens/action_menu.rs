use ratatui::Frame;

use crate::{
    app::{AppState, MenuItem},
    ui::{
        Layout,
        components::{Header, ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// Main menu listing what can be inspected
pub struct ActionMenuScreen;

impl ActionMenuScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        frame.render_widget(
            Header::new("Choose Action").context(state.selected_context.as_deref()),
            header_area,
        );

        let selector = ListSelector::new(" Actions ")
            .items(MenuItem::ALL.iter().map(|item| (item.label(), false)));
        frame.render_list_selector(
            Layout::centered_list(content_area, 60),
            selector,
            &mut state.ui_state.list_state,
        );

        frame.render_widget(StatusBar::new().hints(list_nav_hints()), status_area);
    }
}
