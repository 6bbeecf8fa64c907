use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{AppState, ConfirmChoice},
    ui::{
        Layout, Theme,
        components::{Header, ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// "Is this the correct cluster?" prompt shown at startup
pub struct ContextConfirmScreen;

impl ContextConfirmScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        frame.render_widget(
            Header::new("Confirm Context").context(state.selected_context.as_deref()),
            header_area,
        );

        let list_area = Layout::centered_list(content_area, 60);
        let (question_area, choices_area) = Self::split(list_area);

        Self::render_question(frame, question_area, state);

        let selector = ListSelector::new(" Continue? ")
            .items(ConfirmChoice::ALL.iter().map(|c| (c.label(), false)));
        frame.render_list_selector(choices_area, selector, &mut state.ui_state.list_state);

        frame.render_widget(StatusBar::new().hints(list_nav_hints()), status_area);
    }

    fn split(area: Rect) -> (Rect, Rect) {
        let question_height = 4.min(area.height);
        (
            Rect {
                height: question_height,
                ..area
            },
            Rect {
                y: area.y + question_height,
                height: area.height - question_height,
                ..area
            },
        )
    }

    fn render_question(frame: &mut Frame, area: Rect, state: &AppState) {
        let current = state
            .contexts
            .iter()
            .find(|c| Some(&c.name) == state.selected_context.as_ref());

        let mut lines = vec![Line::from(vec![
            Span::styled("Current context: ", Theme::text_dim()),
            Span::styled(
                state.selected_context.as_deref().unwrap_or("<none>"),
                Theme::text_highlight(),
            ),
        ])];
        if let Some(ctx) = current {
            lines.push(Line::from(vec![
                Span::styled("Cluster: ", Theme::text_dim()),
                Span::styled(ctx.cluster.as_str(), Theme::text()),
            ]));
        }

        let question = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Is this the correct cluster? ", Theme::title())),
        );
        frame.render_widget(question, area);
    }
}
