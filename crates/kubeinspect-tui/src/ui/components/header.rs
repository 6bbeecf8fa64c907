use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::Theme;

/// Bordered breadcrumb line shown at the top of every screen:
/// `kubeinspect │ context │ namespace │ title`
pub struct Header<'a> {
    context: Option<&'a str>,
    namespace: Option<&'a str>,
    title: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            context: None,
            namespace: None,
            title,
        }
    }

    pub fn context(mut self, context: Option<&'a str>) -> Self {
        self.context = context;
        self
    }

    pub fn namespace(mut self, namespace: Option<&'a str>) -> Self {
        self.namespace = namespace;
        self
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = || Span::styled(" │ ", Theme::text_dim());

        let mut spans = vec![Span::styled("kubeinspect", Theme::title())];
        if let Some(context) = self.context {
            spans.push(separator());
            spans.push(Span::styled(context, Theme::text()));
        }
        if let Some(namespace) = self.namespace {
            spans.push(separator());
            spans.push(Span::styled(namespace, Theme::text_highlight()));
        }
        spans.push(separator());
        spans.push(Span::styled(self.title, Theme::text()));

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .render(area, buf);
    }
}
