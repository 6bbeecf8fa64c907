use ratatui::{
    Frame,
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{Layout, Theme};

/// Small centered message box drawn over the current screen
pub struct Popup;

impl Popup {
    /// Error box; the shell dismisses it on the next key press
    pub fn error(frame: &mut Frame, message: &str) {
        Self::render(
            frame,
            " Error ",
            Theme::ERROR,
            vec![
                Line::from(Span::styled(message.to_string(), Theme::text())),
                Line::from(""),
                Line::from(Span::styled("Press any key to continue", Theme::text_dim())),
            ],
        );
    }

    pub fn loading(frame: &mut Frame, message: &str) {
        Self::render(
            frame,
            " Working ",
            Theme::PRIMARY,
            vec![Line::from(Span::styled(
                format!("{}...", message),
                Theme::text(),
            ))],
        );
    }

    fn render(frame: &mut Frame, title: &str, color: ratatui::style::Color, lines: Vec<Line>) {
        let area = frame.area();
        let width = 60.min(area.width.saturating_sub(4));
        // Rough wrap estimate so long API errors still fit
        let text_rows: u16 = lines
            .iter()
            .map(|l| (l.width() as u16 / width.saturating_sub(2).max(1)) + 1)
            .sum();
        let popup_area = Layout::centered_rect(area, width, text_rows + 2);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(Span::styled(title.to_string(), Style::default().fg(color))),
                ),
            popup_area,
        );
    }
}
