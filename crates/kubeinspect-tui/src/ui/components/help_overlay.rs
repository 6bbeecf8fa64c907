use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::Screen,
    ui::{Layout, Theme},
};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, screen: &Screen) {
        let mut help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Navigation"),
        ];

        match screen {
            Screen::LogViewer => {
                help_text.extend([
                    Self::key_line("j/↓", "Scroll down"),
                    Self::key_line("k/↑", "Scroll up"),
                    Self::key_line("Ctrl+d", "Page down"),
                    Self::key_line("Ctrl+u", "Page up"),
                    Self::key_line("g", "Go to top"),
                    Self::key_line("G", "Go to bottom"),
                    Line::from(""),
                    Self::section("Logs"),
                    Self::key_line("t", "Toggle timestamps"),
                    Self::key_line("/", "Filter by regex"),
                    Self::key_line("n", "Clear filter"),
                    Self::key_line("i", "Toggle case sensitivity"),
                    Self::key_line("r", "Fetch again"),
                ]);
            }
            Screen::ReportView => {
                help_text.extend([
                    Self::key_line("j/↓", "Next row"),
                    Self::key_line("k/↑", "Previous row"),
                    Self::key_line("r", "Fetch again"),
                    Self::key_line("Enter", "Back to menu"),
                ]);
            }
            _ => {
                help_text.extend([
                    Self::key_line("j/↓", "Move down"),
                    Self::key_line("k/↑", "Move up"),
                    Self::key_line("Enter", "Select"),
                ]);
            }
        }

        help_text.extend([
            Line::from(""),
            Self::section("General"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Go back"),
            Self::key_line("q", "Quit"),
        ]);

        let area = frame.area();
        let popup_area = Layout::centered_rect(
            area,
            50.min(area.width.saturating_sub(4)),
            (help_text.len() as u16 + 2).min(area.height.saturating_sub(4)),
        );

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(" Help ", Theme::title())),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(name: &str) -> Line<'_> {
        Line::from(Span::styled(name, Style::default().fg(Theme::HIGHLIGHT)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Theme::SUCCESS)),
            Span::styled(format!("  {}", desc), Theme::text()),
        ])
    }
}
