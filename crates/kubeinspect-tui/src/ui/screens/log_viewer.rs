use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use kubeinspect_logs::LogFilter;
use kubeinspect_types::{LogLevel, LogLine};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{Header, StatusBar},
    },
};

/// Log viewer screen
pub struct LogViewerScreen;

impl LogViewerScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        let title = state.selected_workload.as_deref().unwrap_or("Logs");
        frame.render_widget(
            Header::new(title)
                .context(state.selected_context.as_deref())
                .namespace(state.selected_namespace.as_deref()),
            header_area,
        );

        let show_filter_bar = state.ui_state.search_active
            || state.ui_state.active_filter.is_some()
            || state.ui_state.filter_error.is_some();
        let (logs_area, filter_area) = Layout::with_filter_bar(content_area, show_filter_bar);

        Self::render_logs(frame, logs_area, state);
        if let Some(filter_area) = filter_area {
            Self::render_filter_bar(frame, filter_area, state);
        }
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;
        let mut spans = vec![];

        if ui.search_active {
            spans.push(Span::styled(
                " /",
                Style::default()
                    .fg(Theme::HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(ui.search_input.clone(), Theme::text_highlight()));
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Theme::HIGHLIGHT)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        } else if let Some(filter) = &ui.active_filter {
            spans.push(Span::styled(" Filter: ", Theme::text_dim()));
            spans.push(Span::styled(filter.pattern().to_string(), Theme::text_highlight()));
        }

        if let Some(err) = &ui.filter_error {
            spans.push(Span::styled(format!("  ⚠ {}", err), Theme::error()));
        }

        let case_text = if ui.filter_case_insensitive {
            "  [i] case-insensitive"
        } else {
            "  [i] case-sensitive"
        };
        spans.push(Span::styled(case_text, Theme::text_dim()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_logs(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let total_logs = state.filtered_logs().len();

        // Clamp scroll position
        let max_scroll = total_logs.saturating_sub(inner_height);
        if state.ui_state.log_scroll > max_scroll {
            state.ui_state.log_scroll = max_scroll;
        }

        let ui = &state.ui_state;
        let lines: Vec<Line> = state
            .filtered_logs()
            .into_iter()
            .skip(ui.log_scroll)
            .take(inner_height)
            .map(|line| Self::format_line(line, ui.show_timestamps, ui.active_filter.as_ref()))
            .collect();

        let title = if ui.active_filter.is_some() {
            format!(" Logs ({} of {} matching) ", total_logs, state.logs.len())
        } else {
            format!(" Logs ({}) ", total_logs)
        };

        let body = if state.logs.is_empty() {
            Paragraph::new(Span::styled("No log lines returned", Theme::text_dim()))
        } else {
            Paragraph::new(lines)
        };

        frame.render_widget(
            body.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border())
                    .title(Span::styled(title, Theme::title())),
            ),
            area,
        );

        if total_logs > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(state.ui_state.log_scroll);

            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    /// `HH:MM:SS pod/container LVL │ message`, with filter matches highlighted
    fn format_line(
        line: &LogLine,
        show_timestamps: bool,
        filter: Option<&LogFilter>,
    ) -> Line<'static> {
        let mut spans = Vec::new();

        if show_timestamps {
            let time = line
                .timestamp
                .map(|ts| ts.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "--:--:--".to_string());
            spans.push(Span::styled(format!("{} ", time), Theme::text_dim()));
        }

        spans.push(Span::styled(
            format!("{}/{} ", line.pod, line.container),
            Style::default().fg(Theme::PRIMARY),
        ));
        spans.push(Span::styled(
            line.level.as_str(),
            Style::default()
                .fg(line.level.color())
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" │ ", Theme::text_dim()));

        let base_style = level_text_style(line.level);
        let matches = filter.map(|f| f.find_matches(&line.message)).unwrap_or_default();
        if matches.is_empty() {
            spans.push(Span::styled(line.message.clone(), base_style));
            return Line::from(spans);
        }

        let highlight_style = Style::default()
            .fg(Color::Black)
            .bg(Theme::HIGHLIGHT)
            .add_modifier(Modifier::BOLD);

        let mut last_end = 0;
        for (start, end) in matches {
            if start > last_end {
                spans.push(Span::styled(
                    line.message[last_end..start].to_string(),
                    base_style,
                ));
            }
            spans.push(Span::styled(
                line.message[start..end].to_string(),
                highlight_style,
            ));
            last_end = end;
        }
        if last_end < line.message.len() {
            spans.push(Span::styled(line.message[last_end..].to_string(), base_style));
        }

        Line::from(spans)
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let errors = state
            .logs
            .iter()
            .filter(|l| matches!(l.level, LogLevel::Error | LogLevel::Fatal))
            .count();
        let warnings = state
            .logs
            .iter()
            .filter(|l| l.level == LogLevel::Warn)
            .count();

        let status = StatusBar::new()
            .hints([
                ("/", "Filter"),
                ("t", "Timestamps"),
                ("r", "Refresh"),
                ("?", "Help"),
                ("Esc", "Back"),
            ])
            .levels(errors, warnings)
            .count(state.logs.len(), "line");

        frame.render_widget(status, area);
    }
}

/// Get text style based on log level
fn level_text_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error | LogLevel::Fatal => Style::default().fg(Theme::ERROR),
        LogLevel::Warn => Style::default().fg(Theme::WARNING),
        _ => Theme::text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(message: &str) -> LogLine {
        LogLine::new("web-0".to_string(), "app".to_string(), message.to_string())
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_format_line_without_timestamp() {
        let formatted = LogViewerScreen::format_line(&line("ready"), false, None);
        assert_eq!(text(&formatted), "web-0/app ??? │ ready");
    }

    #[test]
    fn test_format_line_missing_timestamp_placeholder() {
        let formatted = LogViewerScreen::format_line(&line("ready"), true, None);
        assert!(text(&formatted).starts_with("--:--:-- "));
    }

    #[test]
    fn test_format_line_highlights_matches() {
        let filter = LogFilter::new("err").unwrap();
        let formatted =
            LogViewerScreen::format_line(&line("an err and another err"), false, Some(&filter));

        let highlighted: Vec<&str> = formatted
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(Theme::HIGHLIGHT))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(highlighted, vec!["err", "err"]);
        assert_eq!(text(&formatted), "web-0/app ??? │ an err and another err");
    }
}
