use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::Theme;

/// Bottom line: key hints on the left, counters on the right
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    counters: Vec<Span<'static>>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            counters: Vec::new(),
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// "1 namespace", "3 namespaces"
    pub fn count(mut self, n: usize, noun: &str) -> Self {
        let plural = if n == 1 { "" } else { "s" };
        self.counters
            .push(Span::styled(format!("{} {}{}", n, noun, plural), Theme::status_bar()));
        self
    }

    /// Error and warning totals of the fetched log lines
    pub fn levels(mut self, errors: usize, warnings: usize) -> Self {
        let colored = |label: String, n: usize, color: Color| {
            if n > 0 {
                Span::styled(label, Theme::status_bar().fg(color))
            } else {
                Span::styled(label, Theme::status_bar())
            }
        };
        self.counters
            .push(colored(format!("E:{}", errors), errors, Theme::ERROR));
        self.counters
            .push(colored(format!("W:{}", warnings), warnings, Theme::WARNING));
        self
    }

    fn counters_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, span) in self.counters.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Theme::status_bar()));
            }
            spans.push(span.clone());
        }
        Line::from(spans)
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let mut spans = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Theme::status_bar()));
            }
            spans.push(Span::styled(format!("[{}]", key), Theme::status_bar_key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::status_bar()));
        }
        let hints = Line::from(spans);
        let hints_width = hints.width() as u16;

        buf.set_line(area.x + 1, area.y, &hints, area.width.saturating_sub(2));

        if self.counters.is_empty() {
            return;
        }

        // Counters are dropped rather than drawn over the hints
        let counters = self.counters_line();
        let counters_width = counters.width() as u16;
        let right_x = area.x + area.width.saturating_sub(counters_width + 2);
        if right_x > area.x + hints_width + 2 {
            buf.set_line(right_x, area.y, &counters, counters_width);
        }
    }
}

/// Default hints for list navigation screens
pub fn list_nav_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("Enter", "Select"),
        ("Esc", "Back"),
        ("q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bar: StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_count_pluralizes() {
        let line = rendered(StatusBar::new().count(1, "namespace"), 40);
        assert!(line.trim_end().ends_with("1 namespace"));

        let line = rendered(StatusBar::new().count(3, "namespace"), 40);
        assert!(line.trim_end().ends_with("3 namespaces"));
    }

    #[test]
    fn test_levels_before_line_count() {
        let bar = StatusBar::new().levels(2, 0).count(10, "line");
        let line = rendered(bar, 60);
        assert!(line.trim_end().ends_with("E:2 │ W:0 │ 10 lines"));
    }

    #[test]
    fn test_counters_never_cover_hints() {
        let bar = StatusBar::new()
            .hints(list_nav_hints())
            .count(12, "workload");
        let line = rendered(bar, 30);
        assert!(!line.contains("workloads"));
        assert!(line.contains("[↑/k]"));
    }
}
