use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{Header, StatusBar},
    },
};

/// Table view of the last fetched report
pub struct ReportViewScreen;

impl ReportViewScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        let title = state
            .report
            .as_ref()
            .map(|r| r.title.as_str())
            .unwrap_or("Report");
        frame.render_widget(
            Header::new(title)
                .context(state.selected_context.as_deref())
                .namespace(state.selected_namespace.as_deref()),
            header_area,
        );

        Self::render_table(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_table(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused());

        let Some(report) = &state.report else {
            frame.render_widget(
                Paragraph::new(Span::styled("Nothing fetched yet", Theme::text_dim()))
                    .block(block),
                area,
            );
            return;
        };

        if report.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No workloads found in this namespace",
                    Theme::text_dim(),
                ))
                .block(block),
                area,
            );
            return;
        }

        let widths: Vec<Constraint> = report
            .column_widths()
            .into_iter()
            .map(|w| Constraint::Length(w as u16))
            .collect();

        let header = Row::new(
            report
                .headers
                .iter()
                .map(|h| Cell::from(h.as_str()).style(Theme::table_header())),
        );

        // Multi-line cells (one image per line) grow the row
        let rows = report.rows.iter().map(|cells| {
            let height = cells.iter().map(|c| c.lines().count()).max().unwrap_or(1);
            Row::new(cells.iter().map(|c| Cell::from(Text::from(c.as_str()))))
                .height(height.max(1) as u16)
                .style(Theme::text())
        });

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(Theme::list_item_selected());

        frame.render_stateful_widget(table, area, &mut state.ui_state.table_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = state.report.as_ref().map_or(0, |r| r.rows.len());

        let status = StatusBar::new()
            .hints([
                ("↑/k", "Up"),
                ("↓/j", "Down"),
                ("r", "Refresh"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ])
            .count(rows, "row");

        frame.render_widget(status, area);
    }
}
