use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate;

/// Cells wider than this are truncated with an ellipsis
const MAX_CELL_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = app.report.as_ref() else {
        render_placeholder(frame, app, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let table = &report.table;
    let block = Block::default()
        .title(format!(" {} ", report.heading()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if table.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            " No records for this date",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, chunks[0]);
        render_footer(frame, 0, None, chunks[1]);
        return;
    }

    let widths = table.column_widths();
    let visible: Vec<usize> = (app.column_offset..table.columns.len()).collect();

    let header = Row::new(
        visible
            .iter()
            .map(|&i| Cell::from(truncate(&table.columns[i], MAX_CELL_WIDTH))),
    )
    .style(styles::header_style());

    let rows = table.rows.iter().map(|row| {
        Row::new(visible.iter().map(|&i| {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            Cell::from(truncate(text, MAX_CELL_WIDTH))
        }))
        .style(styles::list_item_style())
    });

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|&i| Constraint::Length(widths[i].min(MAX_CELL_WIDTH) as u16))
        .collect();

    let widget = TableWidget::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default().with_selected(Some(app.row_selection));
    frame.render_stateful_widget(widget, chunks[0], &mut state);

    let column_window = (table.columns.len() > 1).then(|| {
        (app.column_offset + 1, table.columns.len())
    });
    render_footer(frame, table.row_count(), column_window, chunks[1]);
}

fn render_footer(frame: &mut Frame, total: usize, columns: Option<(usize, usize)>, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" Total records: {}", total),
        styles::success_style(),
    )];
    if let Some((first, count)) = columns {
        spans.push(Span::styled(
            format!("   columns from {} of {} ([h]/[l] to scroll)", first, count),
            styles::muted_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[f]", styles::help_key_style()),
            Span::styled(
                format!(" to fetch the report for {}", app.selected_date.format("%Y-%m-%d")),
                styles::muted_style(),
            ),
        ]),
    ];

    if app.raw_response.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  The last response could not be shown as a table. Press ", styles::muted_style()),
            Span::styled("[r]", styles::help_key_style()),
            Span::styled(" to inspect it.", styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Report ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Raw decoded response, shown when it could not be turned into a table
pub fn render_raw(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.raw_response.as_deref().unwrap_or("");

    let block = Block::default()
        .title(" Raw response  [r] back ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.raw_scroll, 0));

    frame.render_widget(paragraph, area);
}
