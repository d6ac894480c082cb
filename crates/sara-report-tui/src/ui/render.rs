use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

use super::{report, styles};

const TITLE: &str = concat!("  SaRa Report (v", env!("CARGO_PKG_VERSION"), ")");

const LOGO: [&str; 3] = [
    "      ╔═╗┌─┐╦═╗┌─┐  ╦═╗┌─┐┌─┐┌─┐┬─┐┌┬┐",
    "      ╚═╗├─┤╠╦╝├─┤  ╠╦╝├┤ ├─┘│ │├┬┘ │",
    "      ╚═╝┴ ┴╩╚═┴ ┴  ╩╚═└─┘┴  └─┘┴└─ ┴",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Date bar
            Constraint::Min(8),    // Report
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_date_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EditingDate => render_date_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_hint = "[?] Help";
    let session_label = match (app.session.is_gated(), app.is_authenticated()) {
        (false, _) => format!("{} source", app.source.describe()),
        (true, true) => format!("{} source | logged in", app.source.describe()),
        (true, false) => format!("{} source | logged out", app.source.describe()),
    };

    let used = TITLE.chars().count() + session_label.len() + help_hint.len() + 6;
    let title_line = Line::from(vec![
        Span::styled(TITLE, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(session_label, styles::muted_style()),
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_date_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" Select Date: ", styles::highlight_style()),
        Span::styled(
            format!("[ {} ]", app.selected_date.format("%Y-%m-%d")),
            styles::selected_style(),
        ),
        Span::raw("   "),
        Span::styled("[ / ]", styles::help_key_style()),
        Span::styled(" prev/next  ", styles::muted_style()),
        Span::styled("[t]", styles::help_key_style()),
        Span::styled("oday  ", styles::muted_style()),
        Span::styled("[d]", styles::help_key_style()),
        Span::styled(" choose date  ", styles::muted_style()),
        Span::styled("[f]", styles::help_key_style()),
        Span::styled(" Fetch Data", styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if matches!(app.state, AppState::ShowingRaw) {
        report::render_raw(frame, app, area);
    } else {
        report::render(frame, app, area);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.session.is_gated() {
        "[f]etch | [e]xport | l[o]gout | [q]uit"
    } else {
        "[f]etch | [e]xport | [q]uit"
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => " View and download report data by date ".to_string(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect()
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(50, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Please enter your password to access the report",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    let password_masked: String = "*".repeat(app.login_password.chars().count().min(20));
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<20}▌", password_masked), styles::selected_style()),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("[Enter]", styles::help_key_style()),
        Span::styled(" Login   ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" Quit", styles::muted_style()),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_date_overlay(frame: &mut Frame, app: &App) {
    let height = if app.date_error.is_some() { 8 } else { 6 };
    let area = centered_rect_fixed(50, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("   "),
            Span::styled("Choose Date: [", styles::muted_style()),
            Span::styled(format!("{:<10}▌", app.date_input), styles::selected_style()),
            Span::styled("]", styles::muted_style()),
            Span::styled("  YYYY-MM-DD", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("   "),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" select   ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.date_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("   {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Select Date ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 20, frame.area());

    frame.render_widget(Clear, area);

    let entries = [
        ("f", "Fetch Data for the selected date"),
        ("e", "Download CSV (report_data_<date>.csv)"),
        ("[ / ]", "Previous / next day"),
        ("t", "Today"),
        ("d", "Type a date"),
        ("↑/↓ j/k", "Move through rows"),
        ("PgUp/PgDn", "Scroll a page"),
        ("←/→ h/l", "Scroll columns"),
        ("r", "Show raw response (after a decode error)"),
        ("o", "Logout"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 9, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(50, 10, outer), Rect::new(25, 15, 50, 10));

        // Clamped to a smaller terminal
        let small = Rect::new(0, 0, 30, 5);
        assert_eq!(centered_rect_fixed(50, 10, small), Rect::new(0, 0, 30, 5));
    }
}
