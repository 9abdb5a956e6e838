//! Dashboard rendering.
//!
//! Projection functions build owned `Line` values from state slices; the
//! `draw_*` glue only places them into the frame layout. Projections are
//! total: any state renders, list sections cap at `MAX_SECTION_ROWS` rows in
//! input order, and every server-supplied string is sanitized before it
//! reaches the terminal.

use chrono::DateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use sira_common::{Alert, AlertKind, CountStatus, InstrumentSet, InstrumentStats, RecentCount};

use super::state::{DashboardState, Toast, ToastKind};

/// Cap applied to every list section, regardless of input size.
pub const MAX_SECTION_ROWS: usize = 5;

/// Strip control characters from server-supplied text before display.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).collect()
}

/// Group digits with thousands separators: 2247 -> "2,247".
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a wire timestamp for display. Unparseable values are shown as-is
/// (sanitized), absent ones as "-".
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.format("%d/%m %H:%M").to_string(),
            Err(_) => sanitize(raw),
        },
    }
}

/// Severity color and icon for an alert kind. Anything unrecognized gets the
/// neutral info styling.
pub fn alert_style(kind: AlertKind) -> (Color, &'static str) {
    match kind {
        AlertKind::Error => (Color::Red, "x"),
        AlertKind::Warning => (Color::Yellow, "!"),
        AlertKind::Success => (Color::Green, "+"),
        AlertKind::Info | AlertKind::Unknown => (Color::Cyan, "i"),
    }
}

pub fn count_status_color(status: CountStatus) -> Color {
    match status {
        CountStatus::Pendiente => Color::Yellow,
        CountStatus::EnProgreso => Color::Cyan,
        CountStatus::Completado => Color::Green,
        CountStatus::Verificado => Color::Blue,
        CountStatus::Error => Color::Red,
        CountStatus::Unknown => Color::DarkGray,
    }
}

pub fn set_status(active: bool) -> (&'static str, Color) {
    if active {
        ("active", Color::Green)
    } else {
        ("inactive", Color::DarkGray)
    }
}

fn toast_style(kind: ToastKind) -> (Color, &'static str) {
    match kind {
        ToastKind::Info => (Color::Cyan, "i"),
        ToastKind::Success => (Color::Green, "+"),
        ToastKind::Warning => (Color::Yellow, "!"),
        ToastKind::Error => (Color::Red, "x"),
    }
}

/// Alerts section, one row per alert, selection highlighted.
pub fn alert_lines(alerts: &[Alert], selected: usize) -> Vec<Line<'static>> {
    if alerts.is_empty() {
        return vec![Line::from(Span::styled(
            "No active alerts",
            Style::default().fg(Color::Green),
        ))];
    }

    alerts
        .iter()
        .take(MAX_SECTION_ROWS)
        .enumerate()
        .map(|(i, alert)| {
            let (color, icon) = alert_style(alert.kind);
            let title = alert
                .title
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| "System alert".to_string());
            let description = alert
                .description
                .as_deref()
                .map(sanitize)
                .unwrap_or_default();

            let marker = if i == selected { "> " } else { "  " };
            let mut spans = vec![
                Span::styled(
                    marker,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ];
            if !description.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(description, Style::default().fg(Color::Gray)));
            }
            spans.push(Span::styled(
                format!("  {}", format_timestamp(alert.created_at.as_deref())),
                Style::default().fg(Color::DarkGray),
            ));

            Line::from(spans)
        })
        .collect()
}

/// Most-used instrument categories with counts.
pub fn category_lines(stats: &InstrumentStats) -> Vec<Line<'static>> {
    if stats.categories.is_empty() {
        return vec![Line::from(Span::styled(
            "No categories recorded",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    stats
        .categories
        .iter()
        .take(MAX_SECTION_ROWS)
        .map(|category| {
            Line::from(vec![
                Span::raw(sanitize(&category.name)),
                Span::raw(": "),
                Span::styled(
                    format_count(category.count),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect()
}

/// Recent count events.
pub fn count_lines(counts: &[RecentCount]) -> Vec<Line<'static>> {
    if counts.is_empty() {
        return vec![Line::from(Span::styled(
            "No recent counts",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    counts
        .iter()
        .take(MAX_SECTION_ROWS)
        .map(|count| {
            let name = count
                .procedure_name
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| "Count".to_string());
            Line::from(vec![
                Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", count.status.label()),
                    Style::default().fg(count_status_color(count.status)),
                ),
                Span::styled(
                    format!(
                        "  {} instruments  {}",
                        count.total_instruments.unwrap_or(0),
                        format_timestamp(count.created_at.as_deref())
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect()
}

/// Active surgical instrument sets.
pub fn set_lines(sets: &[InstrumentSet]) -> Vec<Line<'static>> {
    if sets.is_empty() {
        return vec![Line::from(Span::styled(
            "No sets available",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    sets.iter()
        .take(MAX_SECTION_ROWS)
        .map(|set| {
            let (label, color) = set_status(set.active);
            let category = set
                .category
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| "General".to_string());
            Line::from(vec![
                Span::styled(sanitize(&set.name), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!(" ({category})"), Style::default().fg(Color::Gray)),
                Span::styled(format!(" {label}"), Style::default().fg(color)),
                Span::styled(
                    format!("  {} instruments", set.total_instruments.unwrap_or(0)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect()
}

/// Toast overlay content, newest last.
pub fn toast_lines(toasts: &[Toast]) -> Vec<Line<'static>> {
    toasts
        .iter()
        .map(|toast| {
            let (color, icon) = toast_style(toast.kind);
            Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::raw(sanitize(&toast.message)),
            ])
        })
        .collect()
}

/// Draw the whole dashboard.
pub fn draw_dashboard(f: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(4), // headline stats
            Constraint::Length(4), // today stats
            Constraint::Min(10),   // main content
            Constraint::Length(3), // footer
        ])
        .split(f.size());

    draw_header(f, chunks[0], state);
    draw_headline_stats(f, chunks[1], state);
    draw_today_stats(f, chunks[2], state);
    draw_main(f, chunks[3], state);
    draw_footer(f, chunks[4], state);
    draw_toasts(f, state);
}

fn draw_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = vec![
        Span::styled(
            "  Sira Dashboard ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(updated) = state.last_update {
        spans.push(Span::styled(
            format!("  |  updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }
    if state.loading {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);
    f.render_widget(header, area);
}

fn stat_tile(f: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let tile = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(tile, area);
}

fn draw_headline_stats(f: &mut Frame, area: Rect, state: &DashboardState) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &state.stats;
    stat_tile(
        f,
        tiles[0],
        "Registered instruments",
        format_count(stats.registered_instruments),
        Color::Cyan,
    );
    stat_tile(
        f,
        tiles[1],
        "Successful identifications",
        format_count(stats.successful_identifications),
        Color::Green,
    );
    stat_tile(f, tiles[2], "Average time", sanitize(&stats.avg_time), Color::Yellow);
    stat_tile(f, tiles[3], "Accuracy", sanitize(&stats.accuracy), Color::Magenta);
}

fn draw_today_stats(f: &mut Frame, area: Rect, state: &DashboardState) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &state.stats;
    stat_tile(
        f,
        tiles[0],
        "Identifications today",
        format_count(stats.identifications_today),
        Color::Cyan,
    );
    stat_tile(
        f,
        tiles[1],
        "Avg time today",
        sanitize(&stats.avg_time_today),
        Color::Yellow,
    );
    stat_tile(
        f,
        tiles[2],
        "Accuracy today",
        sanitize(&stats.accuracy_today),
        Color::Magenta,
    );
    stat_tile(
        f,
        tiles[3],
        "Active users",
        format_count(stats.active_users),
        Color::Green,
    );
}

fn draw_main(f: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(50),
            Constraint::Min(4),
        ])
        .split(columns[1]);

    section(
        f,
        left[0],
        format!(" Alerts ({}) ", state.alerts.len()),
        alert_lines(&state.alerts, state.selected_alert),
        Color::Yellow,
    );
    section(
        f,
        left[1],
        " Recent counts ".to_string(),
        count_lines(&state.recent_counts),
        Color::Blue,
    );

    let procedures = vec![
        Line::from(format!("Total:     {}", state.procedures.total)),
        Line::from(format!("Active:    {}", state.procedures.active)),
        Line::from(format!("Completed: {}", state.procedures.completed)),
    ];
    section(f, right[0], " Procedures ".to_string(), procedures, Color::Cyan);
    section(
        f,
        right[1],
        format!(" Instrument categories ({} total) ", format_count(state.instruments.total)),
        category_lines(&state.instruments),
        Color::Blue,
    );
    section(
        f,
        right[2],
        " Surgical sets ".to_string(),
        set_lines(&state.instrument_sets),
        Color::Blue,
    );
}

fn section(f: &mut Frame, area: Rect, title: String, lines: Vec<Line<'static>>, border: Color) {
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn draw_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let auto = if state.auto_paused {
        Span::styled("  auto-refresh paused", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("  auto-refresh on", Style::default().fg(Color::Gray))
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Refresh  "),
        Span::styled(" up/down ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Select alert  "),
        Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Resolve  "),
        Span::styled(" d ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Dismiss  "),
        Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Quit"),
        auto,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(footer, area);
}

/// Floating notification box, bottom-right, above everything else.
fn draw_toasts(f: &mut Frame, state: &DashboardState) {
    if state.toasts.is_empty() {
        return;
    }

    let frame_area = f.size();
    let width = frame_area.width.min(44);
    let height = (state.toasts.len() as u16 + 2).min(frame_area.height);
    let area = Rect {
        x: frame_area.width.saturating_sub(width + 1),
        y: frame_area.height.saturating_sub(height + 1),
        width,
        height,
    };

    let widget = Paragraph::new(toast_lines(&state.toasts)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(" notifications "),
    );
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn alert(id: u64, kind: AlertKind, title: &str) -> Alert {
        Alert {
            id,
            kind,
            title: Some(title.to_string()),
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize("plain text"), "plain text");
        assert_eq!(sanitize("bad\x1b[31mcolor\x07"), "bad[31mcolor");
        assert_eq!(sanitize("line\nbreak\ttab"), "linebreaktab");
    }

    #[test]
    fn format_count_groups_digits() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(123), "123");
        assert_eq!(format_count(2247), "2,247");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn format_timestamp_handles_all_inputs() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(
            format_timestamp(Some("2025-06-01T10:30:00Z")),
            "01/06 10:30"
        );
        assert_eq!(format_timestamp(Some("not a date")), "not a date");
    }

    #[test]
    fn list_sections_cap_at_five_in_input_order() {
        let alerts: Vec<Alert> = (0..8)
            .map(|i| alert(i, AlertKind::Info, &format!("alert-{i}")))
            .collect();
        let lines = alert_lines(&alerts, 0);
        assert_eq!(lines.len(), MAX_SECTION_ROWS);
        assert!(text_of(&lines[0]).contains("alert-0"));
        assert!(text_of(&lines[4]).contains("alert-4"));

        let sets: Vec<InstrumentSet> = (0..9)
            .map(|i| InstrumentSet {
                name: format!("set-{i}"),
                category: None,
                active: true,
                total_instruments: Some(i),
            })
            .collect();
        let lines = set_lines(&sets);
        assert_eq!(lines.len(), MAX_SECTION_ROWS);
        assert!(text_of(&lines[0]).contains("set-0"));
    }

    #[test]
    fn empty_lists_render_placeholder_rows() {
        assert_eq!(text_of(&alert_lines(&[], 0)[0]), "No active alerts");
        assert_eq!(text_of(&count_lines(&[])[0]), "No recent counts");
        assert_eq!(text_of(&set_lines(&[])[0]), "No sets available");
        assert_eq!(
            text_of(&category_lines(&InstrumentStats::default())[0]),
            "No categories recorded"
        );
    }

    #[test]
    fn unknown_alert_kind_renders_as_info() {
        assert_eq!(alert_style(AlertKind::Unknown), alert_style(AlertKind::Info));
    }

    #[test]
    fn unknown_count_status_gets_neutral_color() {
        assert_eq!(count_status_color(CountStatus::Unknown), Color::DarkGray);
        assert_eq!(count_status_color(CountStatus::Completado), Color::Green);
    }

    #[test]
    fn alert_without_title_gets_default_label() {
        let alerts = vec![Alert {
            id: 1,
            kind: AlertKind::Warning,
            title: None,
            description: Some("desc".to_string()),
            created_at: None,
        }];
        let lines = alert_lines(&alerts, 0);
        assert!(text_of(&lines[0]).contains("System alert"));
        assert!(text_of(&lines[0]).contains("desc"));
    }

    #[test]
    fn alert_text_is_sanitized() {
        let alerts = vec![alert(1, AlertKind::Error, "bad\x1b[0mtitle")];
        let lines = alert_lines(&alerts, 0);
        assert!(!text_of(&lines[0]).contains('\x1b'));
    }

    #[test]
    fn set_without_category_shows_general() {
        let sets = vec![InstrumentSet {
            name: "Basic".to_string(),
            category: None,
            active: false,
            total_instruments: None,
        }];
        let line = text_of(&set_lines(&sets)[0]);
        assert!(line.contains("General"));
        assert!(line.contains("inactive"));
    }

    #[test]
    fn toast_lines_keep_insertion_order() {
        let toasts = vec![
            Toast {
                message: "first".to_string(),
                kind: ToastKind::Info,
                created: Instant::now(),
            },
            Toast {
                message: "second".to_string(),
                kind: ToastKind::Error,
                created: Instant::now(),
            },
        ];
        let lines = toast_lines(&toasts);
        assert_eq!(lines.len(), 2);
        assert!(text_of(&lines[0]).contains("first"));
        assert!(text_of(&lines[1]).contains("second"));
    }
}
