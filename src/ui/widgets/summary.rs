// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use vanguard_posture::core::models::Status;

/// Renders the score, a gauge, the per-evaluator verdicts and issue counts.
///
/// Nothing is drawn inside the frame until a scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & Rating
            Constraint::Length(1), // Gauge
            Constraint::Length(1),
            Constraint::Length(4), // Security Checks
            Constraint::Length(1),
            Constraint::Length(5), // Issues Found
            Constraint::Length(1),
            Constraint::Min(0), // Target
        ])
        .split(area);

    if app.state != AppState::Finished || app.scan_report.is_none() {
        return;
    }

    let (rating_text, rating_style) = match app.summary.score {
        90..=100 => ("Excellent", Style::default().fg(Color::Green)),
        75..=89 => ("Good", Style::default().fg(Color::Cyan)),
        50..=74 => ("Needs Improvement", Style::default().fg(Color::Yellow)),
        _ => ("Poor", Style::default().fg(Color::Red)),
    };
    let score_line =
        Line::from(format!("{}/100 ({})", app.summary.score, rating_text)).style(rating_style);
    let score_text = Text::from(vec![Line::from("Overall Score".bold()), score_line]);
    frame.render_widget(
        Paragraph::new(score_text).alignment(Alignment::Center),
        summary_chunks[0],
    );

    let gauge_color = if app.displayed_score >= 80 {
        Color::Green
    } else if app.displayed_score >= 50 {
        Color::Yellow
    } else {
        Color::Red
    };
    let score_gauge = Gauge::default()
        .percent(u16::from(app.displayed_score))
        .label("")
        .style(Style::default().fg(gauge_color));
    frame.render_widget(score_gauge, summary_chunks[1]);

    let http_line = match app.summary.status_code {
        Some(code) => format!("HTTP Security Headers ({code})"),
        None => "HTTP Security Headers (unreachable)".to_string(),
    };
    let mut checks_lines = Vec::new();
    for (name, passed) in [
        (http_line, app.summary.headers_check_passed),
        ("DNS Configuration".to_string(), app.summary.dns_check_passed),
    ] {
        let (icon, style) = if passed {
            ("✓", Style::default().fg(Color::Green))
        } else {
            ("✗", Style::default().fg(Color::Red))
        };
        checks_lines.push(Line::from(vec![
            Span::styled(format!("{icon} "), style),
            Span::raw(name),
        ]));
    }
    frame.render_widget(
        Paragraph::new(checks_lines).block(Block::default().title("SECURITY CHECKS".bold())),
        summary_chunks[3],
    );

    let count_line = |label: &'static str, count: usize, status: Status| {
        Line::from(vec![
            Span::raw(label),
            Span::styled(count.to_string(), super::analysis_view::status_style(status)),
        ])
    };
    let details_text = Text::from(vec![
        count_line("Failed:   ", app.summary.failed_issues, Status::Failed),
        count_line("Warnings: ", app.summary.warning_issues, Status::Warning),
        count_line("Errors:   ", app.summary.error_checks, Status::Error),
        count_line("Passed:   ", app.summary.passed_checks, Status::Passed),
    ]);
    frame.render_widget(
        Paragraph::new(details_text).block(Block::default().title("ISSUES FOUND".bold())),
        summary_chunks[5],
    );

    let mut target_lines = Vec::new();
    if let Some(report) = &app.scan_report {
        target_lines.push(Line::from(report.headers.target.clone()));
    }
    if let Some(technologies) = &app.summary.technologies {
        target_lines.push(Line::from(vec![
            Span::raw("Stack: "),
            Span::styled(technologies.clone(), Style::default().fg(Color::Cyan)),
        ]));
    }
    if let Some(at) = app.last_scan_at {
        target_lines.push(Line::from(Span::styled(
            format!("Scanned {}", at.format("%Y-%m-%d %H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(
        Paragraph::new(target_lines).block(Block::default().title("TARGET".bold())),
        summary_chunks[7],
    );
}
