// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use vanguard_posture::core::knowledge_base::{self, FindingCategory};
use vanguard_posture::core::models::{Finding, Status};

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Passed => Style::default().fg(Color::Green),
        Status::Warning => Style::default().fg(Color::Yellow),
        Status::Failed => Style::default().fg(Color::Red),
        Status::Info => Style::default().fg(Color::Cyan),
        Status::Error => Style::default().fg(Color::Magenta),
    }
}

fn category_prefix(finding: &Finding) -> &'static str {
    match knowledge_base::get_finding_detail(&finding.check_name).map(|d| d.category) {
        Some(FindingCategory::Dns) => "[DNS] ",
        _ => "[HTTP] ",
    }
}

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Analysis Report (Navigate with ↑ ↓)");

    if app.state != AppState::Finished {
        let content = match app.state {
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{spinner_char} "), Style::default().fg(Color::Cyan)),
                    Span::raw("Scanning... Please wait."),
                ]))
            }
            _ => Paragraph::new("Scan results will appear here..."),
        };
        frame.render_widget(content.alignment(Alignment::Center).block(main_block), area);
        return;
    }

    if let Some(message) = &app.error_message {
        let text = Text::from(vec![
            Line::from(""),
            Line::from("SCAN COULD NOT START".bold().fg(Color::Red)),
            Line::from(""),
            Line::from(message.as_str()),
        ]);
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(main_block);
        frame.render_widget(p, area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(0)])
        .split(inner_area);

    let items: Vec<ListItem> = app
        .all_findings
        .iter()
        .map(|f| {
            ListItem::new(Line::from(vec![
                Span::styled(category_prefix(f), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<8} ", f.status.to_string()), status_style(f.status)),
                Span::raw(f.check_name.clone()),
            ]))
        })
        .collect();

    let findings_list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(findings_list, chunks[0], &mut app.analysis_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    match app.selected_finding() {
        Some(finding) => {
            let p = Paragraph::new(detail_lines(finding))
                .wrap(Wrap { trim: true })
                .block(detail_block);
            frame.render_widget(p, chunks[1]);
        }
        None => render_placeholder_details(frame, app, detail_block, chunks[1]),
    }
}

fn detail_lines(finding: &Finding) -> Vec<Line<'static>> {
    let detail = knowledge_base::get_finding_detail(&finding.check_name);
    let title = detail.map_or(finding.check_name.clone(), |d| d.title.to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().bold()),
            Span::raw("  "),
            Span::styled(finding.status.to_string(), status_style(finding.status).bold()),
        ]),
        Line::from(""),
        Line::from(finding.notes.clone()),
    ];
    if let Some(value) = &finding.value {
        lines.push(Line::from(vec![
            Span::styled("Observed: ", Style::default().fg(Color::DarkGray)),
            Span::raw(value.clone()),
        ]));
    }
    for (key, value) in &finding.details {
        lines.push(Line::from(vec![
            Span::styled(format!("{key}: "), Style::default().fg(Color::DarkGray)),
            Span::raw(value.clone()),
        ]));
    }

    match detail {
        Some(detail) => {
            lines.push(Line::from(""));
            lines.push(Line::from("WHAT IT IS:".yellow().bold()));
            lines.push(Line::from(detail.description));
            if !matches!(finding.status, Status::Passed | Status::Info) {
                lines.push(Line::from(""));
                lines.push(Line::from("HOW TO FIX:".yellow().bold()));
                lines.push(Line::from(detail.remediation));
            }
        }
        None => {
            lines.push(Line::from(""));
            lines.push(Line::from("Custom header presence check.".italic()));
        }
    }
    lines
}

fn render_placeholder_details(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let total_issues = app.summary.failed_issues + app.summary.warning_issues;

    let placeholder_text = if total_issues == 0 && !app.all_findings.is_empty() {
        Text::from(vec![
            Line::from(""),
            Line::from("✓ EXCELLENT SECURITY POSTURE".bold().fg(Color::Green)),
            Line::from(""),
            Line::from("No failed or warning checks were found during the scan."),
        ])
    } else {
        Text::from("Select an item above to see details.")
    };

    let p = Paragraph::new(placeholder_text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(p, area);
}
