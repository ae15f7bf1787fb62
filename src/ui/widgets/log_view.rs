// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

fn level_style(level: &str) -> Style {
    match level {
        "ERROR" => Style::default().fg(Color::Red),
        "WARN" => Style::default().fg(Color::Yellow),
        "INFO" => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Blue),
    }
}

/// Splits "DATE TIME LEVEL MESSAGE" into styled spans; anything else is shown as-is.
fn styled_line(raw: &str) -> Line<'_> {
    let mut parts = raw.splitn(3, ' ');
    let (Some(date), Some(time), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Line::from(raw);
    };
    // Levels are right-aligned, so short ones carry extra leading spaces.
    let rest = rest.trim_start();
    let (level, message) = rest.split_once(' ').unwrap_or((rest, ""));
    Line::from(vec![
        Span::styled(format!("{date} {time}"), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(level.to_string(), level_style(level)),
        Span::raw(format!(" {message}")),
    ])
}

/// Renders the tail of the log file with a horizontal scrollbar.
pub fn render_log_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Logs (scroll with ← →)")
        .borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app
        .log_content
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    app.log_horizontal_scroll_state = app.log_horizontal_scroll_state.content_length(max_width);

    // Newest lines stay visible at the bottom.
    let visible = usize::from(inner_area.height.saturating_sub(1));
    let skip = app.log_content.len().saturating_sub(visible);
    let log_lines: Vec<Line> = app.log_content[skip..]
        .iter()
        .map(|line| styled_line(line))
        .collect();

    let log_paragraph = Paragraph::new(log_lines).scroll((0, app.log_horizontal_scroll as u16));
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom).thumb_symbol("■");
    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    frame.render_stateful_widget(
        scrollbar,
        scrollbar_area,
        &mut app.log_horizontal_scroll_state,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_timestamp_level_and_message() {
        let line = styled_line("2026-10-17 09:15:02  INFO Starting DNS scan. domain=\"example.com\"");
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[0].content, "2026-10-17 09:15:02");
        assert_eq!(line.spans[2].content, "INFO");
        assert_eq!(line.spans[3].content, " Starting DNS scan. domain=\"example.com\"");
    }

    #[test]
    fn unexpected_lines_are_kept_verbatim() {
        assert_eq!(styled_line("garbage").to_string(), "garbage");
    }
}
