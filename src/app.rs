// src/app.rs

use crate::logging;
use chrono::{DateTime, Local};
use ratatui::widgets::{ListState, ScrollbarState};
use vanguard_posture::core::error::ScanError;
use vanguard_posture::core::models::{Finding, FullScanReport, ScanDetails, Status};

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const LOG_TAIL_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub score: u8,
    pub failed_issues: usize,
    pub warning_issues: usize,
    pub error_checks: usize,
    pub passed_checks: usize,
    pub headers_check_passed: bool,
    pub dns_check_passed: bool,
    pub status_code: Option<u16>,
    pub technologies: Option<String>,
}

impl ScanSummary {
    /// 100, minus 15 per FAILED and 5 per WARNING finding, never below 0.
    pub fn score_for<'a>(findings: impl Iterator<Item = &'a Finding>) -> u8 {
        let penalty: usize = findings
            .map(|f| match f.status {
                Status::Failed => 15,
                Status::Warning => 5,
                _ => 0,
            })
            .sum();
        100usize.saturating_sub(penalty) as u8
    }

    pub fn from_report(report: &FullScanReport) -> Self {
        let count = |status: Status| report.all_findings().filter(|f| f.status == status).count();
        let clean = |findings: &[Finding]| {
            findings
                .iter()
                .all(|f| !matches!(f.status, Status::Failed | Status::Error))
        };
        let status_code = match &report.headers.details {
            ScanDetails::Headers { status_code, .. } => *status_code,
            _ => None,
        };
        Self {
            score: Self::score_for(report.all_findings()),
            failed_issues: count(Status::Failed),
            warning_issues: count(Status::Warning),
            error_checks: count(Status::Error),
            passed_checks: count(Status::Passed),
            headers_check_passed: clean(&report.headers.findings),
            dns_check_passed: clean(&report.dns.findings),
            status_code,
            technologies: report
                .headers
                .finding("Technology-Stack")
                .and_then(|f| f.value.clone()),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub scan_report: Option<FullScanReport>,
    pub all_findings: Vec<Finding>,
    pub analysis_list_state: ListState,
    pub summary: ScanSummary,
    /// Animated toward `summary.score` on every tick.
    pub displayed_score: u8,
    pub spinner_frame: usize,
    pub show_disclaimer: bool,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    pub error_message: Option<String>,
    pub last_scan_at: Option<DateTime<Local>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            scan_report: None,
            all_findings: Vec::new(),
            analysis_list_state: ListState::default(),
            summary: ScanSummary::default(),
            displayed_score: 0,
            spinner_frame: 0,
            show_disclaimer: true,
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            error_message: None,
            last_scan_at: None,
        }
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Scanning {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.displayed_score < self.summary.score {
            self.displayed_score = (self.displayed_score + 2).min(self.summary.score);
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    /// Moves to `Scanning` and hands back the target, unless the input is blank.
    pub fn start_scan(&mut self) -> Option<String> {
        let target = self.input.trim().to_string();
        if target.is_empty() {
            return None;
        }
        self.state = AppState::Scanning;
        self.error_message = None;
        self.spinner_frame = 0;
        Some(target)
    }

    pub fn finish_scan(&mut self, result: Result<FullScanReport, ScanError>) {
        self.state = AppState::Finished;
        self.last_scan_at = Some(Local::now());
        match result {
            Ok(report) => {
                self.all_findings = report.all_findings().cloned().collect();
                self.summary = ScanSummary::from_report(&report);
                self.scan_report = Some(report);
                self.analysis_list_state
                    .select(if self.all_findings.is_empty() { None } else { Some(0) });
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                self.all_findings.clear();
                self.summary = ScanSummary::default();
                self.scan_report = None;
                self.analysis_list_state.select(None);
            }
        }
        self.displayed_score = 0;
    }

    pub fn select_next(&mut self) {
        if self.all_findings.is_empty() {
            return;
        }
        let next = match self.analysis_list_state.selected() {
            Some(i) if i + 1 < self.all_findings.len() => i + 1,
            _ => 0,
        };
        self.analysis_list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.all_findings.is_empty() {
            return;
        }
        let previous = match self.analysis_list_state.selected() {
            Some(0) | None => self.all_findings.len() - 1,
            Some(i) => i - 1,
        };
        self.analysis_list_state.select(Some(previous));
    }

    pub fn selected_finding(&self) -> Option<&Finding> {
        self.analysis_list_state
            .selected()
            .and_then(|i| self.all_findings.get(i))
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.refresh_logs();
        }
    }

    pub fn refresh_logs(&mut self) {
        self.log_content = logging::tail_log(LOG_TAIL_LINES);
    }

    pub fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state = self
            .log_horizontal_scroll_state
            .position(self.log_horizontal_scroll);
    }

    pub fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state = self
            .log_horizontal_scroll_state
            .position(self.log_horizontal_scroll);
    }

    pub fn acknowledge_disclaimer(&mut self) {
        self.show_disclaimer = false;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input.clear();
        self.scan_report = None;
        self.all_findings.clear();
        self.analysis_list_state = ListState::default();
        self.summary = ScanSummary::default();
        self.displayed_score = 0;
        self.error_message = None;
    }
}
