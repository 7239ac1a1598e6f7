//! View-models derived from backend responses.
//!
//! Everything here is a pure mapping from wire data to a display-ready
//! structure. Renderers in [`crate::render`] turn these into text, Markdown,
//! HTML, or JSON.

use serde::Serialize;

use crate::domain::{AnalysisResponse, ConnectivityStatus, DetailedFinding, StatusResponse, UploadFile};
use crate::endpoint::ApiConfig;

/// Summary text used when the backend omits one.
pub const DEFAULT_SUMMARY: &str = "No summary available";
/// Headline used for a clean result without a message.
pub const DEFAULT_CLEAN_MESSAGE: &str = "No errors found!";
/// Advice used for a clean result without a suggestion.
pub const DEFAULT_CLEAN_SUGGESTION: &str = "The log file appears to be clean.";
/// Notice shown on a finding whose ticket could not be filed.
pub const TICKET_FAILURE_NOTICE: &str = "Failed to create JIRA ticket";

/// Progress shown while a submission is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingView {
    /// Name of the file being analyzed.
    pub file_name: String,
    /// Size in kilobytes, one decimal place.
    pub file_size: String,
}

impl LoadingView {
    /// Name and size, e.g. `app.log (2.0 KB)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.file_name, self.file_size)
    }
}

/// Ticket outcome for a single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum TicketState {
    /// A ticket was filed at this URL.
    Created(String),
    /// The backend failed to file a ticket.
    Failed,
}

/// One finding card, numbered from 1 in response order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingCard {
    /// 1-based position in the report.
    pub number: usize,
    /// Severity badge text as sent by the backend.
    pub severity: String,
    /// Display class derived from the severity, e.g. `severity-high`.
    pub severity_class: String,
    /// Team badge text.
    pub team: String,
    /// Error type badge text.
    pub kind: String,
    /// Raw error text, shown preformatted.
    pub error: String,
    /// Remediation advice split on line breaks.
    pub analysis_lines: Vec<String>,
    /// Backend test status label, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_status: Option<String>,
    /// Ticket outcome.
    pub ticket: TicketState,
}

/// Report for a response that carried findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingsView {
    /// Total test cases detected.
    pub total_tests: u64,
    /// Passing test cases.
    pub passed_tests: u64,
    /// Failing test cases.
    pub failed_tests: u64,
    /// Number of tickets created.
    pub tickets_count: usize,
    /// Executive summary, preformatted.
    pub summary: String,
    /// Finding cards in response order.
    pub findings: Vec<FindingCard>,
    /// Created ticket URLs; the tickets section is omitted when empty.
    pub tickets: Vec<String>,
}

/// Report for a response without findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanView {
    /// Headline.
    pub message: String,
    /// Follow-up advice.
    pub suggestion: String,
}

/// Report shown when the backend could not be reached or answered garbage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    /// Transport or parse error message.
    pub message: String,
    /// Fixed troubleshooting checklist.
    pub troubleshooting: Vec<String>,
    /// Base URL the submission targeted.
    pub base_url: String,
    /// Name of the attempted file.
    pub file_name: String,
    /// Size of the attempted file, in kilobytes.
    pub file_size: String,
}

/// Terminal state of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReportView {
    /// The backend found and analyzed errors.
    Findings(FindingsView),
    /// The backend reported nothing to act on.
    Clean(CleanView),
    /// The backend could not be reached or its answer was unreadable.
    Error(ErrorView),
}

/// Connectivity indicator content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Probe outcome.
    pub connectivity: ConnectivityStatus,
    /// Extra `label: value` lines reported by the backend.
    pub details: Vec<(String, String)>,
}

/// Anything an output region can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputView {
    /// A submission is in flight.
    Loading(LoadingView),
    /// A submission finished.
    Report(ReportView),
    /// The status probe finished.
    Status(StatusView),
}

/// Build the loading view for a file about to be submitted.
pub fn loading_view(file: &UploadFile) -> LoadingView {
    LoadingView {
        file_name: file.name.clone(),
        file_size: file.size_kb(),
    }
}

/// Map a parsed analysis response to its report.
pub fn classify_response(response: &AnalysisResponse) -> ReportView {
    if !response.success {
        return ReportView::Clean(CleanView {
            message: response
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_CLEAN_MESSAGE.to_string()),
            suggestion: response
                .suggestion
                .clone()
                .unwrap_or_else(|| DEFAULT_CLEAN_SUGGESTION.to_string()),
        });
    }

    let findings = response
        .detailed_analysis
        .iter()
        .enumerate()
        .map(|(index, finding)| finding_card(index + 1, finding))
        .collect();

    ReportView::Findings(FindingsView {
        total_tests: response.total_tests,
        passed_tests: response.passed_tests,
        failed_tests: response.failed_tests,
        tickets_count: response.tickets_created.len(),
        summary: response
            .summary
            .clone()
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        findings,
        tickets: response.tickets_created.clone(),
    })
}

/// Build the connection-error report for a failed submission.
pub fn error_view(config: &ApiConfig, file: &UploadFile, message: impl Into<String>) -> ReportView {
    ReportView::Error(ErrorView {
        message: message.into(),
        troubleshooting: troubleshooting_checklist(config),
        base_url: config.base_url().to_string(),
        file_name: file.name.clone(),
        file_size: file.size_kb(),
    })
}

/// Build the connectivity indicator for a probe outcome.
pub fn status_view(connectivity: ConnectivityStatus, response: Option<&StatusResponse>) -> StatusView {
    let mut details = Vec::new();
    if let Some(response) = response {
        let fields = [
            ("Ticket tracker", response.jira_status.as_deref()),
            ("AI provider", response.ai_status.as_deref()),
            ("Project", response.project_key.as_deref()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                details.push((label.to_string(), value.to_string()));
            }
        }
    }
    StatusView {
        connectivity,
        details,
    }
}

/// Display class for a severity label.
///
/// Lowercased and reduced to `[a-z0-9-]` so it is always a valid class name.
pub fn severity_class(severity: &str) -> String {
    let slug: String = severity
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_whitespace() { '-' } else { ch })
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
        .collect();
    if slug.is_empty() {
        "severity-unknown".to_string()
    } else {
        format!("severity-{slug}")
    }
}

fn finding_card(number: usize, finding: &DetailedFinding) -> FindingCard {
    FindingCard {
        number,
        severity: finding.severity.clone(),
        severity_class: severity_class(&finding.severity),
        team: finding.team.clone(),
        kind: finding.kind.clone(),
        error: finding.error.clone(),
        analysis_lines: finding
            .ai_analysis
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect(),
        test_status: finding.test_status.clone(),
        ticket: match &finding.ticket_url {
            Some(url) if !url.trim().is_empty() => TicketState::Created(url.clone()),
            _ => TicketState::Failed,
        },
    }
}

fn troubleshooting_checklist(config: &ApiConfig) -> Vec<String> {
    vec![
        format!("Check if the backend is running at: {}", config.base_url()),
        "Verify CORS is properly configured".to_string(),
        "Check network connectivity".to_string(),
        "Try submitting the file again".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: &str, ticket_url: Option<&str>) -> DetailedFinding {
        DetailedFinding {
            severity: severity.to_string(),
            team: "Infra".to_string(),
            kind: "Timeout".to_string(),
            error: "conn refused".to_string(),
            ai_analysis: "Retry with backoff".to_string(),
            ticket_url: ticket_url.map(str::to_string),
            test_status: None,
        }
    }

    fn findings(view: ReportView) -> FindingsView {
        match view {
            ReportView::Findings(findings) => findings,
            other => panic!("expected findings, got {other:?}"),
        }
    }

    #[test]
    fn scenario_c_single_finding_with_ticket() {
        let response: AnalysisResponse = serde_json::from_str(
            r#"{"success":true,"detailed_analysis":[{"severity":"High","team":"Infra",
                "type":"Timeout","error":"conn refused","ai_analysis":"Retry with backoff",
                "ticket_url":"https://x/1"}],"tickets_created":["https://x/1"]}"#,
        )
        .unwrap();
        let view = findings(classify_response(&response));

        assert_eq!(view.findings.len(), 1);
        let card = &view.findings[0];
        assert_eq!(card.number, 1);
        assert_eq!(card.severity, "High");
        assert_eq!(card.severity_class, "severity-high");
        assert_eq!(card.team, "Infra");
        assert_eq!(card.kind, "Timeout");
        assert_eq!(card.ticket, TicketState::Created("https://x/1".to_string()));
        assert_eq!(view.tickets, vec!["https://x/1".to_string()]);
        assert_eq!(view.tickets_count, 1);
        assert_eq!(view.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn success_without_findings_has_header_only() {
        let response = AnalysisResponse {
            success: true,
            total_tests: 4,
            passed_tests: 4,
            summary: Some("All good".to_string()),
            ..AnalysisResponse::default()
        };
        let view = findings(classify_response(&response));
        assert_eq!(view.total_tests, 4);
        assert_eq!(view.passed_tests, 4);
        assert_eq!(view.failed_tests, 0);
        assert!(view.findings.is_empty());
        assert!(view.tickets.is_empty());
        assert_eq!(view.summary, "All good");
    }

    #[test]
    fn cards_preserve_order_and_numbering() {
        let response = AnalysisResponse {
            success: true,
            detailed_analysis: vec![
                finding("Critical", Some("https://x/1")),
                finding("Low", None),
                finding("Medium", Some("https://x/3")),
            ],
            ..AnalysisResponse::default()
        };
        let view = findings(classify_response(&response));
        let numbers: Vec<usize> = view.findings.iter().map(|card| card.number).collect();
        let severities: Vec<&str> = view.findings.iter().map(|card| card.severity.as_str()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(severities, vec!["Critical", "Low", "Medium"]);
    }

    #[test]
    fn missing_or_blank_ticket_url_is_a_failure() {
        let response = AnalysisResponse {
            success: true,
            detailed_analysis: vec![finding("High", None), finding("High", Some("  "))],
            ..AnalysisResponse::default()
        };
        let view = findings(classify_response(&response));
        assert!(view.findings.iter().all(|card| card.ticket == TicketState::Failed));
    }

    #[test]
    fn scenario_b_clean_uses_message_and_default_suggestion() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"success": false, "message": "No errors found!"}"#).unwrap();
        let view = classify_response(&response);
        assert_eq!(
            view,
            ReportView::Clean(CleanView {
                message: "No errors found!".to_string(),
                suggestion: DEFAULT_CLEAN_SUGGESTION.to_string(),
            })
        );
    }

    #[test]
    fn absent_success_falls_back_to_clean_defaults() {
        let view = classify_response(&AnalysisResponse::default());
        assert_eq!(
            view,
            ReportView::Clean(CleanView {
                message: DEFAULT_CLEAN_MESSAGE.to_string(),
                suggestion: DEFAULT_CLEAN_SUGGESTION.to_string(),
            })
        );
    }

    #[test]
    fn analysis_text_keeps_line_breaks() {
        let mut item = finding("High", None);
        item.ai_analysis = "1. Check pool\r\n2. Restart\n\n3. Monitor".to_string();
        let card = finding_card(1, &item);
        assert_eq!(
            card.analysis_lines,
            vec!["1. Check pool", "2. Restart", "", "3. Monitor"]
        );
    }

    #[test]
    fn severity_class_is_sanitized() {
        assert_eq!(severity_class("High"), "severity-high");
        assert_eq!(severity_class("Very High"), "severity-very-high");
        assert_eq!(severity_class("x\" onclick=\"y"), "severity-x-onclicky");
        assert_eq!(severity_class(""), "severity-unknown");
    }

    #[test]
    fn error_view_echoes_config_and_file() {
        let config = ApiConfig::from_hostname("localhost");
        let file = UploadFile::new("app.log", vec![0; 2048]);
        let view = error_view(&config, &file, "connection refused");
        match view {
            ReportView::Error(error) => {
                assert_eq!(error.message, "connection refused");
                assert_eq!(error.base_url, "http://localhost:5000");
                assert_eq!(error.file_name, "app.log");
                assert_eq!(error.file_size, "2.0 KB");
                assert_eq!(error.troubleshooting.len(), 4);
                assert!(error.troubleshooting[0].contains("http://localhost:5000"));
            }
            other => panic!("expected error view, got {other:?}"),
        }
    }

    #[test]
    fn status_view_collects_backend_details() {
        let response = StatusResponse {
            server: "Backend API Running".to_string(),
            jira_status: Some("Connected".to_string()),
            ai_status: None,
            project_key: Some("LOG".to_string()),
            jira_connected: Some(true),
        };
        let view = status_view(
            ConnectivityStatus::Connected {
                server: response.server.clone(),
            },
            Some(&response),
        );
        assert_eq!(
            view.details,
            vec![
                ("Ticket tracker".to_string(), "Connected".to_string()),
                ("Project".to_string(), "LOG".to_string()),
            ]
        );
    }

    #[test]
    fn report_serializes_with_outcome_tag() {
        let view = classify_response(&AnalysisResponse::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["outcome"], "clean");
        assert_eq!(json["message"], DEFAULT_CLEAN_MESSAGE);
    }
}
