//! Presentation adapters for LogTriage view-models.

use std::fmt::Write;

use serde::Serialize;
use url::Url;

use crate::domain::ConnectivityStatus;
use crate::view::{
    CleanView, ErrorView, FindingCard, FindingsView, LoadingView, OutputView, ReportView,
    StatusView, TICKET_FAILURE_NOTICE, TicketState,
};

/// Turns a view-model into presentation output.
pub trait Renderer {
    /// Render a complete document for the view.
    fn render(&self, view: &OutputView) -> String;
}

/// HTML fragments matching the upload page's output region.
///
/// Every backend-supplied string is escaped before it is embedded.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

/// Plain terminal text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

/// A Markdown document.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

/// Pretty-printed JSON of the view-model.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

/// Render any serializable payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text so Markdown shows it literally.
///
/// Markdown punctuation is backslash-escaped and HTML metacharacters become
/// entities. Line breaks collapse to spaces so the text stays in its block.
pub fn escape_markdown(text: &str) -> String {
    let text = sanitize_terminal(text);
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push(' '),
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-'
            | '=' | '!' | '|' | '~' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Replace control characters with their escaped form.
///
/// Line feeds and tabs are kept. Bidirectional overrides are escaped too.
pub fn sanitize_terminal(text: &str) -> String {
    let mut clean = String::with_capacity(text.len());
    for ch in text.chars() {
        let unsafe_char = (ch.is_control() && ch != '\n' && ch != '\t')
            || matches!(ch, '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}');
        if unsafe_char {
            clean.extend(ch.escape_default());
        } else {
            clean.push(ch);
        }
    }
    clean
}

fn web_url(url: &str) -> Option<Url> {
    let parsed = Url::parse(url.trim()).ok()?;
    let allowed = matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some();
    allowed.then_some(parsed)
}

fn is_web_url(url: &str) -> bool {
    web_url(url).is_some()
}

impl Renderer for HtmlRenderer {
    fn render(&self, view: &OutputView) -> String {
        let mut output = String::new();
        match view {
            OutputView::Loading(loading) => html_loading(&mut output, loading),
            OutputView::Report(ReportView::Findings(findings)) => {
                html_findings(&mut output, findings)
            }
            OutputView::Report(ReportView::Clean(clean)) => html_clean(&mut output, clean),
            OutputView::Report(ReportView::Error(error)) => html_error(&mut output, error),
            OutputView::Status(status) => html_status(&mut output, status),
        }
        output
    }
}

fn html_loading(output: &mut String, loading: &LoadingView) {
    let _ = writeln!(output, "<div class=\"loading-state\">");
    let _ = writeln!(output, "  <div class=\"spinner\"></div>");
    let _ = writeln!(output, "  <p>Analyzing log file...</p>");
    let _ = writeln!(
        output,
        "  <p class=\"loading-details\">Processing {}</p>",
        escape_html(&loading.label())
    );
    let _ = writeln!(output, "</div>");
}

fn html_findings(output: &mut String, view: &FindingsView) {
    let _ = writeln!(output, "<div class=\"analysis-header\">");
    let _ = writeln!(output, "  <h3>Log Analysis Results</h3>");
    let _ = writeln!(output, "  <div class=\"summary-stats\">");
    let _ = writeln!(output, "    <span class=\"stat\">Total Tests: {}</span>", view.total_tests);
    let _ = writeln!(output, "    <span class=\"stat\">Passed: {}</span>", view.passed_tests);
    let _ = writeln!(output, "    <span class=\"stat\">Failed: {}</span>", view.failed_tests);
    let _ = writeln!(output, "    <span class=\"stat\">Tickets: {}</span>", view.tickets_count);
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "</div>");

    let _ = writeln!(output, "<div class=\"summary-section\">");
    let _ = writeln!(output, "  <h4>Executive Summary</h4>");
    let _ = writeln!(output, "  <pre>{}</pre>", escape_html(&view.summary));
    let _ = writeln!(output, "</div>");

    if !view.findings.is_empty() {
        let _ = writeln!(output, "<div class=\"detailed-analysis\">");
        for card in &view.findings {
            html_card(output, card);
        }
        let _ = writeln!(output, "</div>");
    }

    if !view.tickets.is_empty() {
        let _ = writeln!(output, "<div class=\"tickets-section\">");
        let _ = writeln!(output, "  <h4>Created JIRA Tickets</h4>");
        let _ = writeln!(output, "  <div class=\"ticket-links\">");
        for url in &view.tickets {
            let _ = writeln!(output, "    {}", html_link(url, "ticket-link-btn"));
        }
        let _ = writeln!(output, "  </div>");
        let _ = writeln!(output, "</div>");
    }
}

fn html_card(output: &mut String, card: &FindingCard) {
    let _ = writeln!(output, "<div class=\"error-card\">");
    let _ = writeln!(output, "  <div class=\"error-header\">");
    let _ = writeln!(output, "    <h5>Error {}</h5>", card.number);
    let _ = writeln!(output, "    <div class=\"error-meta\">");
    let _ = writeln!(
        output,
        "      <span class=\"badge {}\">{}</span>",
        card.severity_class,
        escape_html(&card.severity)
    );
    let _ = writeln!(
        output,
        "      <span class=\"badge team-badge\">{}</span>",
        escape_html(&card.team)
    );
    let _ = writeln!(
        output,
        "      <span class=\"badge type-badge\">{}</span>",
        escape_html(&card.kind)
    );
    let _ = writeln!(output, "    </div>");
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "  <div class=\"error-content\">");
    let _ = writeln!(output, "    <strong>Error Message:</strong>");
    let _ = writeln!(
        output,
        "    <pre class=\"error-message\">{}</pre>",
        escape_html(&card.error)
    );
    if let Some(status) = &card.test_status {
        let _ = writeln!(
            output,
            "    <p class=\"test-status\">Test status: {}</p>",
            escape_html(status)
        );
    }
    let analysis = card
        .analysis_lines
        .iter()
        .map(String::as_str)
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>");
    let _ = writeln!(output, "    <div class=\"ai-analysis\">");
    let _ = writeln!(output, "      <strong>AI Analysis &amp; Recommendations:</strong>");
    let _ = writeln!(output, "      <div class=\"ai-content\">{analysis}</div>");
    let _ = writeln!(output, "    </div>");
    match &card.ticket {
        TicketState::Created(url) => {
            let _ = writeln!(output, "    <div class=\"ticket-link\">");
            let _ = writeln!(output, "      <strong>JIRA Ticket:</strong>");
            let _ = writeln!(output, "      {}", html_link(url, "ticket-btn"));
            let _ = writeln!(output, "    </div>");
        }
        TicketState::Failed => {
            let _ = writeln!(output, "    <p class=\"ticket-error\">{TICKET_FAILURE_NOTICE}</p>");
        }
    }
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "</div>");
}

fn html_link(url: &str, class: &str) -> String {
    if is_web_url(url) {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"{class}\">View Ticket</a>",
            escape_html(url.trim())
        )
    } else {
        format!("<span class=\"{class}\">{}</span>", escape_html(url))
    }
}

fn html_clean(output: &mut String, clean: &CleanView) {
    let _ = writeln!(output, "<div class=\"success-message\">");
    let _ = writeln!(output, "  <h3>{}</h3>", escape_html(&clean.message));
    let _ = writeln!(output, "  <p>{}</p>", escape_html(&clean.suggestion));
    let _ = writeln!(output, "</div>");
}

fn html_error(output: &mut String, error: &ErrorView) {
    let _ = writeln!(output, "<div class=\"error-message\">");
    let _ = writeln!(output, "  <h3>Connection Error</h3>");
    let _ = writeln!(
        output,
        "  <p>Failed to contact backend: {}</p>",
        escape_html(&error.message)
    );
    let _ = writeln!(output, "  <p><strong>Troubleshooting:</strong></p>");
    let _ = writeln!(output, "  <ul>");
    for item in &error.troubleshooting {
        let _ = writeln!(output, "    <li>{}</li>", escape_html(item));
    }
    let _ = writeln!(output, "  </ul>");
    let _ = writeln!(output, "  <div class=\"debug-info\">");
    let _ = writeln!(output, "    <strong>Debug Info:</strong>");
    let _ = writeln!(output, "    <p>API URL: {}</p>", escape_html(&error.base_url));
    let _ = writeln!(
        output,
        "    <p>File: {} ({})</p>",
        escape_html(&error.file_name),
        error.file_size
    );
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "</div>");
}

fn html_status(output: &mut String, status: &StatusView) {
    match &status.connectivity {
        ConnectivityStatus::Connected { server } => {
            let _ = writeln!(
                output,
                "<div class=\"status-success\">Backend Connected: {}</div>",
                escape_html(server)
            );
        }
        ConnectivityStatus::Unreachable { error } => {
            let _ = writeln!(
                output,
                "<div class=\"status-warning\">Backend Status: {}</div>",
                escape_html(error)
            );
        }
    }
    if !status.details.is_empty() {
        let _ = writeln!(output, "<ul class=\"status-details\">");
        for (label, value) in &status.details {
            let _ = writeln!(output, "  <li>{label}: {}</li>", escape_html(value));
        }
        let _ = writeln!(output, "</ul>");
    }
}

impl Renderer for TextRenderer {
    fn render(&self, view: &OutputView) -> String {
        let mut output = String::new();
        match view {
            OutputView::Loading(loading) => {
                let _ = writeln!(
                    output,
                    "Analyzing log file... Processing {}",
                    sanitize_terminal(&loading.label())
                );
            }
            OutputView::Report(ReportView::Findings(findings)) => {
                text_findings(&mut output, findings)
            }
            OutputView::Report(ReportView::Clean(clean)) => {
                let _ = writeln!(output, "{}", sanitize_terminal(&clean.message));
                let _ = writeln!(output, "{}", sanitize_terminal(&clean.suggestion));
            }
            OutputView::Report(ReportView::Error(error)) => text_error(&mut output, error),
            OutputView::Status(status) => text_status(&mut output, status),
        }
        output
    }
}

fn text_findings(output: &mut String, view: &FindingsView) {
    let _ = writeln!(output, "Log Analysis Results");
    let _ = writeln!(
        output,
        "Total Tests: {} | Passed: {} | Failed: {} | Tickets: {}",
        view.total_tests, view.passed_tests, view.failed_tests, view.tickets_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "Executive Summary:");
    let _ = writeln!(output, "{}", sanitize_terminal(view.summary.trim_end()));
    for card in &view.findings {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "Error {} [{}] [{}] [{}]",
            card.number,
            sanitize_terminal(&card.severity),
            sanitize_terminal(&card.team),
            sanitize_terminal(&card.kind)
        );
        let _ = writeln!(output, "  Error Message: {}", sanitize_terminal(&card.error));
        if let Some(status) = &card.test_status {
            let _ = writeln!(output, "  Test Status: {}", sanitize_terminal(status));
        }
        let _ = writeln!(output, "  AI Analysis & Recommendations:");
        for line in &card.analysis_lines {
            let _ = writeln!(output, "    {}", sanitize_terminal(line));
        }
        match &card.ticket {
            TicketState::Created(url) => {
                let _ = writeln!(output, "  JIRA Ticket: {}", sanitize_terminal(url));
            }
            TicketState::Failed => {
                let _ = writeln!(output, "  {TICKET_FAILURE_NOTICE}");
            }
        }
    }
    if !view.tickets.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Created JIRA Tickets:");
        for url in &view.tickets {
            let _ = writeln!(output, "  - {}", sanitize_terminal(url));
        }
    }
}

fn text_error(output: &mut String, error: &ErrorView) {
    let _ = writeln!(output, "Connection Error");
    let _ = writeln!(
        output,
        "Failed to contact backend: {}",
        sanitize_terminal(&error.message)
    );
    let _ = writeln!(output, "Troubleshooting:");
    for item in &error.troubleshooting {
        let _ = writeln!(output, "  - {}", sanitize_terminal(item));
    }
    let _ = writeln!(output, "Debug Info:");
    let _ = writeln!(output, "  API URL: {}", sanitize_terminal(&error.base_url));
    let _ = writeln!(
        output,
        "  File: {} ({})",
        sanitize_terminal(&error.file_name),
        error.file_size
    );
}

fn text_status(output: &mut String, status: &StatusView) {
    match &status.connectivity {
        ConnectivityStatus::Connected { server } => {
            let _ = writeln!(output, "Backend Connected: {}", sanitize_terminal(server));
        }
        ConnectivityStatus::Unreachable { error } => {
            let _ = writeln!(output, "Backend Status: {}", sanitize_terminal(error));
        }
    }
    for (label, value) in &status.details {
        let _ = writeln!(output, "  {label}: {}", sanitize_terminal(value));
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, view: &OutputView) -> String {
        let mut output = String::new();
        match view {
            OutputView::Loading(loading) => {
                let _ = writeln!(
                    output,
                    "_Analyzing log file... Processing {}_",
                    escape_markdown(&loading.label())
                );
            }
            OutputView::Report(ReportView::Findings(findings)) => {
                markdown_findings(&mut output, findings)
            }
            OutputView::Report(ReportView::Clean(clean)) => {
                let _ = writeln!(
                    output,
                    "# {}\n\n{}",
                    escape_markdown(&clean.message),
                    escape_markdown(&clean.suggestion)
                );
            }
            OutputView::Report(ReportView::Error(error)) => markdown_error(&mut output, error),
            OutputView::Status(status) => markdown_status(&mut output, status),
        }
        output
    }
}

fn markdown_findings(output: &mut String, view: &FindingsView) {
    let _ = writeln!(output, "# Log Analysis Results\n");
    let _ = writeln!(output, "- Total Tests: {}", view.total_tests);
    let _ = writeln!(output, "- Passed: {}", view.passed_tests);
    let _ = writeln!(output, "- Failed: {}", view.failed_tests);
    let _ = writeln!(output, "- Tickets: {}\n", view.tickets_count);
    append_code_block(output, "Executive Summary", view.summary.trim_end());
    for card in &view.findings {
        let _ = writeln!(output, "## Error {}\n", card.number);
        let _ = writeln!(
            output,
            "Severity: {} | Team: {} | Type: {}\n",
            escape_markdown(&card.severity),
            escape_markdown(&card.team),
            escape_markdown(&card.kind)
        );
        append_code_block(output, "Error Message", &card.error);
        if let Some(status) = &card.test_status {
            let _ = writeln!(output, "Test status: {}\n", escape_markdown(status));
        }
        let analysis = card
            .analysis_lines
            .iter()
            .map(String::as_str)
            .map(escape_markdown)
            .collect::<Vec<_>>()
            .join("  \n");
        let _ = writeln!(output, "### AI Analysis & Recommendations");
        let _ = writeln!(output, "{analysis}\n");
        match &card.ticket {
            TicketState::Created(url) => {
                let _ = writeln!(output, "JIRA Ticket: {}\n", markdown_link(url));
            }
            TicketState::Failed => {
                let _ = writeln!(output, "{TICKET_FAILURE_NOTICE}\n");
            }
        }
    }
    if !view.tickets.is_empty() {
        let _ = writeln!(output, "## Created JIRA Tickets");
        for url in &view.tickets {
            let _ = writeln!(output, "- {}", markdown_link(url));
        }
        let _ = writeln!(output);
    }
}

fn markdown_error(output: &mut String, error: &ErrorView) {
    let _ = writeln!(output, "# Connection Error\n");
    let _ = writeln!(
        output,
        "Failed to contact backend: {}\n",
        escape_markdown(&error.message)
    );
    let _ = writeln!(output, "### Troubleshooting");
    for item in &error.troubleshooting {
        let _ = writeln!(output, "- {}", escape_markdown(item));
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "### Debug Info");
    let _ = writeln!(output, "- API URL: {}", escape_markdown(&error.base_url));
    let _ = writeln!(
        output,
        "- File: {} ({})",
        escape_markdown(&error.file_name),
        error.file_size
    );
}

fn markdown_status(output: &mut String, status: &StatusView) {
    let _ = writeln!(output, "# Backend Status\n");
    match &status.connectivity {
        ConnectivityStatus::Connected { server } => {
            let _ = writeln!(output, "Backend Connected: {}", escape_markdown(server));
        }
        ConnectivityStatus::Unreachable { error } => {
            let _ = writeln!(output, "Backend Status: {}", escape_markdown(error));
        }
    }
    if !status.details.is_empty() {
        let _ = writeln!(output);
        for (label, value) in &status.details {
            let _ = writeln!(output, "- {label}: {}", escape_markdown(value));
        }
    }
}

/// Ticket links only point at web URLs; anything else is shown as text.
fn markdown_link(url: &str) -> String {
    match web_url(url) {
        Some(parsed) => format!(
            "[View Ticket]({})",
            parsed.as_str().replace('(', "%28").replace(')', "%29")
        ),
        None => escape_markdown(url),
    }
}

/// Fenced block whose fence is longer than any backtick run in the contents.
fn append_code_block(output: &mut String, title: &str, contents: &str) {
    let contents = sanitize_terminal(contents);
    let longest_run = contents
        .split(|ch: char| ch != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let _ = writeln!(output, "### {title}");
    let _ = writeln!(output, "{fence}text\n{contents}\n{fence}\n");
}

impl Renderer for JsonRenderer {
    fn render(&self, view: &OutputView) -> String {
        let rendered = match view {
            OutputView::Loading(loading) => render_json(loading),
            OutputView::Report(report) => render_json(report),
            OutputView::Status(status) => render_json(status),
        };
        match rendered {
            Ok(mut json) => {
                json.push('\n');
                json
            }
            Err(err) => format!("{}\n", serde_json::json!({ "error": err.to_string() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisResponse, DetailedFinding, StatusResponse, UploadFile};
    use crate::endpoint::ApiConfig;
    use crate::view::{classify_response, error_view, loading_view, status_view};

    fn finding(ticket_url: Option<&str>) -> DetailedFinding {
        DetailedFinding {
            severity: "High".to_string(),
            team: "Infra".to_string(),
            kind: "Timeout".to_string(),
            error: "conn refused".to_string(),
            ai_analysis: "Retry with backoff\nCheck the pool".to_string(),
            ticket_url: ticket_url.map(str::to_string),
            test_status: None,
        }
    }

    fn report(response: &AnalysisResponse) -> OutputView {
        OutputView::Report(classify_response(response))
    }

    #[test]
    fn html_scenario_c_renders_card_and_ticket_section() {
        let response = AnalysisResponse {
            success: true,
            detailed_analysis: vec![finding(Some("https://x/1"))],
            tickets_created: vec!["https://x/1".to_string()],
            ..AnalysisResponse::default()
        };
        let html = HtmlRenderer.render(&report(&response));
        assert!(html.contains("<span class=\"badge severity-high\">High</span>"));
        assert!(html.contains("<span class=\"badge team-badge\">Infra</span>"));
        assert!(html.contains("<span class=\"badge type-badge\">Timeout</span>"));
        assert!(html.contains("<h5>Error 1</h5>"));
        assert!(html.contains("Retry with backoff<br>Check the pool"));
        assert_eq!(html.matches("href=\"https://x/1\"").count(), 2);
        assert!(html.contains("tickets-section"));
        assert!(!html.contains("ticket-error"));
    }

    #[test]
    fn html_tickets_section_has_one_link_per_url() {
        let tickets: Vec<String> = (1..=3).map(|n| format!("https://jira/browse/LOG-{n}")).collect();
        let response = AnalysisResponse {
            success: true,
            tickets_created: tickets.clone(),
            ..AnalysisResponse::default()
        };
        let html = HtmlRenderer.render(&report(&response));
        assert_eq!(html.matches("class=\"ticket-link-btn\"").count(), 3);
        for url in &tickets {
            assert!(html.contains(&format!("href=\"{url}\"")));
        }
    }

    #[test]
    fn html_omits_tickets_section_and_cards_when_empty() {
        let response = AnalysisResponse {
            success: true,
            ..AnalysisResponse::default()
        };
        let html = HtmlRenderer.render(&report(&response));
        assert!(html.contains("analysis-header"));
        assert!(html.contains("Total Tests: 0"));
        assert!(html.contains("No summary available"));
        assert!(!html.contains("error-card"));
        assert!(!html.contains("tickets-section"));
    }

    #[test]
    fn html_missing_ticket_shows_failure_notice() {
        let response = AnalysisResponse {
            success: true,
            detailed_analysis: vec![finding(None)],
            ..AnalysisResponse::default()
        };
        let html = HtmlRenderer.render(&report(&response));
        assert!(html.contains("<p class=\"ticket-error\">Failed to create JIRA ticket</p>"));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn html_escapes_backend_text() {
        let hostile = "<script>alert(1)</script>";
        let response = AnalysisResponse {
            success: true,
            summary: Some(hostile.to_string()),
            detailed_analysis: vec![DetailedFinding {
                severity: hostile.to_string(),
                team: hostile.to_string(),
                kind: hostile.to_string(),
                error: hostile.to_string(),
                ai_analysis: hostile.to_string(),
                ticket_url: Some("javascript:alert(1)".to_string()),
                test_status: Some(hostile.to_string()),
            }],
            tickets_created: vec!["https://x/\"><script>".to_string()],
            ..AnalysisResponse::default()
        };
        let html = HtmlRenderer.render(&report(&response));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("href=\"https://x/&quot;&gt;&lt;script&gt;\""));

        let clean = AnalysisResponse {
            message: Some(hostile.to_string()),
            suggestion: Some(hostile.to_string()),
            ..AnalysisResponse::default()
        };
        assert!(!HtmlRenderer.render(&report(&clean)).contains("<script>"));
    }

    #[test]
    fn html_loading_shows_name_and_size() {
        let file = UploadFile::new("app.log", vec![0; 2048]);
        let html = HtmlRenderer.render(&OutputView::Loading(loading_view(&file)));
        assert!(html.contains("loading-state"));
        assert!(html.contains("app.log (2.0 KB)"));
    }

    #[test]
    fn html_error_view_contains_debug_fields() {
        let config = ApiConfig::from_hostname("localhost");
        let file = UploadFile::new("app.log", vec![0; 2048]);
        let html = HtmlRenderer.render(&OutputView::Report(error_view(
            &config,
            &file,
            "connection refused",
        )));
        assert!(html.contains("Connection Error"));
        assert!(html.contains("Failed to contact backend: connection refused"));
        assert!(html.contains("API URL: http://localhost:5000"));
        assert!(html.contains("File: app.log (2.0 KB)"));
        assert!(html.contains("Verify CORS is properly configured"));
    }

    #[test]
    fn html_status_reflects_connectivity() {
        let connected = status_view(
            ConnectivityStatus::Connected {
                server: "API <1>".to_string(),
            },
            None,
        );
        let html = HtmlRenderer.render(&OutputView::Status(connected));
        assert!(html.contains("status-success"));
        assert!(html.contains("API &lt;1&gt;"));

        let down = status_view(
            ConnectivityStatus::Unreachable {
                error: "HTTP 502: Bad Gateway".to_string(),
            },
            None,
        );
        let html = HtmlRenderer.render(&OutputView::Status(down));
        assert!(html.contains("status-warning"));
        assert!(html.contains("HTTP 502: Bad Gateway"));
    }

    #[test]
    fn text_renders_clean_result() {
        let response = AnalysisResponse {
            message: Some("No errors found!".to_string()),
            ..AnalysisResponse::default()
        };
        let text = TextRenderer.render(&report(&response));
        assert_eq!(text, "No errors found!\nThe log file appears to be clean.\n");
    }

    #[test]
    fn text_renders_findings() {
        let response = AnalysisResponse {
            success: true,
            total_tests: 5,
            passed_tests: 3,
            failed_tests: 2,
            detailed_analysis: vec![finding(Some("https://x/1")), finding(None)],
            tickets_created: vec!["https://x/1".to_string()],
            ..AnalysisResponse::default()
        };
        let text = TextRenderer.render(&report(&response));
        assert!(text.contains("Total Tests: 5 | Passed: 3 | Failed: 2 | Tickets: 1"));
        assert!(text.contains("Error 1 [High] [Infra] [Timeout]"));
        assert!(text.contains("Error 2 [High] [Infra] [Timeout]"));
        assert!(text.contains("JIRA Ticket: https://x/1"));
        assert!(text.contains("Failed to create JIRA ticket"));
        assert!(text.contains("Created JIRA Tickets:\n  - https://x/1"));
    }

    #[test]
    fn markdown_renders_findings_and_tickets() {
        let response = AnalysisResponse {
            success: true,
            summary: Some("Two failures".to_string()),
            detailed_analysis: vec![finding(Some("https://x/1"))],
            tickets_created: vec!["https://x/1".to_string()],
            ..AnalysisResponse::default()
        };
        let markdown = MarkdownRenderer.render(&report(&response));
        assert!(markdown.contains("# Log Analysis Results"));
        assert!(markdown.contains("```text\nTwo failures\n```"));
        assert!(markdown.contains("## Error 1"));
        assert!(markdown.contains("## Created JIRA Tickets\n- [View Ticket](https://x/1)"));
    }

    #[test]
    fn json_renders_tagged_report() {
        let json = JsonRenderer.render(&report(&AnalysisResponse::default()));
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed["outcome"], "clean");
        assert_eq!(parsed["suggestion"], "The log file appears to be clean.");
    }

    fn hostile_response() -> AnalysisResponse {
        let hostile = "<script>alert(1)</script>";
        AnalysisResponse {
            success: true,
            summary: Some("ok\n```\n<img src=x onerror=alert(1)>".to_string()),
            detailed_analysis: vec![DetailedFinding {
                severity: hostile.to_string(),
                team: "[click](javascript:alert(1))".to_string(),
                kind: hostile.to_string(),
                error: "````\n# not a heading".to_string(),
                ai_analysis: format!("{hostile}\n**bold**"),
                ticket_url: Some("javascript:alert(1)".to_string()),
                test_status: Some(hostile.to_string()),
            }],
            tickets_created: vec![
                "javascript:alert(1)".to_string(),
                "https://jira/browse/LOG-1?q=(a)".to_string(),
            ],
            ..AnalysisResponse::default()
        }
    }

    #[test]
    fn markdown_escapes_backend_text() {
        let markdown = MarkdownRenderer.render(&report(&hostile_response()));
        assert!(!markdown.contains("<script>"));
        assert!(markdown.contains("&lt;script&gt;alert\\(1\\)&lt;/script&gt;"));
        assert!(!markdown.contains("](javascript:"));
        assert!(markdown.contains("\\[click\\]\\(javascript:alert\\(1\\)\\)"));
        assert!(markdown.contains("\\*\\*bold\\*\\*"));
        assert!(markdown.contains("- [View Ticket](https://jira/browse/LOG-1?q=%28a%29)"));
        assert!(markdown.contains("- javascript:alert\\(1\\)"));

        let clean = AnalysisResponse {
            message: Some("<script>alert(1)</script>".to_string()),
            ..AnalysisResponse::default()
        };
        let markdown = MarkdownRenderer.render(&report(&clean));
        assert!(markdown.starts_with("# &lt;script&gt;"));
    }

    #[test]
    fn markdown_fence_outgrows_backticks_in_contents() {
        let markdown = MarkdownRenderer.render(&report(&hostile_response()));
        assert!(markdown.contains("````text\nok\n```\n<img src=x onerror=alert(1)>\n````\n"));
        assert!(markdown.contains("`````text\n````\n# not a heading\n`````\n"));
    }

    #[test]
    fn markdown_status_escapes_details() {
        let response = StatusResponse {
            server: "API <b>1</b>".to_string(),
            jira_status: Some("[x](javascript:y)".to_string()),
            ai_status: None,
            project_key: None,
            jira_connected: None,
        };
        let view = status_view(
            ConnectivityStatus::Connected {
                server: response.server.clone(),
            },
            Some(&response),
        );
        let markdown = MarkdownRenderer.render(&OutputView::Status(view));
        assert!(markdown.contains("Backend Connected: API &lt;b&gt;1&lt;/b&gt;"));
        assert!(markdown.contains("\\[x\\]\\(javascript:y\\)"));
    }

    #[test]
    fn text_escapes_control_characters() {
        let response = AnalysisResponse {
            success: true,
            summary: Some("\u{1b}[2Jowned".to_string()),
            detailed_analysis: vec![DetailedFinding {
                error: "bell\u{7}\tdone".to_string(),
                ai_analysis: "step one\nstep \u{202e}two".to_string(),
                ..finding(Some("https://x/1"))
            }],
            ..AnalysisResponse::default()
        };
        let text = TextRenderer.render(&report(&response));
        assert!(!text.contains('\u{1b}'));
        assert!(!text.contains('\u{7}'));
        assert!(!text.contains('\u{202e}'));
        assert!(text.contains("\\u{1b}[2Jowned"));
        assert!(text.contains("Error Message: bell\\u{7}\tdone"));
        assert!(text.contains("    step one\n    step \\u{202e}two\n"));

        let clean = AnalysisResponse {
            message: Some("done\r\u{1b}[31m".to_string()),
            ..AnalysisResponse::default()
        };
        let text = TextRenderer.render(&report(&clean));
        assert!(text.starts_with("done\\r\\u{1b}[31m\n"));
    }

    #[test]
    fn web_urls_need_http_scheme_and_host() {
        assert!(is_web_url("https://jira/browse/LOG-1"));
        assert!(is_web_url(" HTTP://Example.com/x "));
        assert!(!is_web_url("http://"));
        assert!(!is_web_url("javascript:alert(1)"));
        assert!(!is_web_url("data:text/html,hi"));
        assert!(!is_web_url("/relative/path"));
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(escape_html("a & b < c > \"d\" 'e'"), "a &amp; b &lt; c &gt; &quot;d&quot; &#39;e&#39;");
    }
}
