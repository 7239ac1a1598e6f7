//! Wire entities exchanged with the analysis backend.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Multipart field name the backend reads the uploaded log from.
pub const UPLOAD_FIELD: &str = "logFile";

/// A log file selected for a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as presented to the user and the backend.
    pub name: String,
    /// Size of the content in bytes.
    pub size: u64,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl UploadFile {
    /// Create an upload from a name and its content.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Size in kilobytes with one decimal place, e.g. `2.0 KB`.
    pub fn size_kb(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }

    /// Name and size as shown in progress and debug output.
    pub fn size_label(&self) -> String {
        format!("{} ({})", self.name, self.size_kb())
    }
}

/// A single failed test or error the backend analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetailedFinding {
    /// Free-text severity (e.g. `High`); lowercased to pick a display class.
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    /// Team the finding was routed to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    /// Error classification label.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// Raw error line from the log.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    /// Remediation advice; line breaks are meaningful.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_analysis: String,
    /// Ticket filed for this finding. Absent when ticket creation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    /// Test status label attached by the backend (e.g. `FAILED`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_status: Option<String>,
}

/// Envelope returned by `POST /api/analyze`.
///
/// The backend answers with this shape for every outcome, including its own
/// internal errors. `success` discriminates between a findings report and a
/// clean result; every other field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    /// Whether findings were produced.
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    /// Number of test cases detected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tests: u64,
    /// Number of passing test cases.
    #[serde(default, deserialize_with = "null_as_default")]
    pub passed_tests: u64,
    /// Number of failing test cases.
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_tests: u64,
    /// Executive summary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Findings in the order the backend reported them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_analysis: Vec<DetailedFinding>,
    /// Ticket URLs created during the analysis.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tickets_created: Vec<String>,
    /// Headline for a clean result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Follow-up advice for a clean result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Backend-side failure reason, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload returned by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Server identifier shown in the connectivity indicator.
    pub server: String,
    /// Ticket tracker connection summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_status: Option<String>,
    /// AI provider connection summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_status: Option<String>,
    /// Ticket tracker project key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    /// Whether the ticket tracker client is connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_connected: Option<bool>,
}

/// Backend connectivity derived from a status probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectivityStatus {
    /// The backend answered.
    Connected {
        /// Server identifier reported by the backend.
        server: String,
    },
    /// The backend could not be reached.
    Unreachable {
        /// Why the probe failed.
        error: String,
    },
}

impl ConnectivityStatus {
    /// Whether the probe reached the backend.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
