//! Upload, analyze, and render a single log submission.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::domain::{AnalysisResponse, UPLOAD_FIELD, UploadFile};
use crate::endpoint::ApiConfig;
use crate::error::Result;
use crate::region::OutputRegion;
use crate::view::{OutputView, ReportView, classify_response, error_view, loading_view};

/// Raw HTTP reply handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// Status code.
    pub status: u16,
    /// Canonical reason phrase for the status.
    pub reason: String,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Future returned by [`Transport`] calls.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpReply>> + Send + 'a>>;

/// HTTP client abstraction for talking to the analysis backend.
///
/// Implementations return every reply the server produced, whatever its
/// status; only failures to obtain a reply are errors.
pub trait Transport {
    /// Issue a GET request.
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a>;

    /// POST a multipart form with the file as its only field.
    fn post_file<'a>(
        &'a self,
        url: &'a str,
        field: &'a str,
        file: &'a UploadFile,
    ) -> TransportFuture<'a>;
}

/// Result of a call to [`Pipeline::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// No file was selected; nothing happened.
    Skipped,
    /// The report was shown in the output region.
    Rendered(ReportView),
    /// A newer submission started first; the report was discarded.
    Stale(ReportView),
}

/// Drives submissions against the backend and shows their progress.
pub struct Pipeline<T, R> {
    config: ApiConfig,
    transport: T,
    region: Mutex<R>,
    sequence: AtomicU64,
}

impl<T: Transport, R: OutputRegion> Pipeline<T, R> {
    /// Build a pipeline bound to one backend and one output region.
    pub fn new(config: ApiConfig, transport: T, region: R) -> Self {
        Self {
            config,
            transport,
            region: Mutex::new(region),
            sequence: AtomicU64::new(0),
        }
    }

    /// Backend configuration in use.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the output region.
    pub fn into_region(self) -> R {
        self.region
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a selected file.
    ///
    /// The loading view is shown before the request is issued. When another
    /// submission starts while this one is in flight, this one's report is
    /// discarded so the region always reflects the latest selection.
    pub async fn submit(&self, file: Option<UploadFile>) -> SubmissionOutcome {
        let Some(file) = file else {
            log::debug!("no file selected; skipping submission");
            return SubmissionOutcome::Skipped;
        };

        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.show(&OutputView::Loading(loading_view(&file)));

        let report = self.analyze(&file).await;

        let latest = self.sequence.load(Ordering::SeqCst);
        if latest != ticket {
            log::warn!(
                "discarding stale result for {} (submission {ticket}, latest {latest})",
                file.name
            );
            return SubmissionOutcome::Stale(report);
        }

        self.show(&OutputView::Report(report.clone()));
        SubmissionOutcome::Rendered(report)
    }

    async fn analyze(&self, file: &UploadFile) -> ReportView {
        let url = self.config.analyze_url();
        log::info!("uploading {} to {url}", file.size_label());

        let parsed = self
            .transport
            .post_file(&url, UPLOAD_FIELD, file)
            .await
            .and_then(|reply| parse_analysis(&reply));

        match parsed {
            Ok(response) => {
                if let Some(error) = &response.error {
                    log::warn!("backend reported an error for {}: {error}", file.name);
                }
                let report = classify_response(&response);
                log::info!(
                    "analysis of {} finished with {} findings",
                    file.name,
                    response.detailed_analysis.len()
                );
                report
            }
            Err(err) => {
                log::error!("analysis of {} failed: {err}", file.name);
                error_view(&self.config, file, err.to_string())
            }
        }
    }

    fn show(&self, view: &OutputView) {
        let mut region = self.region.lock().unwrap_or_else(PoisonError::into_inner);
        region.replace(view);
    }
}

/// Decode an analysis reply body, whatever its HTTP status.
pub fn parse_analysis(reply: &HttpReply) -> Result<AnalysisResponse> {
    if !reply.is_success() {
        log::debug!(
            "analyze endpoint answered HTTP {} {}; reading body anyway",
            reply.status,
            reply.reason
        );
    }
    Ok(serde_json::from_str(&reply.body)?)
}
