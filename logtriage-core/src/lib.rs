#![deny(missing_docs)]
//! LogTriage core library.
//!
//! Wire model, endpoint resolution, view-models, and the upload pipeline for
//! the LogTriage client. HTTP and display are supplied by the caller through
//! the [`Transport`] and [`OutputRegion`] traits.

pub mod contract;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod region;
pub mod render;
pub mod view;

pub use contract::{ApiDoc, contract_json};
pub use domain::{
    AnalysisResponse, ConnectivityStatus, DetailedFinding, StatusResponse, UPLOAD_FIELD,
    UploadFile,
};
pub use endpoint::{ApiConfig, DEVELOPMENT_ORIGIN, PRODUCTION_ORIGIN, is_loopback, resolve_base_url};
pub use error::{LogTriageError, Result};
pub use pipeline::{HttpReply, Pipeline, SubmissionOutcome, Transport, TransportFuture, parse_analysis};
pub use probe::probe_status;
pub use region::{OutputRegion, RenderedRegion};
pub use render::{
    HtmlRenderer, JsonRenderer, MarkdownRenderer, Renderer, TextRenderer, escape_html, escape_markdown,
    render_json, sanitize_terminal,
};
pub use view::{
    CleanView, ErrorView, FindingCard, FindingsView, LoadingView, OutputView, ReportView,
    StatusView, TicketState, classify_response, error_view, loading_view, status_view,
};
