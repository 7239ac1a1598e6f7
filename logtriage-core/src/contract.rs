//! OpenAPI description of the backend contract this client supports.
//!
//! `AnalysisResponse` with `total_tests`/`passed_tests`/`failed_tests` is the
//! only supported envelope. Older backends that report
//! `total_errors`/`processed_errors` are not understood.

use utoipa::OpenApi;

use crate::domain::{AnalysisResponse, DetailedFinding, StatusResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LogTriage analysis backend",
        description = "Endpoints consumed by the LogTriage client: GET /api/status and POST /api/analyze (multipart field `logFile`)."
    ),
    components(schemas(AnalysisResponse, DetailedFinding, StatusResponse)),
    tags(
        (name = "analysis", description = "Log upload and analysis"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI document for the analysis backend contract.
pub struct ApiDoc;

/// The contract as pretty-printed JSON.
pub fn contract_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
