//! Backend health check run once at startup.

use crate::domain::{ConnectivityStatus, StatusResponse};
use crate::endpoint::ApiConfig;
use crate::error::LogTriageError;
use crate::pipeline::{HttpReply, Transport};
use crate::region::OutputRegion;
use crate::view::{OutputView, status_view};

/// Check whether the backend is reachable.
///
/// Issues a single GET against the status endpoint with no retry. When a
/// region is given it is updated with the outcome; without one the probe
/// still runs and only returns the status.
pub async fn probe_status<T: Transport + ?Sized>(
    transport: &T,
    config: &ApiConfig,
    region: Option<&mut dyn OutputRegion>,
) -> ConnectivityStatus {
    let url = config.status_url();
    log::debug!("probing backend status at {url}");

    let outcome = match transport.get(&url).await {
        Ok(reply) => interpret_status(&reply),
        Err(err) => Err(err.to_string()),
    };

    let (connectivity, response) = match outcome {
        Ok(response) => {
            log::info!("backend connected: {}", response.server);
            (
                ConnectivityStatus::Connected {
                    server: response.server.clone(),
                },
                Some(response),
            )
        }
        Err(message) => {
            log::warn!("backend status check failed: {message}");
            (ConnectivityStatus::Unreachable { error: message }, None)
        }
    };

    if let Some(region) = region {
        region.replace(&OutputView::Status(status_view(
            connectivity.clone(),
            response.as_ref(),
        )));
    }
    connectivity
}

fn interpret_status(reply: &HttpReply) -> Result<StatusResponse, String> {
    if !reply.is_success() {
        return Err(format!("HTTP {}: {}", reply.status, reply.reason));
    }
    serde_json::from_str(&reply.body).map_err(|err| LogTriageError::from(err).to_string())
}
