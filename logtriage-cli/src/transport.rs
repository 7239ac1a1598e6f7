//! Reqwest-backed transport for the LogTriage backend.

use crate::CliResult;
use logtriage_core::{HttpReply, LogTriageError, Transport, TransportFuture, UploadFile};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::error::Error;

/// HTTP transport built on a shared reqwest client.
///
/// No request timeout is configured; a submission waits until the backend
/// answers or the connection fails.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a new reqwest transport.
    pub fn new() -> CliResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("logtriage-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        Box::pin(get(&self.client, url))
    }

    fn post_file<'a>(
        &'a self,
        url: &'a str,
        field: &'a str,
        file: &'a UploadFile,
    ) -> TransportFuture<'a> {
        Box::pin(post_file(&self.client, url, field, file))
    }
}

async fn get(client: &Client, url: &str) -> logtriage_core::Result<HttpReply> {
    let response = client.get(url).send().await.map_err(transport_error)?;
    read_reply(response).await
}

async fn post_file(
    client: &Client,
    url: &str,
    field: &str,
    file: &UploadFile,
) -> logtriage_core::Result<HttpReply> {
    let part = Part::bytes(file.content.clone()).file_name(file.name.clone());
    let form = Form::new().part(field.to_string(), part);
    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(transport_error)?;
    read_reply(response).await
}

async fn read_reply(response: reqwest::Response) -> logtriage_core::Result<HttpReply> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    Ok(HttpReply {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

/// Flatten a reqwest error and its causes into one message.
fn transport_error(err: reqwest::Error) -> LogTriageError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    LogTriageError::Transport(message)
}
