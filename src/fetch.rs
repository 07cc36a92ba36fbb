/// Report generation and retrieval
///
/// One submission is strictly sequential:
/// 1. POST the request to the generation endpoint
/// 2. Classify the reply (service failure / missing link)
/// 3. GET the returned download link exactly once
/// 4. Parse the body into rows
///
/// Nothing is retried; a retry is a new submission from the user.
use crate::api::{ApiConfig, Transport, UreqTransport};
use crate::error::{ExportError, GENERATE_FAILED, NO_DOWNLOAD_LINK};
use crate::request::ExportRequest;
use crate::tabular::{self, TabularResult};
use log::{debug, warn};
use serde::Deserialize;

/// Success body of the generation call; other fields are ignored
#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    download_link: Option<String>,
}

/// Failure body of the generation call
#[derive(Debug, Deserialize)]
struct FailureReply {
    #[serde(default)]
    error: Option<String>,
}

/// Runs submissions against the configured export service
pub struct ReportFetcher<T: Transport> {
    transport: T,
    config: ApiConfig,
}

impl ReportFetcher<UreqTransport> {
    /// Fetcher over a real HTTP agent
    pub fn from_config(config: ApiConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::new(transport, config)
    }
}

impl<T: Transport> ReportFetcher<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generate, retrieve and parse one export
    pub fn submit(&self, request: &ExportRequest) -> Result<TabularResult, ExportError> {
        let link = self.generate(request)?;
        let raw = self.retrieve(&link)?;

        let result = tabular::parse(&raw);
        debug!(
            "parsed {} columns, {} rows ({} ragged) for '{}'",
            result.header.len(),
            result.row_count(),
            result.ragged_rows(),
            request.name
        );
        Ok(result)
    }

    /// Issue the generation call and return the retrieval link
    fn generate(&self, request: &ExportRequest) -> Result<String, ExportError> {
        let endpoint = self.config.endpoint.as_deref().ok_or(ExportError::NotConfigured("API endpoint"))?;
        let api_key = self.config.api_key.as_deref().ok_or(ExportError::NotConfigured("API key"))?;

        if request.is_all_columns() {
            debug!("requesting export '{}' with all columns", request.name);
        } else {
            debug!("requesting export '{}' with {} column(s)", request.name, request.columns.len());
        }

        let reply = self.transport.post_json(endpoint, api_key, &request.to_json()).map_err(|e| {
            warn!("generation call failed: {}", e);
            ExportError::Network(e)
        })?;

        if !reply.is_success() {
            let message = service_error_message(&reply.body);
            warn!("generation rejected with status {}: {}", reply.status, message);
            return Err(ExportError::ServiceRejected(message));
        }

        let body: GenerateReply = serde_json::from_str(&reply.body).map_err(|e| {
            warn!("generation reply is not usable JSON: {}", e);
            ExportError::MalformedResponse(format!("invalid JSON: {}", e))
        })?;

        match body.download_link {
            Some(link) if !link.is_empty() => Ok(link),
            _ => {
                warn!("generation reply has no download link");
                Err(ExportError::MalformedResponse(NO_DOWNLOAD_LINK.to_string()))
            }
        }
    }

    /// Dereference the retrieval link and return the raw payload
    fn retrieve(&self, link: &str) -> Result<String, ExportError> {
        let reply = self.transport.get_text(link).map_err(|e| {
            warn!("download failed: {}", e);
            ExportError::Network(e)
        })?;

        if !reply.is_success() {
            warn!("download answered with status {}", reply.status);
            return Err(ExportError::DownloadFailed(reply.status));
        }

        debug!("downloaded {} bytes", reply.body.len());
        Ok(reply.body)
    }
}

/// `error` field of a failure body, or the generic fallback
fn service_error_message(body: &str) -> String {
    serde_json::from_str::<FailureReply>(body)
        .ok()
        .and_then(|reply| reply.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERATE_FAILED.to_string())
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;
