//! Error types for the export pipeline.

use thiserror::Error;

/// Fallback when the generation endpoint rejects a request without saying why.
pub const GENERATE_FAILED: &str = "Failed to generate report";

/// Detail carried by `MalformedResponse` when the retrieval link is absent.
pub const NO_DOWNLOAD_LINK: &str = "no download link";

/// Errors that can occur while requesting and retrieving an export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Endpoint or credential missing from the configuration.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// Either endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The generation endpoint answered with a failure status.
    #[error("service rejected the request: {0}")]
    ServiceRejected(String),

    /// The generation endpoint answered success but the body is unusable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The retrieval link answered with a failure status.
    #[error("download failed with status {0}")]
    DownloadFailed(u16),
}

impl ExportError {
    /// Message shown to the user when the session enters the error state.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured(what) => format!("Export service is not configured ({what} missing)."),
            Self::Network(detail) => format!("Could not reach the export service: {detail}"),
            Self::ServiceRejected(message) => message.clone(),
            Self::MalformedResponse(detail) if detail == NO_DOWNLOAD_LINK => {
                "API returned success but no download link.".to_string()
            }
            Self::MalformedResponse(detail) => format!("API returned an unreadable response: {detail}"),
            Self::DownloadFailed(_) => "Failed to download the generated CSV file.".to_string(),
        }
    }

    /// Whether submitting again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotConfigured(_))
    }
}
