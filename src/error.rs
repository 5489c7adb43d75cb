use thiserror::Error;

/// Any failure of an identify/generate/search gateway call.
///
/// The workflow does not distinguish causes: every variant surfaces to the
/// user as the same generic localized message. The variants exist for logging
/// and tests.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),
}
