use thiserror::Error;

/// Coarse failure classes exposed to callers that only care about which
/// stage of the gateway broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Request,
    Decoding,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Invalid value for {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Invalid URL in {key}: {value:?}")]
    InvalidUrl { key: String, value: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Token request failed: {0}")]
    TokenExchange(#[source] reqwest::Error),

    #[error("No access_token found. Response: {raw}")]
    InvalidTokenResponse { raw: String },

    #[error("HTTP request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request failed: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    DecodeFailed(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::MissingConfig(_)
            | GatewayError::InvalidSetting { .. }
            | GatewayError::InvalidUrl { .. }
            | GatewayError::ClientBuild(_) => ErrorCategory::Configuration,
            GatewayError::TokenExchange(_) | GatewayError::InvalidTokenResponse { .. } => {
                ErrorCategory::Authentication
            }
            GatewayError::Network(_) | GatewayError::RequestFailed { .. } => {
                ErrorCategory::Request
            }
            GatewayError::DecodeFailed(_) => ErrorCategory::Decoding,
        }
    }

    /// Names of the missing variables when this is a configuration miss.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            GatewayError::MissingConfig(keys) => keys,
            _ => &[],
        }
    }
}
