use thiserror::Error;

/// Errors raised by an [`ApiTransport`](crate::ApiTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors returned by [`TunnelRouteClient`](crate::TunnelRouteClient) operations
#[derive(Debug, Error)]
pub enum RouteError {
    /// Raised locally before any request is sent
    #[error("account ID is required")]
    MissingAccountId,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {operation} request body: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl RouteError {
    pub(crate) fn decode(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { operation, source }
    }

    pub(crate) fn encode(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Encode { operation, source }
    }

    /// HTTP status of the failed call, when the API produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            RouteError::Transport(TransportError::Api { status, .. }) => Some(*status),
            RouteError::Transport(TransportError::Request(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
