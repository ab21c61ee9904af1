use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Credential exchange failed, or the server rejected the bearer token (403).
    #[error("authentication failed{}", detail_suffix(.0))]
    AuthenticationFailed(Option<String>),

    /// Any other non-success status, transport failure or malformed response.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    pub fn authentication(detail: impl Into<String>) -> Self {
        Error::AuthenticationFailed(Some(detail.into()))
    }

    pub fn unexpected_status(status: u16) -> Self {
        Error::OperationFailed(format!("unexpected response status: {}", status))
    }

    pub fn malformed_response(detail: impl std::fmt::Display) -> Self {
        Error::OperationFailed(format!("malformed response: {}", detail))
    }

    /// True when the caller should force a fresh authentication before retrying.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::AuthenticationFailed(_))
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {}", d),
        _ => String::new(),
    }
}
