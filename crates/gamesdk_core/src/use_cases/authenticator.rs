use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::SdkConfig;
use crate::entities::{AuthRequest, Credentials, TokenResponse};
use crate::error::Error;
use crate::ports::{HttpMethod, HttpRequest, HttpTransport};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// Exchanges the configured API key for a bearer token.
pub struct Authenticator<T: HttpTransport> {
    transport: Arc<T>,
    api_key: String,
    auth_url: String,
    expiration_margin: Duration,
}

impl<T: HttpTransport> Authenticator<T> {
    pub fn new(transport: Arc<T>, config: &SdkConfig) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            auth_url: format!("{}/registry/auth", config.urls.registry),
            expiration_margin: Duration::seconds(i64::from(config.token_expiration_margin_secs)),
        }
    }

    /// Perform one credential exchange. Never retries.
    ///
    /// Any non-200 status, transport failure or missing field is reported as
    /// `Error::AuthenticationFailed`.
    #[instrument(skip(self), fields(url = %self.auth_url))]
    pub async fn exchange(&self) -> Result<Credentials, Error> {
        let body = serde_json::to_string(&AuthRequest {
            api_key: &self.api_key,
        })
        .map_err(|e| Error::authentication(format!("failed to encode request: {}", e)))?;

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.auth_url.clone(),
            headers: vec![
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
                ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        };

        debug!("requesting bearer token");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "authentication request failed");
            Error::authentication(e.to_string())
        })?;

        if response.status != 200 {
            warn!(status = response.status, "authentication rejected");
            return Err(Error::authentication(format!(
                "unexpected response status: {}",
                response.status
            )));
        }

        let token = parse_token_response(&response.body)?;
        let expires_at = token_expiry(Utc::now(), token.expires_in, self.expiration_margin)
            .ok_or_else(|| {
                Error::authentication(format!(
                    "malformed response: expires_in out of range: {}",
                    token.expires_in
                ))
            })?;

        info!(expires_at = %expires_at, "obtained bearer token");

        Ok(Credentials::new(token.access_token, expires_at))
    }
}

/// Decode the credential exchange response body.
pub fn parse_token_response(body: &str) -> Result<TokenResponse, Error> {
    serde_json::from_str::<TokenResponse>(body)
        .map_err(|e| Error::authentication(format!("malformed response: {}", e)))
}

/// `now + expires_in - margin`, or `None` when the arithmetic overflows.
pub fn token_expiry(
    now: DateTime<Utc>,
    expires_in_secs: i64,
    margin: Duration,
) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in_secs)
        .and_then(|lifetime| lifetime.checked_sub(&margin))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
}
