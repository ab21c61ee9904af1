use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::authenticator::{Authenticator, JSON_CONTENT_TYPE};
use crate::config::SdkConfig;
use crate::entities::Credentials;
use crate::error::Error;
use crate::ports::{HttpMethod, HttpRequest, HttpTransport};

/// One authenticated call: where to send it and which status means success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub expected_status: u16,
}

impl Operation {
    pub fn new(method: HttpMethod, url: impl Into<String>, expected_status: u16) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            expected_status,
        }
    }

    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let body = serde_json::to_string(body)
            .map_err(|e| Error::OperationFailed(format!("failed to encode request: {}", e)))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Attaches a fresh bearer token to each operation and interprets the reply.
///
/// The credential store sits behind an async mutex that is held across
/// "check freshness, then authenticate", so concurrent callers never run
/// overlapping exchanges.
pub struct AuthenticatedExecutor<T: HttpTransport> {
    transport: Arc<T>,
    authenticator: Authenticator<T>,
    credentials: Mutex<Credentials>,
}

impl<T: HttpTransport> AuthenticatedExecutor<T> {
    pub fn new(transport: Arc<T>, config: &SdkConfig) -> Self {
        Self {
            authenticator: Authenticator::new(Arc::clone(&transport), config),
            transport,
            credentials: Mutex::new(Credentials::default()),
        }
    }

    /// Force a fresh credential exchange.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let mut credentials = self.credentials.lock().await;
        Self::renew(&self.authenticator, &mut *credentials).await?;
        Ok(())
    }

    /// Current token, re-authenticating first if it is absent or expired.
    ///
    /// A freshly issued token is returned even when its lifetime is already
    /// inside the expiration margin; the next call simply renews again.
    pub async fn bearer_token(&self) -> Result<String, Error> {
        let mut credentials = self.credentials.lock().await;
        if let Some(token) = credentials.usable_token() {
            return Ok(token.to_string());
        }

        debug!("bearer token absent or expired, re-authenticating");
        Self::renew(&self.authenticator, &mut *credentials).await
    }

    pub async fn invalidate(&self) {
        self.credentials.lock().await.clear();
    }

    pub async fn is_token_expired(&self) -> bool {
        self.credentials.lock().await.is_expired()
    }

    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.credentials.lock().await.expires_at()
    }

    async fn renew(
        authenticator: &Authenticator<T>,
        credentials: &mut Credentials,
    ) -> Result<String, Error> {
        // A failed renewal must leave nothing behind that looks usable.
        credentials.clear();
        let issued = authenticator.exchange().await?;
        let token = issued.bearer_token().unwrap_or_default().to_string();
        *credentials = issued;
        Ok(token)
    }

    /// Send the operation once and return the raw success body.
    #[instrument(skip(self, operation), fields(method = %operation.method, url = %operation.url))]
    pub async fn execute(&self, operation: Operation) -> Result<String, Error> {
        let token = self.bearer_token().await?;

        let request = HttpRequest {
            method: operation.method,
            url: operation.url,
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", token)),
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
                ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
            body: operation.body,
        };

        debug!("sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "request failed");
            Error::OperationFailed(e.to_string())
        })?;

        match response.status {
            status if status == operation.expected_status => Ok(response.body),
            403 => {
                warn!("bearer token rejected by server");
                Err(Error::authentication("bearer token rejected (status 403)"))
            }
            status => {
                warn!(status, expected = operation.expected_status, "unexpected status");
                Err(Error::unexpected_status(status))
            }
        }
    }

    /// Send the operation and decode its success body.
    pub async fn execute_json<R: DeserializeOwned>(&self, operation: Operation) -> Result<R, Error> {
        let body = self.execute(operation).await?;
        serde_json::from_str(&body).map_err(Error::malformed_response)
    }
}
