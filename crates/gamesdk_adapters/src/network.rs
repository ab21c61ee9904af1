//! Shared HTTP client configuration.
//!
//! Timeouts, redirect policy and user agent for every call the SDK makes.

use std::time::Duration;

use gamesdk_core::Error;
use reqwest::{redirect, Client};

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of redirects followed before giving up
pub const MAX_REDIRECTS: usize = 10;

pub const SDK_USER_AGENT: &str = concat!("gamesdk/", env!("CARGO_PKG_VERSION"));

/// Build the default client used to talk to the platform services.
///
/// This client is configured with:
/// - Redirect following (up to `MAX_REDIRECTS`)
/// - SDK user agent
/// - Request and connect timeouts
pub fn build_sdk_client() -> Result<Client, Error> {
    Client::builder()
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(SDK_USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .build()
        .map_err(|e| Error::InvalidConfiguration(format!("failed to create HTTP client: {}", e)))
}
