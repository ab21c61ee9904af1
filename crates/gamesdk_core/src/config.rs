use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Base URL used for every service area when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8090/api";

/// Seconds subtracted from a token's lifetime so renewal happens early.
pub const DEFAULT_TOKEN_EXPIRATION_MARGIN_SECS: u32 = 10;

/// Base URL per remote service area. All three may point at the same host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUrls {
    pub registry: String,
    pub statistics: String,
    pub gameplay: String,
}

impl ServiceUrls {
    /// Every service area hosted under one base URL (monolith deployment).
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = trim_base_url(base_url.into());
        Self {
            registry: base_url.clone(),
            statistics: base_url.clone(),
            gameplay: base_url,
        }
    }

    pub fn new(
        registry: impl Into<String>,
        statistics: impl Into<String>,
        gameplay: impl Into<String>,
    ) -> Self {
        Self {
            registry: trim_base_url(registry.into()),
            statistics: trim_base_url(statistics.into()),
            gameplay: trim_base_url(gameplay.into()),
        }
    }

    /// Trailing slashes stripped from every base URL.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.registry.as_str(),
            self.statistics.as_str(),
            self.gameplay.as_str(),
        )
    }

    fn validate(&self) -> Result<(), Error> {
        for (area, url) in [
            ("registry", &self.registry),
            ("statistics", &self.statistics),
            ("gameplay", &self.gameplay),
        ] {
            if url.trim().is_empty() {
                return Err(Error::InvalidConfiguration(format!(
                    "{} base url is empty",
                    area
                )));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} base url must start with http:// or https://: {}",
                    area, url
                )));
            }
        }
        Ok(())
    }
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self::single(DEFAULT_BASE_URL)
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Immutable session configuration handed to the SDK at construction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub api_key: String,
    #[serde(default)]
    pub urls: ServiceUrls,
    #[serde(default = "default_margin")]
    pub token_expiration_margin_secs: u32,
}

fn default_margin() -> u32 {
    DEFAULT_TOKEN_EXPIRATION_MARGIN_SECS
}

impl SdkConfig {
    pub fn new(api_key: impl Into<String>, urls: ServiceUrls) -> Self {
        Self {
            api_key: api_key.into(),
            urls,
            token_expiration_margin_secs: DEFAULT_TOKEN_EXPIRATION_MARGIN_SECS,
        }
    }

    pub fn with_token_expiration_margin(mut self, margin_secs: u32) -> Self {
        self.token_expiration_margin_secs = margin_secs;
        self
    }

    /// Same configuration with base URLs normalized, whatever way it was built.
    pub fn normalized(mut self) -> Self {
        self.urls = self.urls.normalized();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidConfiguration("api key is empty".to_string()));
        }
        self.urls.validate()
    }
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("api_key", &"<redacted>")
            .field("urls", &self.urls)
            .field(
                "token_expiration_margin_secs",
                &self.token_expiration_margin_secs,
            )
            .finish()
    }
}

/// File-loaded settings for host applications.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub sdk: SdkConfig,
    pub log_level: String,
}

impl Settings {
    /// SDK configuration with base URLs normalized.
    pub fn sdk_config(&self) -> SdkConfig {
        self.sdk.clone().normalized()
    }
}
