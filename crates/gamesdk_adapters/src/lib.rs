pub mod configuration;
pub mod network;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;

use gamesdk_core::{Error, GameSdk, SdkConfig};

// Re-exports for convenience
pub use transport::ReqwestTransport;

/// SDK talking to the platform over reqwest.
pub type HttpGameSdk = GameSdk<ReqwestTransport>;

/// Build the default HTTP transport and authenticate.
pub async fn connect(config: SdkConfig) -> Result<HttpGameSdk, Error> {
    let transport = ReqwestTransport::new()?;
    GameSdk::new(config, Arc::new(transport)).await
}

/// Same as [`connect`], with a caller-configured reqwest client.
pub async fn connect_with_client(
    config: SdkConfig,
    client: reqwest::Client,
) -> Result<HttpGameSdk, Error> {
    GameSdk::new(config, Arc::new(ReqwestTransport::with_client(client))).await
}
