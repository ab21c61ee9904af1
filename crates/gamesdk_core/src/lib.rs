pub mod config;
pub mod entities;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{SdkConfig, ServiceUrls};
pub use error::Error;
pub use use_cases::GameSdk;
