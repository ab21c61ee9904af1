mod authenticator;
mod executor;
mod game_sdk;

pub use authenticator::{parse_token_response, token_expiry, Authenticator};
pub use executor::{AuthenticatedExecutor, Operation};
pub use game_sdk::GameSdk;
