use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::executor::{AuthenticatedExecutor, Operation};
use crate::config::SdkConfig;
use crate::entities::{
    AchievementProgress, CompletedSession, CreatedResource, GameContext, GameRegistration,
    LobbyContext, LobbyCreation, LobbyPatch,
};
use crate::error::Error;
use crate::ports::{HttpMethod, HttpTransport};

/// Entry point for every platform capability.
///
/// Construction validates the configuration and authenticates once; a
/// failed exchange means no SDK. Afterwards each operation re-checks token
/// freshness and re-authenticates transparently when needed.
pub struct GameSdk<T: HttpTransport> {
    config: SdkConfig,
    executor: AuthenticatedExecutor<T>,
}

impl<T: HttpTransport> GameSdk<T> {
    #[instrument(skip(transport), fields(registry = %config.urls.registry))]
    pub async fn new(config: SdkConfig, transport: Arc<T>) -> Result<Self, Error> {
        let config = config.normalized();
        config.validate()?;

        let executor = AuthenticatedExecutor::new(transport, &config);
        executor.authenticate().await?;

        Ok(Self { config, executor })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Discard the current token and run a fresh exchange.
    pub async fn authenticate(&self) -> Result<(), Error> {
        self.executor.authenticate().await
    }

    pub async fn bearer_token(&self) -> Result<String, Error> {
        self.executor.bearer_token().await
    }

    /// Drop the cached token; the next operation re-authenticates.
    pub async fn invalidate_token(&self) {
        self.executor.invalidate().await
    }

    pub async fn is_token_expired(&self) -> bool {
        self.executor.is_token_expired().await
    }

    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.executor.token_expires_at().await
    }

    /// Register a game, or update it if the registry already knows it.
    #[instrument(skip(self, registration), fields(title = %registration.title))]
    pub async fn register_game(&self, registration: &GameRegistration) -> Result<GameContext, Error> {
        let operation = Operation::new(
            HttpMethod::Patch,
            format!("{}/registry/games", self.config.urls.registry),
            200,
        )
        .with_json(registration)?;

        let created: CreatedResource = self.executor.execute_json(operation).await?;
        info!(game_id = %created.uuid, "game registered");
        Ok(GameContext::new(created.uuid))
    }

    #[instrument(skip(self))]
    pub async fn create_lobby(
        &self,
        game: &GameContext,
        owner_id: Uuid,
        max_players: u32,
    ) -> Result<LobbyContext, Error> {
        let operation = Operation::new(
            HttpMethod::Post,
            format!("{}/lobby", self.config.urls.gameplay),
            201,
        )
        .with_json(&LobbyCreation {
            game_id: game.game_id(),
            owner_id,
            max_players,
        })?;

        let created: CreatedResource = self.executor.execute_json(operation).await?;
        info!(lobby_id = %created.uuid, "lobby created");
        Ok(LobbyContext::new(created.uuid))
    }

    #[instrument(skip(self))]
    pub async fn patch_lobby(&self, lobby: &LobbyContext, patch: &LobbyPatch) -> Result<(), Error> {
        let operation = Operation::new(
            HttpMethod::Patch,
            format!("{}/lobby/{}", self.config.urls.gameplay, lobby.lobby_id()),
            200,
        )
        .with_json(patch)?;

        self.executor.execute(operation).await?;
        Ok(())
    }

    /// Always `Ok(true)` on success; every failure is an `Err`.
    #[instrument(skip(self, session), fields(end_state = %session.end_state))]
    pub async fn submit_completed_session(
        &self,
        game: &GameContext,
        player_id: Uuid,
        session: &CompletedSession,
    ) -> Result<bool, Error> {
        let operation = Operation::new(
            HttpMethod::Post,
            format!(
                "{}/statistics/submit?playerId={}&gameId={}",
                self.config.urls.statistics,
                player_id,
                game.game_id()
            ),
            200,
        )
        .with_json(session)?;

        self.executor.execute(operation).await?;
        Ok(true)
    }

    /// Advance an achievement, keyed by its unique number within the game.
    /// Without `new_progress_amount` the service advances it by one.
    #[instrument(skip(self))]
    pub async fn update_achievement_progress(
        &self,
        game: &GameContext,
        player_id: Uuid,
        achievement_number: u32,
        new_progress_amount: Option<u32>,
    ) -> Result<bool, Error> {
        let operation = Operation::new(
            HttpMethod::Post,
            format!(
                "{}/statistics/achievements/{}?playerId={}&gameId={}",
                self.config.urls.statistics,
                achievement_number,
                player_id,
                game.game_id()
            ),
            200,
        )
        .with_json(&AchievementProgress {
            new_progress_amount,
        })?;

        self.executor.execute(operation).await?;
        Ok(true)
    }
}
