use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle for a registered game, issued by the registry service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameContext {
    game_id: Uuid,
}

impl GameContext {
    /// Wrap an id that is already known to exist on the registry.
    pub fn new(game_id: Uuid) -> Self {
        Self { game_id }
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }
}

/// Handle for a lobby, issued by the gameplay service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LobbyContext {
    lobby_id: Uuid,
}

impl LobbyContext {
    pub fn new(lobby_id: Uuid) -> Self {
        Self { lobby_id }
    }

    pub fn lobby_id(&self) -> Uuid {
        self.lobby_id
    }
}

/// Ordered instruction entry shown on a game's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub step_number: u32,
    #[serde(rename = "rule")]
    pub text: String,
}

impl Rule {
    pub fn new(step_number: u32, text: impl Into<String>) -> Self {
        Self {
            step_number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub unique_number: u32,
    pub title: String,
    pub description: String,
    /// Progress needed to unlock (1 for one-shot achievements)
    pub counter_total: u32,
}

impl Achievement {
    pub fn new(unique_number: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            unique_number,
            title: title.into(),
            description: description.into(),
            counter_total: 1,
        }
    }

    pub fn with_counter_total(mut self, counter_total: u32) -> Self {
        self.counter_total = counter_total;
        self
    }
}

/// Outcome of a completed play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndState {
    Win,
    Loss,
    Draw,
}

impl fmt::Display for EndState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win => write!(f, "WIN"),
            EndState::Loss => write!(f, "LOSS"),
            EndState::Draw => write!(f, "DRAW"),
        }
    }
}

/// Game metadata sent to the registry. Absent optional fields are omitted
/// from the payload, never sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRegistration {
    pub title: String,
    #[serde(rename = "currentHost")]
    pub host_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "currentPrice", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<Achievement>>,
}

impl GameRegistration {
    pub fn new(title: impl Into<String>, host_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            host_url: host_url.into(),
            description: None,
            price: None,
            icon_url: None,
            background_url: None,
            rules: None,
            screenshots: None,
            achievements: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    pub fn with_background_url(mut self, background_url: impl Into<String>) -> Self {
        self.background_url = Some(background_url.into());
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_screenshots(mut self, screenshots: Vec<String>) -> Self {
        self.screenshots = Some(screenshots);
        self
    }

    pub fn with_achievements(mut self, achievements: Vec<Achievement>) -> Self {
        self.achievements = Some(achievements);
        self
    }
}

/// Body of a lobby creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyCreation {
    pub game_id: Uuid,
    pub owner_id: Uuid,
    pub max_players: u32,
}

/// Partial lobby update; any subset of fields may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
}

impl LobbyPatch {
    pub fn owner_id(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn player_count(mut self, player_count: u32) -> Self {
        self.player_count = Some(player_count);
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }
}

/// Statistics for one finished play session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub end_state: EndState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turns_taken: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_seconds_per_turn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_first_to_go: Option<bool>,
}

impl CompletedSession {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime, end_state: EndState) -> Self {
        Self {
            start_time,
            end_time,
            end_state,
            turns_taken: None,
            avg_seconds_per_turn: None,
            player_score: None,
            opponent_score: None,
            clicks: None,
            character: None,
            was_first_to_go: None,
        }
    }

    pub fn with_turns_taken(mut self, turns_taken: u32) -> Self {
        self.turns_taken = Some(turns_taken);
        self
    }

    pub fn with_avg_seconds_per_turn(mut self, avg_seconds_per_turn: f64) -> Self {
        self.avg_seconds_per_turn = Some(avg_seconds_per_turn);
        self
    }

    pub fn with_scores(mut self, player_score: i64, opponent_score: i64) -> Self {
        self.player_score = Some(player_score);
        self.opponent_score = Some(opponent_score);
        self
    }

    pub fn with_clicks(mut self, clicks: u32) -> Self {
        self.clicks = Some(clicks);
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.character = Some(character.into());
        self
    }

    pub fn with_was_first_to_go(mut self, was_first_to_go: bool) -> Self {
        self.was_first_to_go = Some(was_first_to_go);
        self
    }
}

/// Body of an achievement progress update. `None` is sent as an explicit
/// `null`, which the statistics service treats as "advance by one".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub new_progress_amount: Option<u32>,
}

/// Credential exchange request body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub api_key: &'a str,
}

/// Credential exchange response body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Response of every endpoint that creates a resource
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub uuid: Uuid,
}

/// Bearer token currently held by the SDK.
///
/// Empty at construction, cleared at the start of every authentication
/// attempt and replaced wholesale when one succeeds.
#[derive(Clone, Default)]
pub struct Credentials {
    bearer_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(bearer_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            bearer_token: Some(bearer_token),
            expires_at: Some(expires_at),
        }
    }

    pub fn clear(&mut self) {
        self.bearer_token = None;
        self.expires_at = None;
    }

    /// Usable only while a token is present and `now < expires_at`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.bearer_token, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        !self.is_usable_at(Utc::now())
    }

    /// Token as issued, regardless of freshness.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Token, if present and still fresh.
    pub fn usable_token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.bearer_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
