use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Error returned when a text token is not part of the recognised vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised token: {0}")]
pub struct UnknownToken(pub String);

/// Lower-case a token and collapse inner whitespace so "1st  Serve" == "1st serve"
fn normalize_token(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Return the trimmed text if it carries a value.
///
/// Empty cells and the `-` placeholder used by match charting sheets count as absent.
pub fn present(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse an optional text cell into a token, treating anything unrecognised as absent
pub fn parse_token<T: FromStr>(text: Option<&str>) -> Option<T> {
    text.and_then(present).and_then(|t| t.parse().ok())
}

/// Serve marker on the event that opens a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServeMarker {
    #[serde(rename = "1st Serve")]
    First,
    #[serde(rename = "2nd Serve")]
    Second,
}

impl FromStr for ServeMarker {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "1st" | "1st serve" | "first serve" => Ok(Self::First),
            "2nd" | "2nd serve" | "second serve" => Ok(Self::Second),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// Outcome of a serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServeResult {
    #[serde(rename = "In")]
    In,
    #[serde(rename = "Ace")]
    Ace,
    #[serde(rename = "Double Fault")]
    DoubleFault,
}

impl FromStr for ServeResult {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "in" | "in play" => Ok(Self::In),
            "ace" => Ok(Self::Ace),
            "double fault" => Ok(Self::DoubleFault),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// How the last shot of a point ended the rally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FinishType {
    #[serde(rename = "Winner")]
    Winner,
    #[serde(rename = "Forced Error")]
    ForcedError,
    #[serde(rename = "Unforced Error")]
    UnforcedError,
}

impl FromStr for FinishType {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "winner" => Ok(Self::Winner),
            "forced error" => Ok(Self::ForcedError),
            "unforced error" => Ok(Self::UnforcedError),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// Deserializers that never fail on optional cells: wrong shapes become `None`
mod lenient {
    use super::{present, FromStr};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => present(&s).map(str::to_string),
            _ => None,
        })
    }

    pub fn token<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(text(deserializer)?.and_then(|t| t.parse().ok()))
    }
}

/// One row of a shot-by-shot match log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShotEvent {
    /// Player performing the action
    #[validate(length(min = 1))]
    #[serde(alias = "Player_1", alias = "player_1")]
    pub player: String,
    #[serde(alias = "Serve", default, deserialize_with = "lenient::token")]
    pub serve: Option<ServeMarker>,
    #[serde(
        rename = "serveZone",
        alias = "serve_zone",
        alias = "Serve Zone",
        default,
        deserialize_with = "lenient::text"
    )]
    pub serve_zone: Option<String>,
    #[serde(
        rename = "serveResult",
        alias = "serve_result",
        alias = "Serve Result",
        default,
        deserialize_with = "lenient::token"
    )]
    pub serve_result: Option<ServeResult>,
    #[serde(
        rename = "shotType",
        alias = "shot_type",
        alias = "Shot Type",
        default,
        deserialize_with = "lenient::text"
    )]
    pub shot_type: Option<String>,
    #[serde(
        rename = "finishType",
        alias = "finish_type",
        alias = "Finish Type",
        default,
        deserialize_with = "lenient::token"
    )]
    pub finish_type: Option<FinishType>,
    #[serde(
        rename = "gameScore",
        alias = "game_score",
        alias = "Game Score",
        default,
        deserialize_with = "lenient::text"
    )]
    pub game_score: Option<String>,
}

impl ShotEvent {
    /// Create an event with only the acting player set
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            serve: None,
            serve_zone: None,
            serve_result: None,
            shot_type: None,
            finish_type: None,
            game_score: None,
        }
    }

    pub fn with_serve(mut self, marker: ServeMarker) -> Self {
        self.serve = Some(marker);
        self
    }

    pub fn with_serve_zone(mut self, zone: impl Into<String>) -> Self {
        self.serve_zone = Some(zone.into());
        self
    }

    pub fn with_serve_result(mut self, result: ServeResult) -> Self {
        self.serve_result = Some(result);
        self
    }

    pub fn with_shot(mut self, shot_type: impl Into<String>) -> Self {
        self.shot_type = Some(shot_type.into());
        self
    }

    pub fn with_finish(mut self, finish: FinishType) -> Self {
        self.finish_type = Some(finish);
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.game_score = Some(score.into());
        self
    }

    /// Shot type, if the cell carried one
    pub fn shot(&self) -> Option<&str> {
        self.shot_type.as_deref()
    }
}

/// One rally: the serve event that opened it plus everything up to the next serve marker.
///
/// The opening event is held separately so a point can never be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    opening: ShotEvent,
    rally: Vec<ShotEvent>,
}

impl Point {
    pub(crate) fn open(opening: ShotEvent) -> Self {
        Self {
            opening,
            rally: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: ShotEvent) {
        self.rally.push(event);
    }

    /// Acting player of the serve marker that opened the point
    pub fn server(&self) -> &str {
        &self.opening.player
    }

    /// Serve marker that opened the point
    pub fn marker(&self) -> Option<ServeMarker> {
        self.opening.serve
    }

    /// All actions in log order, starting with the opening serve
    pub fn actions(&self) -> impl Iterator<Item = &ShotEvent> + '_ {
        std::iter::once(&self.opening).chain(self.rally.iter())
    }

    pub fn action_count(&self) -> usize {
        1 + self.rally.len()
    }

    pub fn last_action(&self) -> &ShotEvent {
        self.rally.last().unwrap_or(&self.opening)
    }

    /// First action carrying the given serve marker
    pub fn serve_event(&self, marker: ServeMarker) -> Option<&ShotEvent> {
        self.actions().find(|a| a.serve == Some(marker))
    }

    /// First game-score text found among the point's actions
    pub fn score_text(&self) -> Option<&str> {
        self.actions().find_map(|a| a.game_score.as_deref())
    }

    /// Number of actions carrying a shot type
    pub fn shot_count(&self) -> usize {
        self.actions().filter(|a| a.shot().is_some()).count()
    }
}

/// How many recommendation entries per category are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Minimal,
    #[default]
    Medium,
    Detailed,
}

impl DetailLevel {
    /// Maximum entries per category, `None` meaning unlimited
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Minimal => Some(1),
            Self::Medium => Some(2),
            Self::Detailed => None,
        }
    }
}

impl FromStr for DetailLevel {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "minimal" => Ok(Self::Minimal),
            "medium" => Ok(Self::Medium),
            "detailed" => Ok(Self::Detailed),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strengths,
    Improvements,
    Tactics,
    TrainingFocus,
    MentalGame,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Strengths,
        Category::Improvements,
        Category::Tactics,
        Category::TrainingFocus,
        Category::MentalGame,
    ];
}

/// Coaching advice for one player, grouped by category in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tactics: Vec<String>,
    pub training_focus: Vec<String>,
    pub mental_game: Vec<String>,
}

impl Recommendation {
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Strengths => &self.strengths,
            Category::Improvements => &self.improvements,
            Category::Tactics => &self.tactics,
            Category::TrainingFocus => &self.training_focus,
            Category::MentalGame => &self.mental_game,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Strengths => &mut self.strengths,
            Category::Improvements => &mut self.improvements,
            Category::Tactics => &mut self.tactics,
            Category::TrainingFocus => &mut self.training_focus,
            Category::MentalGame => &mut self.mental_game,
        }
    }

    pub fn push(&mut self, category: Category, message: impl Into<String>) {
        self.category_mut(category).push(message.into());
    }

    /// Total entries across all categories
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the leading entries of each category allowed by the detail level
    pub fn truncate_to(&mut self, detail: DetailLevel) {
        if let Some(limit) = detail.limit() {
            for category in Category::ALL {
                self.category_mut(category).truncate(limit);
            }
        }
    }
}
