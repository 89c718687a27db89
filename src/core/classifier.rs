use serde::{Deserialize, Serialize};

/// What a score token says about the point being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFlag {
    /// Returner is one point from winning the game
    BreakPoint,
    /// Server is one point from winning the game
    GamePoint,
    /// Both players level at a near-game count (30-30, deuce)
    Level,
}

/// A literal score token and the flag it raises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreToken {
    pub token: String,
    pub flag: ScoreFlag,
}

impl ScoreToken {
    pub fn new(token: impl Into<String>, flag: ScoreFlag) -> Self {
        Self {
            token: token.into(),
            flag,
        }
    }
}

/// Lookup table mapping score-text tokens to key-moment flags.
///
/// Scores are written server-first. Swap the table to support another notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreNotation {
    pub tokens: Vec<ScoreToken>,
}

impl Default for ScoreNotation {
    fn default() -> Self {
        use ScoreFlag::*;

        let tokens = [
            ("0-40", BreakPoint),
            ("15-40", BreakPoint),
            ("30-40", BreakPoint),
            ("40-A", BreakPoint),
            ("40-0", GamePoint),
            ("40-15", GamePoint),
            ("40-30", GamePoint),
            ("A-40", GamePoint),
            ("30-30", Level),
            ("40-40", Level),
        ]
        .into_iter()
        .map(|(token, flag)| ScoreToken::new(token, flag))
        .collect();

        Self { tokens }
    }
}

/// Key-moment flags for a single point, from the server's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyMoment {
    pub break_point: bool,
    pub game_point: bool,
    pub level: bool,
}

impl KeyMoment {
    pub const NONE: KeyMoment = KeyMoment {
        break_point: false,
        game_point: false,
        level: false,
    };

    /// Break point or game point
    pub fn is_key(&self) -> bool {
        self.break_point || self.game_point
    }

    /// Key moment or level near-game score
    pub fn is_pressure(&self) -> bool {
        self.is_key() || self.level
    }

    fn raise(&mut self, flag: ScoreFlag) {
        match flag {
            ScoreFlag::BreakPoint => self.break_point = true,
            ScoreFlag::GamePoint => self.game_point = true,
            ScoreFlag::Level => self.level = true,
        }
    }
}

/// Classifies game-score text into break point / game point / level flags
#[derive(Debug, Clone, Default)]
pub struct KeyMomentClassifier {
    notation: ScoreNotation,
}

impl KeyMomentClassifier {
    pub fn new(notation: ScoreNotation) -> Self {
        Self { notation }
    }

    pub fn notation(&self) -> &ScoreNotation {
        &self.notation
    }

    /// Classify a point's score text. Absent or unrecognised text is never a key moment.
    pub fn classify(&self, score: Option<&str>) -> KeyMoment {
        let Some(score) = score else {
            return KeyMoment::NONE;
        };
        let score = score.to_lowercase();

        self.notation
            .tokens
            .iter()
            .filter(|entry| contains_token(&score, &entry.token.to_lowercase()))
            .fold(KeyMoment::NONE, |mut moment, entry| {
                moment.raise(entry.flag);
                moment
            })
    }
}

/// Substring match that refuses occurrences glued to other alphanumerics,
/// so `0-40` is not found inside `40-40`
fn contains_token(haystack: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    haystack.match_indices(token).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + token.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
