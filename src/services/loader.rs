use crate::models::domain::{parse_token, present};
use crate::models::ShotEvent;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use thiserror::Error;

pub const PLAYER_COLUMN: &str = "Player_1";
pub const SERVE_COLUMN: &str = "Serve";
pub const SERVE_ZONE_COLUMN: &str = "Serve Zone";
pub const SERVE_RESULT_COLUMN: &str = "Serve Result";
pub const SHOT_TYPE_COLUMN: &str = "Shot Type";
pub const FINISH_TYPE_COLUMN: &str = "Finish Type";
pub const GAME_SCORE_COLUMN: &str = "Game Score";

/// Columns a log must carry before it can be analysed
pub const REQUIRED_COLUMNS: [&str; 3] = [PLAYER_COLUMN, SERVE_COLUMN, SHOT_TYPE_COLUMN];

/// Errors that can occur while ingesting a match log
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Match log contains no events")]
    EmptyLog,
}

/// Header positions of the known columns
struct ColumnMap {
    player: usize,
    serve: usize,
    shot_type: usize,
    serve_zone: Option<usize>,
    serve_result: Option<usize>,
    finish_type: Option<usize>,
    game_score: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();

        match (find(PLAYER_COLUMN), find(SERVE_COLUMN), find(SHOT_TYPE_COLUMN)) {
            (Some(player), Some(serve), Some(shot_type)) => Ok(Self {
                player,
                serve,
                shot_type,
                serve_zone: find(SERVE_ZONE_COLUMN),
                serve_result: find(SERVE_RESULT_COLUMN),
                finish_type: find(FINISH_TYPE_COLUMN),
                game_score: find(GAME_SCORE_COLUMN),
            }),
            _ => Err(LoaderError::MissingColumns(missing)),
        }
    }

    /// Build an event from a row; rows without an acting player yield `None`
    fn event(&self, record: &StringRecord) -> Option<ShotEvent> {
        let cell = |index: Option<usize>| index.and_then(|i| record.get(i));
        let text = |index: Option<usize>| cell(index).and_then(present).map(str::to_string);

        let player = cell(Some(self.player)).and_then(present)?;

        Some(ShotEvent {
            player: player.to_string(),
            serve: parse_token(cell(Some(self.serve))),
            serve_zone: text(self.serve_zone),
            serve_result: parse_token(cell(self.serve_result)),
            shot_type: text(Some(self.shot_type)),
            finish_type: parse_token(cell(self.finish_type)),
            game_score: text(self.game_score),
        })
    }
}

/// Reads shot-by-shot match logs exported as CSV
pub struct MatchLogLoader;

impl MatchLogLoader {
    /// Parse a CSV log, keeping row order
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ShotEvent>, LoaderError> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut events = Vec::new();
        let mut skipped = 0usize;

        for record in csv_reader.records() {
            match columns.event(&record?) {
                Some(event) => events.push(event),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} rows without an acting player", skipped);
        }

        if events.is_empty() {
            return Err(LoaderError::EmptyLog);
        }

        tracing::debug!("Loaded {} events from match log", events.len());
        Ok(events)
    }

    pub fn from_csv_str(text: &str) -> Result<Vec<ShotEvent>, LoaderError> {
        Self::from_reader(text.as_bytes())
    }
}
