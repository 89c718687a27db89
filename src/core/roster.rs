use crate::models::ShotEvent;
use serde::Serialize;
use thiserror::Error;

/// Errors resolving the two players of a match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Expected exactly two players, found {found}: {players:?}")]
    InsufficientRoster { found: usize, players: Vec<String> },
}

/// Fixed slot of a player within a two-player match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// The two players of a match, in order of first appearance in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    players: [String; 2],
}

impl Roster {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Result<Self, RosterError> {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return Err(RosterError::InsufficientRoster {
                found: 1,
                players: vec![a],
            });
        }
        Ok(Self { players: [a, b] })
    }

    /// Resolve the roster from the acting players of a log
    pub fn from_events(events: &[ShotEvent]) -> Result<Self, RosterError> {
        let mut players: Vec<String> = Vec::new();
        for event in events {
            if !players.iter().any(|p| p == &event.player) {
                players.push(event.player.clone());
            }
        }

        match <[String; 2]>::try_from(players) {
            Ok(players) => Ok(Self { players }),
            Err(players) => Err(RosterError::InsufficientRoster {
                found: players.len(),
                players,
            }),
        }
    }

    pub fn name(&self, side: Side) -> &str {
        &self.players[side.index()]
    }

    pub fn players(&self) -> &[String; 2] {
        &self.players
    }

    pub fn side_of(&self, player: &str) -> Option<Side> {
        Side::BOTH.into_iter().find(|side| self.name(*side) == player)
    }
}
