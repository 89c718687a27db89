// Core analysis pipeline exports
pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod recommendations;
pub mod roster;
pub mod segmenter;

pub use aggregator::{aggregate_match, point_winner, MatchStatistics};
pub use analyzer::{MatchAnalyzer, MatchReport, PlayerReport};
pub use classifier::{KeyMoment, KeyMomentClassifier, ScoreFlag, ScoreNotation, ScoreToken};
pub use recommendations::{Band, RecommendationEngine, RecommendationThresholds};
pub use roster::{Roster, RosterError, Side};
pub use segmenter::segment_points;
