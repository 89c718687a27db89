// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod stats;

pub use domain::{Category, DetailLevel, FinishType, Point, Recommendation, ServeMarker, ServeResult, ShotEvent, UnknownToken};
pub use requests::{AnalyzeMatchRequest, DetailQuery};
pub use responses::{AnalyzeMatchResponse, ErrorResponse, HealthResponse};
pub use stats::{percentage, KeyPointStats, RallyBucket, ServeStats, ShotPair, StatProfile, Tally};
