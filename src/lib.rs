//! Rally Insight - tennis match analysis from shot-by-shot logs
//!
//! This library turns an ordered match log into per-player serve, rally and shot
//! statistics, and derives rule-based coaching recommendations from them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchAnalyzer, MatchReport, KeyMomentClassifier, RecommendationEngine, Roster, RosterError};
pub use models::{ShotEvent, StatProfile, Recommendation, DetailLevel, AnalyzeMatchRequest, AnalyzeMatchResponse};
