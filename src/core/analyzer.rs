use crate::core::{
    aggregator::aggregate_match,
    classifier::KeyMomentClassifier,
    recommendations::RecommendationEngine,
    roster::{Roster, RosterError, Side},
    segmenter::segment_points,
};
use crate::models::{DetailLevel, Recommendation, ShotEvent, StatProfile};
use serde::Serialize;

/// Statistics and advice for one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub name: String,
    pub stats: StatProfile,
    pub recommendations: Recommendation,
}

/// Result of analysing one match log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    #[serde(rename = "pointsAnalyzed")]
    pub points_analyzed: usize,
    pub players: Vec<PlayerReport>,
}

impl MatchReport {
    pub fn player(&self, name: &str) -> Option<&PlayerReport> {
        self.players.iter().find(|p| p.name == name)
    }
}

/// Main analysis orchestrator
///
/// # Pipeline Stages
/// 1. Roster resolution (exactly two players)
/// 2. Point segmentation
/// 3. Statistics aggregation with key-moment classification
/// 4. Recommendations for each player against the other
#[derive(Debug, Clone, Default)]
pub struct MatchAnalyzer {
    classifier: KeyMomentClassifier,
    engine: RecommendationEngine,
}

impl MatchAnalyzer {
    pub fn new(classifier: KeyMomentClassifier, engine: RecommendationEngine) -> Self {
        Self { classifier, engine }
    }

    pub fn classifier(&self) -> &KeyMomentClassifier {
        &self.classifier
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Run the full pipeline over an ordered match log
    pub fn analyze(
        &self,
        events: &[ShotEvent],
        detail: DetailLevel,
    ) -> Result<MatchReport, RosterError> {
        let roster = Roster::from_events(events)?;
        let points = segment_points(events.iter().cloned());
        let stats = aggregate_match(&points, &roster, &self.classifier);

        let players = Side::BOTH
            .into_iter()
            .map(|side| PlayerReport {
                name: roster.name(side).to_string(),
                stats: stats[side].clone(),
                recommendations: self.engine.recommend(
                    &stats[side],
                    Some(&stats[side.opponent()]),
                    detail,
                ),
            })
            .collect();

        tracing::info!(
            "Analyzed {} events into {} points for {} vs {}",
            events.len(),
            points.len(),
            roster.name(Side::A),
            roster.name(Side::B)
        );

        Ok(MatchReport {
            points_analyzed: points.len(),
            players,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FinishType, ServeMarker, ServeResult};

    #[test]
    fn test_analyze_two_player_match() {
        let events = vec![
            ShotEvent::new("Alice")
                .with_serve(ServeMarker::First)
                .with_serve_result(ServeResult::Ace)
                .with_shot("Serve"),
            ShotEvent::new("Bob")
                .with_serve(ServeMarker::First)
                .with_serve_result(ServeResult::In)
                .with_shot("Serve"),
            ShotEvent::new("Alice").with_shot("Forehand").with_finish(FinishType::Winner),
        ];

        let report = MatchAnalyzer::default()
            .analyze(&events, DetailLevel::Medium)
            .unwrap();

        assert_eq!(report.points_analyzed, 2);
        assert_eq!(report.players.len(), 2);
        assert_eq!(report.players[0].name, "Alice");

        let alice = report.player("Alice").unwrap();
        assert_eq!(alice.stats.aces, 1);
        let bob = report.player("Bob").unwrap();
        assert_eq!(bob.stats.first_serve.won, 0);
    }

    #[test]
    fn test_single_player_log_is_rejected() {
        let events = vec![ShotEvent::new("Alice").with_serve(ServeMarker::First)];

        let result = MatchAnalyzer::default().analyze(&events, DetailLevel::Medium);

        assert!(matches!(result, Err(RosterError::InsufficientRoster { found: 1, .. })));
    }
}
