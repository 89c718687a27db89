use crate::core::classifier::{KeyMoment, KeyMomentClassifier};
use crate::core::roster::{Roster, Side};
use crate::models::stats::histogram_key;
use crate::models::{FinishType, Point, RallyBucket, ServeMarker, ServeResult, ShotEvent, ShotPair, StatProfile};
use std::ops::{Index, IndexMut};

/// Per-player statistics for one match, one fixed slot per side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStatistics {
    profiles: [StatProfile; 2],
}

impl MatchStatistics {
    pub fn profile(&self, side: Side) -> &StatProfile {
        &self.profiles[side.index()]
    }

    pub fn into_profiles(self) -> [StatProfile; 2] {
        self.profiles
    }
}

impl Index<Side> for MatchStatistics {
    type Output = StatProfile;

    fn index(&self, side: Side) -> &StatProfile {
        &self.profiles[side.index()]
    }
}

impl IndexMut<Side> for MatchStatistics {
    fn index_mut(&mut self, side: Side) -> &mut StatProfile {
        &mut self.profiles[side.index()]
    }
}

/// Aggregate serve, rally and shot statistics for both players.
///
/// Counters are accumulated point by point; percentages are derived once at the end.
pub fn aggregate_match(
    points: &[Point],
    roster: &Roster,
    classifier: &KeyMomentClassifier,
) -> MatchStatistics {
    let mut stats = MatchStatistics::default();

    for point in points {
        record_point(&mut stats, point, roster, classifier);
    }

    for side in Side::BOTH {
        stats[side].finalize();
    }

    stats
}

/// Who won the point, judged by how its last action finished
pub fn point_winner(point: &Point, roster: &Roster) -> Option<Side> {
    let last = point.last_action();
    let actor = roster.side_of(&last.player)?;

    match last.finish_type? {
        FinishType::Winner => Some(actor),
        FinishType::ForcedError | FinishType::UnforcedError => Some(actor.opponent()),
    }
}

fn record_point(
    stats: &mut MatchStatistics,
    point: &Point,
    roster: &Roster,
    classifier: &KeyMomentClassifier,
) {
    let Some(server) = roster.side_of(point.server()) else {
        tracing::debug!("Skipping point served by unknown player {}", point.server());
        return;
    };
    let returner = server.opponent();

    let first_serve = point.serve_event(ServeMarker::First);
    let second_serve = point.serve_event(ServeMarker::Second);
    record_serves(&mut stats[server], first_serve, second_serve);

    let winner = point_winner(point, roster);

    if winner == Some(server) {
        let is_in = |serve: Option<&ShotEvent>| {
            serve.is_some_and(|s| s.serve_result == Some(ServeResult::In))
        };
        if is_in(first_serve) {
            stats[server].first_serve.won += 1;
        } else if is_in(second_serve) {
            stats[server].second_serve.won += 1;
        }
    }

    // Classified fresh for every point; nothing carries over from the previous one
    let moment = classifier.classify(point.score_text());
    record_key_moment(stats, server, returner, moment, winner);

    if let Some(winner) = winner {
        let bucket = RallyBucket::from_shot_count(point.shot_count());
        for side in Side::BOTH {
            stats[side]
                .rally_lengths
                .entry(bucket)
                .or_default()
                .record(side == winner);
        }
    }

    record_shots(stats, point, roster, moment, winner);
    record_bigrams(stats, point, roster, winner);
}

fn record_serves(
    profile: &mut StatProfile,
    first_serve: Option<&ShotEvent>,
    second_serve: Option<&ShotEvent>,
) {
    if let Some(serve) = first_serve {
        profile.first_serve.attempted += 1;

        if let Some(zone) = serve.serve_zone.as_deref() {
            *profile.serve_zones.entry(zone.to_string()).or_insert(0) += 1;
        }

        match serve.serve_result {
            Some(ServeResult::In) => profile.first_serve.in_play += 1,
            Some(ServeResult::Ace) => {
                profile.first_serve.in_play += 1;
                profile.first_serve.won += 1;
                profile.aces += 1;
            }
            _ => {}
        }
    }

    if let Some(serve) = second_serve {
        profile.second_serve.attempted += 1;

        match serve.serve_result {
            Some(ServeResult::In) => profile.second_serve.in_play += 1,
            Some(ServeResult::DoubleFault) => profile.double_faults += 1,
            _ => {}
        }
    }
}

fn record_key_moment(
    stats: &mut MatchStatistics,
    server: Side,
    returner: Side,
    moment: KeyMoment,
    winner: Option<Side>,
) {
    if moment.break_point {
        stats[server].break_points.faced += 1;
        stats[returner].break_points.faced += 1;

        match winner {
            Some(w) if w == returner => stats[returner].break_points.converted += 1,
            Some(_) => stats[server].break_points.saved += 1,
            None => {}
        }
    }

    if moment.game_point {
        stats[server].game_points.faced += 1;

        match winner {
            Some(w) if w == server => stats[server].game_points.converted += 1,
            Some(_) => stats[returner].game_points.saved += 1,
            None => {}
        }
    }
}

fn record_shots(
    stats: &mut MatchStatistics,
    point: &Point,
    roster: &Roster,
    moment: KeyMoment,
    winner: Option<Side>,
) {
    for action in point.actions() {
        let Some(shot) = action.shot() else { continue };
        let Some(side) = roster.side_of(&action.player) else { continue };
        let won = winner == Some(side);
        let profile = &mut stats[side];

        let shot = histogram_key(&profile.shot_types, shot);
        *profile.shot_types.entry(shot.clone()).or_insert(0) += 1;

        if moment.is_key() {
            profile.key_shots.entry(shot).or_default().record(won);
        }
        if moment.is_pressure() {
            profile.pressure_points.record(won);
        }
    }
}

fn record_bigrams(stats: &mut MatchStatistics, point: &Point, roster: &Roster, winner: Option<Side>) {
    for (prev, next) in point.actions().zip(point.actions().skip(1)) {
        if prev.player != next.player {
            continue;
        }
        let (Some(first), Some(second)) = (prev.shot(), next.shot()) else { continue };
        let Some(side) = roster.side_of(&prev.player) else { continue };
        let profile = &mut stats[side];
        let pair = ShotPair::new(
            histogram_key(&profile.shot_types, first),
            histogram_key(&profile.shot_types, second),
        );

        profile
            .shot_bigrams
            .entry(pair)
            .or_default()
            .record(winner == Some(side));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segmenter::segment_points;

    fn roster() -> Roster {
        Roster::new("Alice", "Bob").unwrap()
    }

    fn analyze(events: Vec<ShotEvent>) -> MatchStatistics {
        let points = segment_points(events);
        aggregate_match(&points, &roster(), &KeyMomentClassifier::default())
    }

    #[test]
    fn test_first_serve_in_and_won() {
        let stats = analyze(vec![
            ShotEvent::new("Alice")
                .with_serve(ServeMarker::First)
                .with_serve_zone("T")
                .with_serve_result(ServeResult::In)
                .with_shot("Serve"),
            ShotEvent::new("Bob").with_shot("Backhand").with_finish(FinishType::UnforcedError),
        ]);

        let alice = &stats[Side::A];
        assert_eq!(alice.first_serve.attempted, 1);
        assert_eq!(alice.first_serve.in_play, 1);
        assert_eq!(alice.first_serve.won, 1);
        assert_eq!(alice.first_serve.won_pct, 100.0);
        assert_eq!(alice.serve_zones.get("T"), Some(&1));
    }

    #[test]
    fn test_second_serve_won_after_fault() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First),
            ShotEvent::new("Alice")
                .with_serve(ServeMarker::Second)
                .with_serve_result(ServeResult::In)
                .with_shot("Serve"),
            ShotEvent::new("Alice").with_shot("Forehand").with_finish(FinishType::Winner),
        ]);

        let alice = &stats[Side::A];
        assert_eq!(alice.first_serve.attempted, 1);
        assert_eq!(alice.first_serve.in_play, 0);
        assert_eq!(alice.second_serve.attempted, 1);
        assert_eq!(alice.second_serve.won, 1);
        assert_eq!(alice.first_serve_pct(), 0.0);
    }

    #[test]
    fn test_unknown_winner_skips_rally_but_counts_shots() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve"),
            ShotEvent::new("Bob").with_shot("Forehand"),
        ]);

        assert_eq!(stats[Side::A].rally(RallyBucket::Short).total, 0);
        assert_eq!(stats[Side::B].rally(RallyBucket::Short).total, 0);
        assert_eq!(stats[Side::A].shot_types.get("Serve"), Some(&1));
        assert_eq!(stats[Side::B].shot_types.get("Forehand"), Some(&1));
    }

    #[test]
    fn test_game_point_saved_by_returner() {
        let stats = analyze(vec![
            ShotEvent::new("Alice")
                .with_serve(ServeMarker::First)
                .with_shot("Serve")
                .with_score("40-30"),
            ShotEvent::new("Bob").with_shot("Backhand").with_finish(FinishType::Winner),
        ]);

        assert_eq!(stats[Side::A].game_points.faced, 1);
        assert_eq!(stats[Side::A].game_points.converted, 0);
        assert_eq!(stats[Side::B].game_points.saved, 1);
        assert_eq!(stats[Side::B].key_shots.get("Backhand").map(|t| t.won), Some(1));
        assert_eq!(stats[Side::A].key_shots.get("Serve").map(|t| t.won), Some(0));
    }

    #[test]
    fn test_key_moment_does_not_leak_into_next_point() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve").with_score("30-40"),
            ShotEvent::new("Bob").with_shot("Forehand").with_finish(FinishType::Winner),
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve"),
            ShotEvent::new("Bob").with_shot("Forehand").with_finish(FinishType::Winner),
        ]);

        assert_eq!(stats[Side::A].break_points.faced, 1);
        assert_eq!(stats[Side::B].break_points.faced, 1);
        assert_eq!(stats[Side::B].break_points.converted, 1);
        assert_eq!(stats[Side::B].key_shots.get("Forehand").map(|t| t.total), Some(1));
        assert_eq!(stats[Side::B].pressure_points.total, 1);
    }

    #[test]
    fn test_level_score_counts_as_pressure_only() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve").with_score("40-40"),
            ShotEvent::new("Bob").with_shot("Forehand").with_finish(FinishType::ForcedError),
        ]);

        assert_eq!(stats[Side::A].break_points.faced, 0);
        assert!(stats[Side::A].key_shots.is_empty());
        assert_eq!(stats[Side::A].pressure_points.total, 1);
        assert_eq!(stats[Side::A].pressure_points.won, 1);
        assert_eq!(stats[Side::B].pressure_points.total, 1);
        assert_eq!(stats[Side::B].pressure_points.won, 0);
    }

    #[test]
    fn test_bigrams_only_pair_same_player() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve"),
            ShotEvent::new("Alice").with_shot("Forehand"),
            ShotEvent::new("Bob").with_shot("Backhand"),
            ShotEvent::new("Alice").with_shot("Volley").with_finish(FinishType::Winner),
        ]);

        let alice = &stats[Side::A];
        let pair = alice.shot_bigrams.get(&ShotPair::new("Serve", "Forehand")).unwrap();
        assert_eq!(pair.total, 1);
        assert_eq!(pair.won, 1);
        assert_eq!(pair.win_pct, 100.0);
        assert_eq!(alice.shot_bigrams.len(), 1);
        assert!(stats[Side::B].shot_bigrams.is_empty());
    }

    #[test]
    fn test_shot_types_merge_case_variants() {
        let stats = analyze(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve").with_score("30-40"),
            ShotEvent::new("Alice").with_shot("Forehand"),
            ShotEvent::new("Bob").with_shot("Backhand"),
            ShotEvent::new("Alice").with_shot("forehand"),
            ShotEvent::new("Alice").with_shot("FOREHAND").with_finish(FinishType::Winner),
        ]);

        let alice = &stats[Side::A];
        assert_eq!(alice.shot_types.get("Forehand"), Some(&3));
        assert_eq!(alice.shot_types.len(), 2);
        assert_eq!(alice.shot_count("forehand"), 3);
        assert_eq!(alice.key_shots.get("Forehand").map(|t| t.total), Some(3));
        let pair = alice.shot_bigrams.get(&ShotPair::new("Forehand", "Forehand")).unwrap();
        assert_eq!(pair.total, 1);
    }

    #[test]
    fn test_point_winner_on_error() {
        let points = segment_points(vec![
            ShotEvent::new("Alice").with_serve(ServeMarker::First).with_shot("Serve"),
            ShotEvent::new("Bob").with_shot("Forehand").with_finish(FinishType::UnforcedError),
        ]);

        assert_eq!(point_winner(&points[0], &roster()), Some(Side::A));
    }
}
