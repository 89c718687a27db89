use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Percentage rounded to one decimal place; a zero denominator yields 0
#[inline]
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (f64::from(numerator) / f64::from(denominator) * 1000.0).round() / 10.0
}

/// Occurrence counter with the share that ended in a won point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    pub total: u32,
    pub won: u32,
    pub win_pct: f64,
}

impl Tally {
    pub fn record(&mut self, won: bool) {
        self.total += 1;
        if won {
            self.won += 1;
        }
    }

    fn finalize(&mut self) {
        self.win_pct = percentage(self.won, self.total);
    }
}

/// Counters for one serve (first or second)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ServeStats {
    pub attempted: u32,
    #[serde(rename = "in")]
    pub in_play: u32,
    pub won: u32,
    /// Serves in / serves attempted
    pub in_pct: f64,
    /// Points won / serves in
    pub won_pct: f64,
}

impl ServeStats {
    fn finalize(&mut self) {
        self.in_pct = percentage(self.in_play, self.attempted);
        self.won_pct = percentage(self.won, self.in_play);
    }
}

/// Break point or game point outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KeyPointStats {
    pub faced: u32,
    pub saved: u32,
    pub converted: u32,
    pub conversion_pct: f64,
}

impl KeyPointStats {
    fn finalize(&mut self) {
        self.conversion_pct = percentage(self.converted, self.faced);
    }
}

/// Rally length classification by number of shots in the point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RallyBucket {
    #[serde(rename = "1-3")]
    Short,
    #[serde(rename = "4-6")]
    Medium,
    #[serde(rename = "7-9")]
    Long,
    #[serde(rename = "10+")]
    Extended,
}

impl RallyBucket {
    pub const ALL: [RallyBucket; 4] = [
        RallyBucket::Short,
        RallyBucket::Medium,
        RallyBucket::Long,
        RallyBucket::Extended,
    ];

    pub fn from_shot_count(shots: usize) -> Self {
        match shots {
            0..=3 => Self::Short,
            4..=6 => Self::Medium,
            7..=9 => Self::Long,
            _ => Self::Extended,
        }
    }

    /// Buckets aggregated into the long-rally win percentage
    pub fn is_long(self) -> bool {
        !matches!(self, Self::Short)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "1-3",
            Self::Medium => "4-6",
            Self::Long => "7-9",
            Self::Extended => "10+",
        }
    }
}

/// Two consecutive shot types hit by the same player within a point
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShotPair {
    pub first: String,
    pub second: String,
}

impl ShotPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for ShotPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.first, self.second)
    }
}

// Serialized as its display form so the bigram histogram stays a JSON object
impl Serialize for ShotPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Key under which `name` is counted in a histogram.
///
/// Spellings differing only in ASCII case share the first key recorded.
pub fn histogram_key<V>(histogram: &BTreeMap<String, V>, name: &str) -> String {
    histogram
        .keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}

/// Aggregated statistics for one player over a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatProfile {
    pub first_serve: ServeStats,
    pub second_serve: ServeStats,
    pub aces: u32,
    pub double_faults: u32,
    pub serve_zones: BTreeMap<String, u32>,
    pub shot_types: BTreeMap<String, u32>,
    pub shot_bigrams: BTreeMap<ShotPair, Tally>,
    pub rally_lengths: BTreeMap<RallyBucket, Tally>,
    /// Win percentage over rallies of four shots or more
    pub long_rally_win_pct: f64,
    pub break_points: KeyPointStats,
    pub game_points: KeyPointStats,
    pub key_shots: BTreeMap<String, Tally>,
    pub pressure_points: Tally,
}

impl Default for StatProfile {
    fn default() -> Self {
        Self {
            first_serve: ServeStats::default(),
            second_serve: ServeStats::default(),
            aces: 0,
            double_faults: 0,
            serve_zones: BTreeMap::new(),
            shot_types: BTreeMap::new(),
            shot_bigrams: BTreeMap::new(),
            rally_lengths: RallyBucket::ALL
                .iter()
                .map(|bucket| (*bucket, Tally::default()))
                .collect(),
            long_rally_win_pct: 0.0,
            break_points: KeyPointStats::default(),
            game_points: KeyPointStats::default(),
            key_shots: BTreeMap::new(),
            pressure_points: Tally::default(),
        }
    }
}

impl StatProfile {
    pub fn first_serve_pct(&self) -> f64 {
        self.first_serve.in_pct
    }

    pub fn second_serve_won_pct(&self) -> f64 {
        self.second_serve.won_pct
    }

    pub fn rally(&self, bucket: RallyBucket) -> Tally {
        self.rally_lengths.get(&bucket).copied().unwrap_or_default()
    }

    pub fn total_shots(&self) -> u32 {
        self.shot_types.values().sum()
    }

    /// Count for a shot type, matched case-insensitively
    pub fn shot_count(&self, shot_type: &str) -> u32 {
        self.shot_types
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(shot_type))
            .map(|(_, count)| *count)
            .sum()
    }

    /// Compute every derived percentage from the raw counters
    pub fn finalize(&mut self) {
        self.first_serve.finalize();
        self.second_serve.finalize();
        self.break_points.finalize();
        self.game_points.finalize();
        self.pressure_points.finalize();

        for tally in self.rally_lengths.values_mut() {
            tally.finalize();
        }
        for tally in self.shot_bigrams.values_mut() {
            tally.finalize();
        }
        for tally in self.key_shots.values_mut() {
            tally.finalize();
        }

        let (long_won, long_played) = self
            .rally_lengths
            .iter()
            .filter(|(bucket, _)| bucket.is_long())
            .fold((0, 0), |(won, played), (_, t)| (won + t.won, played + t.total));
        self.long_rally_win_pct = percentage(long_won, long_played);
    }
}
