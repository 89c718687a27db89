use crate::models::{Category, DetailLevel, Recommendation, StatProfile, Tally};
use serde::{Deserialize, Serialize};

/// Low / high cut-offs for a percentage metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Thresholds the recommendation rules compare statistics against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub first_serve_pct: Band,
    pub second_serve_won_pct_low: f64,
    pub serve_zone_concentration_pct: f64,
    pub break_point_conversion: Band,
    pub break_point_min_faced: u32,
    /// Shot type compared head-to-head against the opponent
    pub power_shot: String,
    pub power_shot_ratio: f64,
    pub power_shot_min_count: u32,
    pub long_rally_gap: f64,
    pub shot_dominance_pct: f64,
    pub specialty_shots: Vec<String>,
    pub specialty_shot_floor_pct: f64,
    pub bigram_win_pct: f64,
    pub bigram_min_count: u32,
    pub key_shot: Band,
    pub key_shot_min_total: u32,
    pub second_serve_risk_first_pct: f64,
    pub second_serve_risk_won_pct: f64,
    pub pressure: Band,
    pub pressure_min_total: u32,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            first_serve_pct: Band::new(50.0, 70.0),
            second_serve_won_pct_low: 40.0,
            serve_zone_concentration_pct: 60.0,
            break_point_conversion: Band::new(30.0, 60.0),
            break_point_min_faced: 2,
            power_shot: "Forehand".to_string(),
            power_shot_ratio: 1.5,
            power_shot_min_count: 5,
            long_rally_gap: 20.0,
            shot_dominance_pct: 65.0,
            specialty_shots: vec!["Slice".to_string(), "Drop Shot".to_string(), "Volley".to_string()],
            specialty_shot_floor_pct: 5.0,
            bigram_win_pct: 60.0,
            bigram_min_count: 3,
            key_shot: Band::new(40.0, 60.0),
            key_shot_min_total: 2,
            second_serve_risk_first_pct: 65.0,
            second_serve_risk_won_pct: 40.0,
            pressure: Band::new(40.0, 60.0),
            pressure_min_total: 5,
        }
    }
}

/// Inputs visible to every rule
struct RuleContext<'a> {
    player: &'a StatProfile,
    opponent: Option<&'a StatProfile>,
    detail: DetailLevel,
    thresholds: &'a RecommendationThresholds,
}

/// A named rule; rules run in table order so truncation keeps the same leading entries
struct Rule {
    name: &'static str,
    apply: fn(&RuleContext<'_>, &mut Recommendation),
}

const RULES: &[Rule] = &[
    Rule { name: "first_serve_pct", apply: first_serve_pct },
    Rule { name: "second_serve_won", apply: second_serve_won },
    Rule { name: "serve_zone_concentration", apply: serve_zone_concentration },
    Rule { name: "power_shot_dominance", apply: power_shot_dominance },
    Rule { name: "long_rally_gap", apply: long_rally_gap },
    Rule { name: "break_point_conversion", apply: break_point_conversion },
    Rule { name: "shot_distribution", apply: shot_distribution },
    Rule { name: "best_shot_bigram", apply: best_shot_bigram },
    Rule { name: "second_serve_risk", apply: second_serve_risk },
    Rule { name: "pressure_points", apply: pressure_points },
    // Detailed-only rules go last so their entries only ever extend a category
    Rule { name: "key_shots", apply: key_shots },
];

/// Rule-based coaching recommendations from a player's statistics
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    thresholds: RecommendationThresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: RecommendationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RecommendationThresholds {
        &self.thresholds
    }

    /// Evaluate every rule once, in order, then trim each category to the detail level
    pub fn recommend(
        &self,
        player: &StatProfile,
        opponent: Option<&StatProfile>,
        detail: DetailLevel,
    ) -> Recommendation {
        let ctx = RuleContext {
            player,
            opponent,
            detail,
            thresholds: &self.thresholds,
        };
        let mut recommendation = Recommendation::default();

        for rule in RULES {
            let before = recommendation.len();
            (rule.apply)(&ctx, &mut recommendation);
            if recommendation.len() > before {
                tracing::trace!("Rule {} added {} entries", rule.name, recommendation.len() - before);
            }
        }

        recommendation.truncate_to(detail);
        recommendation
    }
}

fn share(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total) * 100.0
    }
}

fn first_serve_pct(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let pct = ctx.player.first_serve_pct();
    let band = ctx.thresholds.first_serve_pct;

    if pct < band.low {
        rec.push(
            Category::Improvements,
            format!(
                "Improve first-serve percentage (currently {:.1}%). Focus on technique and consistency.",
                pct
            ),
        );
        rec.push(Category::TrainingFocus, "First-serve consistency");
    } else if pct > band.high {
        rec.push(
            Category::Strengths,
            format!("High first-serve percentage ({:.1}%). Keep using it as an advantage.", pct),
        );
    }
}

fn second_serve_won(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let pct = ctx.player.second_serve_won_pct();

    if pct < ctx.thresholds.second_serve_won_pct_low {
        rec.push(
            Category::Improvements,
            format!(
                "Low share of points won behind the second serve ({:.1}%). Improve its quality and variety.",
                pct
            ),
        );
        rec.push(Category::TrainingFocus, "Second-serve quality");
    }
}

fn serve_zone_concentration(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let zones = &ctx.player.serve_zones;
    let total: u32 = zones.values().sum();

    // First zone wins ties
    let busiest = zones
        .iter()
        .fold(None, |best: Option<(&String, u32)>, (zone, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((zone, *count)),
        });

    if let Some((zone, count)) = busiest {
        let pct = share(count, total);
        if pct > ctx.thresholds.serve_zone_concentration_pct {
            rec.push(
                Category::Improvements,
                format!(
                    "Serves concentrated in the {} zone ({:.1}%). Add more variety to serve placement.",
                    zone, pct
                ),
            );
        }
    }
}

fn power_shot_dominance(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let Some(opponent) = ctx.opponent else { return };
    let shot = &ctx.thresholds.power_shot;
    let own = ctx.player.shot_count(shot);
    let theirs = opponent.shot_count(shot);

    if f64::from(own) > f64::from(theirs) * ctx.thresholds.power_shot_ratio
        && own > ctx.thresholds.power_shot_min_count
    {
        rec.push(
            Category::Strengths,
            format!("Clear edge over the opponent with the {}. Use it as the main weapon.", shot.to_lowercase()),
        );
        rec.push(
            Category::Tactics,
            format!("Build rallies around the {} and look for chances to attack with it.", shot.to_lowercase()),
        );
    }
}

fn long_rally_gap(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let Some(opponent) = ctx.opponent else { return };
    let own = ctx.player.long_rally_win_pct;
    let theirs = opponent.long_rally_win_pct;
    let gap = ctx.thresholds.long_rally_gap;

    if own > theirs + gap {
        rec.push(
            Category::Tactics,
            format!(
                "Strong advantage in long rallies ({:.1}% vs {:.1}%). Aim for extended exchanges.",
                own, theirs
            ),
        );
    } else if own < theirs - gap {
        rec.push(
            Category::Tactics,
            format!(
                "Weak in long rallies ({:.1}% vs {:.1}%). Avoid extended exchanges and play more aggressively.",
                own, theirs
            ),
        );
        rec.push(Category::TrainingFocus, "Fitness and endurance for long rallies");
    }
}

fn break_point_conversion(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    if ctx.opponent.is_none() {
        return;
    }
    let break_points = &ctx.player.break_points;
    if break_points.faced < ctx.thresholds.break_point_min_faced {
        return;
    }

    let pct = break_points.conversion_pct;
    let band = ctx.thresholds.break_point_conversion;

    if pct < band.low {
        rec.push(
            Category::MentalGame,
            format!(
                "Low break-point conversion ({:.1}%). Work on concentration at key moments.",
                pct
            ),
        );
    } else if pct > band.high {
        rec.push(
            Category::Strengths,
            format!(
                "High break-point conversion ({:.1}%). Composed under pressure at key moments.",
                pct
            ),
        );
    }
}

fn shot_distribution(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let total = ctx.player.total_shots();
    if total == 0 {
        return;
    }
    let thresholds = ctx.thresholds;

    for (shot, count) in &ctx.player.shot_types {
        let pct = share(*count, total);

        if pct > thresholds.shot_dominance_pct {
            rec.push(
                Category::Strengths,
                format!(
                    "Heavy use of the {} ({:.1}% of all shots). Keep building the game around it.",
                    shot.to_lowercase(),
                    pct
                ),
            );
        }

        let specialty = thresholds
            .specialty_shots
            .iter()
            .any(|s| s.eq_ignore_ascii_case(shot));
        if specialty && pct < thresholds.specialty_shot_floor_pct {
            rec.push(
                Category::Improvements,
                format!("Rare use of the {} ({:.1}%). Add more variety to the game.", shot.to_lowercase(), pct),
            );
            rec.push(Category::TrainingFocus, format!("Develop the {}", shot.to_lowercase()));
        }
    }
}

fn best_shot_bigram(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let thresholds = ctx.thresholds;

    let best = ctx
        .player
        .shot_bigrams
        .iter()
        .filter(|(_, t)| t.win_pct > thresholds.bigram_win_pct && t.total >= thresholds.bigram_min_count)
        .fold(None, |best: Option<(_, &Tally)>, (pair, tally)| match best {
            Some((_, top)) if top.win_pct >= tally.win_pct => best,
            _ => Some((pair, tally)),
        });

    if let Some((pair, tally)) = best {
        rec.push(
            Category::Tactics,
            format!(
                "The '{}' combination is especially effective ({:.1}% success). Use it more at key moments.",
                pair, tally.win_pct
            ),
        );
    }
}

fn key_shots(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    if ctx.detail != DetailLevel::Detailed {
        return;
    }
    let thresholds = ctx.thresholds;
    let eligible: Vec<(&String, &Tally)> = ctx
        .player
        .key_shots
        .iter()
        .filter(|(_, t)| t.total >= thresholds.key_shot_min_total)
        .collect();

    let best = eligible
        .iter()
        .filter(|(_, t)| t.win_pct > thresholds.key_shot.high)
        .fold(None, |best: Option<&(&String, &Tally)>, entry| match best {
            Some((_, top)) if top.win_pct >= entry.1.win_pct => best,
            _ => Some(entry),
        });
    if let Some((shot, tally)) = best {
        rec.push(
            Category::Strengths,
            format!(
                "Effective {} at key moments ({:.1}% success).",
                shot.to_lowercase(),
                tally.win_pct
            ),
        );
    }

    let worst = eligible
        .iter()
        .filter(|(_, t)| t.win_pct < thresholds.key_shot.low)
        .fold(None, |worst: Option<&(&String, &Tally)>, entry| match worst {
            Some((_, bottom)) if bottom.win_pct <= entry.1.win_pct => worst,
            _ => Some(entry),
        });
    if let Some((shot, tally)) = worst {
        rec.push(
            Category::Improvements,
            format!(
                "Low effectiveness of the {} at key moments ({:.1}% success). Work on its stability under pressure.",
                shot.to_lowercase(),
                tally.win_pct
            ),
        );
    }
}

fn second_serve_risk(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let thresholds = ctx.thresholds;

    if ctx.player.first_serve_pct() > thresholds.second_serve_risk_first_pct
        && ctx.player.second_serve_won_pct() < thresholds.second_serve_risk_won_pct
    {
        rec.push(
            Category::MentalGame,
            "Reliance on the first serve leaves the second serve exposed and can breed doubt. \
             Build confidence in the second serve.",
        );
    }
}

fn pressure_points(ctx: &RuleContext<'_>, rec: &mut Recommendation) {
    let pressure = &ctx.player.pressure_points;
    if pressure.total < ctx.thresholds.pressure_min_total {
        return;
    }
    let band = ctx.thresholds.pressure;

    if pressure.win_pct < band.low {
        rec.push(
            Category::MentalGame,
            format!(
                "Low share of pressure points won ({:.1}%). Work on mental resilience at key moments.",
                pressure.win_pct
            ),
        );
    } else if pressure.win_pct > band.high {
        rec.push(
            Category::Strengths,
            format!(
                "High share of pressure points won ({:.1}%). Strong composure.",
                pressure.win_pct
            ),
        );
    }
}
