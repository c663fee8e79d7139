//! Dashboard statistics derived from a collection snapshot.
//!
//! # Invariants
//! - Ratings that do not parse as integers are excluded from the average and
//!   the histogram, counted in `malformed_count`, and logged at warn.
//! - Parsed ratings outside 1..=10 count toward the average but not the
//!   histogram.
//! - Averages round half up.

use crate::model::participant::{Participant, Skill};
use log::warn;
use std::collections::BTreeMap;

/// Number of histogram buckets; bucket `i` counts rating `i + 1`.
pub const RATING_BUCKETS: usize = 10;

/// Statistics for one skill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillStats {
    /// Rounded mean of parsed ratings; 0 when nothing is rated.
    pub average: i64,
    pub distribution: [u32; RATING_BUCKETS],
    /// Ratings that parsed and contributed to the average.
    pub rated_count: usize,
    /// Non-empty ratings that failed to parse.
    pub malformed_count: usize,
}

impl SkillStats {
    /// Average as a 0-100 progress value.
    pub fn progress_percentage(&self) -> f64 {
        self.average as f64 / RATING_BUCKETS as f64 * 100.0
    }

    /// Count of participants who gave `rating` (1..=10).
    pub fn count_for(&self, rating: usize) -> u32 {
        match rating {
            1..=RATING_BUCKETS => self.distribution[rating - 1],
            _ => 0,
        }
    }
}

/// Aggregate view of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedStats {
    pub participant_count: usize,
    /// Participants with a non-empty rating for every skill.
    pub fully_rated_count: usize,
    pub skills: BTreeMap<Skill, SkillStats>,
}

impl DerivedStats {
    pub fn skill(&self, skill: Skill) -> &SkillStats {
        static EMPTY: SkillStats = SkillStats {
            average: 0,
            distribution: [0; RATING_BUCKETS],
            rated_count: 0,
            malformed_count: 0,
        };
        self.skills.get(&skill).unwrap_or(&EMPTY)
    }

    pub fn malformed_total(&self) -> usize {
        self.skills.values().map(|stats| stats.malformed_count).sum()
    }
}

/// Parses a rating string as a trimmed integer.
pub fn parse_rating(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Computes per-skill averages and histograms plus the fully-rated count.
pub fn aggregate(participants: &[Participant]) -> DerivedStats {
    let fully_rated_count = participants.iter().filter(|p| p.is_fully_rated()).count();

    let skills = Skill::ALL
        .iter()
        .map(|skill| (*skill, skill_stats(participants, *skill)))
        .collect::<BTreeMap<_, _>>();

    DerivedStats {
        participant_count: participants.len(),
        fully_rated_count,
        skills,
    }
}

fn skill_stats(participants: &[Participant], skill: Skill) -> SkillStats {
    let mut stats = SkillStats::default();
    let mut sum: i64 = 0;

    for raw in participants
        .iter()
        .filter_map(|p| p.rating(skill))
        .filter(|value| !value.is_empty())
    {
        let Some(rating) = parse_rating(raw) else {
            stats.malformed_count += 1;
            continue;
        };
        sum = sum.saturating_add(rating);
        stats.rated_count += 1;
        if (1..=RATING_BUCKETS as i64).contains(&rating) {
            stats.distribution[(rating - 1) as usize] += 1;
        }
    }

    if stats.malformed_count > 0 {
        warn!(
            "event=stats_aggregate module=query status=degraded skill={} malformed_ratings={}",
            skill, stats.malformed_count
        );
    }

    if stats.rated_count > 0 {
        stats.average = round_half_up(sum as f64 / stats.rated_count as f64);
    }
    stats
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::{parse_rating, round_half_up};

    #[test]
    fn round_half_up_matches_dashboard_rounding() {
        assert_eq!(round_half_up(6.5), 7);
        assert_eq!(round_half_up(6.49), 6);
        assert_eq!(round_half_up(-2.5), -2);
    }

    #[test]
    fn parse_rating_is_strict() {
        assert_eq!(parse_rating(" 7 "), Some(7));
        assert_eq!(parse_rating("7abc"), None);
        assert_eq!(parse_rating("abc"), None);
    }
}
