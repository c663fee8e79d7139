//! Dashboard summary built from a fresh collection read.

use crate::clock::Clock;
use crate::model::participant::Skill;
use crate::query::stats::{aggregate, DerivedStats, SkillStats};
use crate::repo::participant_repo::ParticipantRepository;
use crate::storage::KeyValueStore;

/// Statistics shown on the roster dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub stats: DerivedStats,
}

impl DashboardSummary {
    /// Reloads the collection through `repo.get_all()` and aggregates it.
    pub fn load<S: KeyValueStore, C: Clock>(repo: &ParticipantRepository<S, C>) -> Self {
        let participants = repo.get_all();
        Self {
            stats: aggregate(&participants),
        }
    }

    pub fn participant_count(&self) -> usize {
        self.stats.participant_count
    }

    pub fn fully_rated_count(&self) -> usize {
        self.stats.fully_rated_count
    }

    pub fn skill(&self, skill: Skill) -> &SkillStats {
        self.stats.skill(skill)
    }
}
