//! Core roster logic: participant persistence, change stream, search and stats.
//! Form, list and dashboard hosts call into this crate; it owns every invariant.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod publish;
pub mod query;
pub mod repo;
pub mod service;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RosterConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::{ParticipantDraft, ParticipantValidationError};
pub use model::participant::{Participant, ParticipantId, Skill, SkillLevel, TechnicalSkills};
pub use publish::{Publisher, SubscriptionId};
pub use query::filter::{filter, skills_text};
pub use query::paginate::{page_numbers, paginate, total_pages};
pub use query::stats::{aggregate, parse_rating, DerivedStats, SkillStats};
pub use repo::participant_repo::{
    ParticipantRepository, ParticipantSnapshot, RepoError, RepoResult, SaveOutcome,
};
pub use service::auto_refresh::AutoRefresh;
pub use service::dashboard::DashboardSummary;
pub use service::list_view::{format_since, ParticipantListView};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use store::participant_store::{ParticipantStore, StoreError, StoreResult};

/// Minimal health-check API for host integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
