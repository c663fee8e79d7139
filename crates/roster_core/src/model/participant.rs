//! Participant domain model.
//!
//! # Responsibility
//! - Define the persisted roster record and its skill ratings.
//! - Provide lifecycle helpers for create-path identity and timestamps.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `updated_at` is never earlier than `created_at`.
//! - Rating strings are stored verbatim; the store never re-validates them.
//!
//! # See also
//! - crate::model::draft for form-side validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque participant identifier.
///
/// Kept as a plain string so records written by other producers round-trip.
pub type ParticipantId = String;

/// The fixed set of self-rated technical skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Angular,
    Python,
    Css,
    Html,
    Mysql,
}

impl Skill {
    /// All skills in display and search-concatenation order.
    pub const ALL: [Skill; 5] = [
        Skill::Angular,
        Skill::Python,
        Skill::Css,
        Skill::Html,
        Skill::Mysql,
    ];

    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Angular => "angular",
            Skill::Python => "python",
            Skill::Css => "css",
            Skill::Html => "html",
            Skill::Mysql => "mysql",
        }
    }

    /// Parses a lowercase or mixed-case skill name.
    pub fn parse(value: &str) -> Option<Skill> {
        match value.trim().to_ascii_lowercase().as_str() {
            "angular" => Some(Skill::Angular),
            "python" => Some(Skill::Python),
            "css" => Some(Skill::Css),
            "html" => Some(Skill::Html),
            "mysql" => Some(Skill::Mysql),
            _ => None,
        }
    }
}

impl Display for Skill {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse proficiency bucket derived from a rating string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Buckets a rating: 9+ expert, 7+ advanced, 4+ intermediate.
    ///
    /// Unparseable ratings fall into `Beginner`.
    pub fn from_rating(rating: &str) -> SkillLevel {
        match rating.trim().parse::<i64>() {
            Ok(level) if level >= 9 => SkillLevel::Expert,
            Ok(level) if level >= 7 => SkillLevel::Advanced,
            Ok(level) if level >= 4 => SkillLevel::Intermediate,
            _ => SkillLevel::Beginner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

/// Rating strings keyed by skill.
///
/// A rating counts as present only when it is `Some` and non-empty, matching
/// how the form leaves unrated skills as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mysql: Option<String>,
}

impl TechnicalSkills {
    /// Returns the raw rating string for one skill.
    pub fn rating(&self, skill: Skill) -> Option<&str> {
        match skill {
            Skill::Angular => self.angular.as_deref(),
            Skill::Python => self.python.as_deref(),
            Skill::Css => self.css.as_deref(),
            Skill::Html => self.html.as_deref(),
            Skill::Mysql => self.mysql.as_deref(),
        }
    }

    pub fn set_rating(&mut self, skill: Skill, rating: Option<String>) {
        let slot = match skill {
            Skill::Angular => &mut self.angular,
            Skill::Python => &mut self.python,
            Skill::Css => &mut self.css,
            Skill::Html => &mut self.html,
            Skill::Mysql => &mut self.mysql,
        };
        *slot = rating;
    }

    /// Returns whether the skill carries a non-empty rating.
    pub fn is_rated(&self, skill: Skill) -> bool {
        self.rating(skill).is_some_and(|value| !value.is_empty())
    }

    /// Returns whether all five skills carry a non-empty rating.
    pub fn is_fully_rated(&self) -> bool {
        Skill::ALL.iter().all(|skill| self.is_rated(*skill))
    }

    /// Present, non-empty ratings in `Skill::ALL` order.
    pub fn rated_values(&self) -> Vec<&str> {
        Skill::ALL
            .iter()
            .filter_map(|skill| self.rating(*skill))
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Persisted roster record.
///
/// Serialized in camelCase to match the stored collection layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_skills: Option<TechnicalSkills>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_outcome: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Creates a participant with a generated id and both timestamps at `now`.
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, email, now)
    }

    /// Creates a participant with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: impl Into<ParticipantId>,
        name: impl Into<String>,
        email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone_number: None,
            linked_in_profile: None,
            github_id: None,
            technical_skills: None,
            training_outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the rating string for one skill, if any skills are recorded.
    pub fn rating(&self, skill: Skill) -> Option<&str> {
        self.technical_skills
            .as_ref()
            .and_then(|skills| skills.rating(skill))
    }

    /// Returns whether every skill has a non-empty rating.
    pub fn is_fully_rated(&self) -> bool {
        self.technical_skills
            .as_ref()
            .is_some_and(TechnicalSkills::is_fully_rated)
    }
}
