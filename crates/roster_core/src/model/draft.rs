//! Form-side participant input and field validation.
//!
//! # Responsibility
//! - Hold raw form values before they become a `Participant`.
//! - Report every field-level problem in one pass.
//! - Build create-path and update-path records with correct identity rules.
//!
//! # Invariants
//! - The repository never calls `validate()`; callers own input quality.
//! - `apply_to` keeps the existing `id` and `created_at`.

use crate::model::participant::{Participant, Skill, TechnicalSkills};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NAME_MIN_CHARS: usize = 2;
const OUTCOME_MIN_CHARS: usize = 250;
const OUTCOME_MAX_CHARS: usize = 1000;
const RATING_MIN: i64 = 1;
const RATING_MAX: i64 = 10;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("valid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]{10,}$").expect("valid phone regex"));
static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://([a-z]{2,3}\.)?linkedin\.com/.*$").expect("valid linkedin regex")
});

/// Field-level validation failure for participant form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    NameRequired,
    NameTooShort { min_chars: usize },
    EmailRequired,
    EmailInvalid,
    PhoneInvalid,
    LinkedInInvalid,
    RatingInvalid { skill: Skill, value: String },
    TrainingOutcomeLength { chars: usize },
}

impl Display for ParticipantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name is required"),
            Self::NameTooShort { min_chars } => {
                write!(f, "name must be at least {min_chars} characters")
            }
            Self::EmailRequired => write!(f, "email is required"),
            Self::EmailInvalid => write!(f, "email is not a valid address"),
            Self::PhoneInvalid => write!(f, "phone number must contain at least 10 digits"),
            Self::LinkedInInvalid => write!(f, "linkedin profile must be a linkedin.com URL"),
            Self::RatingInvalid { skill, value } => {
                write!(f, "rating for {skill} must be 1-10, got `{value}`")
            }
            Self::TrainingOutcomeLength { chars } => write!(
                f,
                "training outcome must be {OUTCOME_MIN_CHARS}-{OUTCOME_MAX_CHARS} characters, got {chars}"
            ),
        }
    }
}

impl Error for ParticipantValidationError {}

/// Raw form values for one participant.
///
/// Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantDraft {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub linked_in_profile: String,
    pub github_id: String,
    pub technical_skills: TechnicalSkills,
    pub training_outcome: String,
}

impl ParticipantDraft {
    /// Pre-fills a draft from a persisted participant for edit mode.
    pub fn from_participant(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            email: participant.email.clone(),
            phone_number: participant.phone_number.clone().unwrap_or_default(),
            linked_in_profile: participant.linked_in_profile.clone().unwrap_or_default(),
            github_id: participant.github_id.clone().unwrap_or_default(),
            technical_skills: participant.technical_skills.clone().unwrap_or_default(),
            training_outcome: participant.training_outcome.clone().unwrap_or_default(),
        }
    }

    /// Validates every field and returns all failures in field order.
    pub fn validate(&self) -> Result<(), Vec<ParticipantValidationError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ParticipantValidationError::NameRequired);
        } else if name.chars().count() < NAME_MIN_CHARS {
            errors.push(ParticipantValidationError::NameTooShort {
                min_chars: NAME_MIN_CHARS,
            });
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ParticipantValidationError::EmailRequired);
        } else if !EMAIL_RE.is_match(email) {
            errors.push(ParticipantValidationError::EmailInvalid);
        }

        let phone = self.phone_number.trim();
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.push(ParticipantValidationError::PhoneInvalid);
        }

        let linkedin = self.linked_in_profile.trim();
        if !linkedin.is_empty() && !LINKEDIN_RE.is_match(linkedin) {
            errors.push(ParticipantValidationError::LinkedInInvalid);
        }

        for skill in Skill::ALL {
            let Some(value) = self.technical_skills.rating(skill) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let in_range = value
                .trim()
                .parse::<i64>()
                .is_ok_and(|rating| (RATING_MIN..=RATING_MAX).contains(&rating));
            if !in_range {
                errors.push(ParticipantValidationError::RatingInvalid {
                    skill,
                    value: value.to_string(),
                });
            }
        }

        let outcome_chars = self.training_outcome.trim().chars().count();
        if outcome_chars > 0 && !(OUTCOME_MIN_CHARS..=OUTCOME_MAX_CHARS).contains(&outcome_chars) {
            errors.push(ParticipantValidationError::TrainingOutcomeLength {
                chars: outcome_chars,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds a create-path participant with a fresh id and both timestamps at `now`.
    pub fn into_new_participant(self, now: DateTime<Utc>) -> Participant {
        let mut participant = Participant::new(self.name.trim(), self.email.trim(), now);
        self.fill_optional_fields(&mut participant);
        participant
    }

    /// Builds an update-path participant from `existing`.
    ///
    /// Keeps `id` and `created_at`; sets `updated_at` to `now`.
    pub fn apply_to(self, existing: &Participant, now: DateTime<Utc>) -> Participant {
        let mut participant = Participant::with_id(
            existing.id.clone(),
            self.name.trim(),
            self.email.trim(),
            existing.created_at,
        );
        participant.updated_at = now.max(existing.created_at);
        self.fill_optional_fields(&mut participant);
        participant
    }

    fn fill_optional_fields(self, participant: &mut Participant) {
        participant.phone_number = non_empty(self.phone_number);
        participant.linked_in_profile = non_empty(self.linked_in_profile);
        participant.github_id = non_empty(self.github_id);
        participant.training_outcome = non_empty(self.training_outcome);

        let mut skills = TechnicalSkills::default();
        for skill in Skill::ALL {
            let rating = self
                .technical_skills
                .rating(skill)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            skills.set_rating(skill, rating);
        }
        participant.technical_skills = if skills == TechnicalSkills::default() {
            None
        } else {
            Some(skills)
        };
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
