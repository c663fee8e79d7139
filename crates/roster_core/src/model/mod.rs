//! Roster domain model.
//!
//! # Responsibility
//! - Define the persisted participant record and skill vocabulary.
//! - Define form-side draft input and its validation rules.
//!
//! # Invariants
//! - Every participant is identified by a stable `ParticipantId`.
//! - Deletion removes the record; there are no tombstones.

pub mod draft;
pub mod participant;
