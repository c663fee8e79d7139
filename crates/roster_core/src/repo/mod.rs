//! Repository layer over the persisted participant collection.
//!
//! # Responsibility
//! - Own the cached collection and its change stream.
//! - Isolate whole-collection persistence from list/dashboard/form callers.
//!
//! # Invariants
//! - Mutations return an explicit `RepoResult`; expected failures never panic.

pub mod participant_repo;
