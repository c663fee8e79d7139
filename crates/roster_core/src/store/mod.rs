//! Persisted collection adapter.
//!
//! # Responsibility
//! - Map the participant collection onto one durable key.
//! - Absorb read failures; surface write failures.

pub mod participant_store;
