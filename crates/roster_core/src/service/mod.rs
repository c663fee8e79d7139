//! Use-case services composed over the repository and query engine.
//!
//! # Responsibility
//! - Give list and dashboard hosts ready-made projections.
//! - Own the optional periodic reload task.

pub mod auto_refresh;
pub mod dashboard;
pub mod list_view;
