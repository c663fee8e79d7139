//! Pure query and aggregation functions over collection snapshots.
//!
//! # Responsibility
//! - Search filtering and page slicing for list views.
//! - Per-skill statistics for the dashboard.
//!
//! # Invariants
//! - No function here performs I/O or keeps state between calls.
//! - Input order is preserved by every filtering/slicing function.

pub mod filter;
pub mod paginate;
pub mod stats;
