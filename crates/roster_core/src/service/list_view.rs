//! List view composition over collection snapshots.
//!
//! # Responsibility
//! - Hold search text and paging position for a participant table.
//! - Recompute filter -> page whenever the snapshot or search changes.
//!
//! # Invariants
//! - A new snapshot, search text or page size resets to page 0.
//! - Page size changes are limited to the configured options.
//! - `page_index` always addresses an existing page, or 0 when empty.

use crate::config::RosterConfig;
use crate::model::participant::Participant;
use crate::query::filter::filter;
use crate::query::paginate::{page_numbers, paginate, total_pages};
use chrono::{DateTime, Utc};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to users.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Filtered, paginated projection of the participant collection.
#[derive(Debug, Clone)]
pub struct ParticipantListView {
    search_text: String,
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    filtered: Vec<Participant>,
    page: Vec<Participant>,
}

impl ParticipantListView {
    /// Creates an empty view offering [`PAGE_SIZE_OPTIONS`]; a zero
    /// `page_size` falls back to the default.
    pub fn new(page_size: usize) -> Self {
        Self::with_options(page_size, &PAGE_SIZE_OPTIONS)
    }

    /// Creates an empty view whose page size may later change only to one of
    /// `page_size_options`.
    pub fn with_options(page_size: usize, page_size_options: &[usize]) -> Self {
        Self {
            search_text: String::new(),
            page_index: 0,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            page_size_options: page_size_options.to_vec(),
            filtered: Vec::new(),
            page: Vec::new(),
        }
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::with_options(config.default_page_size, &config.page_size_options)
    }

    /// Recomputes from a new snapshot and returns to the first page.
    pub fn apply_snapshot(&mut self, participants: &[Participant]) {
        self.filtered = filter(participants, &self.search_text);
        self.page_index = 0;
        self.repage();
    }

    /// Changes the search text; the caller passes the current snapshot.
    pub fn set_search_text(&mut self, participants: &[Participant], search_text: impl Into<String>) {
        self.search_text = search_text.into();
        self.apply_snapshot(participants);
    }

    /// Moves to `page_index`. Returns `false` and stays put when out of range.
    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        if page_index >= self.total_pages() {
            return false;
        }
        self.page_index = page_index;
        self.repage();
        true
    }

    /// Changes page size and returns to the first page.
    ///
    /// Returns `false` and keeps the current size when `page_size` is not
    /// one of the offered options.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !self.page_size_options.contains(&page_size) {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        self.repage();
        true
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered(&self) -> &[Participant] {
        &self.filtered
    }

    pub fn current_page_items(&self) -> &[Participant] {
        &self.page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        page_numbers(self.filtered.len(), self.page_size)
    }

    fn repage(&mut self) {
        self.page = paginate(&self.filtered, self.page_index, self.page_size);
    }
}

impl Default for ParticipantListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Renders elapsed time since the last refresh, e.g. `1m 5s ago`.
pub fn format_since(last_refresh: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_refresh) = last_refresh else {
        return "Never".to_string();
    };

    let seconds = (now - last_refresh).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{hours}h {}m ago", minutes % 60)
    } else if minutes > 0 {
        format!("{minutes}m {}s ago", seconds % 60)
    } else {
        format!("{seconds}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::format_since;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn format_since_picks_largest_unit() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_since(None, now), "Never");
        assert_eq!(format_since(Some(now - Duration::seconds(42)), now), "42s ago");
        assert_eq!(format_since(Some(now - Duration::seconds(65)), now), "1m 5s ago");
        assert_eq!(
            format_since(Some(now - Duration::minutes(125)), now),
            "2h 5m ago"
        );
    }
}
