use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Counters reported by `GET /api/health/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of questions the backend has answered.
    pub total_queries: u64,

    /// Number of distinct session identifiers seen.
    pub unique_users: u64,

    /// Questions answered in the last day.
    pub recent_queries_24h: u64,

    /// Backend status string, e.g. `active`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// The client's copy of the backend counters.
///
/// Overwritten on every successful refresh.  A failed refresh keeps the
/// previous counters and marks the snapshot stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    stats: UsageStats,
    fetched_at: Option<OffsetDateTime>,
    stale: bool,
}

impl StatsSnapshot {
    /// The most recent counters, all zero before the first fetch.
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    /// When the counters were last fetched successfully.
    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    /// True when the most recent refresh failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replace the counters with a freshly fetched value.
    pub fn update(&mut self, stats: UsageStats) {
        self.stats = stats;
        self.fetched_at = Some(OffsetDateTime::now_utc());
        self.stale = false;
    }

    /// Record a failed refresh.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }
}
