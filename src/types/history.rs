use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Default page size for history requests.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// One stored exchange returned by `GET /api/health/history/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier of the stored exchange.
    pub id: String,
    /// Session identifier the exchange belongs to.
    pub user_id: String,
    /// The question that was asked.
    pub question: String,
    /// The answer that was given.
    pub answer: String,
    /// When the exchange was stored.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,
    /// Backend-assigned topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A page of history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// The exchanges on this page.
    pub messages: Vec<HistoryEntry>,
    /// Total exchanges stored for the session.
    pub total: u64,
}

/// Paging parameters for history requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryParams {
    /// Maximum entries to return.
    pub limit: u32,
    /// Entries to skip from the newest.
    pub skip: u32,
}

impl HistoryParams {
    /// Parameters for the first `limit` entries.
    pub fn first(limit: u32) -> Self {
        Self { limit, skip: 0 }
    }
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self::first(DEFAULT_HISTORY_LIMIT)
    }
}

/// Banner returned by `GET /api/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Human-readable service name.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn history_page_with_naive_timestamps() {
        let page: HistoryPage = serde_json::from_value(json!({
            "messages": [{
                "id": "q1",
                "user_id": "user_1_abc",
                "question": "How much sleep do I need?",
                "answer": "Most adults need 7-9 hours.",
                "timestamp": "2024-02-02T08:00:00.000123",
                "category": "general_health"
            }],
            "total": 1
        }))
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.messages[0].timestamp, datetime!(2024-02-02 08:00:00.000123 UTC));
        assert_eq!(page.messages[0].category.as_deref(), Some("general_health"));
    }

    #[test]
    fn default_params() {
        assert_eq!(HistoryParams::default(), HistoryParams { limit: 20, skip: 0 });
    }
}
