// Public modules
pub mod history;
pub mod message;
pub mod query;
pub mod session_id;
pub mod usage_stats;

// Re-exports
pub use history::{ApiInfo, DEFAULT_HISTORY_LIMIT, HistoryEntry, HistoryPage, HistoryParams};
pub use message::{Message, Role};
pub use query::{QueryRequest, QueryResponse};
pub use session_id::SessionId;
pub use usage_stats::{StatsSnapshot, UsageStats};
