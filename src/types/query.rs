use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::SessionId;

/// Body of `POST /api/health/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question exactly as typed by the user.
    pub question: String,

    /// The session identifier, used by the backend for statistics.
    pub user_id: String,
}

impl QueryRequest {
    /// Create a request for `question` on behalf of `session`.
    pub fn new(question: impl Into<String>, session: &SessionId) -> Self {
        Self {
            question: question.into(),
            user_id: session.to_string(),
        }
    }
}

/// Successful answer from `POST /api/health/query`.
///
/// Only `answer` is required; the backend also reports the id it stored the
/// exchange under and when it answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The assistant's answer, plain text.
    pub answer: String,

    /// Identifier of the stored exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,

    /// When the backend produced the answer.
    #[serde(
        default,
        with = "crate::utils::time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
}

impl QueryResponse {
    /// Create a response carrying only an answer.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            query_id: None,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};
    use time::macros::datetime;

    #[test]
    fn request_wire_format() {
        let request = QueryRequest {
            question: "What are the symptoms of flu?".to_string(),
            user_id: "user_1_abc".to_string(),
        };
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "question": "What are the symptoms of flu?",
                "user_id": "user_1_abc"
            })
        );
    }

    #[test]
    fn response_answer_only() {
        let response: QueryResponse =
            serde_json::from_value(json!({"answer": "Common flu symptoms include fever, cough..."}))
                .unwrap();
        assert_eq!(response, QueryResponse::new("Common flu symptoms include fever, cough..."));
    }

    #[test]
    fn response_full() {
        let response: QueryResponse = serde_json::from_value(json!({
            "answer": "Drink water.",
            "query_id": "8d7e",
            "timestamp": "2024-05-01T09:00:00.5+00:00"
        }))
        .unwrap();
        assert_eq!(response.query_id.as_deref(), Some("8d7e"));
        assert_eq!(response.timestamp, Some(datetime!(2024-05-01 09:00:00.5 UTC)));
    }

    #[test]
    fn response_without_answer_is_rejected() {
        let response = serde_json::from_value::<QueryResponse>(json!({"detail": "oops"}));
        assert!(response.is_err());
    }
}
