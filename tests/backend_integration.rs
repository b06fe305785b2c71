//! Integration tests that drive the client and the chat session against an
//! in-process backend speaking the same HTTP API as the real service.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use healthchat::chat::{APOLOGY_MESSAGE, ChatConfig, ChatSession, SubmitOutcome};
use healthchat::render::Renderer;
use healthchat::{
    Backend, HealthClient, HistoryPage, HistoryParams, Message, QueryRequest, Role, SessionId,
    StatsSnapshot,
};

const FLU_ANSWER: &str = "Common flu symptoms include fever, cough...";

#[derive(Default)]
struct MockBackend {
    fail_queries: bool,
    broken_stats: bool,
    stored: Mutex<Vec<Value>>,
    stats_calls: Mutex<usize>,
}

impl MockBackend {
    fn stats_calls(&self) -> usize {
        *self.stats_calls.lock().unwrap()
    }
}

async fn root() -> Json<Value> {
    Json(json!({"message": "AI-Powered Public Health Chatbot API"}))
}

async fn stats(State(state): State<Arc<MockBackend>>) -> (StatusCode, String) {
    *state.stats_calls.lock().unwrap() += 1;
    if state.broken_stats {
        return (StatusCode::OK, "<html>gateway</html>".to_string());
    }
    let stored = state.stored.lock().unwrap();
    let users: HashSet<&str> = stored
        .iter()
        .filter_map(|q| q["user_id"].as_str())
        .collect();
    let body = json!({
        "total_queries": stored.len(),
        "unique_users": users.len(),
        "recent_queries_24h": stored.len(),
        "status": "active"
    });
    (StatusCode::OK, body.to_string())
}

async fn query(
    State(state): State<Arc<MockBackend>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let question = body["question"].as_str().unwrap_or_default().trim().to_string();
    if question.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Question cannot be empty"})),
        ));
    }
    if state.fail_queries {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Sorry, I encountered an error processing your health question. Please try again."})),
        ));
    }
    let answer = if question.to_lowercase().contains("flu") {
        FLU_ANSWER.to_string()
    } else {
        format!("General guidance about: {question}")
    };
    let mut stored = state.stored.lock().unwrap();
    let id = format!("q{}", stored.len() + 1);
    stored.push(json!({
        "id": id,
        "user_id": body["user_id"].as_str().unwrap_or("anonymous"),
        "question": question,
        "answer": answer,
        "timestamp": "2024-04-01T10:00:00.123456",
        "category": "general_health"
    }));
    Ok(Json(json!({
        "answer": answer,
        "query_id": id,
        "timestamp": "2024-04-01T10:00:00.123456+00:00"
    })))
}

async fn history(
    State(state): State<Arc<MockBackend>>,
    Path(user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);
    let stored = state.stored.lock().unwrap();
    let mine: Vec<Value> = stored
        .iter()
        .filter(|q| q["user_id"] == user_id.as_str())
        .cloned()
        .collect();
    let total = mine.len();
    let page: Vec<Value> = mine.into_iter().rev().take(limit).collect();
    Json(json!({"messages": page, "total": total}))
}

async fn serve(state: Arc<MockBackend>) -> String {
    let app = Router::new()
        .route("/api/", get(root))
        .route("/api/health/stats", get(stats))
        .route("/api/health/query", post(query))
        .route("/api/health/history/{user_id}", get(history))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Default)]
struct NullRenderer {
    messages: Vec<Message>,
}

impl Renderer for NullRenderer {
    fn print_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }
    fn start_typing(&mut self) {}
    fn finish_typing(&mut self) {}
    fn print_stats(&mut self, _: &StatsSnapshot) {}
    fn print_quick_questions(&mut self, _: &[String]) {}
    fn print_history(&mut self, _: &HistoryPage) {}
    fn print_error(&mut self, _: &str) {}
    fn print_info(&mut self, _: &str) {}
}

fn config_for(base_url: &str) -> ChatConfig {
    ChatConfig::new().with_base_url(base_url).without_color()
}

#[tokio::test]
async fn ping_and_stats() {
    let state = Arc::new(MockBackend::default());
    let base_url = serve(state.clone()).await;
    let client = HealthClient::new(Some(base_url)).unwrap();

    let info = client.ping().await.unwrap();
    assert_eq!(info.message, "AI-Powered Public Health Chatbot API");

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.status.as_deref(), Some("active"));
    assert_eq!(state.stats_calls(), 1);
}

#[tokio::test]
async fn flu_question_round_trip() {
    let state = Arc::new(MockBackend::default());
    let base_url = serve(state.clone()).await;
    let config = config_for(&base_url);
    let client = HealthClient::new(Some(config.base_url.clone())).unwrap();

    let mut session = ChatSession::start(client, &config).await;
    assert_eq!(state.stats_calls(), 1);
    assert_eq!(session.stats().stats().total_queries, 0);
    assert_eq!(session.messages()[0].content, config.welcome_message);

    let mut renderer = NullRenderer::default();
    let outcome = session
        .submit("What are the symptoms of flu?", &mut renderer)
        .await;

    assert_eq!(outcome, SubmitOutcome::Answered);
    assert!(!session.is_pending());
    assert_eq!(session.message_count(), 3);
    assert_eq!(session.messages()[1].role, Role::User);
    assert_eq!(session.messages()[1].content, "What are the symptoms of flu?");
    assert_eq!(session.last_message().unwrap().content, FLU_ANSWER);
    assert_eq!(renderer.messages.len(), 1);

    assert_eq!(state.stats_calls(), 2);
    assert_eq!(session.stats().stats().total_queries, 1);
    assert_eq!(session.stats().stats().unique_users, 1);

    let stored = state.stored.lock().unwrap();
    assert_eq!(stored[0]["user_id"], session.session_id().as_str());
}

#[tokio::test]
async fn failed_submission_shows_apology_and_skips_stats() {
    let state = Arc::new(MockBackend {
        fail_queries: true,
        ..MockBackend::default()
    });
    let base_url = serve(state.clone()).await;
    let config = config_for(&base_url);
    let client = HealthClient::new(Some(config.base_url.clone())).unwrap();

    let mut session = ChatSession::start(client, &config).await;
    let mut renderer = NullRenderer::default();
    let outcome = session.submit("Is my headache serious?", &mut renderer).await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(!session.is_pending());
    assert_eq!(session.message_count(), 3);
    let last = session.last_message().unwrap();
    assert_eq!(last.role, Role::Bot);
    assert_eq!(last.content, APOLOGY_MESSAGE);
    assert_eq!(state.stats_calls(), 1);
}

#[tokio::test]
async fn error_status_carries_detail() {
    let state = Arc::new(MockBackend::default());
    let base_url = serve(state).await;
    let client = HealthClient::new(Some(base_url)).unwrap();
    let session_id = SessionId::generate();

    let err = client
        .query(&QueryRequest::new("   ", &session_id))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(422));
    assert!(err.to_string().contains("Question cannot be empty"));
}

#[tokio::test]
async fn non_json_stats_leave_snapshot_alone() {
    let state = Arc::new(MockBackend {
        broken_stats: true,
        ..MockBackend::default()
    });
    let base_url = serve(state.clone()).await;
    let config = config_for(&base_url);
    let client = HealthClient::new(Some(config.base_url.clone())).unwrap();

    assert!(client.stats().await.is_err());

    let mut session = ChatSession::start(client, &config).await;
    assert_eq!(session.stats().stats().total_queries, 0);
    assert!(session.stats().fetched_at().is_none());
    assert!(session.stats().is_stale());

    let mut renderer = NullRenderer::default();
    let outcome = session
        .submit("What are the symptoms of flu?", &mut renderer)
        .await;
    assert_eq!(outcome, SubmitOutcome::Answered);
    assert_eq!(session.last_message().unwrap().content, FLU_ANSWER);
    assert_eq!(state.stats_calls(), 3);
}

#[tokio::test]
async fn history_lists_session_questions() {
    let state = Arc::new(MockBackend::default());
    let base_url = serve(state).await;
    let config = config_for(&base_url);
    let client = HealthClient::new(Some(config.base_url.clone())).unwrap();

    let mut session = ChatSession::new(client, &config);
    let mut renderer = NullRenderer::default();
    session.submit("How much water should I drink?", &mut renderer).await;
    session.submit("What are the symptoms of flu?", &mut renderer).await;

    let page = session.history(HistoryParams::first(1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].question, "What are the symptoms of flu?");
    assert_eq!(page.messages[0].user_id, session.session_id().as_str());
}

#[tokio::test]
async fn unreachable_backend_is_a_failed_submission() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(&format!("http://{addr}"));
    let client = HealthClient::new(Some(config.base_url.clone())).unwrap();
    assert!(client.stats().await.unwrap_err().is_connection());
    let mut session = ChatSession::start(client, &config).await;
    assert!(session.stats().is_stale());

    let mut renderer = NullRenderer::default();
    let outcome = session.submit("Hello?", &mut renderer).await;
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.last_message().unwrap().content, APOLOGY_MESSAGE);
    assert!(!session.is_pending());
}
