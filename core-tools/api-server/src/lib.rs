//! API Server
//!
//! HTTP front of the Haven engine. Validates payloads, dispatches to the handles
//! in [`CoreContext`], and maps results onto the JSON contract below. It holds no
//! business logic of its own.
//!
//! # Endpoints
//!
//! - POST /api/mood - Record a mood entry (requires `id` and `date`)
//! - GET /api/mood - All mood entries, newest first
//! - POST /api/chat/:conversation_id - Record a chat message (requires `text` and `sender`)
//! - GET /api/chat/:conversation_id - Conversation history, oldest first
//! - POST /api/completion - Ask the model; body `{prompt, systemPrompt}`
//! - GET /api/music - Relaxation tracks, optional `?category=`
//! - GET /api/status - Server status

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use sdk::core_context::CoreContext;
use sdk::errors::EngineError;
use sdk::types::{
    ChatMessage, CompletionReply, CompletionRequest, MoodEntry, MusicTrack, TrackCategory,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod error;

pub use error::ApiError;

/// Listener settings
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Address to bind; port 0 picks a free port
    pub addr: SocketAddr,

    /// Attach a permissive CORS layer
    pub cors: bool,
}

/// State shared across handlers
#[derive(Clone)]
struct ServerState {
    ctx: CoreContext,
}

/// Query string of `GET /api/music`
#[derive(Debug, Deserialize)]
struct MusicQuery {
    category: Option<String>,
}

/// Build the router over the given handles
pub fn router(ctx: CoreContext, cors: bool) -> Router {
    let app = Router::new()
        .route("/api/mood", post(record_mood_handler).get(list_mood_handler))
        .route(
            "/api/chat/:conversation_id",
            post(record_chat_handler).get(chat_history_handler),
        )
        .route("/api/completion", post(completion_handler))
        .route("/api/music", get(music_handler))
        .route("/api/status", get(status_handler))
        .with_state(ServerState { ctx })
        .layer(TraceLayer::new_for_http());

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// API server
pub struct ApiServer {
    ctx: CoreContext,
    options: ServerOptions,
    addr: Option<SocketAddr>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Create a new ApiServer instance
    pub fn new(ctx: CoreContext, options: ServerOptions) -> Self {
        Self {
            ctx,
            options,
            addr: None,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Bind the listener and start serving in a background task.
    ///
    /// Returns the bound address. Calling `start` on a running server returns
    /// the existing address.
    pub async fn start(&mut self) -> Result<SocketAddr, EngineError> {
        if let Some(addr) = self.addr {
            return Ok(addr);
        }

        let listener = tokio::net::TcpListener::bind(self.options.addr)
            .await
            .map_err(|e| {
                EngineError::Network(format!("Failed to bind to {}: {}", self.options.addr, e))
            })?;

        let addr = listener
            .local_addr()
            .map_err(|e| EngineError::Network(format!("Failed to get local address: {}", e)))?;

        let app = router(self.ctx.clone(), self.options.cors);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            tracing::info!("API server listening on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.await.ok();
                    tracing::info!("API server shutting down gracefully");
                })
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("API server error: {}", e);
                });
        });

        self.addr = Some(addr);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);

        Ok(addr)
    }

    /// Address the server is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Signal shutdown and wait for in-flight requests to finish
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).ok();
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {}", e);
            }
            tracing::info!("API server stopped");
        }
        self.addr = None;
    }
}

/// A body that is missing or not valid JSON is treated as an absent entry
fn body_or_null(payload: Result<Json<Value>, JsonRejection>) -> Value {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!("Unreadable JSON body: {}", rejection);
            Value::Null
        }
    }
}

/// POST /api/mood
async fn record_mood_handler(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let entry = MoodEntry::new(body_or_null(payload));
    state.ctx.mood.record(entry)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/mood
async fn list_mood_handler(State(state): State<ServerState>) -> Json<Vec<MoodEntry>> {
    Json(state.ctx.mood.all())
}

/// POST /api/chat/:conversation_id
async fn record_chat_handler(
    State(state): State<ServerState>,
    Path(conversation_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let message = ChatMessage::new(body_or_null(payload));
    state.ctx.chat.record(&conversation_id, message)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/chat/:conversation_id
async fn chat_history_handler(
    State(state): State<ServerState>,
    Path(conversation_id): Path<String>,
) -> Json<Vec<ChatMessage>> {
    Json(state.ctx.chat.history(&conversation_id))
}

/// POST /api/completion
async fn completion_handler(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CompletionReply>, ApiError> {
    let request = CompletionRequest::from_value(&body_or_null(payload));

    let response = state
        .ctx
        .completion
        .complete(&request.prompt, &request.system_prompt)
        .await?;

    Ok(Json(CompletionReply { response }))
}

/// GET /api/music
async fn music_handler(
    State(state): State<ServerState>,
    Query(query): Query<MusicQuery>,
) -> Json<Vec<MusicTrack>> {
    let tracks = match query.category.as_deref() {
        None => state.ctx.music.tracks(None),
        Some(name) => match TrackCategory::parse(name) {
            Some(category) => state.ctx.music.tracks(Some(category)),
            None => Vec::new(),
        },
    };
    Json(tracks)
}

/// GET /api/status
async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sdk::core_context::{
        ChatHandle, ChatHandleImpl, CompletionHandle, CompletionHandleImpl, MoodHandle,
        MoodHandleImpl, MusicHandle, MusicHandleImpl,
    };
    use sdk::errors::{GatewayError, ValidationError};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingMood(Mutex<Vec<MoodEntry>>);

    impl MoodHandleImpl for RecordingMood {
        fn record(&self, entry: MoodEntry) -> Result<(), ValidationError> {
            entry.validate()?;
            self.0.lock().unwrap().insert(0, entry);
            Ok(())
        }

        fn all(&self) -> Vec<MoodEntry> {
            self.0.lock().unwrap().clone()
        }
    }

    struct EmptyChat;

    impl ChatHandleImpl for EmptyChat {
        fn record(&self, _conversation: &str, message: ChatMessage) -> Result<(), ValidationError> {
            message.validate()
        }

        fn history(&self, _conversation: &str) -> Vec<ChatMessage> {
            Vec::new()
        }
    }

    struct EchoCompletion;

    #[async_trait::async_trait]
    impl CompletionHandleImpl for EchoCompletion {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, GatewayError> {
            Ok(prompt.to_uppercase())
        }
    }

    struct NoMusic;

    impl MusicHandleImpl for NoMusic {
        fn tracks(&self, _category: Option<TrackCategory>) -> Vec<MusicTrack> {
            Vec::new()
        }
    }

    fn test_router() -> Router {
        let ctx = CoreContext::new(
            MoodHandle::new(Arc::new(RecordingMood::default())),
            ChatHandle::new(Arc::new(EmptyChat)),
            CompletionHandle::new(Arc::new(EchoCompletion)),
            MusicHandle::new(Arc::new(NoMusic)),
        );
        router(ctx, true)
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_mood_body_is_invalid_entry() {
        let resp = test_router()
            .oneshot(post_json("/api/mood", "{not json"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "Invalid mood entry"}));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_invalid_message() {
        let req = Request::post("/api/chat/alex")
            .body(Body::from(r#"{"text":"hi","sender":"user"}"#))
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "Invalid chat message"}));
    }

    #[tokio::test]
    async fn test_completion_with_unreadable_body_forwards_empty_prompt() {
        let resp = test_router()
            .oneshot(post_json("/api/completion", "[]"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"response": ""}));
    }

    #[tokio::test]
    async fn test_completion_keeps_prompt_when_other_field_is_not_a_string() {
        for body in [
            r#"{"prompt":"I feel anxious","systemPrompt":null}"#,
            r#"{"prompt":"I feel anxious","systemPrompt":7}"#,
            r#"{"prompt":"I feel anxious"}"#,
        ] {
            let resp = test_router()
                .oneshot(post_json("/api/completion", body))
                .await
                .unwrap();

            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_json(resp).await, json!({"response": "I FEEL ANXIOUS"}));
        }
    }

    #[tokio::test]
    async fn test_status() {
        let resp = test_router()
            .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "running");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/mood")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();

        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }
}
