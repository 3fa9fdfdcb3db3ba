use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    serve, Form, Json, Router,
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::assets::Assets;
use crate::chat::{self, Exchange};
use crate::config::WebConfig;
use crate::error::ChatError;
use crate::generator::ResponseGenerator;
use crate::render::Renderer;
use crate::session::{Message, Role, SessionId, SessionStore, Transcript};

// Shared application state. Every handler names the session it touches.
#[derive(Clone)]
pub struct AppState {
    store: Arc<SessionStore>,
    generator: Arc<ResponseGenerator>,
    renderer: Arc<Renderer>,
    assets: Arc<Assets>,
}

impl AppState {
    pub fn new(store: SessionStore, assets: Assets, renderer: Renderer, generator: ResponseGenerator) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            renderer: Arc::new(renderer),
            assets: Arc::new(assets),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

/// Error returned from handlers; maps library errors onto HTTP statuses.
#[derive(Debug)]
pub struct WebError(ChatError);

impl From<ChatError> for WebError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.0 {
            ChatError::SessionNotFound(id) => {
                warn!(session = %id, "Request for unknown session");
                (StatusCode::NOT_FOUND, format!("Session {} not found", id)).into_response()
            }
            ChatError::EmptyPrompt => (StatusCode::BAD_REQUEST, "Prompt must not be empty").into_response(),
            err => {
                error!("Failed to handle request: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!("Internal Server Error: {}", err)),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub role: Role,
    pub content: String,
}

async fn index_handler() -> Redirect {
    let id = SessionId::new();
    Redirect::to(&format!("/session/{}", id))
}

async fn session_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Html<String>, WebError> {
    state.store.initialize(id).await;
    let transcript = state.store.all(id).await?;
    let html = state.renderer.render_chat(id, &transcript, &state.assets)?;
    Ok(Html(html))
}

async fn post_message_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Form(form): Form<PromptForm>,
) -> Result<Redirect, WebError> {
    // Blank submissions just re-render the page.
    if !form.prompt.trim().is_empty() {
        state.store.initialize(id).await;
        chat::exchange_in_store(&state.store, id, &*state.generator, &form.prompt).await?;
    }
    Ok(Redirect::to(&format!("/session/{}#latest", id)))
}

async fn end_session_handler(State(state): State<AppState>, Path(id): Path<SessionId>) -> Redirect {
    state.store.end(id).await;
    Redirect::to("/")
}

async fn api_messages_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Transcript>, WebError> {
    Ok(Json(state.store.all(id).await?))
}

async fn api_chat_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(body): Json<PromptForm>,
) -> Result<Json<Exchange>, WebError> {
    // Same rule as the HTML form: blank input never reaches the transcript.
    if body.prompt.trim().is_empty() {
        return Err(ChatError::EmptyPrompt.into());
    }
    state.store.initialize(id).await;
    let turn = chat::exchange_in_store(&state.store, id, &*state.generator, &body.prompt).await?;
    Ok(Json(turn))
}

async fn api_append_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(body): Json<AppendRequest>,
) -> Result<Json<Message>, WebError> {
    let message = state.store.append(id, body.role, body.content).await?;
    Ok(Json(message))
}

async fn healthz_handler() -> &'static str {
    "ok"
}

pub fn router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    let static_files_service = ServeDir::new(static_dir.as_ref()).not_found_service(tower::service_fn(
        |_req: Request| async {
            Ok::<_, std::convert::Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
        },
    ));

    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route("/session/:id", get(session_handler).post(post_message_handler))
        .route("/session/:id/end", post(end_session_handler))
        .route(
            "/api/sessions/:id/messages",
            get(api_messages_handler).post(api_chat_handler),
        )
        .route("/api/sessions/:id/append", post(api_append_handler))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Loads assets and templates, then serves until Ctrl-C.
pub async fn start_web_server(config: &WebConfig) -> Result<()> {
    let assets = Assets::load(&config.assets_dir)
        .await
        .context("Failed to load static assets")?;
    let renderer = Renderer::new(&config.templates_dir);
    renderer.check().context("Failed to initialize template engine")?;

    let store = SessionStore::with_idle_ttl(config.session_idle_ttl());
    info!("Idle sessions expire after {}s", config.session_idle_secs);
    let state = AppState::new(store, assets, renderer, ResponseGenerator::new());
    let app = router(state, &config.assets_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;
    info!("Web server listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
        // Without a signal handler, keep serving.
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, initiating shutdown...");
}
