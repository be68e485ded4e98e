use crate::server::{ApiError, AppContext};
use crate::session::{Session, SessionSnapshot};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use segcut_timeline::Command;
use serde::Deserialize;
use std::path::PathBuf;

pub fn session_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/session",
            get(get_session).post(open_session).delete(close_session),
        )
        .route("/session/commands", post(apply_commands))
}

#[derive(Deserialize)]
struct OpenSessionRequest {
    path: Option<PathBuf>,
    /// Skips probing when given.
    duration: Option<f64>,
}

async fn open_session(
    State(ctx): State<AppContext>,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let settings = ctx
        .config
        .segments
        .engine_settings()
        .map_err(|e| ApiError::internal(format!("Invalid segment settings: {}", e)))?;

    let session = match (payload.path, payload.duration) {
        (path, Some(duration)) => Session::with_duration(path, duration, settings)?,
        (Some(path), None) => {
            let tools = ctx.tools.clone();
            tokio::task::spawn_blocking(move || Session::open(&tools, &path, settings)).await??
        }
        (None, None) => return Err(ApiError::bad_request("Either path or duration is required")),
    };

    Ok(Json(ctx.sessions.open(session)))
}

async fn get_session(State(ctx): State<AppContext>) -> Result<Json<SessionSnapshot>, ApiError> {
    ctx.sessions
        .snapshot()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no session is open"))
}

async fn close_session(State(ctx): State<AppContext>) -> StatusCode {
    if ctx.sessions.close() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandBatch {
    One(Command),
    Many(Vec<Command>),
}

async fn apply_commands(
    State(ctx): State<AppContext>,
    Json(batch): Json<CommandBatch>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let commands = match batch {
        CommandBatch::One(command) => vec![command],
        CommandBatch::Many(commands) => commands,
    };

    Ok(Json(ctx.sessions.apply(&commands)?))
}
