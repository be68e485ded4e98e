use crate::server::{ApiError, AppContext};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use segcut_av::{AudioFile, SplitReport};
use segcut_timeline::CutSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/output-folder", get(output_folder))
        .route("/file-info", post(file_info))
        .route("/split", post(split_file))
        .route("/list-mp3-files", post(list_mp3_files))
        .route("/join-mp3", post(join_mp3))
        .route("/tools", get(get_tools))
}

#[derive(Serialize)]
struct PathResponse {
    path: PathBuf,
}

async fn output_folder(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(PathResponse {
        path: ctx.config.export.resolved_output_dir(),
    })
}

#[derive(Deserialize)]
struct FileInfoRequest {
    path: Option<PathBuf>,
}

#[derive(Serialize)]
struct FileInfoResponse {
    duration: f64,
}

async fn file_info(
    State(ctx): State<AppContext>,
    Json(payload): Json<FileInfoRequest>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    let path = payload
        .path
        .filter(|p| p.exists())
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    let tools = ctx.tools.clone();
    let duration =
        tokio::task::spawn_blocking(move || segcut_av::probe_duration(&tools, &path)).await??;

    Ok(Json(FileInfoResponse { duration }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SplitSegment {
    start: f64,
    end: f64,
    output_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SplitRequest {
    input_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    /// Taken from the open session when omitted.
    segments: Option<Vec<SplitSegment>>,
    #[serde(default)]
    create_zip: bool,
}

async fn split_file(
    State(ctx): State<AppContext>,
    Json(payload): Json<SplitRequest>,
) -> Result<Json<SplitReport>, ApiError> {
    let session = ctx.sessions.snapshot();

    let input = payload
        .input_file
        .or_else(|| session.as_ref().and_then(|s| s.source.clone()))
        .filter(|p| p.is_file())
        .ok_or_else(|| ApiError::bad_request("Input file not found"))?;

    let output_dir = payload
        .output_dir
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| ctx.config.export.resolved_output_dir());

    let cuts: Vec<CutSpec> = match payload.segments {
        Some(segments) => segments
            .into_iter()
            .map(|s| CutSpec {
                start_seconds: s.start,
                end_seconds: s.end,
                output_name: s.output_name,
            })
            .collect(),
        None => session
            .map(|s| {
                s.segments
                    .iter()
                    .map(|seg| CutSpec {
                        start_seconds: seg.start,
                        end_seconds: seg.end,
                        output_name: seg.output_name.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default(),
    };
    if cuts.is_empty() {
        return Err(ApiError::bad_request("No segments defined"));
    }

    let tools = ctx.tools.clone();
    let options = ctx.config.export.split_options(payload.create_zip);
    let report = tokio::task::spawn_blocking(move || {
        segcut_av::split(&tools, &input, &output_dir, &cuts, &options)
    })
    .await??;

    Ok(Json(report))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest {
    folder_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ListResponse {
    files: Vec<AudioFile>,
}

async fn list_mp3_files(
    State(ctx): State<AppContext>,
    Json(payload): Json<ListRequest>,
) -> Result<Json<ListResponse>, ApiError> {
    let folder = payload
        .folder_path
        .filter(|p| p.exists())
        .ok_or_else(|| ApiError::not_found("Folder not found"))?;
    if !folder.is_dir() {
        return Err(ApiError::bad_request("Path is not a directory"));
    }

    let tools = ctx.tools.clone();
    let files =
        tokio::task::spawn_blocking(move || segcut_av::list_audio_files(&tools, &folder)).await??;

    Ok(Json(ListResponse { files }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest {
    #[serde(default)]
    file_paths: Vec<PathBuf>,
    output_path: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinResponse {
    success: bool,
    output_path: PathBuf,
    message: String,
}

async fn join_mp3(
    State(ctx): State<AppContext>,
    Json(payload): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    if payload.file_paths.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }
    let output = payload
        .output_path
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ApiError::bad_request("Output path not specified"))?;
    if let Some(missing) = payload.file_paths.iter().find(|p| !p.exists()) {
        return Err(ApiError::not_found(format!(
            "File not found: {}",
            missing.display()
        )));
    }

    let tools = ctx.tools.clone();
    let files = payload.file_paths;
    let count = files.len();
    let output_path =
        tokio::task::spawn_blocking(move || segcut_av::join(&tools, &files, &output)).await??;

    Ok(Json(JoinResponse {
        success: true,
        output_path,
        message: format!("Successfully joined {} files", count),
    }))
}

async fn get_tools(State(ctx): State<AppContext>) -> impl IntoResponse {
    let tools = ctx.tools.clone();
    match tokio::task::spawn_blocking(move || tools.check()).await {
        Ok(infos) => Json(infos).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
