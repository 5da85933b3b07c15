//! HTTP handler for browser media uploads.
//!
//! `POST /upload-media` receives a multipart form from the uploader page,
//! stages each file into a request-scoped temp workspace, relays the batch to
//! the staging channel, and posts the formatted URL listing to the result
//! channel. The workspace is released on every path out of the handler;
//! cleanup failures are logged but never fail a request that otherwise
//! succeeded.

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::io::AsyncWriteExt;

use crate::{
    error::{upload::UploadError, AppError},
    model::{
        api::UploadResponseDto,
        upload::{MediaFile, UploadRequest},
    },
    service::{format::format_listing, relay::MediaRelay, workspace::Workspace},
    state::AppState,
};

/// Handles `POST /upload-media`.
///
/// # Returns
/// - `200 {"success": true, "files": N}` - All files relayed and the listing
///   posted to the result channel
/// - `400` - Missing/invalid channel IDs, no files, or bad multipart data
/// - `413` - A file exceeded the configured size cap
/// - `500` - Relay or formatting failure
pub async fn upload_media(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let workspace = state.workspaces.acquire().await?;

    let result = stage_and_relay(&state, &workspace, multipart).await;

    if let Err(e) = state.workspaces.release(&workspace).await {
        tracing::warn!(
            "Failed to release workspace {}: {}",
            workspace.path.display(),
            e
        );
    }

    let files = result?;

    Ok((
        StatusCode::OK,
        Json(UploadResponseDto {
            success: true,
            files,
        }),
    ))
}

/// Runs the upload pipeline inside an acquired workspace.
///
/// Returns the number of relayed files so the handler can release the
/// workspace before shaping the response.
async fn stage_and_relay(
    state: &AppState,
    workspace: &Workspace,
    multipart: Multipart,
) -> Result<usize, AppError> {
    let request = parse_request(state, workspace, multipart).await?;

    tracing::info!(
        "Relaying {} file(s) ({} bytes) from {} to staging channel {}",
        request.files.len(),
        request.files.iter().map(|file| file.size).sum::<u64>(),
        workspace.path.display(),
        request.staging_channel
    );

    let relay = MediaRelay::new(state.discord_http.clone());

    let (staging, result_channel) = relay.resolve_destinations(&request).await?;
    let relayed = relay.relay(staging, &request.files).await?;
    let count = relayed.len();

    let output = format_listing(relayed, &state.config.chunk_policy)?;
    relay.post_output(result_channel, output).await?;

    Ok(count)
}

/// Parses the multipart form into a validated `UploadRequest`.
///
/// Files are staged to disk as they stream in, so the destination check can
/// only happen after the form has been fully read; the relay itself is never
/// invoked for an invalid request.
async fn parse_request(
    state: &AppState,
    workspace: &Workspace,
    mut multipart: Multipart,
) -> Result<UploadRequest, AppError> {
    let mut staging_channel = None;
    let mut result_channel = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "uploadChannel" => {
                staging_channel = Some(parse_channel_id(&name, field.text().await?)?);
            }
            "resultChannel" => {
                result_channel = Some(parse_channel_id(&name, field.text().await?)?);
            }
            "mediaFiles" => {
                files.push(stage_file(state, workspace, files.len(), field).await?);
            }
            _ => {}
        }
    }

    let (Some(staging_channel), Some(result_channel)) = (staging_channel, result_channel) else {
        return Err(UploadError::MissingParameters.into());
    };

    if files.is_empty() {
        return Err(UploadError::EmptyUpload.into());
    }

    Ok(UploadRequest {
        staging_channel,
        result_channel,
        files,
    })
}

fn parse_channel_id(field: &str, value: String) -> Result<u64, AppError> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {field} value '{value}'")))
}

/// Streams one file part into the workspace, enforcing the size cap.
///
/// The client-supplied filename is display metadata only; on disk the part is
/// staged under an opaque sequential name, so a hostile filename can never
/// escape the workspace.
async fn stage_file(
    state: &AppState,
    workspace: &Workspace,
    index: usize,
    mut field: Field<'_>,
) -> Result<MediaFile, AppError> {
    let name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("upload-{index}"));

    let limit = state.config.max_file_size;
    let path = workspace.path.join(format!("part-{index:04}"));
    let mut staged = tokio::fs::File::create(&path).await?;
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        if size > limit {
            return Err(UploadError::FileTooLarge { name, size, limit }.into());
        }
        staged.write_all(&chunk).await?;
    }

    staged.flush().await?;

    Ok(MediaFile { name, path, size })
}
