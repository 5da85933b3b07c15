//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into appropriate HTTP responses. The `AppError` enum serves
//! as the top-level error type that wraps domain-specific errors and implements
//! `IntoResponse` for automatic error handling in API endpoints.

pub mod config;
pub mod playlist;
pub mod upload;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{config::ConfigError, playlist::PlaylistError, upload::UploadError},
    model::api::ErrorDto,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Most variants use `#[from]` for automatic
/// error conversion. Domain-specific errors like `UploadError` carry their own status
/// mapping, while generic variants provide standard HTTP status codes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    ///
    /// Always results in 500 Internal Server Error as configuration issues
    /// prevent normal application operation.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Upload relay pipeline error.
    ///
    /// Maps to 400, 413, or 500 depending on the variant; see `UploadError`.
    #[error(transparent)]
    UploadErr(#[from] UploadError),

    /// Playlist importer error.
    ///
    /// These normally surface as command-reply text rather than HTTP responses;
    /// when they do reach the HTTP layer they map to 502 Bad Gateway since the
    /// failure originated upstream.
    #[error(transparent)]
    PlaylistErr(#[from] PlaylistError),

    /// Multipart form parsing error.
    ///
    /// Results in 400 Bad Request with the parser's message.
    #[error(transparent)]
    MultipartErr(#[from] MultipartError),

    /// HTTP client request error from reqwest.
    ///
    /// Results in 500 Internal Server Error when external API calls fail.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size. Results in 500 Internal Server Error when
    /// Discord bot operations fail.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Filesystem error while staging or cleaning up uploaded files.
    ///
    /// Results in 500 Internal Server Error.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Invalid request error.
    ///
    /// Results in 400 Bad Request with the provided error message.
    ///
    /// # Fields
    /// - Message describing what was invalid about the request
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error with custom message.
    ///
    /// Results in 500 Internal Server Error. The provided message is logged
    /// but a generic message is returned to the client.
    ///
    /// # Fields
    /// - Detailed error message for server-side logging
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

/// Converts application errors into HTTP responses.
///
/// Maps each error variant to an appropriate HTTP status code and response body.
/// Validation errors echo their message to the caller, while internal errors are
/// logged with full details but return generic messages to avoid information
/// leakage.
///
/// # Returns
/// - 400 Bad Request - Missing/invalid parameters, bad multipart data
/// - 413 Payload Too Large - A file exceeded the size cap
/// - 502 Bad Gateway - Upstream listing API failure
/// - 500 Internal Server Error - All other error types
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::UploadErr(err) => {
                let status = match err {
                    UploadError::MissingParameters
                    | UploadError::EmptyUpload
                    | UploadError::InvalidDestination(_) => StatusCode::BAD_REQUEST,
                    UploadError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    UploadError::EntryTooLarge { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(ErrorDto { error: err.to_string() })).into_response()
            }
            Self::PlaylistErr(err) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorDto { error: err.to_string() }),
            )
                .into_response(),
            Self::MultipartErr(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto { error: err.to_string() }),
            )
                .into_response(),
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto { error: msg })).into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto {
                        error: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// This struct logs the error message and returns a generic "Internal server error" message
/// to the client to avoid leaking implementation details. Used as a fallback for errors that
/// don't have specific HTTP response mappings.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
