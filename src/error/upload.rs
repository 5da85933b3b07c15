use thiserror::Error;

/// Errors produced by the upload relay pipeline.
///
/// Covers request validation, per-file size enforcement, and the message-length
/// contract of the result formatter. Each variant maps to a specific HTTP status
/// in `AppError::into_response`.
#[derive(Error, Debug)]
pub enum UploadError {
    /// One or both destination channel IDs were absent from the request.
    ///
    /// Results in 400 Bad Request. The relay is never invoked for such requests.
    #[error("Missing channel IDs")]
    MissingParameters,

    /// The request contained no media files.
    ///
    /// Results in 400 Bad Request.
    #[error("No files uploaded")]
    EmptyUpload,

    /// A destination ID did not resolve to a text-capable channel.
    ///
    /// Raised before any file is sent, for both the staging and the result
    /// channel. Results in 400 Bad Request.
    ///
    /// # Fields
    /// - The channel ID that failed to resolve
    #[error("Invalid channel ID: {0}")]
    InvalidDestination(u64),

    /// An uploaded file exceeded the configured size cap.
    ///
    /// Enforced while the multipart part is streamed to the workspace, so the
    /// overrun is detected without buffering the whole file. Results in
    /// 413 Payload Too Large.
    #[error("File too large: {name} ({size} bytes, limit {limit})")]
    FileTooLarge {
        /// Original filename as supplied by the client
        name: String,
        /// Bytes received before the cap was hit
        size: u64,
        /// Configured per-file limit in bytes
        limit: u64,
    },

    /// A single rendered listing entry exceeded the message length bound.
    ///
    /// The formatter refuses to truncate entries, so an entry that cannot fit
    /// into one message fails the whole request with no partial output.
    /// Results in 500 Internal Server Error.
    #[error("Listing entry of {len} characters exceeds the {limit} character message limit")]
    EntryTooLarge {
        /// Rendered length of the offending entry
        len: usize,
        /// Configured message length bound
        limit: usize,
    },
}
