use thiserror::Error;

/// Errors produced by the YouTube playlist importer.
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// The supplied URL is not a recognizable YouTube playlist link.
    ///
    /// The URL must parse, point at a YouTube host, and carry a `list` query
    /// parameter with the playlist ID.
    #[error("Not a valid YouTube playlist URL: {0}")]
    InvalidUrl(String),

    /// The listing API answered 429 Too Many Requests.
    ///
    /// The importer retries the affected page exactly once after a fixed delay
    /// before giving up and surfacing this error.
    #[error("YouTube API rate limit exceeded")]
    RateLimited,

    /// The listing API answered with a non-success status other than 429.
    ///
    /// Carries the upstream error message so command replies can show what
    /// actually went wrong.
    #[error("YouTube API error ({status}): {message}")]
    UpstreamApi {
        /// HTTP status returned by the API
        status: u16,
        /// Error message extracted from the API response body
        message: String,
    },
}
