use std::path::PathBuf;

/// One media file staged on disk for relay.
///
/// `name` is the original client-supplied filename and is only ever used as
/// display metadata; the staged file lives under an opaque part name inside
/// the request workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// A parsed and validated upload request.
///
/// Invariant: `files` is non-empty and every file is within the configured
/// size cap by the time this struct is constructed.
#[derive(Debug)]
pub struct UploadRequest {
    pub staging_channel: u64,
    pub result_channel: u64,
    pub files: Vec<MediaFile>,
}

/// A file that has been forwarded to the staging channel.
///
/// Pairs the original filename with the CDN URL Discord assigned to the
/// attachment. Produced one-to-one from the request's files and discarded
/// once the response listing has been posted.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedFile {
    pub name: String,
    pub url: String,
}
