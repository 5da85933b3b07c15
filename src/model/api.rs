use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub success: bool,
    /// Number of files relayed to the staging channel.
    pub files: usize,
}
