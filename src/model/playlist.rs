/// One video entry from a YouTube playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub title: String,
    pub video_id: String,
}

/// One page of playlist items as returned by the listing API.
///
/// The API does not guarantee any ordering across pages; entries are sorted
/// by title before display.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}
