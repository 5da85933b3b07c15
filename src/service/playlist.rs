//! YouTube playlist import with paginated retrieval.
//!
//! The importer walks the YouTube Data API's `playlistItems` listing page by
//! page, accumulating every entry until the API stops returning a page token.
//! A rate-limited page (HTTP 429) is retried exactly once after a fixed delay;
//! any other upstream failure propagates immediately with the API's own error
//! message so command replies can show what went wrong.
//!
//! The API seam is a trait so the pagination and retry contract can be
//! exercised against a scripted source in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::{
    error::{playlist::PlaylistError, AppError},
    model::playlist::{PlaylistEntry, PlaylistPage},
    util::natural::natural_cmp,
};

/// YouTube Data API v3 playlist items endpoint.
const PLAYLIST_ITEMS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

/// Canonical watch URL prefix for rendered entries.
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Maximum page size the API allows.
const PAGE_SIZE: &str = "50";

/// Delay before the single retry of a rate-limited page.
const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// A paginated source of playlist entries.
#[async_trait]
pub trait PlaylistSource {
    /// Fetches one page of entries.
    ///
    /// # Arguments
    /// - `playlist_id` - The playlist to list
    /// - `page_token` - Continuation token from the previous page, if any
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, AppError>;
}

/// Production source backed by the YouTube Data API.
pub struct YouTubeApi {
    client: reqwest::Client,
    api_key: String,
}

impl YouTubeApi {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[derive(Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Deserialize)]
struct PlaylistItemSnippet {
    title: String,
    #[serde(rename = "resourceId")]
    resource_id: PlaylistResourceId,
}

#[derive(Deserialize)]
struct PlaylistResourceId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl PlaylistSource for YouTubeApi {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, AppError> {
        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", PAGE_SIZE),
            ("playlistId", playlist_id),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(PLAYLIST_ITEMS_ENDPOINT)
            .query(&query)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PlaylistError::RateLimited.into());
        }

        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| status.to_string());

            return Err(PlaylistError::UpstreamApi {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: PlaylistItemsResponse = response.json().await?;

        Ok(PlaylistPage {
            entries: body
                .items
                .into_iter()
                .map(|item| PlaylistEntry {
                    title: item.snippet.title,
                    video_id: item.snippet.resource_id.video_id,
                })
                .collect(),
            next_page_token: body.next_page_token,
        })
    }
}

/// Extracts the playlist ID from a YouTube URL.
///
/// Accepts `youtube.com` (including subdomains such as `www.` and `music.`)
/// and `youtu.be` links carrying a `list` query parameter; both plain playlist
/// links and watch links qualify.
///
/// # Arguments
/// - `input` - The URL as typed by the user
///
/// # Returns
/// - `Ok(String)` - The playlist ID
/// - `Err(AppError::PlaylistErr(InvalidUrl))` - Unparseable URL, foreign host,
///   or no `list` parameter
pub fn extract_playlist_id(input: &str) -> Result<String, AppError> {
    let invalid = || PlaylistError::InvalidUrl(input.to_string());

    let url = Url::parse(input).map_err(|_| invalid())?;

    let host = url.host_str().ok_or_else(invalid)?;
    let known_host =
        host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be";
    if !known_host {
        return Err(invalid().into());
    }

    url.query_pairs()
        .find(|(key, value)| key == "list" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| invalid().into())
}

/// Retrieves all entries of a playlist, page by page.
///
/// Keeps requesting pages until the source stops returning a continuation
/// token. A rate-limited page gets exactly one retry after
/// `RATE_LIMIT_RETRY_DELAY`; a second rate limit, or any other error,
/// propagates.
///
/// # Arguments
/// - `source` - Page source (API client, or a scripted source in tests)
/// - `playlist_id` - The playlist to import
///
/// # Returns
/// - `Ok(Vec<PlaylistEntry>)` - All entries across all pages, source order
/// - `Err(AppError)` - Upstream failure after the retry policy is exhausted
pub async fn import<S: PlaylistSource>(
    source: &S,
    playlist_id: &str,
) -> Result<Vec<PlaylistEntry>, AppError> {
    let mut entries = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = match source.fetch_page(playlist_id, page_token.as_deref()).await {
            Err(AppError::PlaylistErr(PlaylistError::RateLimited)) => {
                tracing::warn!(
                    "Rate limited while listing playlist {}, retrying in {:?}",
                    playlist_id,
                    RATE_LIMIT_RETRY_DELAY
                );
                tokio::time::sleep(RATE_LIMIT_RETRY_DELAY).await;
                source.fetch_page(playlist_id, page_token.as_deref()).await?
            }
            other => other?,
        };

        entries.extend(page.entries);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(entries)
}

/// Renders playlist entries as display lines, sorted by title.
///
/// The listing API does not guarantee any ordering, so entries are sorted with
/// natural comparison before rendering `title: watch-url` lines.
pub fn render_entries(mut entries: Vec<PlaylistEntry>) -> Vec<String> {
    entries.sort_by(|a, b| natural_cmp(&a.title, &b.title));

    entries
        .into_iter()
        .map(|entry| format!("{}: {}{}", entry.title, WATCH_URL, entry.video_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Scripted page source for exercising the pagination loop.
    ///
    /// Pages are indexed by continuation token: `None` is page 0, `tok<i>`
    /// is page i. One page can be configured to answer 429 on its first
    /// attempt only.
    struct ScriptedSource {
        pages: Vec<PlaylistPage>,
        rate_limited_page: Mutex<Option<usize>>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(page_sizes: &[usize]) -> Self {
            let page_count = page_sizes.len();
            let pages = page_sizes
                .iter()
                .enumerate()
                .map(|(page, size)| PlaylistPage {
                    entries: (0..*size)
                        .map(|i| PlaylistEntry {
                            title: format!("video {page}-{i}"),
                            video_id: format!("id{page}x{i}"),
                        })
                        .collect(),
                    next_page_token: if page + 1 < page_count {
                        Some(format!("tok{}", page + 1))
                    } else {
                        None
                    },
                })
                .collect();

            Self {
                pages,
                rate_limited_page: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn rate_limit_page_once(self, page: usize) -> Self {
            *self.rate_limited_page.lock().unwrap() = Some(page);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PlaylistSource for ScriptedSource {
        async fn fetch_page(
            &self,
            _playlist_id: &str,
            page_token: Option<&str>,
        ) -> Result<PlaylistPage, AppError> {
            self.calls
                .lock()
                .unwrap()
                .push(page_token.map(str::to_string));

            let page = match page_token {
                None => 0,
                Some(token) => token
                    .strip_prefix("tok")
                    .and_then(|n| n.parse().ok())
                    .expect("unexpected page token"),
            };

            let mut rate_limited = self.rate_limited_page.lock().unwrap();
            if *rate_limited == Some(page) {
                *rate_limited = None;
                return Err(PlaylistError::RateLimited.into());
            }

            Ok(self.pages[page].clone())
        }
    }

    /// Tests pagination termination across three pages.
    ///
    /// A source with tokens None -> tok1 -> tok2 -> end must be asked exactly
    /// three times and yield the union of all pages' entries.
    ///
    /// Expected: Ok with 6 entries from 3 requests
    #[tokio::test]
    async fn paginates_until_token_runs_out() {
        let source = ScriptedSource::new(&[2, 3, 1]);

        let entries = import(&source, "PLtest").await.unwrap();

        assert_eq!(source.call_count(), 3);
        assert_eq!(entries.len(), 6);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![None, Some("tok1".to_string()), Some("tok2".to_string())]
        );
    }

    /// Tests the single-retry policy for a rate-limited page.
    ///
    /// The second page answers 429 once; the importer must wait out the delay,
    /// retry that page, and finish with the union of both pages' entries.
    ///
    /// Expected: Ok after one retry, with the delay observed
    #[tokio::test(start_paused = true)]
    async fn rate_limited_page_is_retried_once() {
        let source = ScriptedSource::new(&[2, 2]).rate_limit_page_once(1);
        let started = Instant::now();

        let entries = import(&source, "PLtest").await.unwrap();

        assert_eq!(entries.len(), 4);
        // page 0, page 1 (429), page 1 again
        assert_eq!(source.call_count(), 3);
        assert!(started.elapsed() >= RATE_LIMIT_RETRY_DELAY);
    }

    /// Tests that a page rate-limited on both attempts propagates the error.
    ///
    /// Expected: Err(RateLimited) after exactly two attempts at that page
    #[tokio::test(start_paused = true)]
    async fn second_rate_limit_propagates() {
        struct AlwaysLimited;

        #[async_trait]
        impl PlaylistSource for AlwaysLimited {
            async fn fetch_page(
                &self,
                _playlist_id: &str,
                _page_token: Option<&str>,
            ) -> Result<PlaylistPage, AppError> {
                Err(PlaylistError::RateLimited.into())
            }
        }

        let result = import(&AlwaysLimited, "PLtest").await;
        assert!(matches!(
            result,
            Err(AppError::PlaylistErr(PlaylistError::RateLimited))
        ));
    }

    /// Tests that non-rate-limit upstream errors are not retried.
    ///
    /// Expected: Err(UpstreamApi) after a single attempt
    #[tokio::test]
    async fn upstream_error_propagates_immediately() {
        struct Failing {
            calls: Mutex<usize>,
        }

        #[async_trait]
        impl PlaylistSource for Failing {
            async fn fetch_page(
                &self,
                _playlist_id: &str,
                _page_token: Option<&str>,
            ) -> Result<PlaylistPage, AppError> {
                *self.calls.lock().unwrap() += 1;
                Err(PlaylistError::UpstreamApi {
                    status: 403,
                    message: "quota exceeded".to_string(),
                }
                .into())
            }
        }

        let source = Failing {
            calls: Mutex::new(0),
        };

        let result = import(&source, "PLtest").await;
        assert!(matches!(
            result,
            Err(AppError::PlaylistErr(PlaylistError::UpstreamApi { status: 403, .. }))
        ));
        assert_eq!(*source.calls.lock().unwrap(), 1);
    }

    /// Tests playlist ID extraction from accepted URL shapes.
    ///
    /// Expected: Ok with the `list` parameter value
    #[test]
    fn extracts_playlist_id_from_known_hosts() {
        assert_eq!(
            extract_playlist_id("https://www.youtube.com/playlist?list=PLabc123").unwrap(),
            "PLabc123"
        );
        assert_eq!(
            extract_playlist_id("https://youtube.com/watch?v=xyz&list=PLdef456").unwrap(),
            "PLdef456"
        );
        assert_eq!(
            extract_playlist_id("https://music.youtube.com/playlist?list=PLmusic").unwrap(),
            "PLmusic"
        );
        assert_eq!(
            extract_playlist_id("https://youtu.be/xyz?list=PLshort").unwrap(),
            "PLshort"
        );
    }

    /// Tests rejection of URLs that are not YouTube playlist links.
    ///
    /// Expected: Err(InvalidUrl) for foreign hosts, missing list parameter,
    /// and unparseable input
    #[test]
    fn rejects_invalid_playlist_urls() {
        for input in [
            "https://vimeo.com/watch?list=PLabc",
            "https://www.youtube.com/watch?v=xyz",
            "https://www.youtube.com/playlist?list=",
            "https://notyoutube.com/playlist?list=PLabc",
            "not a url at all",
        ] {
            let result = extract_playlist_id(input);
            assert!(
                matches!(result, Err(AppError::PlaylistErr(PlaylistError::InvalidUrl(_)))),
                "expected InvalidUrl for {input}"
            );
        }
    }

    /// Tests rendered entry ordering and shape.
    ///
    /// Expected: natural-sorted titles rendered with canonical watch URLs
    #[test]
    fn renders_sorted_watch_lines() {
        let entries = vec![
            PlaylistEntry {
                title: "episode 10".to_string(),
                video_id: "vid10".to_string(),
            },
            PlaylistEntry {
                title: "episode 2".to_string(),
                video_id: "vid2".to_string(),
            },
        ];

        let lines = render_entries(entries);

        assert_eq!(
            lines,
            vec![
                "episode 2: https://www.youtube.com/watch?v=vid2".to_string(),
                "episode 10: https://www.youtube.com/watch?v=vid10".to_string(),
            ]
        );
    }
}
