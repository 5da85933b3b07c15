use std::sync::Arc;
use std::time::Duration;

use serenity::all::ApplicationId;
use serenity::http::{Http, HttpBuilder};

use crate::config::Config;
use crate::error::AppError;

/// Bound on each YouTube API call; the transport default is no timeout.
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates the HTTP client used for external API requests.
///
/// Configured with security settings (no redirects) to prevent SSRF
/// vulnerabilities, and a request timeout so a stalled upstream cannot hang
/// a command forever.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError)` - Client construction failed
pub fn setup_http_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_CLIENT_TIMEOUT)
        .build()?;

    Ok(client)
}

/// Creates the Discord HTTP client shared between the bot and the relay.
///
/// The relay and command handlers send messages through this client; only the
/// bot task holds a gateway connection.
///
/// # Arguments
/// - `config` - Application configuration with the bot token and application ID
pub fn setup_discord_http(config: &Config) -> Arc<Http> {
    let http = HttpBuilder::new(&config.discord_bot_token)
        .application_id(ApplicationId::new(config.discord_client_id))
        .build();

    Arc::new(http)
}
