use std::str::FromStr;

use crate::{
    error::{config::ConfigError, AppError},
    service::format::ChunkPolicy,
};

const DEFAULT_PORT: u16 = 3000;

/// Default per-file upload cap: 25 MiB, matching the limit enforced by the
/// uploader page.
const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

pub struct Config {
    pub discord_bot_token: String,
    pub discord_client_id: u64,

    pub port: u16,
    pub webpage_url: String,
    pub allowed_origins: Vec<String>,

    pub youtube_api_key: String,
    pub test_guild_id: Option<u64>,

    pub max_file_size: u64,
    pub chunk_policy: ChunkPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let webpage_url = require("WEBPAGE_URL")?;

        // Browser uploads are only accepted from the uploader page unless the
        // allow-list is widened explicitly.
        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(list) => list
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            Err(_) => vec![webpage_url.trim_end_matches('/').to_string()],
        };

        Ok(Self {
            discord_bot_token: require("DISCORD_BOT_TOKEN")?,
            discord_client_id: parse_var("DISCORD_CLIENT_ID", require("DISCORD_CLIENT_ID")?)?,
            port: parse_var_or("PORT", DEFAULT_PORT)?,
            webpage_url,
            allowed_origins,
            youtube_api_key: require("YOUTUBE_API_KEY")?,
            test_guild_id: match std::env::var("TEST_GUILD_ID") {
                Ok(value) => Some(parse_var("TEST_GUILD_ID", value)?),
                Err(_) => None,
            },
            max_file_size: parse_var_or("MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
            chunk_policy: ChunkPolicy::default(),
        })
    }
}

fn require(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()).into())
}

fn parse_var<T: FromStr>(name: &str, value: String) -> Result<T, AppError> {
    value.parse().map_err(|_| {
        ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }
        .into()
    })
}

fn parse_var_or<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match std::env::var(name) {
        Ok(value) => parse_var(name, value),
        Err(_) => Ok(default),
    }
}
