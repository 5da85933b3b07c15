//! Discord bot integration for the upload relay.
//!
//! The bot owns the command surface: the uploader-page link, channel ID
//! lookup, the wake-up probe, and YouTube playlist import. It is initialized
//! during startup and runs in a separate tokio task so it never blocks the
//! HTTP server. The relay side talks to Discord through a standalone HTTP
//! client shared via `AppState`, so no second gateway connection is needed.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Resolve guild channels for command handling
//! - `GUILD_MESSAGES` - Send listing messages into guild channels

pub mod commands;
pub mod handler;
pub mod start;
