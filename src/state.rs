//! Application state shared across request handlers and the Discord bot.
//!
//! This module defines the `AppState` struct which holds all shared resources
//! needed by the HTTP endpoints and the bot's command handlers. The state is
//! initialized once during startup and then cloned for each request handler
//! through Axum's state extraction; the bot's event handler holds its own clone.

use std::sync::Arc;

use serenity::http::Http;
use tokio::sync::watch;

use crate::{config::Config, service::workspace::WorkspaceRegistry};

/// One-shot gateway readiness signal.
///
/// Starts out not-ready and flips exactly once, when the bot's `ready` event
/// fires. Pending `arise` commands subscribe to the transition instead of
/// polling a flag; after the flip every waiter resolves immediately.
#[derive(Clone)]
pub struct Readiness {
    sender: Arc<watch::Sender<bool>>,
}

impl Readiness {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns whether the gateway connection has been established.
    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }

    /// Marks the application ready, releasing all pending `ready()` waiters.
    pub fn set_ready(&self) {
        self.sender.send_replace(true);
    }

    /// Resolves once the application is ready.
    ///
    /// Returns immediately if readiness was already signalled.
    pub async fn ready(&self) {
        let mut receiver = self.sender.subscribe();
        // wait_for only fails when the sender is dropped, and the sender is
        // owned by self.
        let _ = receiver.wait_for(|ready| *ready).await;
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `Arc<Config>` and `Arc<Http>` are reference-counted pointers
/// - `reqwest::Client` uses an `Arc` internally
/// - `WorkspaceRegistry` and `Readiness` wrap shared state in `Arc`s
#[derive(Clone)]
pub struct AppState {
    /// Parsed environment configuration.
    pub config: Arc<Config>,

    /// HTTP client for calls to the YouTube listing API.
    pub http_client: reqwest::Client,

    /// Discord HTTP client shared with the bot.
    ///
    /// Used by the upload relay to resolve channels and send attachment
    /// messages without maintaining a second gateway connection.
    pub discord_http: Arc<Http>,

    /// Tracking registry for per-request temp workspaces.
    pub workspaces: WorkspaceRegistry,

    /// Gateway readiness signal, flipped by the bot's `ready` handler.
    pub readiness: Readiness,
}

impl AppState {
    pub fn new(config: Arc<Config>, http_client: reqwest::Client, discord_http: Arc<Http>) -> Self {
        Self {
            config,
            http_client,
            discord_http,
            workspaces: WorkspaceRegistry::new(),
            readiness: Readiness::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the initial readiness state.
    ///
    /// Expected: not ready before the gateway connects
    #[test]
    fn starts_not_ready() {
        let readiness = Readiness::new();
        assert!(!readiness.is_ready());
    }

    /// Tests that a pending waiter resolves when readiness flips.
    ///
    /// Expected: the waiter task completes after set_ready
    #[tokio::test]
    async fn pending_waiter_resolves_on_ready() {
        let readiness = Readiness::new();

        let waiter = {
            let readiness = readiness.clone();
            tokio::spawn(async move { readiness.ready().await })
        };

        readiness.set_ready();
        waiter.await.expect("waiter task panicked");
        assert!(readiness.is_ready());
    }

    /// Tests that waiting after the flip returns immediately.
    ///
    /// Expected: ready() resolves without blocking
    #[tokio::test]
    async fn ready_after_flip_is_immediate() {
        let readiness = Readiness::new();
        readiness.set_ready();
        readiness.ready().await;
    }
}
