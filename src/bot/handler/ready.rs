//! Ready event handler for bot initialization.
//!
//! The `ready` event fires when the bot completes the gateway handshake. It is
//! the point where slash commands get registered and where the readiness
//! signal flips, releasing any `arise` commands that were waiting for the bot
//! to come up.

use serenity::all::{ActivityData, Context, Ready};

use crate::bot::commands;
use crate::state::AppState;

/// Handles the ready event when the bot connects to Discord.
///
/// Registers the slash command set, sets the bot presence, and signals
/// readiness. Command registration failure is logged rather than fatal: the
/// previously registered command set keeps working across reconnects.
///
/// # Arguments
/// - `state` - Shared application state carrying the readiness signal
/// - `ctx` - Discord context for registration and activity
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Relaying uploads")));

    if let Err(e) = commands::register(&ctx, &state.config).await {
        tracing::error!("Failed to register commands: {:?}", e);
    }

    state.readiness.set_ready();
}
