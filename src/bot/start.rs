use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::error::AppError;
use crate::state::AppState;

/// Builds the Discord client around the shared application state.
///
/// The returned client has not connected yet; pass it to `start_bot` from a
/// spawned task. Building and starting are split so the caller can grab the
/// shard manager for shutdown before the client is consumed.
///
/// # Arguments
/// - `state` - Shared application state for the event handler
///
/// # Returns
/// - `Ok(Client)` - Configured client ready to start
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(state: AppState) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;

    let client = Client::builder(&state.config.discord_bot_token, intents)
        .event_handler(Handler::new(state))
        .await?;

    Ok(client)
}

/// Starts the Discord bot in a blocking manner.
///
/// This function should be called from within a tokio::spawn task since it
/// will block until the bot shuts down.
///
/// # Arguments
/// - `client` - Client built by `init_bot`
///
/// # Returns
/// - `Ok(())` if the bot runs until a clean shutdown
/// - `Err(AppError)` if the gateway connection fails
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
