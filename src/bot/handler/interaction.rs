//! Slash command dispatch and replies.
//!
//! Commands that finish fast reply directly; the playlist import defers its
//! response because pagination can outlive Discord's 3-second interaction
//! deadline, then streams the rendered listing into the invoking channel and
//! edits the deferred response with the final count.

use std::time::Duration;

use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse, Interaction,
    ResolvedValue,
};

use crate::bot::commands;
use crate::error::AppError;
use crate::service::format::chunk_lines;
use crate::service::playlist::{self, YouTubeApi};
use crate::state::AppState;

/// Pause between listing chunk sends to respect Discord rate limits.
const CHUNK_SEND_PAUSE: Duration = Duration::from_secs(1);

/// Dispatches an incoming interaction to its command handler.
///
/// Failures are caught here: the user gets a generic ephemeral error reply and
/// the real error goes to the log.
pub async fn handle_interaction_create(state: &AppState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let result = match command.data.name.as_str() {
        commands::ARISE => handle_arise(state, &ctx, &command).await,
        commands::BDA => handle_bda(state, &ctx, &command).await,
        commands::CHANNEL_ID => handle_channel_id(&ctx, &command).await,
        commands::FROM_YOUTUBE => handle_from_youtube(state, &ctx, &command).await,
        other => {
            tracing::warn!("Ignoring unknown command '{}'", other);
            return;
        }
    };

    if let Err(e) = result {
        tracing::error!("Command '{}' failed: {:?}", command.data.name, e);

        let apology = CreateInteractionResponseMessage::new()
            .content("⚠️ An error occurred")
            .ephemeral(true);
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(apology))
            .await
        {
            tracing::error!("Failed to send error reply: {:?}", e);
        }
    }
}

/// Liveness probe.
///
/// Replies immediately when the gateway is up; otherwise acknowledges the
/// wake-up and follows up once the readiness signal flips. There is no
/// polling: the pending command subscribes to the one-shot transition.
async fn handle_arise(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    if state.readiness.is_ready() {
        respond(ctx, command, "⚡ Ready! Type `/bda` to start").await?;
        return Ok(());
    }

    respond(ctx, command, "💤 Waking up... Please wait").await?;
    state.readiness.ready().await;
    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new().content("✅ Ready now!"),
        )
        .await?;

    Ok(())
}

/// Replies with the uploader configuration page link.
async fn handle_bda(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    respond(
        ctx,
        command,
        &format!("🔗 Configuration page: {}", state.config.webpage_url),
    )
    .await
}

/// Echoes the numeric ID of the selected channel.
async fn handle_channel_id(ctx: &Context, command: &CommandInteraction) -> Result<(), AppError> {
    let channel = command
        .data
        .options()
        .iter()
        .find_map(|option| match &option.value {
            ResolvedValue::Channel(channel) => Some(channel.id),
            _ => None,
        })
        .ok_or_else(|| AppError::BadRequest("Missing channel option".to_string()))?;

    respond(ctx, command, &format!("📡 ID for <#{channel}>: `{channel}`")).await
}

/// Imports a YouTube playlist and streams the rendered listing.
///
/// The deferred response slot ends up holding the import summary; the listing
/// itself goes into the invoking channel as paced chunk messages. Import
/// failures edit the deferred response instead of raising, so the user sees
/// what went wrong.
async fn handle_from_youtube(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    let url = command
        .data
        .options()
        .iter()
        .find_map(|option| match &option.value {
            ResolvedValue::String(value) => Some(value.to_string()),
            _ => None,
        })
        .ok_or_else(|| AppError::BadRequest("Missing url option".to_string()))?;

    command.defer(&ctx.http).await?;

    let summary = match import_and_stream(state, ctx, command, &url).await {
        Ok(count) => format!("✅ Imported {count} video(s) from the playlist"),
        Err(e) => {
            tracing::error!("Playlist import failed: {:?}", e);
            format!("⚠️ Import failed: {e}")
        }
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(summary))
        .await?;

    Ok(())
}

async fn import_and_stream(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
    url: &str,
) -> Result<usize, AppError> {
    let playlist_id = playlist::extract_playlist_id(url)?;

    let source = YouTubeApi::new(
        state.http_client.clone(),
        state.config.youtube_api_key.clone(),
    );
    let entries = playlist::import(&source, &playlist_id).await?;
    let count = entries.len();

    let lines = playlist::render_entries(entries);
    let chunks = chunk_lines(&lines, state.config.chunk_policy.max_chunk_len)?;

    for (i, chunk) in chunks.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(CHUNK_SEND_PAUSE).await;
        }
        command
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().content(chunk))
            .await?;
    }

    Ok(count)
}

async fn respond(
    ctx: &Context,
    command: &CommandInteraction,
    content: &str,
) -> Result<(), AppError> {
    let message = CreateInteractionResponseMessage::new().content(content);
    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;

    Ok(())
}
