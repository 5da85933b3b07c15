//! Slash command definitions and registration.

use serenity::all::{
    Command, CommandOptionType, Context, CreateCommand, CreateCommandOption, GuildId,
};

use crate::config::Config;
use crate::error::AppError;

pub const BDA: &str = "bda";
pub const CHANNEL_ID: &str = "channel_id";
pub const ARISE: &str = "arise";
pub const FROM_YOUTUBE: &str = "from_youtube";

fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(BDA).description("Get the uploader configuration link"),
        CreateCommand::new(CHANNEL_ID)
            .description("Get a channel ID")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Channel, "channel", "Target channel")
                    .required(true),
            ),
        CreateCommand::new(ARISE).description("Wake up the bot from standby"),
        CreateCommand::new(FROM_YOUTUBE)
            .description("Import a YouTube playlist as a list of watch links")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "url", "Playlist URL")
                    .required(true),
            ),
    ]
}

/// Registers the application command set.
///
/// Global registration can take up to an hour to propagate, so a configured
/// test guild gets guild-scoped registration instead, which is immediate.
///
/// # Arguments
/// - `ctx` - Discord context from the ready event
/// - `config` - Application configuration with the optional test guild
pub async fn register(ctx: &Context, config: &Config) -> Result<(), AppError> {
    let commands = definitions();

    match config.test_guild_id {
        Some(guild_id) => {
            GuildId::new(guild_id)
                .set_commands(&ctx.http, commands)
                .await?;
            tracing::info!("Registered commands for test guild {}", guild_id);
        }
        None => {
            Command::set_global_commands(&ctx.http, commands).await?;
            tracing::info!("Registered global commands");
        }
    }

    Ok(())
}
