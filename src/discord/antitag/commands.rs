// Antitag slash commands for group admins.

use crate::core::antitag::{AntitagAction, AntitagError, EnableOutcome};
use crate::discord::{Context, Error};

const ERROR_REPLY: &str = "*_Error processing antitag command_*";

/// Action choices offered by `/antitag set`.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ActionChoice {
    #[name = "delete"]
    Delete,
    #[name = "kick"]
    Kick,
}

impl From<ActionChoice> for AntitagAction {
    fn from(choice: ActionChoice) -> Self {
        match choice {
            ActionChoice::Delete => AntitagAction::Delete,
            ActionChoice::Kick => AntitagAction::Kick,
        }
    }
}

fn group_id(ctx: &Context<'_>) -> String {
    ctx.channel_id().get().to_string()
}

/// Log a failed command and give the admin the generic error reply.
async fn reply_error(ctx: Context<'_>, e: AntitagError) -> Result<(), Error> {
    tracing::error!(channel_id = %ctx.channel_id(), "Error in antitag command: {}", e);
    ctx.say(ERROR_REPLY).await?;
    Ok(())
}

/// Mass-mention protection for this channel.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    subcommands("antitag_on", "antitag_off", "antitag_set", "antitag_get"),
    subcommand_required
)]
pub async fn antitag(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent command - Discord only ever invokes the subcommands
    Ok(())
}

/// Turn antitag on (default action: delete).
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    rename = "on"
)]
pub async fn antitag_on(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().antitag.enable(&group_id(&ctx)).await {
        Ok(EnableOutcome::AlreadyEnabled) => {
            ctx.say("*_Antitag is already on_*").await?;
        }
        Ok(EnableOutcome::Enabled) => {
            ctx.say("*_Antitag has been turned ON_*").await?;
        }
        Err(AntitagError::PolicyUnavailable(e)) => {
            tracing::error!("Failed to turn on antitag: {}", e);
            ctx.say("*_Failed to turn on Antitag_*").await?;
        }
        Err(e) => return reply_error(ctx, e).await,
    }
    Ok(())
}

/// Turn antitag off.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    rename = "off"
)]
pub async fn antitag_off(ctx: Context<'_>) -> Result<(), Error> {
    if let Err(e) = ctx.data().antitag.disable(&group_id(&ctx)).await {
        return reply_error(ctx, e).await;
    }
    ctx.say("*_Antitag has been turned OFF_*").await?;
    Ok(())
}

/// Choose what happens to mass mentions.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    rename = "set"
)]
pub async fn antitag_set(
    ctx: Context<'_>,
    #[description = "Delete the message, or delete it and kick the sender"] action: ActionChoice,
) -> Result<(), Error> {
    let action = AntitagAction::from(action);

    match ctx.data().antitag.set_action(&group_id(&ctx), action).await {
        Ok(()) => {
            ctx.say(format!("*_Antitag action set to {}_*", action))
                .await?;
        }
        Err(AntitagError::NotEnabled) => {
            ctx.say("*_Please enable antitag first using /antitag on_*")
                .await?;
        }
        Err(AntitagError::PolicyUnavailable(e)) => {
            tracing::error!("Failed to set antitag action: {}", e);
            ctx.say("*_Failed to set Antitag action_*").await?;
        }
        Err(e) => return reply_error(ctx, e).await,
    }
    Ok(())
}

/// Show the antitag configuration.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    rename = "get"
)]
pub async fn antitag_get(ctx: Context<'_>) -> Result<(), Error> {
    let policy = match ctx.data().antitag.status(&group_id(&ctx)).await {
        Ok(policy) => policy,
        Err(e) => return reply_error(ctx, e).await,
    };

    let status = if policy.is_some_and(|p| p.enabled) {
        "ON"
    } else {
        "OFF"
    };
    let action = policy
        .map(|p| p.action.to_string())
        .unwrap_or_else(|| "Not set".to_string());

    ctx.say(format!(
        "*_Antitag Configuration:_*\nStatus: {}\nAction: {}",
        status, action
    ))
    .await?;
    Ok(())
}
