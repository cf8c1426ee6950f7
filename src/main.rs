// This is the entry point of the antitag bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (policy stores)
// - `discord/` = Discord-specific adapters (commands, events, transport)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::antitag::{AntitagService, PolicyStore};
use crate::discord::antitag::{message_event_from_discord, DiscordTransport};
use crate::discord::{Data, Error};
use crate::infra::antitag::{InMemoryPolicyStore, JsonPolicyStore, SqlitePolicyStore};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Pick the policy store named by `ANTITAG_POLICY_BACKEND`.
async fn build_policy_store(
    backend: &str,
    data_dir: &str,
) -> anyhow::Result<Arc<dyn PolicyStore>> {
    match backend {
        "sqlite" => {
            let store = SqlitePolicyStore::open(&format!("{}/antitag.db", data_dir)).await?;
            Ok(Arc::new(store))
        }
        "json" => {
            std::fs::create_dir_all(data_dir)?;
            let store = JsonPolicyStore::new(format!("{}/antitag.json", data_dir))?;
            Ok(Arc::new(store))
        }
        "memory" => {
            tracing::warn!("Using in-memory antitag policies; they will not survive a restart");
            Ok(Arc::new(InMemoryPolicyStore::new()))
        }
        other => anyhow::bail!(
            "Unknown ANTITAG_POLICY_BACKEND '{}' (expected sqlite, json or memory)",
            other
        ),
    }
}

/// Event handler for non-command Discord events.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // Ignore bot messages (including our own) and DMs
        if new_message.author.bot {
            return Ok(());
        }
        let Some(guild_id) = new_message.guild_id else {
            return Ok(());
        };
        data.antitag
            .transport()
            .remember_guild(new_message.channel_id, guild_id);

        // Each message gets its own detection task so a slow Discord call
        // never holds up the next message.
        let message_event = message_event_from_discord(new_message);
        let antitag = Arc::clone(&data.antitag);
        tokio::spawn(async move {
            antitag.detect(&message_event).await;
        });
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists), before the
    // subscriber reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // Keep runtime databases in a dedicated folder so the repo root stays tidy.
    let data_dir = std::env::var("ANTITAG_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let backend =
        std::env::var("ANTITAG_POLICY_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The policy store is built now; the transport needs the Discord HTTP
    // client, so the service itself is assembled in `setup`.

    let policy_store = build_policy_store(&backend, &data_dir)
        .await
        .expect("Failed to initialize antitag policy store");
    tracing::info!(backend = %backend, data_dir = %data_dir, "Antitag policy store ready");

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS; // Required to count members

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::antitag::commands::antitag()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                let transport = DiscordTransport::new(ctx.http.clone());
                let data = Data {
                    antitag: Arc::new(AntitagService::new(policy_store, transport)),
                };

                tracing::info!("Bot is ready");
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
