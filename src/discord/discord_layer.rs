// Discord layer - commands, event handlers and the transport adapter.

#[path = "antitag/mod.rs"]
pub mod antitag;

use crate::core::antitag::{AntitagService, PolicyStore};
use antitag::DiscordTransport;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// The antitag service as wired for Discord.
pub type DiscordAntitagService = AntitagService<Arc<dyn PolicyStore>, DiscordTransport>;

/// Shared state available to every command and event handler.
pub struct Data {
    pub antitag: Arc<DiscordAntitagService>,
}
