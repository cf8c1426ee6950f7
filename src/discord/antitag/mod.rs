// Discord side of the antitag system: slash commands, the ChatTransport
// adapter and message conversion.

pub mod commands;
pub mod transport;

pub use transport::{message_event_from_discord, DiscordTransport};
