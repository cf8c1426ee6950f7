// Antitag domain models - data structures for mass-mention detection.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts its messages into `MessageEvent`s and turns
// `OutgoingMessage`s back into API calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// INBOUND MESSAGE
// ============================================================================

/// The possible bodies a message can carry.
///
/// A chat message usually fills only one of these; `body()` picks the first
/// non-empty one in a fixed priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// Plain conversational text
    pub conversation: Option<String>,
    /// Text of an extended message (replies, link previews, rich mentions)
    pub extended_text: Option<String>,
    pub image_caption: Option<String>,
    pub video_caption: Option<String>,
}

impl MessageContent {
    #[cfg(test)]
    /// Plain text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            conversation: Some(text.into()),
            ..Default::default()
        }
    }

    /// Resolve the message body: plain text, extended text, image caption,
    /// video caption. Empty string if none is present.
    pub fn body(&self) -> &str {
        [
            &self.conversation,
            &self.extended_text,
            &self.image_caption,
            &self.video_caption,
        ]
        .into_iter()
        .filter_map(|candidate| candidate.as_deref())
        .find(|text| !text.is_empty())
        .unwrap_or("")
    }
}

/// A normalized inbound message, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// The originating group (chat id)
    pub group_id: String,
    /// The sender's participant id
    pub sender_id: String,
    pub message_id: String,
    pub content: MessageContent,
    /// Identities the transport surfaced structurally as mentioned.
    pub mentioned_ids: Vec<String>,
}

// ============================================================================
// MENTIONS
// ============================================================================

/// One mention signal.
///
/// Equality is by exact value, so `Identity("123@s.whatsapp.net")` and
/// `Text("@123")` are two different signals even when they name the same
/// participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MentionSignal {
    /// A transport-native identity reference
    Identity(String),
    /// A literal substring matched in the message text
    Text(String),
}

impl MentionSignal {
    pub fn value(&self) -> &str {
        match self {
            MentionSignal::Identity(value) | MentionSignal::Text(value) => value,
        }
    }
}

/// Deduplicated set of mention signals.
///
/// Signals are keyed by their raw value, so an identity and a text match
/// that happen to be spelled identically collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionSet {
    values: BTreeSet<String>,
}

impl MentionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signal. Returns `false` if an identical value was already present.
    pub fn insert(&mut self, signal: MentionSignal) -> bool {
        if self.values.contains(signal.value()) {
            return false;
        }
        self.values.insert(signal.value().to_string())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }
}

/// Output of the mention extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionScan {
    pub mentions: MentionSet,
    /// Raw count of strict numeric `@` matches, kept apart from the union.
    pub numeric_count: usize,
}

impl MentionScan {
    pub fn unique_count(&self) -> usize {
        self.mentions.len()
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// What to do when a mass mention is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntitagAction {
    /// Delete the offending message
    #[default]
    Delete,
    /// Delete the message and remove the sender from the group
    Kick,
}

impl AntitagAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AntitagAction::Delete => "delete",
            AntitagAction::Kick => "kick",
        }
    }
}

impl fmt::Display for AntitagAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AntitagAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(AntitagAction::Delete),
            "kick" => Ok(AntitagAction::Kick),
            other => Err(format!("unknown antitag action: {other}")),
        }
    }
}

/// Per-group moderation policy. Read once per message, never mutated by detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    pub enabled: bool,
    #[serde(default)]
    pub action: AntitagAction,
}

impl ModerationPolicy {
    pub fn enabled(action: AntitagAction) -> Self {
        Self {
            enabled: true,
            action,
        }
    }
}

// ============================================================================
// TRANSPORT SHAPES
// ============================================================================

/// Current membership of a group, fetched fresh for every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRoster {
    pub participants: Vec<String>,
}

impl GroupRoster {
    pub fn size(&self) -> usize {
        self.participants.len()
    }
}

/// Structured request to delete one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteIntent {
    pub remote_jid: String,
    pub from_me: bool,
    pub id: String,
    pub participant: String,
}

impl DeleteIntent {
    /// Intent to delete `event`, a message sent by someone else.
    pub fn for_event(event: &MessageEvent) -> Self {
        Self {
            remote_jid: event.group_id.clone(),
            from_me: false,
            id: event.message_id.clone(),
            participant: event.sender_id.clone(),
        }
    }
}

/// Content handed to `ChatTransport::send_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Delete {
        delete: DeleteIntent,
    },
    Text {
        text: String,
        /// Participants referenced as `@<id>` in `text`
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        mentions: Vec<String>,
    },
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingMessage::Text {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    pub fn text_with_mentions(text: impl Into<String>, mentions: Vec<String>) -> Self {
        OutgoingMessage::Text {
            text: text.into(),
            mentions,
        }
    }

    pub fn delete(intent: DeleteIntent) -> Self {
        OutgoingMessage::Delete { delete: intent }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one transport call during enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The step was not part of the configured action
    NotAttempted,
    Succeeded,
    Failed { reason: String },
}

impl ActionResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, ActionResult::Succeeded)
    }

    #[cfg(test)]
    pub fn failed(&self) -> bool {
        matches!(self, ActionResult::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ActionResult::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// Result of one enforcement attempt. Only used to pick the notice text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationOutcome {
    pub action: AntitagAction,
    pub message_deleted: ActionResult,
    pub participant_removed: ActionResult,
    /// Whether the public notice reached the chat
    pub notice_sent: bool,
}

/// Result of threshold evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_attack: bool,
    pub threshold: usize,
    pub group_size: usize,
}

/// What happened to one message on its way through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No enabled policy for this group
    Inactive,
    /// Fewer distinct mentions than the pre-filter minimum
    BelowPrefilter { unique_mentions: usize },
    /// Roster could not be fetched; treated as benign
    RosterUnavailable,
    Benign(Classification),
    Enforced {
        classification: Classification,
        outcome: RemediationOutcome,
    },
}
