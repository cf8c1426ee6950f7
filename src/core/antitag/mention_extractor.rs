// Mention extraction - turns one message into a set of mention signals.
//
// Three independent sources feed the set:
// - structural identity references surfaced by the transport
// - a broad "tag-like token" text pattern
// - a strict "numeric mention" text pattern
//
// Text matching is a heuristic. Obfuscated mentions slip through and some
// phone-number-shaped text is over-counted; that is accepted.

use super::antitag_models::{MentionScan, MentionSet, MentionSignal, MessageEvent};
use regex::Regex;
use std::sync::OnceLock;

/// `@` followed by digits, `+`, whitespace, hyphens, parentheses, tildes or dots.
const TAG_LIKE_PATTERN: &str = r"@[0-9+\s\-()~.]+";

/// `@` followed by at least ten consecutive digits.
const NUMERIC_PATTERN: &str = r"@[0-9]{10,}";

fn tag_like_regex() -> &'static Regex {
    static TAG_LIKE: OnceLock<Regex> = OnceLock::new();
    TAG_LIKE.get_or_init(|| Regex::new(TAG_LIKE_PATTERN).expect("valid regex"))
}

fn numeric_regex() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(NUMERIC_PATTERN).expect("valid regex"))
}

/// Every non-overlapping tag-like match in `text`, in order.
pub fn tag_like_mentions(text: &str) -> impl Iterator<Item = &str> {
    tag_like_regex().find_iter(text).map(|m| m.as_str())
}

/// Every non-overlapping strict numeric match in `text`, in order.
pub fn numeric_mentions(text: &str) -> impl Iterator<Item = &str> {
    numeric_regex().find_iter(text).map(|m| m.as_str())
}

/// Whether a structural reference is a stand-in for "nobody".
///
/// Transports emit these for malformed or unset mentions, e.g.
/// `undefined@s.whatsapp.net`.
pub fn is_placeholder_identity(id: &str) -> bool {
    let id = id.trim();
    if id.is_empty() {
        return true;
    }
    let local = id.split('@').next().unwrap_or_default();
    local.is_empty() || local == "undefined" || local == "null"
}

/// Extract the mention signals from one message.
///
/// Pure: the same event always yields the same scan.
pub fn extract(event: &MessageEvent) -> MentionScan {
    let body = event.content.body();
    let mut mentions = MentionSet::new();

    for id in &event.mentioned_ids {
        if !is_placeholder_identity(id) {
            mentions.insert(MentionSignal::Identity(id.clone()));
        }
    }

    for tag in tag_like_mentions(body) {
        mentions.insert(MentionSignal::Text(tag.to_string()));
    }

    let mut numeric_count = 0;
    for tag in numeric_mentions(body) {
        numeric_count += 1;
        mentions.insert(MentionSignal::Text(tag.to_string()));
    }

    MentionScan {
        mentions,
        numeric_count,
    }
}
