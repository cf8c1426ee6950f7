// Antitag service - mass-mention detection and enforcement.
//
// Per message, strictly in order:
// 1. read the group's policy once (disabled or missing -> stop)
// 2. extract mention signals
// 3. pre-filter, fetch the live roster, classify
// 4. on attack, delete and/or remove the sender and post a notice
//
// NO Discord dependencies here - the chat platform sits behind `ChatTransport`.

use super::antitag_models::{
    ActionResult, AntitagAction, Classification, DeleteIntent, Detection, GroupRoster,
    MentionScan, MessageEvent, ModerationPolicy, OutgoingMessage, RemediationOutcome,
};
use super::mention_extractor;
use super::threshold;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Failure of a single chat transport call (including timeouts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Insufficient permissions: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum AntitagError {
    #[error("Policy unavailable: {0}")]
    PolicyUnavailable(#[from] StoreError),

    #[error("Roster unavailable: {0}")]
    RosterUnavailable(TransportError),

    #[error("Antitag is not enabled for this group")]
    NotEnabled,
}

// ============================================================================
// PORTS
// ============================================================================

/// Per-group moderation policy storage.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// The stored policy, or `None` if the group never enabled antitag.
    async fn get_policy(&self, group_id: &str) -> Result<Option<ModerationPolicy>, StoreError>;

    /// Enable antitag for a group with the given action.
    async fn set_policy(&self, group_id: &str, action: AntitagAction) -> Result<(), StoreError>;

    /// Disable antitag for a group. Removing a missing policy is not an error.
    async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<P: PolicyStore + ?Sized> PolicyStore for Arc<P> {
    async fn get_policy(&self, group_id: &str) -> Result<Option<ModerationPolicy>, StoreError> {
        (**self).get_policy(group_id).await
    }

    async fn set_policy(&self, group_id: &str, action: AntitagAction) -> Result<(), StoreError> {
        (**self).set_policy(group_id, action).await
    }

    async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError> {
        (**self).remove_policy(group_id).await
    }
}

/// The chat platform, as seen by the antitag core.
///
/// Timeouts are the transport's business; a timed-out call is just an error.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post a text notice or carry out a delete intent.
    async fn send_message(
        &self,
        group_id: &str,
        message: OutgoingMessage,
    ) -> Result<(), TransportError>;

    /// Current participants of a group.
    async fn fetch_group_metadata(&self, group_id: &str) -> Result<GroupRoster, TransportError>;

    /// Remove participants from a group.
    async fn remove_participants(
        &self,
        group_id: &str,
        participant_ids: &[String],
    ) -> Result<(), TransportError>;
}

// ============================================================================
// NOTICES
// ============================================================================

pub const DELETE_NOTICE: &str =
    "⚠️ *Tagall Detected!*\nMessage deleted for mentioning too many members.";

pub const KICK_PERMISSION_NOTICE: &str =
    "⚠️ *Tagall Detected!*\nFailed to kick user (insufficient permissions).";

pub const KICK_FAILED_NOTICE: &str = "⚠️ *Tagall Detected!*\nFailed to kick user.";

/// The `@handle` form of a participant id, as rendered in notice text.
pub fn mention_handle(participant_id: &str) -> &str {
    participant_id.split('@').next().unwrap_or(participant_id)
}

/// Notice naming a removed sender.
pub fn kick_notice(sender_id: &str) -> String {
    format!(
        "🚫 *Antitag Detected!*\n\n@{} has been kicked for mass mentioning members.",
        mention_handle(sender_id)
    )
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Result of turning antitag on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    Enabled,
    AlreadyEnabled,
}

/// Mass-mention detection and enforcement for one chat platform.
pub struct AntitagService<S: PolicyStore, T: ChatTransport> {
    store: S,
    transport: T,
}

impl<S: PolicyStore, T: ChatTransport> AntitagService<S, T> {
    /// Create a new antitag service over a policy store and a transport.
    pub fn new(store: S, transport: T) -> Self {
        Self { store, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run detection for one inbound message.
    ///
    /// Never fails: every error is logged here so one bad message cannot stall
    /// intake for the ones after it.
    pub async fn detect(&self, event: &MessageEvent) {
        match self.process_message(event).await {
            Ok(Detection::Enforced {
                classification,
                outcome,
            }) => {
                tracing::info!(
                    group_id = %event.group_id,
                    sender = %event.sender_id,
                    message_id = %event.message_id,
                    action = %outcome.action,
                    threshold = classification.threshold,
                    group_size = classification.group_size,
                    deleted = outcome.message_deleted.succeeded(),
                    delete_error = ?outcome.message_deleted.failure_reason(),
                    removed = outcome.participant_removed.succeeded(),
                    remove_error = ?outcome.participant_removed.failure_reason(),
                    "Mass mention enforced"
                );
            }
            Ok(detection) => {
                tracing::debug!(group_id = %event.group_id, ?detection, "Message checked");
            }
            Err(e) => {
                tracing::error!(
                    group_id = %event.group_id,
                    message_id = %event.message_id,
                    "Error in tag detection: {}",
                    e
                );
            }
        }
    }

    /// The full per-message pipeline.
    ///
    /// The policy is read exactly once; a concurrent toggle takes effect on the
    /// next message.
    pub async fn process_message(&self, event: &MessageEvent) -> Result<Detection, AntitagError> {
        let policy = match self.store.get_policy(&event.group_id).await? {
            Some(policy) if policy.enabled => policy,
            _ => return Ok(Detection::Inactive),
        };

        let scan = mention_extractor::extract(event);
        if !threshold::needs_evaluation(scan.unique_count()) {
            return Ok(Detection::BelowPrefilter {
                unique_mentions: scan.unique_count(),
            });
        }

        let classification = match self.evaluate(&event.group_id, &scan).await {
            Ok(classification) => classification,
            Err(AntitagError::RosterUnavailable(e)) => {
                tracing::warn!(
                    group_id = %event.group_id,
                    "Failed to fetch group metadata, treating message as benign: {}",
                    e
                );
                return Ok(Detection::RosterUnavailable);
            }
            Err(e) => return Err(e),
        };

        if !classification.is_attack {
            return Ok(Detection::Benign(classification));
        }

        let outcome = self.enforce(policy.action, event).await;
        Ok(Detection::Enforced {
            classification,
            outcome,
        })
    }

    /// Classify a scan against the group's current size.
    ///
    /// Callers must check the pre-filter first; this always fetches the roster.
    pub async fn evaluate(
        &self,
        group_id: &str,
        scan: &MentionScan,
    ) -> Result<Classification, AntitagError> {
        let roster = self
            .transport
            .fetch_group_metadata(group_id)
            .await
            .map_err(AntitagError::RosterUnavailable)?;

        Ok(threshold::classify(
            scan.unique_count(),
            scan.numeric_count,
            roster.size(),
        ))
    }

    /// Carry out the configured action against a message and its sender.
    ///
    /// Deletion is always attempted first. No step's failure blocks another and
    /// nothing is retried.
    pub async fn enforce(&self, action: AntitagAction, event: &MessageEvent) -> RemediationOutcome {
        let message_deleted = self.delete_message(event).await;

        match action {
            AntitagAction::Delete => {
                // Sent even if the delete call failed.
                let notice_sent = self
                    .notify(&event.group_id, OutgoingMessage::text(DELETE_NOTICE))
                    .await;

                RemediationOutcome {
                    action,
                    message_deleted,
                    participant_removed: ActionResult::NotAttempted,
                    notice_sent,
                }
            }
            AntitagAction::Kick => {
                let participants = vec![event.sender_id.clone()];
                let removal = self
                    .transport
                    .remove_participants(&event.group_id, &participants)
                    .await;

                let (participant_removed, notice) = match removal {
                    Ok(()) => (
                        ActionResult::Succeeded,
                        OutgoingMessage::text_with_mentions(
                            kick_notice(&event.sender_id),
                            participants,
                        ),
                    ),
                    Err(e) => {
                        tracing::warn!(
                            group_id = %event.group_id,
                            sender = %event.sender_id,
                            "Failed to kick user: {}",
                            e
                        );
                        let text = match e {
                            TransportError::PermissionDenied(_) => KICK_PERMISSION_NOTICE,
                            _ => KICK_FAILED_NOTICE,
                        };
                        (
                            ActionResult::Failed {
                                reason: e.to_string(),
                            },
                            OutgoingMessage::text(text),
                        )
                    }
                };

                let notice_sent = self.notify(&event.group_id, notice).await;

                RemediationOutcome {
                    action,
                    message_deleted,
                    participant_removed,
                    notice_sent,
                }
            }
        }
    }

    async fn delete_message(&self, event: &MessageEvent) -> ActionResult {
        let intent = OutgoingMessage::delete(DeleteIntent::for_event(event));
        match self.transport.send_message(&event.group_id, intent).await {
            Ok(()) => ActionResult::Succeeded,
            Err(e) => {
                tracing::warn!(
                    group_id = %event.group_id,
                    message_id = %event.message_id,
                    "Failed to delete message: {}",
                    e
                );
                ActionResult::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn notify(&self, group_id: &str, message: OutgoingMessage) -> bool {
        match self.transport.send_message(group_id, message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(group_id = %group_id, "Failed to send antitag notice: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------------

    /// Current policy for a group.
    pub async fn status(&self, group_id: &str) -> Result<Option<ModerationPolicy>, AntitagError> {
        Ok(self.store.get_policy(group_id).await?)
    }

    /// Turn antitag on with the default `delete` action.
    pub async fn enable(&self, group_id: &str) -> Result<EnableOutcome, AntitagError> {
        if let Some(policy) = self.store.get_policy(group_id).await? {
            if policy.enabled {
                return Ok(EnableOutcome::AlreadyEnabled);
            }
        }

        self.store
            .set_policy(group_id, AntitagAction::default())
            .await?;
        Ok(EnableOutcome::Enabled)
    }

    /// Turn antitag off.
    pub async fn disable(&self, group_id: &str) -> Result<(), AntitagError> {
        Ok(self.store.remove_policy(group_id).await?)
    }

    /// Change the action. Antitag must already be on.
    pub async fn set_action(&self, group_id: &str, action: AntitagAction) -> Result<(), AntitagError> {
        match self.store.get_policy(group_id).await? {
            Some(policy) if policy.enabled => {
                self.store.set_policy(group_id, action).await?;
                Ok(())
            }
            _ => Err(AntitagError::NotEnabled),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::antitag::MessageContent;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory store for testing
    struct MockPolicyStore {
        policies: DashMap<String, ModerationPolicy>,
        fail_reads: AtomicBool,
        reads: AtomicUsize,
    }

    impl MockPolicyStore {
        fn new() -> Self {
            Self {
                policies: DashMap::new(),
                fail_reads: AtomicBool::new(false),
                reads: AtomicUsize::new(0),
            }
        }

        fn with_policy(group_id: &str, policy: ModerationPolicy) -> Self {
            let store = Self::new();
            store.policies.insert(group_id.to_string(), policy);
            store
        }
    }

    #[async_trait]
    impl PolicyStore for MockPolicyStore {
        async fn get_policy(
            &self,
            group_id: &str,
        ) -> Result<Option<ModerationPolicy>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::StorageError("database is locked".to_string()));
            }
            Ok(self.policies.get(group_id).map(|p| *p))
        }

        async fn set_policy(
            &self,
            group_id: &str,
            action: AntitagAction,
        ) -> Result<(), StoreError> {
            self.policies
                .insert(group_id.to_string(), ModerationPolicy::enabled(action));
            Ok(())
        }

        async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError> {
            self.policies.remove(group_id);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Send(OutgoingMessage),
        FetchRoster,
        Remove(Vec<String>),
    }

    /// Transport that records every call and fails on request.
    struct MockTransport {
        group_size: usize,
        calls: Mutex<Vec<Call>>,
        delete_error: Option<TransportError>,
        remove_error: Option<TransportError>,
        roster_error: Option<TransportError>,
    }

    impl MockTransport {
        fn new(group_size: usize) -> Self {
            Self {
                group_size,
                calls: Mutex::new(Vec::new()),
                delete_error: None,
                remove_error: None,
                roster_error: None,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn texts(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Send(OutgoingMessage::Text { text, .. }) => Some(text),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ChatTransport for MockTransport {
        async fn send_message(
            &self,
            _group_id: &str,
            message: OutgoingMessage,
        ) -> Result<(), TransportError> {
            let is_delete = matches!(message, OutgoingMessage::Delete { .. });
            self.calls.lock().unwrap().push(Call::Send(message));
            match (&self.delete_error, is_delete) {
                (Some(e), true) => Err(e.clone()),
                _ => Ok(()),
            }
        }

        async fn fetch_group_metadata(
            &self,
            _group_id: &str,
        ) -> Result<GroupRoster, TransportError> {
            self.calls.lock().unwrap().push(Call::FetchRoster);
            if let Some(e) = &self.roster_error {
                return Err(e.clone());
            }
            Ok(GroupRoster {
                participants: (0..self.group_size).map(|i| format!("member{i}")).collect(),
            })
        }

        async fn remove_participants(
            &self,
            _group_id: &str,
            participant_ids: &[String],
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Remove(participant_ids.to_vec()));
            match &self.remove_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    const GROUP: &str = "120363000000000000@g.us";
    const SENDER: &str = "15550001111@s.whatsapp.net";

    fn event_with(text: &str, mentioned: &[&str]) -> MessageEvent {
        MessageEvent {
            group_id: GROUP.to_string(),
            sender_id: SENDER.to_string(),
            message_id: "3EB0ABCDEF".to_string(),
            content: MessageContent::text(text),
            mentioned_ids: mentioned.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn three_structural_mentions() -> MessageEvent {
        event_with(
            "",
            &[
                "15550000001@s.whatsapp.net",
                "15550000002@s.whatsapp.net",
                "15550000003@s.whatsapp.net",
            ],
        )
    }

    fn enabled(action: AntitagAction) -> MockPolicyStore {
        MockPolicyStore::with_policy(GROUP, ModerationPolicy::enabled(action))
    }

    #[tokio::test]
    async fn test_disabled_policy_makes_no_transport_calls() {
        let store = MockPolicyStore::with_policy(
            GROUP,
            ModerationPolicy {
                enabled: false,
                action: AntitagAction::Kick,
            },
        );
        let service = AntitagService::new(store, MockTransport::new(5));

        let event = event_with("@1234567890 @1234567891 @1234567892 @1234567893 @1234567894", &[]);
        service.detect(&event).await;

        assert!(service.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_policy_is_inactive() {
        let service = AntitagService::new(MockPolicyStore::new(), MockTransport::new(5));

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        assert_eq!(detection, Detection::Inactive);
        assert!(service.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed_by_detect() {
        let store = enabled(AntitagAction::Delete);
        store.fail_reads.store(true, Ordering::SeqCst);
        let service = AntitagService::new(store, MockTransport::new(5));

        let event = three_structural_mentions();
        assert!(matches!(
            service.process_message(&event).await,
            Err(AntitagError::PolicyUnavailable(_))
        ));

        service.detect(&event).await;
        assert!(service.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_action_in_small_group() {
        let service = AntitagService::new(enabled(AntitagAction::Delete), MockTransport::new(10));
        let event = three_structural_mentions();

        let detection = service.process_message(&event).await.unwrap();

        let Detection::Enforced { outcome, .. } = detection else {
            panic!("expected enforcement, got {detection:?}");
        };
        assert!(outcome.message_deleted.succeeded());
        assert_eq!(outcome.participant_removed, ActionResult::NotAttempted);
        assert_eq!(
            service.transport.calls(),
            vec![
                Call::FetchRoster,
                Call::Send(OutgoingMessage::delete(DeleteIntent::for_event(&event))),
                Call::Send(OutgoingMessage::text(DELETE_NOTICE)),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_notice_sent_even_when_delete_fails() {
        let mut transport = MockTransport::new(10);
        transport.delete_error = Some(TransportError::Request("timed out".to_string()));
        let service = AntitagService::new(enabled(AntitagAction::Delete), transport);

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        let Detection::Enforced { outcome, .. } = detection else {
            panic!("expected enforcement, got {detection:?}");
        };
        assert!(outcome.message_deleted.failed());
        assert!(outcome.notice_sent);
        assert_eq!(service.transport.texts(), vec![DELETE_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_kick_continues_after_delete_failure() {
        let mut transport = MockTransport::new(10);
        transport.delete_error = Some(TransportError::NotFound("message".to_string()));
        let service = AntitagService::new(enabled(AntitagAction::Kick), transport);

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        let Detection::Enforced { outcome, .. } = detection else {
            panic!("expected enforcement, got {detection:?}");
        };
        assert_eq!(
            outcome.message_deleted.failure_reason(),
            Some("Not found: message")
        );
        assert!(outcome.participant_removed.succeeded());

        let calls = service.transport.calls();
        assert!(calls.contains(&Call::Remove(vec![SENDER.to_string()])));
        assert_eq!(
            calls.last(),
            Some(&Call::Send(OutgoingMessage::text_with_mentions(
                kick_notice(SENDER),
                vec![SENDER.to_string()],
            )))
        );
        assert!(service.transport.texts()[0].contains("@15550001111 has been kicked"));
    }

    #[tokio::test]
    async fn test_kick_permission_failure_notice() {
        let mut transport = MockTransport::new(10);
        transport.remove_error = Some(TransportError::PermissionDenied(
            "not an admin".to_string(),
        ));
        let service = AntitagService::new(enabled(AntitagAction::Kick), transport);

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        let Detection::Enforced { outcome, .. } = detection else {
            panic!("expected enforcement, got {detection:?}");
        };
        assert!(outcome.message_deleted.succeeded());
        assert!(outcome.participant_removed.failed());
        assert_eq!(
            service.transport.texts(),
            vec![KICK_PERMISSION_NOTICE.to_string()]
        );
        assert!(KICK_PERMISSION_NOTICE.contains("insufficient permissions"));
    }

    #[tokio::test]
    async fn test_kick_other_failure_uses_generic_notice() {
        let mut transport = MockTransport::new(10);
        transport.remove_error = Some(TransportError::Request("503".to_string()));
        let service = AntitagService::new(enabled(AntitagAction::Kick), transport);

        service.detect(&three_structural_mentions()).await;

        assert_eq!(service.transport.texts(), vec![KICK_FAILED_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_policy_read_once_per_enforced_kick() {
        let mut transport = MockTransport::new(10);
        transport.remove_error = Some(TransportError::PermissionDenied(
            "not an admin".to_string(),
        ));
        let service = AntitagService::new(enabled(AntitagAction::Kick), transport);

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        assert!(matches!(detection, Detection::Enforced { .. }));
        assert_eq!(service.store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_policy_read_once_below_prefilter() {
        let service = AntitagService::new(enabled(AntitagAction::Kick), MockTransport::new(3));
        let event = event_with("@1, @2", &[]);

        service.detect(&event).await;

        assert_eq!(service.store.reads.load(Ordering::SeqCst), 1);
        assert!(service.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_two_mentions_never_fetch_roster() {
        let service = AntitagService::new(enabled(AntitagAction::Kick), MockTransport::new(3));
        let event = event_with(
            "",
            &["15550000001@s.whatsapp.net", "15550000002@s.whatsapp.net"],
        );

        let detection = service.process_message(&event).await.unwrap();

        assert_eq!(detection, Detection::BelowPrefilter { unique_mentions: 2 });
        assert!(service.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_roster_failure_fails_open() {
        let mut transport = MockTransport::new(0);
        transport.roster_error = Some(TransportError::Request("connection reset".to_string()));
        let service = AntitagService::new(enabled(AntitagAction::Kick), transport);

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        assert_eq!(detection, Detection::RosterUnavailable);
        assert_eq!(service.transport.calls(), vec![Call::FetchRoster]);
    }

    #[tokio::test]
    async fn test_below_threshold_in_medium_group_is_benign() {
        let service = AntitagService::new(enabled(AntitagAction::Delete), MockTransport::new(20));

        let detection = service
            .process_message(&three_structural_mentions())
            .await
            .unwrap();

        let Detection::Benign(classification) = detection else {
            panic!("expected benign, got {detection:?}");
        };
        assert_eq!(classification.threshold, 8);
        assert_eq!(service.transport.calls(), vec![Call::FetchRoster]);
    }

    #[tokio::test]
    async fn test_numeric_tripwire_in_large_group() {
        let service = AntitagService::new(enabled(AntitagAction::Delete), MockTransport::new(500));
        let event = event_with(
            "@1234567890, @1234567891, @1234567892, @1234567893, @1234567894",
            &[],
        );

        let detection = service.process_message(&event).await.unwrap();

        assert!(matches!(detection, Detection::Enforced { .. }));
    }

    #[tokio::test]
    async fn test_enable_and_set_action() {
        let service = AntitagService::new(MockPolicyStore::new(), MockTransport::new(0));

        assert!(matches!(
            service.set_action(GROUP, AntitagAction::Kick).await,
            Err(AntitagError::NotEnabled)
        ));

        assert_eq!(service.enable(GROUP).await.unwrap(), EnableOutcome::Enabled);
        assert_eq!(
            service.enable(GROUP).await.unwrap(),
            EnableOutcome::AlreadyEnabled
        );
        assert_eq!(
            service.status(GROUP).await.unwrap(),
            Some(ModerationPolicy::enabled(AntitagAction::Delete))
        );

        service.set_action(GROUP, AntitagAction::Kick).await.unwrap();
        assert_eq!(
            service.status(GROUP).await.unwrap(),
            Some(ModerationPolicy::enabled(AntitagAction::Kick))
        );

        service.disable(GROUP).await.unwrap();
        assert_eq!(service.status(GROUP).await.unwrap(), None);
    }

    #[test]
    fn test_mention_handle_strips_domain() {
        assert_eq!(mention_handle("15550001111@s.whatsapp.net"), "15550001111");
        assert_eq!(mention_handle("123456789012345678"), "123456789012345678");
    }
}
