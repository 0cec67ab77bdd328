//! What the message-created hook reports back to the message store.

use domain::notification::{MentionReason, NotificationOutcome};
use domain::Id;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NotificationSummary {
    pub(crate) post_id: Id,
    pub(crate) recipients: BTreeMap<Id, MentionReason>,
    pub(crate) followers: Vec<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) out_of_channel_mentions: Vec<String>,
    /// Emails and pushes handed to the sender.
    pub(crate) deliveries: usize,
}

impl NotificationSummary {
    pub(crate) fn new(post_id: Id, outcome: &NotificationOutcome) -> Self {
        Self {
            post_id,
            recipients: outcome.recipients.clone(),
            followers: outcome.followers.clone(),
            out_of_channel_mentions: outcome.out_of_channel_mentions.clone(),
            deliveries: outcome.deliveries.len(),
        }
    }
}
