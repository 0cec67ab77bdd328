//! Boundary to the email transport and push proxy.

use crate::email::EmailNotification;
use crate::error::Error;
use crate::push::PushNotification;
use crate::Id;
use async_trait::async_trait;
use log::*;
use serde::Serialize;
use service::logging::NOTIFICATIONS_TARGET;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    Email(EmailNotification),
    Push(PushNotification),
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::Email(_) => "email",
            NotificationPayload::Push(_) => "push",
        }
    }
}

/// A notification planned for one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDelivery {
    pub recipient_id: Id,
    pub payload: NotificationPayload,
}

/// Hands secondary notifications to whatever transport is configured.
///
/// Implementations are called from a spawned task; errors are logged by the
/// caller and never surface to whoever created the post.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn deliver(&self, recipient_id: Id, payload: NotificationPayload) -> Result<(), Error>;
}

/// Sender that only logs what it would deliver. Used when no transport is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn deliver(&self, recipient_id: Id, payload: NotificationPayload) -> Result<(), Error> {
        info!(
            target: NOTIFICATIONS_TARGET,
            "{} notification for {recipient_id}: {}",
            payload.kind(),
            serde_json::to_string(&payload)?
        );
        Ok(())
    }
}
