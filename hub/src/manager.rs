use crate::connection::{ConnectionId, ConnectionRegistry, Session, SessionReceiver, UserId};
use crate::event::{EventView, OutboundEvent};
use crate::hooks::HookRegistry;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// Queue capacity used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Result of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Views enqueued.
    pub delivered: usize,
    /// Sessions dropped because their queue was full or closed.
    pub disconnected: usize,
}

/// Routes outbound events to live sessions.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    hooks: HookRegistry,
    queue_capacity: usize,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            hooks: HookRegistry::with_default_hooks(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Membership indexes live on the registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register a new connection and return its session and queue receiver
    pub fn register_connection(
        &self,
        user_id: impl Into<UserId>,
        locale: impl Into<String>,
    ) -> (Arc<Session>, SessionReceiver) {
        let (session, receiver) = self
            .registry
            .register(user_id, locale, self.queue_capacity);
        info!(
            "Registered live connection {} for user {} ({})",
            session.id().as_str(),
            session.user_id(),
            session.locale()
        );
        (session, receiver)
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if self.registry.unregister(connection_id).is_some() {
            info!("Unregistered live connection {}", connection_id.as_str());
        }
    }

    /// Delivers an event to every live session its scope selects.
    ///
    /// Candidates are snapshotted first; hooks run and views are enqueued
    /// without holding any registry guard. Enqueueing never waits: a session
    /// whose queue is full is disconnected, one whose writer is gone is removed.
    pub fn broadcast(&self, event: OutboundEvent) -> BroadcastReport {
        let event = Arc::new(event);
        let sessions = self.registry.candidates(event.scope());
        let mut report = BroadcastReport::default();

        for session in sessions {
            // Unregistered after the snapshot was taken
            if !session.is_alive() {
                continue;
            }

            let mut view = EventView::new(event.clone());
            self.hooks.apply(&mut view, &session);

            match session.try_send(view) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    if self.registry.unregister(session.id()).is_some() {
                        warn!(
                            "Disconnecting slow connection {} for user {}: outbound queue is full",
                            session.id().as_str(),
                            session.user_id()
                        );
                    }
                    report.disconnected += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    if self.registry.unregister(session.id()).is_some() {
                        debug!(
                            "Removed closed connection {} for user {}",
                            session.id().as_str(),
                            session.user_id()
                        );
                    }
                    report.disconnected += 1;
                }
            }
        }

        debug!(
            "Broadcast {} event to {} session(s), {} disconnected",
            event.event_type(),
            report.delivered,
            report.disconnected
        );
        report
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
