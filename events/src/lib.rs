//! Event system infrastructure for the notification platform.
//!
//! This crate decouples the notification domain from the live transport.
//! The domain layer decides *who* is affected by a change and publishes a
//! [`DomainEvent`]; infrastructure handlers (the live-session hub) turn those
//! events into outbound messages.
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates, avoiding circular
//! dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any entity's id field data type.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the system.
/// These events are emitted after the change has been durably stored.
///
/// Events carry the user IDs needed for routing. The domain layer is
/// responsible for computing them; handlers only route.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted once per new post, after mentions were resolved and recipients filtered.
    PostCreated {
        /// Channel the post belongs to. The live event is scoped to this channel.
        channel_id: Id,
        /// Team owning the channel. `None` for direct and group channels.
        team_id: Option<Id>,
        /// Complete serialized post.
        post: Value,
        /// Channel name and display name, used by clients to render the notification.
        channel_name: String,
        channel_display_name: String,
        /// Wire name of the channel type ("O", "P", "D", "G").
        channel_type: String,
        /// Display name of the author.
        sender_name: String,
        /// Snapshot of the channel's members at the time the post was created.
        channel_member_ids: Vec<Id>,
        /// Users that were mentioned and passed notification filtering.
        /// Each session only learns whether its own user is in this list.
        mentioned_user_ids: Vec<Id>,
        /// Thread followers that were not otherwise mentioned.
        follower_ids: Vec<Id>,
    },
    /// A user joined a channel.
    ChannelMemberAdded {
        channel_id: Id,
        team_id: Option<Id>,
        user_id: Id,
    },
    /// A user left or was removed from a channel.
    ChannelMemberRemoved {
        channel_id: Id,
        user_id: Id,
        /// Who performed the removal. Equal to `user_id` when the user left.
        removed_by: Id,
    },
    /// A message only one user should see (e.g. feedback about out-of-channel mentions).
    EphemeralMessage {
        user_id: Id,
        channel_id: Id,
        message: String,
    },
}

impl DomainEvent {
    /// Short stable name, used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::PostCreated { .. } => "post_created",
            DomainEvent::ChannelMemberAdded { .. } => "channel_member_added",
            DomainEvent::ChannelMemberRemoved { .. } => "channel_member_removed",
            DomainEvent::EphemeralMessage { .. } => "ephemeral_message",
        }
    }
}

/// Trait for handling domain events.
/// Implementations can perform side effects like pushing live events,
/// invalidating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially. A handler is expected to log its own
    /// failures; publishing always continues with the remaining handlers.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
