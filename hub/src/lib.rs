//! Live event hub: connection registry, broadcast dispatcher and per-recipient hooks.
//!
//! # Architecture
//!
//! - **Multiple sessions per recipient**: every open client connection is a
//!   [`connection::Session`] with its own bounded outbound queue.
//! - **Indexed registry**: O(1) lookups by connection and by user via separate
//!   DashMap indices, plus channel and team membership indices used to resolve
//!   broadcast scopes.
//! - **Shared events, per-recipient views**: an [`event::OutboundEvent`] is
//!   built once and shared; hooks add recipient-specific keys to an overlay in
//!   each session's [`event::EventView`].
//! - **Non-blocking fan-out**: the dispatcher never waits on a queue. A session
//!   that cannot keep up is disconnected and sees fresh data on reconnect.
//!
//! # Message Flow
//!
//! 1. A client connects and the transport registers a session for its user
//! 2. The domain layer publishes a [`events::DomainEvent`] after storing a change
//! 3. [`HubDomainEventHandler`] updates membership and builds an outbound event
//! 4. [`Manager::broadcast`] snapshots the candidate sessions, runs the hooks
//!    for each one and enqueues the resulting view
//! 5. The transport drains the session's [`connection::SessionReceiver`] and
//!    writes each view to the wire
//!
//! # Example: Broadcasting an event
//!
//! ```rust,ignore
//! use hub::event::{BroadcastScope, OutboundEvent, USER_ADDED};
//!
//! manager.broadcast(
//!     OutboundEvent::new(USER_ADDED, BroadcastScope::channel(channel_id.to_string()))
//!         .with_data("user_id", user_id.to_string()),
//! );
//! ```

pub mod connection;
pub mod domain_event_handler;
pub mod event;
pub mod hooks;
pub mod manager;

pub use domain_event_handler::HubDomainEventHandler;
pub use manager::Manager;
