//! Notification domain: who a post notifies, and how.
//!
//! The crate is pure business logic. Live delivery is reached through the
//! [`events::EventPublisher`] and secondary notifications through
//! [`delivery::NotificationSender`]; neither transport is known here.

pub use events::Id;

pub mod channels;
pub mod delivery;
pub mod email;
pub mod error;
pub mod keywords;
pub mod mention;
pub mod notification;
pub mod posts;
pub mod push;
pub mod users;
