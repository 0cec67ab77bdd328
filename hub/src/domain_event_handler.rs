use crate::event::{BroadcastScope, OutboundEvent, EPHEMERAL_MESSAGE, POSTED, USER_ADDED, USER_REMOVED};
use crate::hooks::{HookArg, HookArgs, ADD_FOLLOWERS, ADD_MENTIONS, FOLLOWERS, MENTIONS};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler, Id};
use log::*;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Handles domain events by turning them into live events and broadcasting
/// them to the affected sessions.
///
/// The domain layer decides who is mentioned or following; this handler only
/// keeps the membership index current and attaches the hooks that let each
/// recipient learn about itself.
pub struct HubDomainEventHandler {
    manager: Arc<Manager>,
}

impl HubDomainEventHandler {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self { manager }
    }

    fn id_args(name: &str, ids: &[Id]) -> HookArgs {
        let ids = ids.iter().map(Id::to_string).collect();
        HashMap::from([(name.to_string(), HookArg::Ids(ids))])
    }
}

#[async_trait]
impl EventHandler for HubDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        let registry = self.manager.registry();

        match event {
            DomainEvent::PostCreated {
                channel_id,
                team_id,
                post,
                channel_name,
                channel_display_name,
                channel_type,
                sender_name,
                channel_member_ids,
                mentioned_user_ids,
                follower_ids,
            } => {
                debug!("Handling PostCreated event for channel {channel_id}");

                registry.set_channel_members(
                    channel_id.to_string(),
                    channel_member_ids.iter().map(Id::to_string),
                );

                let mut outbound = OutboundEvent::new(POSTED, BroadcastScope::channel(channel_id.to_string()))
                    .with_data("post", post.to_string())
                    .with_data("channel_name", channel_name.as_str())
                    .with_data("channel_display_name", channel_display_name.as_str())
                    .with_data("channel_type", channel_type.as_str())
                    .with_data("sender_name", sender_name.as_str())
                    .with_data(
                        "team_id",
                        team_id.map(|id| id.to_string()).unwrap_or_default(),
                    );

                if !mentioned_user_ids.is_empty() {
                    outbound = outbound
                        .with_hook(ADD_MENTIONS, Self::id_args(MENTIONS, mentioned_user_ids));
                }
                if !follower_ids.is_empty() {
                    outbound = outbound
                        .with_hook(ADD_FOLLOWERS, Self::id_args(FOLLOWERS, follower_ids));
                }

                self.manager.broadcast(outbound);
            }

            DomainEvent::ChannelMemberAdded {
                channel_id,
                team_id,
                user_id,
            } => {
                debug!("Handling ChannelMemberAdded event for user {user_id} in channel {channel_id}");

                registry.add_channel_member(channel_id.to_string(), user_id.to_string());
                if let Some(team_id) = team_id {
                    registry.add_team_member(team_id.to_string(), user_id.to_string());
                }

                self.manager.broadcast(
                    OutboundEvent::new(USER_ADDED, BroadcastScope::channel(channel_id.to_string()))
                        .with_data("user_id", user_id.to_string())
                        .with_data(
                            "team_id",
                            team_id.map(|id| id.to_string()).unwrap_or_default(),
                        ),
                );
            }

            DomainEvent::ChannelMemberRemoved {
                channel_id,
                user_id,
                removed_by,
            } => {
                debug!("Handling ChannelMemberRemoved event for user {user_id} in channel {channel_id}");

                // Broadcast first so the removed user still hears about it
                self.manager.broadcast(
                    OutboundEvent::new(USER_REMOVED, BroadcastScope::channel(channel_id.to_string()))
                        .with_data("user_id", user_id.to_string())
                        .with_data("remover_id", removed_by.to_string())
                        .with_data("channel_id", channel_id.to_string()),
                );

                registry.remove_channel_member(&channel_id.to_string(), &user_id.to_string());
            }

            DomainEvent::EphemeralMessage {
                user_id,
                channel_id,
                message,
            } => {
                debug!("Handling EphemeralMessage event for user {user_id}");

                let post = json!({
                    "channel_id": channel_id.to_string(),
                    "user_id": user_id.to_string(),
                    "message": message,
                    "type": "system_ephemeral",
                });

                self.manager.broadcast(
                    OutboundEvent::new(EPHEMERAL_MESSAGE, BroadcastScope::user(user_id.to_string()))
                        .with_data("post", post.to_string()),
                );
            }
        }
    }
}
