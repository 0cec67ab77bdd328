//! Turns a newly stored post into live events and secondary notifications.
//!
//! [`Notifier::on_message_created`] runs the linear pipeline
//! `Received → MentionsResolved → RecipientsFiltered → LiveEventEmitted →
//! SecondaryNotificationsDispatched → Done`. The live event goes out through the
//! [`EventPublisher`]; emails and pushes are handed to a [`NotificationSender`]
//! on a spawned task so the caller never waits on them.

use crate::channels::{Channel, ChannelMemberProfile, ChannelType, NotifyLevel, Team};
use crate::delivery::{NotificationPayload, NotificationSender, PlannedDelivery};
use crate::email::{EmailContext, EmailNotification};
use crate::error::Error;
use crate::keywords::{channel_mentions_allowed, mention_keywords_in_channel};
use crate::mention::{explicit_mentions, ExplicitMentions};
use crate::posts::Post;
use crate::push::{PushContext, PushNotification};
use crate::users::{PushLevel, Status, User};
use crate::Id;
use events::{DomainEvent, EventPublisher};
use log::*;
use serde::Serialize;
use service::config::Config;
use service::logging::NOTIFICATIONS_TARGET;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Why a recipient is being notified. Later variants are stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionReason {
    Here,
    ChannelWide,
    DirectMessage,
    Explicit,
}

impl MentionReason {
    fn is_channel_wide(self) -> bool {
        matches!(self, MentionReason::Here | MentionReason::ChannelWide)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStage {
    Received,
    MentionsResolved,
    RecipientsFiltered,
    LiveEventEmitted,
    SecondaryNotificationsDispatched,
    Done,
}

impl fmt::Display for NotificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            NotificationStage::Received => "received",
            NotificationStage::MentionsResolved => "mentions resolved",
            NotificationStage::RecipientsFiltered => "recipients filtered",
            NotificationStage::LiveEventEmitted => "live event emitted",
            NotificationStage::SecondaryNotificationsDispatched => {
                "secondary notifications dispatched"
            }
            NotificationStage::Done => "done",
        };
        write!(f, "{stage}")
    }
}

/// A post that was just stored, with the caller's snapshot of the channel.
#[derive(Debug, Clone, Copy)]
pub struct MessageCreated<'a> {
    pub post: &'a Post,
    pub channel: &'a Channel,
    /// `None` for direct and group channels.
    pub team: Option<&'a Team>,
    pub sender: &'a User,
    /// Profiles of the channel members, including the author.
    pub members: &'a [ChannelMemberProfile],
    /// Total member count, used for the channel-wide mention threshold.
    pub member_count: usize,
    /// Users following the thread the post replies to.
    pub thread_followers: &'a [Id],
    /// Lower-cased usernames of people who could be mentioned from this
    /// channel, such as the team's users. Only these are reported back to the
    /// author as out of the channel.
    pub known_users: &'a HashMap<String, Id>,
}

/// What the pipeline decided for one post.
#[derive(Debug)]
pub struct NotificationOutcome {
    pub mentions: ExplicitMentions,
    /// Recipients that survived filtering and why they are notified.
    pub recipients: BTreeMap<Id, MentionReason>,
    /// Thread followers told about the post without being mentioned.
    pub followers: Vec<Id>,
    /// `@names` in the post that belong to known users outside the channel.
    pub out_of_channel_mentions: Vec<String>,
    pub deliveries: Vec<PlannedDelivery>,
    /// Task delivering `deliveries`, `None` when there was nothing to send.
    pub delivery: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct Notifier {
    config: Config,
    publisher: EventPublisher,
    sender: Arc<dyn NotificationSender>,
}

impl Notifier {
    pub fn new(config: Config, publisher: EventPublisher, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            config,
            publisher,
            sender,
        }
    }

    /// Runs the notification pipeline for a post that has been durably stored.
    pub async fn on_message_created(
        &self,
        message: MessageCreated<'_>,
    ) -> Result<NotificationOutcome, Error> {
        let post = message.post;
        let channel = message.channel;
        let stage = |stage: NotificationStage| debug!("Post {}: {stage}", post.id);

        if post.channel_id != channel.id {
            return Err(Error::invalid(format!(
                "post {} belongs to channel {}, not {}",
                post.id, post.channel_id, channel.id
            )));
        }
        stage(NotificationStage::Received);

        let members: HashMap<Id, &ChannelMemberProfile> = message
            .members
            .iter()
            .map(|member| (member.user.id, member))
            .collect();

        let allow_channel_mentions = channel_mentions_allowed(
            message.member_count,
            self.config.max_notifications_per_channel(),
        );
        if !allow_channel_mentions {
            debug!(
                "Channel {} has {} members, channel-wide mentions are disabled",
                channel.id, message.member_count
            );
        }

        let keywords = mention_keywords_in_channel(
            message.members.iter().map(|member| &member.user),
            allow_channel_mentions,
        );
        let mentions = explicit_mentions(&post.message, &keywords);
        let candidates = mention_candidates(&message, &mentions, allow_channel_mentions);
        stage(NotificationStage::MentionsResolved);

        let recipients: BTreeMap<Id, MentionReason> = candidates
            .into_iter()
            .filter(|(id, reason)| should_notify(&message, &members, *id, *reason))
            .collect();
        let followers = thread_followers(&message, &recipients);
        let out_of_channel_mentions = match channel.channel_type {
            ChannelType::Open | ChannelType::Private => {
                out_of_channel_mentions(&message, &members, &mentions)
            }
            ChannelType::Direct | ChannelType::Group => Vec::new(),
        };
        stage(NotificationStage::RecipientsFiltered);

        self.emit_live_events(&message, &recipients, &followers, &out_of_channel_mentions)
            .await?;
        stage(NotificationStage::LiveEventEmitted);

        let deliveries = self.plan_deliveries(&message, &members, &recipients);
        let delivery = self.dispatch(post.id, deliveries.clone());
        stage(NotificationStage::SecondaryNotificationsDispatched);

        info!(
            "Post {} in channel {}: {} recipients, {} followers, {} deliveries",
            post.id,
            channel.id,
            recipients.len(),
            followers.len(),
            deliveries.len()
        );
        stage(NotificationStage::Done);

        Ok(NotificationOutcome {
            mentions,
            recipients,
            followers,
            out_of_channel_mentions,
            deliveries,
            delivery,
        })
    }

    async fn emit_live_events(
        &self,
        message: &MessageCreated<'_>,
        recipients: &BTreeMap<Id, MentionReason>,
        followers: &[Id],
        out_of_channel_mentions: &[String],
    ) -> Result<(), Error> {
        let channel = message.channel;

        self.publisher
            .publish(DomainEvent::PostCreated {
                channel_id: channel.id,
                team_id: channel.team_id,
                post: serde_json::to_value(message.post)?,
                channel_name: channel.name.clone(),
                channel_display_name: channel.display_name.clone(),
                channel_type: channel.channel_type.as_str().to_string(),
                sender_name: message.sender.display_name(),
                channel_member_ids: message.members.iter().map(|m| m.user.id).collect(),
                mentioned_user_ids: recipients.keys().copied().collect(),
                follower_ids: followers.to_vec(),
            })
            .await;

        if !out_of_channel_mentions.is_empty() {
            debug!(
                "Post {} mentions {} users outside channel {}",
                message.post.id,
                out_of_channel_mentions.len(),
                channel.id
            );
            self.publisher
                .publish(DomainEvent::EphemeralMessage {
                    user_id: message.sender.id,
                    channel_id: channel.id,
                    message: out_of_channel_message(out_of_channel_mentions),
                })
                .await;
        }

        Ok(())
    }

    fn plan_deliveries(
        &self,
        message: &MessageCreated<'_>,
        members: &HashMap<Id, &ChannelMemberProfile>,
        recipients: &BTreeMap<Id, MentionReason>,
    ) -> Vec<PlannedDelivery> {
        let sender_name = message.sender.display_name();
        let site_url = self.config.site_url();
        let (team_name, team_url) = match message.team {
            Some(team) => (team.display_name.clone(), format!("{site_url}/{}", team.name)),
            None => ("Direct Messages".to_string(), site_url.to_string()),
        };

        let mut deliveries = Vec::new();

        for member in message.members {
            let user = &member.user;
            let reason = recipients.get(&user.id).copied();

            if reason.is_some() && self.should_email(member) {
                let email = EmailNotification::render(&EmailContext {
                    site_name: self.config.site_name(),
                    team_name: &team_name,
                    team_url: &team_url,
                    channel: message.channel,
                    post: message.post,
                    sender_name: &sender_name,
                    contents: user.notify_props.contents,
                });
                deliveries.push(PlannedDelivery {
                    recipient_id: user.id,
                    payload: NotificationPayload::Email(email),
                });
            }

            let wants_push = match reason {
                Some(_) => true,
                // Members who asked for every post get a push without being mentioned.
                None => {
                    wants_every_post(member)
                        && should_notify(message, members, user.id, MentionReason::Here)
                }
            };
            if wants_push && self.should_push(member) {
                let push = PushNotification::render(&PushContext {
                    post_id: message.post.id,
                    channel: message.channel,
                    sender_name: &sender_name,
                    message: &message.post.message,
                    explicit_mention: reason == Some(MentionReason::Explicit),
                    contents: user.notify_props.contents,
                });
                deliveries.push(PlannedDelivery {
                    recipient_id: user.id,
                    payload: NotificationPayload::Push(push),
                });
            }
        }

        deliveries
    }

    fn should_email(&self, member: &ChannelMemberProfile) -> bool {
        self.config.send_email_notifications()
            && member.user.notify_props.email
            && member.status != Status::Online
    }

    fn should_push(&self, member: &ChannelMemberProfile) -> bool {
        let props = &member.user.notify_props;
        self.config.send_push_notifications()
            && props.push != PushLevel::None
            && member.status != Status::Dnd
            && props.push_status.allows(member.status)
    }

    fn dispatch(&self, post_id: Id, deliveries: Vec<PlannedDelivery>) -> Option<JoinHandle<()>> {
        if deliveries.is_empty() {
            return None;
        }

        let sender = self.sender.clone();
        Some(tokio::spawn(async move {
            for delivery in deliveries {
                let kind = delivery.payload.kind();
                let recipient_id = delivery.recipient_id;
                match sender.deliver(recipient_id, delivery.payload).await {
                    Ok(()) => debug!(
                        target: NOTIFICATIONS_TARGET,
                        "Delivered {kind} notification for post {post_id} to {recipient_id}"
                    ),
                    Err(e) => warn!(
                        target: NOTIFICATIONS_TARGET,
                        "Failed to deliver {kind} notification for post {post_id} to {recipient_id}: {e}"
                    ),
                }
            }
        }))
    }
}

/// Collects everyone the post might notify, keeping the strongest reason per recipient.
fn mention_candidates(
    message: &MessageCreated<'_>,
    mentions: &ExplicitMentions,
    allow_channel_mentions: bool,
) -> HashMap<Id, MentionReason> {
    let mut candidates = HashMap::new();
    let mut add = |id: Id, reason: MentionReason| {
        candidates
            .entry(id)
            .and_modify(|current: &mut MentionReason| *current = (*current).max(reason))
            .or_insert(reason);
    };

    for id in &mentions.named_user_ids {
        add(*id, MentionReason::Explicit);
    }
    for id in &mentions.channel_wide_user_ids {
        add(*id, MentionReason::ChannelWide);
    }

    if mentions.here_mentioned && allow_channel_mentions {
        for member in message.members {
            if member.status == Status::Online && member.user.notify_props.channel {
                add(member.user.id, MentionReason::Here);
            }
        }
    }

    if message.channel.channel_type.is_direct_or_group() {
        for member in message.members {
            add(member.user.id, MentionReason::DirectMessage);
        }
    }

    candidates
}

fn should_notify(
    message: &MessageCreated<'_>,
    members: &HashMap<Id, &ChannelMemberProfile>,
    id: Id,
    reason: MentionReason,
) -> bool {
    if id == message.sender.id {
        return false;
    }
    let Some(member) = members.get(&id) else {
        return false;
    };
    if !member.user.is_active {
        return false;
    }
    if member.notify_props.muted && reason.is_channel_wide() {
        return false;
    }
    member.notify_props.notify_level != NotifyLevel::None
}

fn wants_every_post(member: &ChannelMemberProfile) -> bool {
    member.user.notify_props.push == PushLevel::All
        || member.notify_props.notify_level == NotifyLevel::All
}

/// Followers of the thread who are not the author and not already notified.
fn thread_followers(message: &MessageCreated<'_>, recipients: &BTreeMap<Id, MentionReason>) -> Vec<Id> {
    let mut seen = HashSet::new();
    message
        .thread_followers
        .iter()
        .copied()
        .filter(|id| *id != message.sender.id && !recipients.contains_key(id))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Potential mentions naming a known user who is not a member of the channel.
/// Names that belong to nobody, typos included, are left out.
fn out_of_channel_mentions(
    message: &MessageCreated<'_>,
    members: &HashMap<Id, &ChannelMemberProfile>,
    mentions: &ExplicitMentions,
) -> Vec<String> {
    mentions
        .other_potential_mentions
        .iter()
        .filter(|name| {
            message
                .known_users
                .get(&name.to_lowercase())
                .is_some_and(|id| !members.contains_key(id))
        })
        .cloned()
        .collect()
}

/// "@a did not get notified..." or "@a, @b and @c did not get notified..."
fn out_of_channel_message(names: &[String]) -> String {
    let mentions: Vec<String> = names.iter().map(|name| format!("@{name}")).collect();
    match mentions.split_last() {
        Some((last, [])) => format!(
            "{last} did not get notified by this mention because they are not in the channel."
        ),
        Some((last, rest)) => format!(
            "{} and {last} did not get notified by this mention because they are not in the channel.",
            rest.join(", ")
        ),
        None => String::new(),
    }
}
