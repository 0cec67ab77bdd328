//! Channels, teams and per-member channel preferences.

use crate::users::{Status, User};
use crate::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
}

impl ChannelType {
    /// Wire name used by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Open => "O",
            ChannelType::Private => "P",
            ChannelType::Direct => "D",
            ChannelType::Group => "G",
        }
    }

    /// Direct and group channels notify every member on every post.
    pub fn is_direct_or_group(&self) -> bool {
        matches!(self, ChannelType::Direct | ChannelType::Group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Id,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Id,
    /// `None` for direct and group channels.
    pub team_id: Option<Id>,
    pub name: String,
    pub display_name: String,
    pub channel_type: ChannelType,
}

/// Channel-level notification override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    #[default]
    Default,
    All,
    Mention,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelNotifyProps {
    /// A muted channel does not notify on @channel, @all or @here.
    pub muted: bool,
    pub notify_level: NotifyLevel,
}

/// Everything the notification pipeline needs to know about one channel member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMemberProfile {
    pub user: User,
    #[serde(default)]
    pub notify_props: ChannelNotifyProps,
    #[serde(default)]
    pub status: Status,
}

impl ChannelMemberProfile {
    pub fn new(user: User) -> Self {
        Self {
            user,
            notify_props: ChannelNotifyProps::default(),
            status: Status::default(),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn muted(mut self) -> Self {
        self.notify_props.muted = true;
        self
    }

    pub fn with_notify_level(mut self, level: NotifyLevel) -> Self {
        self.notify_props.notify_level = level;
        self
    }
}
