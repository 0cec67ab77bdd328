//! User profiles and their notification preferences.

use crate::Id;
use serde::{Deserialize, Serialize};

/// When push notifications are sent for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushLevel {
    All,
    #[default]
    Mention,
    None,
}

/// The least-present status at which a user still receives push notifications.
/// `Online` pushes regardless of presence, `Away` only when away or offline,
/// `Offline` only when offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    Online,
    #[default]
    Away,
    Offline,
}

/// Whether notification payloads may carry the message text and channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationContents {
    #[default]
    Full,
    Generic,
}

/// Presence of a user at the time a post is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Away,
    #[default]
    Offline,
    Dnd,
}

impl PushStatus {
    /// Returns true when a user with this preference should get a push while in `status`.
    pub fn allows(self, status: Status) -> bool {
        match self {
            PushStatus::Online => true,
            PushStatus::Away => matches!(status, Status::Away | Status::Offline),
            PushStatus::Offline => status == Status::Offline,
        }
    }
}

/// Per-user notification preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserNotifyProps {
    /// Comma separated custom mention keywords.
    pub mention_keys: String,
    /// Notify when the first name is written.
    pub first_name: bool,
    /// Notify on @channel and @all.
    pub channel: bool,
    pub email: bool,
    pub push: PushLevel,
    pub push_status: PushStatus,
    pub contents: NotificationContents,
}

impl Default for UserNotifyProps {
    fn default() -> Self {
        Self {
            mention_keys: String::new(),
            first_name: false,
            channel: true,
            email: true,
            push: PushLevel::default(),
            push_status: PushStatus::default(),
            contents: NotificationContents::default(),
        }
    }
}

impl UserNotifyProps {
    /// Iterates the configured custom keywords, trimmed, skipping empty entries.
    pub fn custom_keywords(&self) -> impl Iterator<Item = &str> {
        self.mention_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub locale: String,
    /// False once the account has been deactivated.
    pub is_active: bool,
    #[serde(default)]
    pub notify_props: UserNotifyProps,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Id::new_v4(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            nickname: String::new(),
            locale: "en".to_string(),
            is_active: true,
            notify_props: UserNotifyProps::default(),
        }
    }

    /// Name shown to other users: nickname, then full name, then username.
    pub fn display_name(&self) -> String {
        if !self.nickname.is_empty() {
            return self.nickname.clone();
        }
        let full_name = format!("{} {}", self.first_name, self.last_name);
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_keywords_are_trimmed_and_skip_empty_entries() {
        let props = UserNotifyProps {
            mention_keys: " User, @User,,MENTION ,".to_string(),
            ..Default::default()
        };

        assert_eq!(
            props.custom_keywords().collect::<Vec<_>>(),
            vec!["User", "@User", "MENTION"]
        );
    }

    #[test]
    fn test_push_status_allows() {
        assert!(PushStatus::Online.allows(Status::Online));
        assert!(!PushStatus::Away.allows(Status::Online));
        assert!(PushStatus::Away.allows(Status::Away));
        assert!(PushStatus::Away.allows(Status::Offline));
        assert!(!PushStatus::Offline.allows(Status::Away));
        assert!(PushStatus::Offline.allows(Status::Offline));
    }

    #[test]
    fn test_display_name_prefers_nickname_then_full_name() {
        let mut user = User::new("jdoe");
        assert_eq!(user.display_name(), "jdoe");

        user.first_name = "John".to_string();
        user.last_name = "Doe".to_string();
        assert_eq!(user.display_name(), "John Doe");

        user.nickname = "Johnny".to_string();
        assert_eq!(user.display_name(), "Johnny");
    }
}
