use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message posted to a channel. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub channel_id: Id,
    pub user_id: Id,
    /// Root of the thread this post replies to.
    pub root_id: Option<Id>,
    pub message: String,
    /// Empty for regular user posts; system posts carry a type such as "system_join_channel".
    #[serde(rename = "type")]
    pub post_type: String,
    pub create_at: DateTime<Utc>,
    pub edit_at: Option<DateTime<Utc>>,
    pub delete_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(channel_id: Id, user_id: Id, message: impl Into<String>) -> Self {
        Self {
            id: Id::new_v4(),
            channel_id,
            user_id,
            root_id: None,
            message: message.into(),
            post_type: String::new(),
            create_at: Utc::now(),
            edit_at: None,
            delete_at: None,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.root_id.is_some()
    }

    pub fn is_system_message(&self) -> bool {
        self.post_type.starts_with("system_")
    }
}
