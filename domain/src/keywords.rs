//! Builds the keyword → recipient table that the mention resolver matches against.
//!
//! The table is rebuilt for every notification from the caller's snapshot of
//! channel members, so it never goes stale.

use crate::users::User;
use crate::Id;
use std::collections::HashMap;

pub const CHANNEL_MENTION: &str = "@channel";
pub const ALL_MENTION: &str = "@all";
pub const HERE_MENTION: &str = "@here";

/// Mapping from keyword to the recipients it notifies.
///
/// A recipient may appear several times under the same keyword (e.g. both as
/// username and as an identical custom keyword). Consumers that need distinct
/// recipients dedupe on their side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    keywords: HashMap<String, Vec<Id>>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, keyword: impl Into<String>, id: Id) {
        self.keywords.entry(keyword.into()).or_default().push(id);
    }

    pub fn get(&self, keyword: &str) -> Option<&[Id]> {
        self.keywords.get(keyword).map(Vec::as_slice)
    }

    pub fn contains_key(&self, keyword: &str) -> bool {
        self.keywords.contains_key(keyword)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Id>)> for KeywordTable {
    fn from_iter<T: IntoIterator<Item = (K, Vec<Id>)>>(iter: T) -> Self {
        let mut table = KeywordTable::new();
        for (keyword, ids) in iter {
            table.keywords.entry(keyword.into()).or_default().extend(ids);
        }
        table
    }
}

/// Returns true when a channel is small enough for @channel, @all and @here to notify.
pub fn channel_mentions_allowed(member_count: usize, max_notifications_per_channel: usize) -> bool {
    member_count <= max_notifications_per_channel
}

/// Builds the keyword table for the given channel members.
///
/// Every member is registered under `@username` (lower case) and under each
/// custom keyword (lower case). The first name is registered as stored when the
/// member asked to be notified on it, and `@channel`/`@all` are registered only
/// when `allow_channel_mentions` is set and the member opted in.
pub fn mention_keywords_in_channel<'a>(
    profiles: impl IntoIterator<Item = &'a User>,
    allow_channel_mentions: bool,
) -> KeywordTable {
    let mut table = KeywordTable::new();

    for profile in profiles {
        let id = profile.id;
        let props = &profile.notify_props;

        table.insert(format!("@{}", profile.username.to_lowercase()), id);

        for keyword in props.custom_keywords() {
            table.insert(keyword.to_lowercase(), id);
        }

        if props.first_name && !profile.first_name.is_empty() {
            table.insert(profile.first_name.clone(), id);
        }

        if allow_channel_mentions && props.channel {
            table.insert(CHANNEL_MENTION, id);
            table.insert(ALL_MENTION, id);
        }
    }

    table
}
