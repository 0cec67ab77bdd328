use domain::channels::{Channel, ChannelMemberProfile, Team};
use domain::notification::MessageCreated;
use domain::posts::Post;
use domain::users::User;
use domain::Id;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Body of `POST /hooks/message_created`: a stored post together with the
/// caller's snapshot of its channel.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageCreatedParams {
    pub(crate) post: Post,
    pub(crate) channel: Channel,
    #[serde(default)]
    pub(crate) team: Option<Team>,
    pub(crate) sender: User,
    pub(crate) members: Vec<ChannelMemberProfile>,
    /// Defaults to the number of profiles sent.
    #[serde(default)]
    pub(crate) member_count: Option<usize>,
    #[serde(default)]
    pub(crate) thread_followers: Vec<Id>,
    /// Usernames of the team's users, for out-of-channel feedback.
    #[serde(default, deserialize_with = "lowercase_keys")]
    pub(crate) known_users: HashMap<String, Id>,
}

fn lowercase_keys<'de, D>(deserializer: D) -> Result<HashMap<String, Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let users = HashMap::<String, Id>::deserialize(deserializer)?;
    Ok(users
        .into_iter()
        .map(|(username, id)| (username.to_lowercase(), id))
        .collect())
}

impl MessageCreatedParams {
    pub(crate) fn as_message(&self) -> MessageCreated<'_> {
        MessageCreated {
            post: &self.post,
            channel: &self.channel,
            team: self.team.as_ref(),
            sender: &self.sender,
            members: &self.members,
            member_count: self.member_count.unwrap_or(self.members.len()),
            thread_followers: &self.thread_followers,
            known_users: &self.known_users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_usernames_are_lower_cased() {
        let ghost = Id::new_v4();
        let alice = User::new("alice");
        let channel_id = Id::new_v4();
        let params: MessageCreatedParams = serde_json::from_value(json!({
            "post": Post::new(channel_id, alice.id, "hi @Ghost"),
            "channel": {
                "id": channel_id,
                "name": "town-square",
                "display_name": "Town Square",
                "channel_type": "O",
            },
            "sender": alice,
            "members": [],
            "known_users": { "Ghost": ghost },
        }))
        .unwrap();

        let message = params.as_message();
        assert_eq!(message.known_users.get("ghost"), Some(&ghost));
        assert_eq!(message.member_count, 0);
    }
}
