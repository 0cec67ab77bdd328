//! Push notification message rendering.

use crate::channels::{Channel, ChannelType};
use crate::users::NotificationContents;
use crate::Id;
use serde::Serialize;

/// A rendered push notification, ready for the push proxy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNotification {
    pub post_id: Id,
    pub channel_id: Id,
    pub channel_name: String,
    pub sender_name: String,
    pub message: String,
    /// Set when the recipient was mentioned rather than just a member.
    pub explicit_mention: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PushContext<'a> {
    pub post_id: Id,
    pub channel: &'a Channel,
    pub sender_name: &'a str,
    pub message: &'a str,
    pub explicit_mention: bool,
    pub contents: NotificationContents,
}

impl PushNotification {
    pub fn render(context: &PushContext<'_>) -> Self {
        Self {
            post_id: context.post_id,
            channel_id: context.channel.id,
            channel_name: context.channel.display_name.clone(),
            sender_name: context.sender_name.to_string(),
            message: push_message(context),
            explicit_mention: context.explicit_mention,
        }
    }
}

pub fn push_message(context: &PushContext<'_>) -> String {
    let sender = context.sender_name;
    let channel = &context.channel.display_name;
    let direct = context.channel.channel_type == ChannelType::Direct;

    match context.contents {
        NotificationContents::Full if direct => format!("{sender}: {}", context.message),
        NotificationContents::Full => format!("{sender} in {channel}: {}", context.message),
        NotificationContents::Generic if direct => format!("{sender} sent you a direct message"),
        NotificationContents::Generic if context.explicit_mention => {
            format!("{sender} mentioned you in {channel}")
        }
        NotificationContents::Generic => format!("{sender} posted in {channel}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(channel_type: ChannelType) -> Channel {
        Channel {
            id: Id::new_v4(),
            team_id: None,
            name: "town-square".to_string(),
            display_name: "Town Square".to_string(),
            channel_type,
        }
    }

    fn message(channel: &Channel, contents: NotificationContents, explicit_mention: bool) -> String {
        push_message(&PushContext {
            post_id: Id::new_v4(),
            channel,
            sender_name: "alice",
            message: "lunch?",
            explicit_mention,
            contents,
        })
    }

    #[test]
    fn test_full_contents() {
        let open = channel(ChannelType::Open);
        let direct = channel(ChannelType::Direct);

        assert_eq!(
            message(&open, NotificationContents::Full, true),
            "alice in Town Square: lunch?"
        );
        assert_eq!(message(&direct, NotificationContents::Full, false), "alice: lunch?");
    }

    #[test]
    fn test_generic_contents_never_include_message() {
        let open = channel(ChannelType::Open);
        let direct = channel(ChannelType::Direct);

        assert_eq!(
            message(&open, NotificationContents::Generic, true),
            "alice mentioned you in Town Square"
        );
        assert_eq!(
            message(&open, NotificationContents::Generic, false),
            "alice posted in Town Square"
        );
        assert_eq!(
            message(&direct, NotificationContents::Generic, false),
            "alice sent you a direct message"
        );
    }

    #[test]
    fn test_render_copies_channel_details() {
        let group = channel(ChannelType::Group);
        let push = PushNotification::render(&PushContext {
            post_id: Id::new_v4(),
            channel: &group,
            sender_name: "alice",
            message: "lunch?",
            explicit_mention: false,
            contents: NotificationContents::Full,
        });

        assert_eq!(push.channel_id, group.id);
        assert_eq!(push.channel_name, "Town Square");
        assert_eq!(push.message, "alice in Town Square: lunch?");
    }
}
