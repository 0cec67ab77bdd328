//! Email notification subject and body rendering.

use crate::channels::{Channel, ChannelType};
use crate::posts::Post;
use crate::users::NotificationContents;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A rendered email notification, ready for the email transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailNotification {
    pub subject: String,
    pub body: String,
}

/// Everything needed to render one email notification.
#[derive(Debug, Clone, Copy)]
pub struct EmailContext<'a> {
    pub site_name: &'a str,
    pub team_name: &'a str,
    pub team_url: &'a str,
    pub channel: &'a Channel,
    pub post: &'a Post,
    pub sender_name: &'a str,
    pub contents: NotificationContents,
}

impl EmailNotification {
    pub fn render(context: &EmailContext<'_>) -> Self {
        let subject = if context.channel.channel_type == ChannelType::Direct {
            direct_message_subject(context.site_name, context.sender_name, context.post.create_at)
        } else {
            notification_subject(context.site_name, context.team_name, context.post.create_at)
        };

        Self {
            subject,
            body: notification_body(context),
        }
    }
}

/// "March 4, 2024"
fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn format_time(date: DateTime<Utc>) -> String {
    date.format("%-I:%M %p UTC").to_string()
}

pub fn notification_subject(site_name: &str, team_name: &str, date: DateTime<Utc>) -> String {
    format!(
        "[{site_name}] Notification in {team_name} on {}",
        format_date(date)
    )
}

pub fn direct_message_subject(site_name: &str, sender_name: &str, date: DateTime<Utc>) -> String {
    format!(
        "[{site_name}] New Direct Message from {sender_name} on {}",
        format_date(date)
    )
}

/// Renders the email body. With generic contents the body names only the
/// sender, never the channel or the message text.
pub fn notification_body(context: &EmailContext<'_>) -> String {
    let channel_type = context.channel.channel_type;
    let sender = context.sender_name;
    let mut lines = Vec::new();

    match context.contents {
        NotificationContents::Full => {
            lines.push(if channel_type == ChannelType::Direct {
                "You have a new direct message.".to_string()
            } else {
                "You have a new notification.".to_string()
            });

            match channel_type {
                ChannelType::Direct => {}
                ChannelType::Group => lines.push("CHANNEL: Group Message".to_string()),
                ChannelType::Open | ChannelType::Private => {
                    lines.push(format!("CHANNEL: {}", context.channel.display_name))
                }
            }

            lines.push(format!("{sender} - {}", format_time(context.post.create_at)));
            lines.push(context.post.message.clone());
        }
        NotificationContents::Generic => {
            lines.push(if channel_type == ChannelType::Direct {
                format!("You have a new direct message from {sender}")
            } else {
                format!("You have a new notification from {sender}")
            });
        }
    }

    lines.push(format!("Go to {}", context.team_url));
    lines.join("\n")
}
