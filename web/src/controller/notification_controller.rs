use crate::controller::ApiResponse;
use crate::params::message::MessageCreatedParams;
use crate::response::notification::NotificationSummary;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use log::*;

/// POST a post that was just stored, so its recipients get notified.
///
/// Responds once the live event is out; emails and pushes are still being
/// delivered in the background.
pub async fn message_created(
    State(app_state): State<AppState>,
    Json(params): Json<MessageCreatedParams>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST message created: post {} in channel {}",
        params.post.id, params.channel.id
    );

    let outcome = app_state
        .notifier
        .on_message_created(params.as_message())
        .await?;

    let summary = NotificationSummary::new(params.post.id, &outcome);
    debug!("Notification summary: {summary:?}");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(StatusCode::ACCEPTED.into(), summary)),
    ))
}
