use crate::extractors::recipient::Recipient;
use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use hub::connection::ConnectionId;
use hub::event::EventView;
use hub::Manager;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;

/// Unregisters the session when the response stream is dropped, which is
/// how axum reports that the client went away.
struct ConnectionGuard {
    manager: Arc<Manager>,
    connection_id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "SSE connection {} closed, cleaning up",
            self.connection_id.as_str()
        );
        self.manager.unregister_connection(&self.connection_id);
    }
}

/// SSE handler that establishes a long-lived connection for live events.
/// A user may hold several at once, one per open client.
pub(crate) async fn sse_handler(
    recipient: Recipient,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection for user {}", recipient.user_id);

    let (_session, mut receiver) = app_state
        .hub
        .register_connection(recipient.user_id, recipient.locale);

    let guard = ConnectionGuard {
        manager: app_state.hub.clone(),
        connection_id: receiver.connection_id().clone(),
    };

    // Ends once the hub drops the session, e.g. after its queue overflowed
    let stream = stream! {
        let _guard = guard;
        while let Some(view) = receiver.recv().await {
            if let Some(event) = to_sse_event(&view) {
                yield Ok(event);
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(view: &EventView) -> Option<Event> {
    let data = match view.to_json() {
        Ok(data) => data,
        Err(e) => {
            warn!("Skipping {} event that failed to serialize: {e}", view.event_type());
            return None;
        }
    };

    let mut event = Event::default().event(view.event_type()).data(data);
    if let Some(seq) = view.seq() {
        event = event.id(seq.to_string());
    }
    Some(event)
}
