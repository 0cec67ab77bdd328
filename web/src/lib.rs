//! HTTP surface of the notification platform.
//!
//! Clients hold a server-sent event stream open on `/events`; the message
//! store calls `/hooks/message_created` once a post has been durably saved.

use domain::notification::Notifier;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;

mod controller;
mod error;
mod extractors;
mod params;
mod response;
mod router;
mod sse;

pub use error::{Error, Result};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hub: Arc<hub::Manager>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: Config, hub: Arc<hub::Manager>, notifier: Notifier) -> Self {
        Self {
            config,
            hub,
            notifier,
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let listen_addr = format!("{interface}:{}", app_state.config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, router::define_routes(app_state)).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AppState;
    use domain::delivery::LogSender;
    use domain::notification::Notifier;
    use events::EventPublisher;
    use hub::HubDomainEventHandler;
    use service::config::Config;
    use std::sync::Arc;

    /// State wired the way `main` wires it, with email and push turned off.
    pub(crate) fn app_state() -> AppState {
        let config = Config::default()
            .set_send_email_notifications(false)
            .set_send_push_notifications(false);
        let hub = Arc::new(hub::Manager::new());
        let publisher =
            EventPublisher::new().with_handler(Arc::new(HubDomainEventHandler::new(hub.clone())));
        let notifier = Notifier::new(config.clone(), publisher, Arc::new(LogSender));
        AppState::new(config, hub, notifier)
    }
}
