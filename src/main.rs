use domain::delivery::LogSender;
use domain::notification::Notifier;
use events::EventPublisher;
use hub::{HubDomainEventHandler, Manager};
use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting notification platform [{}] for {}",
        config.runtime_env(),
        config.site_url()
    );

    let hub = Arc::new(Manager::new().with_queue_capacity(config.session_queue_capacity()));

    // Live events reach connected sessions through the hub
    let publisher =
        EventPublisher::new().with_handler(Arc::new(HubDomainEventHandler::new(hub.clone())));

    let notifier = Notifier::new(config.clone(), publisher, Arc::new(LogSender));
    let app_state = web::AppState::new(config, hub, notifier);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
