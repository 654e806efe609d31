use std::sync::Arc;

use mediarelay_core::Config;
use mediarelay_infra::NotificationDispatcher;
use mediarelay_processing::Transcoder;
use mediarelay_storage::Storage;

/// Shared application state, built once at start-up and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub transcoder: Arc<dyn Transcoder>,
    /// Workflow trigger for stored uploads
    pub notifier: NotificationDispatcher,
    /// Sink of the legacy passthrough route
    pub passthrough: NotificationDispatcher,
}
