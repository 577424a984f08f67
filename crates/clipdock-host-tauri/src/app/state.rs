use clipdock_app::CapabilityDispatcher;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub dispatcher: Arc<CapabilityDispatcher>,
    pub started_at: Instant,
}
