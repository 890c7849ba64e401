use std::sync::Arc;

use crate::sink::TelemetrySink;

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn TelemetrySink>,
    /// Take the client address from `X-Forwarded-For` instead of the socket.
    pub trust_proxy: bool,
}
