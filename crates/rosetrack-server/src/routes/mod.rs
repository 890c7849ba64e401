mod health;
pub mod ip;
pub mod pixel;

#[cfg(test)]
pub(crate) mod test_helpers;

use axum::{Router, routing::get};
use rosetrack_common::pixel::PIXEL_PATH;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(PIXEL_PATH, get(pixel::pixel))
        .with_state(state)
}
