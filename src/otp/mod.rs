use axum::Router;

use crate::state::AppState;

pub mod delivery;
pub mod dto;
pub mod handlers;
pub mod services;
pub mod store;

pub fn router() -> Router<AppState> {
    handlers::otp_routes()
}
