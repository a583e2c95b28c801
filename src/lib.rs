pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{db::Store, error::AppError};

/// Shared by every request. `store` stays `None` when the client could not
/// be built at startup; the server runs anyway and store-backed routes fail.
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Option<Store>,
}

impl FromRequestParts<AppState> for Store {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.store.clone().ok_or(AppError::Unavailable)
    }
}
