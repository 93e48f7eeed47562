use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    catalog::dto::{Bakery, Product},
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/bakeries", get(list_bakeries))
        .route("/bakeries/:bakery_id/products", get(list_products))
}

#[instrument(skip(state))]
pub async fn list_bakeries(State(state): State<AppState>) -> Json<Vec<Bakery>> {
    Json(state.catalog.list_bakeries().to_vec())
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Path(bakery_id): Path<i64>,
) -> Json<Vec<Product>> {
    Json(state.catalog.list_products(bakery_id))
}
