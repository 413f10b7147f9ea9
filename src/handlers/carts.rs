use crate::{errors::ServiceError, AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_cart).delete(clear_cart))
        .route("/:user_id/items", post(add_cart_item))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub variant_id: Uuid,
    pub quantity: i32,
}

async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state.services.carts.get_or_create(user_id).await?;
    Ok(Json(cart))
}

async fn add_cart_item(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AddCartItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let cart = state
        .services
        .carts
        .add_item(user_id, payload.variant_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.carts.clear(user_id).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
