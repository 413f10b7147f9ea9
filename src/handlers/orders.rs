use crate::{
    entities::{OrderItemModel, OrderModel, OrderStatus},
    errors::ServiceError,
    services::orders::DeliveryUpdate,
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_order_status))
        .route("/:id/delivery", put(update_order_delivery))
        .route("/by-reference/:reference", get(get_order_by_reference))
        .route("/track/:tracking_number", get(track_order))
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    pub order: OrderModel,
    pub items: Vec<OrderItemModel>,
}

/// Public projection for guest tracking; omits owner and
/// payment details.
#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub delivery_status: crate::entities::DeliveryStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<chrono::DateTime<chrono::Utc>>,
    pub delivery_notes: Option<String>,
    pub items: Vec<TrackingItem>,
}

#[derive(Debug, Serialize)]
pub struct TrackingItem {
    pub product_name: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(value_type = String)]
    pub status: OrderStatus,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its items"),
        (status = 404, description = "Unknown order or wrong owner", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let user_id = query.user_id.ok_or(ServiceError::MissingField("user_id"))?;
    let (order, items) = state.services.orders.get_for_user(id, user_id).await?;
    Ok(Json(OrderWithItems { order, items }))
}

/// Polling target after the card-payment redirect: 404 until the webhook
/// has materialized the order for this gateway reference.
#[utoipa::path(
    get,
    path = "/api/v1/orders/by-reference/{reference}",
    params(("reference" = String, Path, description = "Gateway transaction reference")),
    responses(
        (status = 200, description = "Order with its items"),
        (status = 404, description = "No order for this reference yet", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let user_id = query.user_id.ok_or(ServiceError::MissingField("user_id"))?;
    let (order, items) = state
        .services
        .orders
        .find_by_reference(&reference, user_id)
        .await?;
    Ok(Json(OrderWithItems { order, items }))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/track/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Public tracking number")),
    responses(
        (status = 200, description = "Tracking projection"),
        (status = 404, description = "Unknown tracking number", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn track_order(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let (order, items) = state.services.orders.track(&tracking_number).await?;
    Ok(Json(TrackingResponse {
        order_id: order.id,
        status: order.status,
        delivery_status: order.delivery_status,
        tracking_number: order.tracking_number,
        estimated_delivery: order.estimated_delivery,
        delivery_notes: order.delivery_notes,
        items: items
            .into_iter()
            .map(|i| TrackingItem {
                product_name: i.product_name,
                quantity: i.quantity,
            })
            .collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order"),
        (status = 404, description = "Unknown order", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.update_status(id, payload.status).await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/delivery",
    request_body = DeliveryUpdate,
    responses(
        (status = 200, description = "Updated order"),
        (status = 404, description = "Unknown order", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn update_order_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeliveryUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.update_delivery(id, payload).await?;
    Ok(Json(order))
}
