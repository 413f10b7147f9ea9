use crate::{
    entities::PaymentMethod,
    errors::ServiceError,
    services::{
        cart_validation::CartLineRequest,
        checkout::{CheckoutInput, CheckoutOutcome},
    },
    AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_checkout))
}

/// Checkout initiation request. `user_id` is supplied by the authenticating
/// gateway in front of this service; the echoed line prices are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartLineRequest>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    pub payment_method: Option<PaymentMethod>,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
}

/// Card checkout response: the client follows `url` to the hosted payment
/// page and later polls for the order using `tempSessionId`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CardCheckoutResponse {
    #[serde(rename = "tempSessionId")]
    pub temp_session_id: Uuid,
    pub url: String,
}

/// Cash-on-delivery checkout response: the order already exists.
#[derive(Debug, Serialize, ToSchema)]
pub struct CodCheckoutResponse {
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout accepted"),
        (status = 400, description = "Validation or payment initialization failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Checkout"
)]
pub async fn submit_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user_id = payload.user_id.ok_or(ServiceError::MissingField("user_id"))?;
    let shipping_address_id = payload
        .shipping_address_id
        .ok_or(ServiceError::MissingField("shipping_address_id"))?;
    let billing_address_id = payload
        .billing_address_id
        .ok_or(ServiceError::MissingField("billing_address_id"))?;
    let payment_method = payload
        .payment_method
        .ok_or(ServiceError::MissingField("payment_method"))?;

    let outcome = state
        .services
        .checkout
        .submit(CheckoutInput {
            user_id,
            email: payload.email,
            items: payload.items,
            shipping_address_id,
            billing_address_id,
            payment_method,
        })
        .await?;

    Ok(match outcome {
        CheckoutOutcome::CodConfirmed { order_id } => Json(CodCheckoutResponse {
            order_id,
            message: "Order placed successfully".to_string(),
        })
        .into_response(),
        CheckoutOutcome::RedirectToGateway {
            session_id,
            authorization_url,
        } => Json(CardCheckoutResponse {
            temp_session_id: session_id,
            url: authorization_url,
        })
        .into_response(),
    })
}
