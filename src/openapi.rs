use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stride Checkout API",
        description = "Checkout and payment orchestration for the Stride storefront"
    ),
    paths(
        crate::handlers::checkout::submit_checkout,
        crate::handlers::payment_webhooks::payment_webhook,
        crate::handlers::orders::get_order,
        crate::handlers::orders::get_order_by_reference,
        crate::handlers::orders::track_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::update_order_delivery,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::checkout::CheckoutRequest,
        crate::handlers::checkout::CardCheckoutResponse,
        crate::handlers::checkout::CodCheckoutResponse,
        crate::handlers::orders::UpdateStatusRequest,
        crate::services::orders::DeliveryUpdate,
        crate::services::cart_validation::CartLineRequest,
    )),
    tags(
        (name = "Checkout", description = "Checkout initiation"),
        (name = "Payments", description = "Gateway webhook intake"),
        (name = "Orders", description = "Order lookups and admin updates")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi serializes");
        assert!(json.contains("/api/v1/checkout"));
        assert!(json.contains("/api/v1/payments/webhook"));
    }
}
