use crate::{
    entities::OrderStatus,
    errors::ServiceError,
    events::Event,
    services::payments::to_minor_units,
    AppState,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha512;
use tracing::{info, warn};

type HmacSha512 = Hmac<Sha512>;

pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Inbound gateway notification. Extra payload fields are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub reference: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

// POST /api/v1/payments/webhook
//
// Always answers 200 once a request is authenticated and processed, even
// for business-level no-ops, so the gateway stops retrying. 403 is
// reserved for signature failures, 400 for malformed bodies and failed
// re-verification, 500 for promotion failures (inviting a retry).
#[utoipa::path(
    post,
    path = "/api/v1/payments/webhook",
    request_body = String,
    responses(
        (status = 200, description = "Webhook processed or acknowledged as no-op"),
        (status = 400, description = "Malformed payload or verification failure", body = crate::errors::ErrorResponse),
        (status = 403, description = "Invalid signature", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    if !verify_signature(&headers, &body, &state.config.gateway_secret_key) {
        warn!("Payment webhook signature verification failed");
        state
            .event_sender
            .send_or_log(Event::WebhookRejected {
                reason: "invalid signature".to_string(),
            })
            .await;
        return Err(ServiceError::InvalidSignature);
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::ValidationError(format!("Invalid webhook payload: {e}")))?;

    match event.event.as_str() {
        "charge.success" => handle_charge_success(&state, event).await,
        "charge.failed" | "charge.abandoned" => handle_charge_failure(&state, event).await,
        other => {
            info!(event = other, "Ignoring unhandled payment webhook event");
            Ok(acknowledged("ignored"))
        }
    }
}

async fn handle_charge_success(
    state: &AppState,
    event: WebhookEvent,
) -> Result<Response, ServiceError> {
    let reference = event.data.reference;

    let Some(session) = state
        .services
        .checkout
        .session_by_reference(&reference)
        .await?
    else {
        // Duplicate delivery or replication lag: the gateway gets a 200 so
        // it stops retrying an already-promoted session.
        warn!(%reference, "charge.success for unknown or already-promoted session");
        return Ok(acknowledged("no matching session"));
    };

    // Never trust the webhook payload alone: re-fetch the transaction from
    // the gateway and cross-check amounts in minor units.
    let verified = state.services.gateway.verify(&reference).await?;
    if !verified.success {
        return Err(ServiceError::VerificationFailed(format!(
            "gateway reports non-success for {reference}"
        )));
    }
    if let Some(claimed) = event.data.amount {
        if verified.amount_minor != claimed {
            return Err(ServiceError::VerificationFailed(format!(
                "verified amount {} does not match claimed amount {claimed}",
                verified.amount_minor
            )));
        }
    }
    let expected = to_minor_units(session.total_amount)?;
    if verified.amount_minor != expected {
        return Err(ServiceError::VerificationFailed(format!(
            "verified amount {} does not match session total {expected}",
            verified.amount_minor
        )));
    }

    let session_id = session.id;
    // Any promotion failure must answer 500 so the gateway retries; the
    // session survives as the durable record of intent.
    let order = state
        .services
        .orders
        .materialize_session(
            session,
            OrderStatus::Completed,
            Some(reference),
            Some(verified.raw),
        )
        .await
        .map_err(|e| match e {
            err @ ServiceError::DatabaseError(_) => err,
            other => ServiceError::InternalError(format!("order promotion failed: {other}")),
        })?;

    state
        .event_sender
        .send_or_log(Event::PaymentConfirmed {
            session_id,
            order_id: order.id,
        })
        .await;

    Ok((StatusCode::OK, Json(json!({ "status": "ok", "order_id": order.id }))).into_response())
}

async fn handle_charge_failure(
    state: &AppState,
    event: WebhookEvent,
) -> Result<Response, ServiceError> {
    let reference = event.data.reference;

    if let Some(session) = state
        .services
        .checkout
        .session_by_reference(&reference)
        .await?
    {
        state.services.checkout.mark_session_failed(session).await?;
        info!(%reference, event = %event.event, "Flagged checkout session as failed");
    }

    state
        .event_sender
        .send_or_log(Event::PaymentFailed {
            reference,
            event: event.event,
        })
        .await;

    Ok(acknowledged("ok"))
}

fn acknowledged(message: &str) -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok", "message": message }))).into_response()
}

/// HMAC-SHA512 over the raw request body with the gateway secret key,
/// hex-encoded in the signature header.
pub fn verify_signature(headers: &HeaderMap, payload: &Bytes, secret: &str) -> bool {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|h| h.to_str().ok()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    constant_time_eq(&expected, signature)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut res = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        res |= x ^ y;
    }
    res == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_accepted() {
        let payload = Bytes::from_static(b"{\"event\":\"charge.success\"}");
        let secret = "sk_test_secret";
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(&payload, secret)).unwrap(),
        );

        assert!(verify_signature(&headers, &payload, secret));
    }

    #[test]
    fn altered_body_rejected() {
        let original = Bytes::from_static(b"{\"data\":{\"amount\":10000}}");
        let tampered = Bytes::from_static(b"{\"data\":{\"amount\":1}}");
        let secret = "sk_test_secret";
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(&original, secret)).unwrap(),
        );

        assert!(!verify_signature(&headers, &tampered, secret));
    }

    #[test]
    fn wrong_secret_rejected() {
        let payload = Bytes::from_static(b"{}");
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(&payload, "other_secret")).unwrap(),
        );

        assert!(!verify_signature(&headers, &payload, "sk_test_secret"));
    }

    #[test]
    fn missing_header_rejected() {
        let payload = Bytes::from_static(b"{}");
        assert!(!verify_signature(&HeaderMap::new(), &payload, "secret"));
    }

    #[test]
    fn webhook_event_parses_charge_success() {
        let body = r#"{
            "event": "charge.success",
            "data": {
                "reference": "4f2f2d3c-1111-2222-3333-444455556666",
                "amount": 10000,
                "status": "success",
                "channel": "card"
            }
        }"#;
        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event, "charge.success");
        assert_eq!(event.data.amount, Some(10000));
    }
}
