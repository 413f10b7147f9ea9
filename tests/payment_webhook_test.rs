//! Integration tests for the payment webhook receiver: signature gating,
//! server-side re-verification, at-most-once promotion, and failure-event
//! handling.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;
use stride_api::entities::{
    product_variant, CheckoutSession, Order, OrderItem, OrderStatus, SessionStatus,
};
use uuid::Uuid;

/// Runs a card checkout and returns (session id, user id, variant id).
async fn card_checkout(app: &TestApp, price: Decimal, quantity: i32) -> (Uuid, Uuid, Uuid) {
    let variant = app.seed_variant("Fleece Hoodie", "HD-001", price, 10).await;
    let user_id = Uuid::new_v4();
    let address_id = app.seed_address(user_id).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/checkout",
            Some(json!({
                "items": [{"variant_id": variant.id, "quantity": quantity}],
                "shipping_address_id": address_id,
                "billing_address_id": address_id,
                "payment_method": "gateway-card",
                "user_id": user_id,
                "email": "customer@test.com",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let session_id = Uuid::parse_str(body["tempSessionId"].as_str().unwrap()).unwrap();
    (session_id, user_id, variant.id)
}

fn charge_success_body(reference: Uuid, amount_minor: i64) -> serde_json::Value {
    json!({
        "event": "charge.success",
        "data": {
            "reference": reference,
            "amount": amount_minor,
            "status": "success",
            "channel": "card",
        }
    })
}

#[tokio::test]
async fn invalid_signature_rejected_without_state_change() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;
    app.gateway.set_verification(&session_id.to_string(), true, 10_000);

    let body = charge_success_body(session_id, 10_000);
    let response = app
        .post_webhook_raw(body.to_string(), "deadbeef".repeat(16).as_str())
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
    assert!(CheckoutSession::find_by_id(session_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn altered_body_with_stale_signature_rejected() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;
    app.gateway.set_verification(&session_id.to_string(), true, 10_000);

    // Signature computed over the original body, body then tampered with.
    let original = charge_success_body(session_id, 10_000).to_string();
    let signature = app.sign(original.as_bytes());
    let tampered = charge_success_body(session_id, 1).to_string();

    let response = app.post_webhook_raw(tampered, &signature).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn verified_charge_success_promotes_session_exactly_once() {
    let app = TestApp::new().await;
    let (session_id, user_id, _) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();
    app.gateway.set_verification(&reference, true, 10_000);

    let body = charge_success_body(session_id, 10_000);
    let response = app.post_webhook(&body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Exactly one completed order carrying the session snapshot.
    let orders = Order::find().all(&*app.state.db).await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.total_amount, dec!(100.00));
    assert_eq!(order.user_id, user_id);
    assert_eq!(order.payment_reference.as_deref(), Some(reference.as_str()));
    assert!(order.provider_payload.is_some());

    let items = OrderItem::find().all(&*app.state.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, dec!(50.00));

    // Session deleted: the commit signal for at-most-once promotion.
    assert!(CheckoutSession::find_by_id(session_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .is_none());

    // Replay of the identical webhook acknowledges without a second order.
    let replay = app.post_webhook(&body).await;
    assert_eq!(replay.status(), StatusCode::OK);
    let replay_body = response_json(replay).await;
    assert_eq!(replay_body["message"].as_str().unwrap(), "no matching session");
    assert_eq!(Order::find().all(&*app.state.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn promoted_order_is_pollable_by_reference() {
    let app = TestApp::new().await;
    let (session_id, user_id, _) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();

    // Before promotion the poll target reports nothing.
    let pending = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/by-reference/{reference}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(pending.status(), StatusCode::NOT_FOUND);

    app.gateway.set_verification(&reference, true, 10_000);
    let response = app.post_webhook(&charge_success_body(session_id, 10_000)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let found = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/by-reference/{reference}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(found.status(), StatusCode::OK);
    let body = response_json(found).await;
    assert_eq!(body["order"]["payment_reference"].as_str().unwrap(), reference);
}

#[tokio::test]
async fn amount_mismatch_leaves_session_untouched() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();
    // Gateway says 9_999, webhook claims 10_000.
    app.gateway.set_verification(&reference, true, 9_999);

    let response = app.post_webhook(&charge_success_body(session_id, 10_000)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Payment verification failed"));
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
    let session = CheckoutSession::find_by_id(session_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("session kept for investigation");
    assert_eq!(session.status, SessionStatus::Pending);
}

#[tokio::test]
async fn webhook_amount_must_match_session_total() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();
    // Gateway and webhook agree on an amount that is not the session total.
    app.gateway.set_verification(&reference, true, 5_000);

    let response = app.post_webhook(&charge_success_body(session_id, 5_000)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_success_verification_rejected() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();
    app.gateway.set_verification(&reference, false, 10_000);

    let response = app.post_webhook(&charge_success_body(session_id, 10_000)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn charge_failed_flags_session_without_order() {
    let app = TestApp::new().await;
    let (session_id, _, _) = card_checkout(&app, dec!(50.00), 2).await;

    let body = json!({
        "event": "charge.failed",
        "data": { "reference": session_id, "status": "failed" }
    });
    let response = app.post_webhook(&body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let session = CheckoutSession::find_by_id(session_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("session kept for reconciliation");
    assert_eq!(session.status, SessionStatus::Failed);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_reference_acknowledged_as_noop() {
    let app = TestApp::new().await;

    // A webhook may arrive before its session is visible; answering 200
    // defers to the gateway's own retry schedule.
    let body = charge_success_body(Uuid::new_v4(), 10_000);
    let response = app.post_webhook(&body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["message"].as_str().unwrap(), "no matching session");
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_uuid_reference_acknowledged_as_noop() {
    let app = TestApp::new().await;

    let body = json!({
        "event": "charge.success",
        "data": { "reference": "not-a-session", "amount": 1, "status": "success" }
    });
    let response = app.post_webhook(&body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unhandled_event_acknowledged() {
    let app = TestApp::new().await;

    let body = json!({
        "event": "transfer.success",
        "data": { "reference": Uuid::new_v4(), "amount": 500 }
    });
    let response = app.post_webhook(&body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["message"].as_str().unwrap(), "ignored");
}

#[tokio::test]
async fn malformed_body_rejected() {
    let app = TestApp::new().await;

    let raw = "{\"event\": \"charge.success\"".to_string();
    let signature = app.sign(raw.as_bytes());
    let response = app.post_webhook_raw(raw, &signature).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn promotion_failure_keeps_session_for_retry() {
    let app = TestApp::new().await;
    let (session_id, _, variant_id) = card_checkout(&app, dec!(50.00), 2).await;
    let reference = session_id.to_string();
    app.gateway.set_verification(&reference, true, 10_000);

    // A concurrent sale consumed the stock between validation and webhook.
    let variant = product_variant::Entity::find_by_id(variant_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: product_variant::ActiveModel = variant.into();
    active.stock_quantity = Set(1);
    active.update(&*app.state.db).await.unwrap();

    let response = app.post_webhook(&charge_success_body(session_id, 10_000)).await;

    // 500 prompts the gateway to retry; the session is the durable record
    // of intent until an order exists.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
    assert!(OrderItem::find().all(&*app.state.db).await.unwrap().is_empty());
    assert!(CheckoutSession::find_by_id(session_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .is_some());
}
