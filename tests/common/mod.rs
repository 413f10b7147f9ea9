#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use sha2::Sha512;
use stride_api::{
    api_v1_routes,
    config::AppConfig,
    db,
    entities::{customer_address, product, product_variant},
    errors::ServiceError,
    events::{self, EventSender},
    handlers::AppServices,
    services::payments::{
        InitializePayment, InitializedPayment, PaymentGateway, VerifiedTransaction,
    },
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_GATEWAY_SECRET: &str = "sk_test_webhook_secret_0123456789";

type HmacSha512 = Hmac<Sha512>;

/// In-process stand-in for the payment provider. Initialization always
/// succeeds (unless told to fail) and verification answers from a
/// preprogrammed table keyed by reference.
#[derive(Default)]
pub struct MockGateway {
    pub init_calls: AtomicUsize,
    pub fail_initialize: AtomicBool,
    verifications: Mutex<HashMap<String, (bool, i64)>>,
}

impl MockGateway {
    pub fn set_verification(&self, reference: &str, success: bool, amount_minor: i64) {
        self.verifications
            .lock()
            .expect("verification table poisoned")
            .insert(reference.to_string(), (success, amount_minor));
    }

    pub fn init_call_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initialize(
        &self,
        request: InitializePayment,
    ) -> Result<InitializedPayment, ServiceError> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(ServiceError::PaymentInitFailed(
                "declined by gateway".to_string(),
            ));
        }
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(InitializedPayment {
            authorization_url: format!("https://checkout.gateway.test/{}", request.reference),
            access_code: Some("AC_test".to_string()),
            reference: request.reference,
        })
    }

    async fn verify(&self, reference: &str) -> Result<VerifiedTransaction, ServiceError> {
        let table = self
            .verifications
            .lock()
            .expect("verification table poisoned");
        let (success, amount_minor) = *table
            .get(reference)
            .ok_or_else(|| ServiceError::ExternalServiceError("unknown transaction".to_string()))?;
        Ok(VerifiedTransaction {
            success,
            amount_minor,
            raw: json!({
                "status": true,
                "data": {
                    "status": if success { "success" } else { "failed" },
                    "amount": amount_minor,
                    "reference": reference,
                }
            }),
        })
    }
}

/// Test application backed by a file-based SQLite database; each instance
/// gets its own file so tests stay independent.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub gateway: Arc<MockGateway>,
    db_file: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_file = format!("stride_test_{}.db", Uuid::new_v4().simple());
        let _ = std::fs::remove_file(&db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
            TEST_GATEWAY_SECRET.to_string(),
            "https://stridewear.shop/checkout/callback".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        tokio::spawn(events::process_events(event_rx));

        let gateway = Arc::new(MockGateway::default());
        let services = AppServices::new(
            db_arc.clone(),
            event_sender.clone(),
            gateway.clone(),
            &cfg,
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            gateway,
            db_file,
        }
    }

    /// Sends a JSON request through the router without binding a socket.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("request builds"))
            .await
            .expect("router responds")
    }

    /// HMAC-SHA512 signature over a payload, as the gateway would send it.
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(TEST_GATEWAY_SECRET.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Posts a webhook body with a correct signature.
    pub async fn post_webhook(&self, body: &Value) -> Response {
        let raw = body.to_string();
        let signature = self.sign(raw.as_bytes());
        self.post_webhook_raw(raw, &signature).await
    }

    /// Posts a webhook with an arbitrary raw body and signature header.
    pub async fn post_webhook_raw(&self, raw: String, signature: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/payments/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-paystack-signature", signature)
            .body(Body::from(raw))
            .expect("request builds");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds")
    }

    /// Seeds a product with one variant and returns the variant.
    pub async fn seed_variant(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
        stock: i32,
    ) -> product_variant::Model {
        let now = Utc::now();
        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(name.to_lowercase().replace(' ', "-")),
            description: Set(None),
            brand: Set(Some("Stride".to_string())),
            category: Set(None),
            is_published: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("product seeds");

        product_variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            sku: Set(sku.to_string()),
            name: Set("One Size".to_string()),
            price: Set(price),
            stock_quantity: Set(stock),
            position: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("variant seeds")
    }

    /// Seeds a delivery address for a user and returns its id.
    pub async fn seed_address(&self, user_id: Uuid) -> Uuid {
        let address = customer_address::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            label: Set(Some("Home".to_string())),
            recipient_name: Set("Test Customer".to_string()),
            phone: Set(None),
            address_line_1: Set("12 Allen Avenue".to_string()),
            address_line_2: Set(None),
            city: Set("Ikeja".to_string()),
            state: Set("Lagos".to_string()),
            postal_code: Set(None),
            country: Set("NG".to_string()),
            is_default: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("address seeds");
        address.id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_file));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_file));
    }
}

/// Decodes a response body into JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
