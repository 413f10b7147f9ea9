use crate::{
    entities::{
        checkout_session, CheckoutSession, CheckoutSessionModel, OrderStatus, PaymentMethod,
        SessionStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        cart::CartService,
        cart_validation::{CartLineRequest, CartValidationService},
        orders::OrderService,
        payments::{InitializePayment, PaymentGateway},
    },
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Checkout orchestrator.
///
/// Validates the submitted cart against the catalog, stages a checkout
/// session, and branches on payment method: cash on delivery promotes the
/// session to an order in the same request; card payments hand off to the
/// gateway and leave promotion to the webhook receiver.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    validation: CartValidationService,
    carts: Arc<CartService>,
    orders: Arc<OrderService>,
    gateway: Arc<dyn PaymentGateway>,
    event_sender: EventSender,
    callback_url: String,
}

#[derive(Debug)]
pub struct CheckoutInput {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub items: Vec<CartLineRequest>,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Uuid,
    pub payment_method: PaymentMethod,
}

#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Cash on delivery: the order exists before the response is sent.
    CodConfirmed { order_id: Uuid },
    /// Card: the client must follow the gateway's hosted payment page.
    RedirectToGateway {
        session_id: Uuid,
        authorization_url: String,
    },
}

impl CheckoutService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        validation: CartValidationService,
        carts: Arc<CartService>,
        orders: Arc<OrderService>,
        gateway: Arc<dyn PaymentGateway>,
        event_sender: EventSender,
        callback_url: String,
    ) -> Self {
        Self {
            db,
            validation,
            carts,
            orders,
            gateway,
            event_sender,
            callback_url,
        }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn submit(&self, input: CheckoutInput) -> Result<CheckoutOutcome, ServiceError> {
        // Reject before any write; card payments need an email for the gateway.
        let card_email = match input.payment_method {
            PaymentMethod::Card => Some(
                input
                    .email
                    .clone()
                    .ok_or(ServiceError::MissingField("email"))?,
            ),
            PaymentMethod::CashOnDelivery => None,
        };

        let validated = self.validation.validate(&input.items).await?;

        let session_id = Uuid::new_v4();
        let session = checkout_session::ActiveModel {
            id: Set(session_id),
            user_id: Set(input.user_id),
            lines: Set(serde_json::to_value(&validated.lines)?),
            shipping_address_id: Set(input.shipping_address_id),
            billing_address_id: Set(input.billing_address_id),
            payment_method: Set(input.payment_method),
            total_amount: Set(validated.total),
            status: Set(SessionStatus::Pending),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::CheckoutSessionCreated {
                session_id,
                user_id: input.user_id,
            })
            .await;

        // Best-effort: the session snapshot already captured the cart, so a
        // failed clear must not fail the checkout.
        if let Err(e) = self.carts.clear(input.user_id).await {
            warn!(user_id = %input.user_id, "Failed to clear cart after checkout: {e}");
        }

        match input.payment_method {
            PaymentMethod::CashOnDelivery => {
                let order = self
                    .orders
                    .materialize_session(session, OrderStatus::Pending, None, None)
                    .await?;
                info!(order_id = %order.id, "Cash-on-delivery order confirmed");
                Ok(CheckoutOutcome::CodConfirmed { order_id: order.id })
            }
            PaymentMethod::Card => {
                let Some(email) = card_email else {
                    return Err(ServiceError::MissingField("email"));
                };
                let callback_url = format!("{}?tempSessionId={session_id}", self.callback_url);
                let initialized = self
                    .gateway
                    .initialize(InitializePayment {
                        email,
                        amount: validated.total,
                        reference: session_id.to_string(),
                        callback_url,
                    })
                    .await
                    .map_err(|e| match e {
                        err @ ServiceError::PaymentInitFailed(_) => err,
                        other => ServiceError::PaymentInitFailed(other.response_message()),
                    })?;

                self.event_sender
                    .send_or_log(Event::PaymentInitialized { session_id })
                    .await;

                Ok(CheckoutOutcome::RedirectToGateway {
                    session_id,
                    authorization_url: initialized.authorization_url,
                })
            }
        }
    }

    /// Looks up a pending session by the gateway reference. A reference
    /// that is not a UUID can never match a session and resolves to `None`.
    pub async fn session_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<CheckoutSessionModel>, ServiceError> {
        let Ok(session_id) = Uuid::parse_str(reference) else {
            return Ok(None);
        };
        Ok(CheckoutSession::find_by_id(session_id)
            .one(&*self.db)
            .await?)
    }

    /// Flags a session as failed after a failure/abandonment event. The row
    /// is kept for reconciliation; no order is ever created from it unless
    /// a later verified success promotes it.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn mark_session_failed(
        &self,
        session: CheckoutSessionModel,
    ) -> Result<(), ServiceError> {
        let mut active: checkout_session::ActiveModel = session.into();
        active.status = Set(SessionStatus::Failed);
        active.update(&*self.db).await?;
        Ok(())
    }
}
