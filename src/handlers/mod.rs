pub mod carts;
pub mod checkout;
pub mod orders;
pub mod payment_webhooks;
pub mod products;

use crate::{
    config::AppConfig,
    events::EventSender,
    services::{
        cart::CartService, cart_validation::CartValidationService, checkout::CheckoutService,
        orders::OrderService, payments::PaymentGateway,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Services shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub carts: Arc<CartService>,
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        gateway: Arc<dyn PaymentGateway>,
        config: &AppConfig,
    ) -> Self {
        let carts = Arc::new(CartService::new(db.clone(), event_sender.clone()));
        let orders = Arc::new(OrderService::new(db.clone(), event_sender.clone()));
        let checkout = Arc::new(CheckoutService::new(
            db.clone(),
            CartValidationService::new(db),
            carts.clone(),
            orders.clone(),
            gateway.clone(),
            event_sender,
            config.checkout_callback_url.clone(),
        ));

        Self {
            carts,
            checkout,
            orders,
            gateway,
        }
    }
}
