use crate::{
    entities::{
        order, order_item, product_variant, CheckoutSession, CheckoutSessionModel, DeliveryStatus,
        Order, OrderItem, OrderItemModel, OrderModel, OrderStatus, ProductVariant,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::cart_validation::ValidatedCartLine,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order lifecycle service. Owns the single promotion point that turns a
/// checkout session into a permanent order, plus the read and admin-update
/// surfaces over materialized orders.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

/// Admin update of delivery fields. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeliveryUpdate {
    #[schema(value_type = Option<String>)]
    pub delivery_status: Option<DeliveryStatus>,
    pub tracking_number: Option<String>,
    pub rider_id: Option<Uuid>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivery_notes: Option<String>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Promotes a checkout session into an order with its items.
    ///
    /// Runs as one transaction: insert the order, copy the snapshot lines
    /// into order items, decrement variant stock, delete the session. The
    /// session delete is the commit signal that makes promotion
    /// at-most-once: a redelivered webhook finds no session and no-ops.
    /// Any failure rolls everything back, leaving the session as the
    /// durable record of intent for a later retry.
    #[instrument(skip(self, session, provider_payload), fields(session_id = %session.id))]
    pub async fn materialize_session(
        &self,
        session: CheckoutSessionModel,
        status: OrderStatus,
        payment_reference: Option<String>,
        provider_payload: Option<serde_json::Value>,
    ) -> Result<OrderModel, ServiceError> {
        let lines: Vec<ValidatedCartLine> = serde_json::from_value(session.lines.clone())?;

        let txn = self.db.begin().await?;
        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let order = order::ActiveModel {
            id: Set(order_id),
            user_id: Set(session.user_id),
            status: Set(status),
            payment_method: Set(session.payment_method),
            total_amount: Set(session.total_amount),
            shipping_address_id: Set(session.shipping_address_id),
            billing_address_id: Set(session.billing_address_id),
            delivery_status: Set(DeliveryStatus::Pending),
            tracking_number: Set(None),
            rider_id: Set(None),
            estimated_delivery: Set(None),
            delivery_notes: Set(None),
            payment_reference: Set(payment_reference),
            provider_payload: Set(provider_payload),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };
        let order = order.insert(&txn).await?;

        for line in &lines {
            order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(line.product_id),
                variant_id: Set(line.variant_id),
                product_name: Set(line.product_name.clone()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;

            // Guarded decrement: stock was only read-checked at validation
            // time, so a concurrent sale may have consumed it since.
            let result = ProductVariant::update_many()
                .col_expr(
                    product_variant::Column::StockQuantity,
                    Expr::col(product_variant::Column::StockQuantity).sub(line.quantity),
                )
                .filter(product_variant::Column::Id.eq(line.variant_id))
                .filter(product_variant::Column::StockQuantity.gte(line.quantity))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                let available = ProductVariant::find_by_id(line.variant_id)
                    .one(&txn)
                    .await?
                    .map(|v| v.stock_quantity)
                    .unwrap_or(0);
                return Err(ServiceError::InsufficientStock {
                    name: line.product_name.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        CheckoutSession::delete_by_id(session.id).exec(&txn).await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderCreated(order_id))
            .await;

        info!(%order_id, session_id = %session.id, "Materialized order from checkout session");
        Ok(order)
    }

    /// Owner-scoped order lookup.
    pub async fn get_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), ServiceError> {
        let order = Order::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        let items = order.find_related(OrderItem).all(&*self.db).await?;
        Ok((order, items))
    }

    /// Lookup by the gateway transaction reference. Used by the storefront
    /// to poll for the order after the card payment redirect.
    pub async fn find_by_reference(
        &self,
        reference: &str,
        user_id: Uuid,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), ServiceError> {
        let order = Order::find()
            .filter(order::Column::PaymentReference.eq(reference))
            .filter(order::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No order for reference {reference}"))
            })?;

        let items = order.find_related(OrderItem).all(&*self.db).await?;
        Ok((order, items))
    }

    /// Public tracking lookup for guest order tracking.
    pub async fn track(
        &self,
        tracking_number: &str,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), ServiceError> {
        let order = Order::find()
            .filter(order::Column::TrackingNumber.eq(tracking_number))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No order with tracking number {tracking_number}"))
            })?;

        let items = order.find_related(OrderItem).all(&*self.db).await?;
        Ok((order, items))
    }

    /// Admin status transition.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let order = Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        let old_status = order.status;
        let mut active: order::ActiveModel = order.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: format!("{old_status:?}"),
                new_status: format!("{new_status:?}"),
            })
            .await;

        Ok(updated)
    }

    /// Admin update of the delivery fields.
    #[instrument(skip(self, update))]
    pub async fn update_delivery(
        &self,
        order_id: Uuid,
        update: DeliveryUpdate,
    ) -> Result<OrderModel, ServiceError> {
        let order = Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        let mut active: order::ActiveModel = order.into();
        if let Some(status) = update.delivery_status {
            active.delivery_status = Set(status);
        }
        if let Some(tracking) = update.tracking_number {
            active.tracking_number = Set(Some(tracking));
        }
        if let Some(rider) = update.rider_id {
            active.rider_id = Set(Some(rider));
        }
        if let Some(eta) = update.estimated_delivery {
            active.estimated_delivery = Set(Some(eta));
        }
        if let Some(notes) = update.delivery_notes {
            active.delivery_notes = Set(Some(notes));
        }
        active.updated_at = Set(Some(Utc::now()));

        Ok(active.update(&*self.db).await?)
    }
}
