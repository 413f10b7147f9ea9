use crate::{
    entities::{cart, cart_item, Cart, CartItem, CartItemModel, CartModel, ProductVariant},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Persisted per-user cart. Contents are advisory only: checkout captures
/// a re-priced snapshot and then clears the cart, so nothing here is ever
/// trusted for totals or stock.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

#[derive(Debug, Serialize)]
pub struct CartWithItems {
    pub cart: CartModel,
    pub items: Vec<CartItemModel>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Fetches the user's cart, creating an empty one on first touch.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<CartWithItems, ServiceError> {
        let existing = Cart::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?;

        let cart = match existing {
            Some(cart) => cart,
            None => {
                let now = Utc::now();
                cart::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&*self.db)
                .await?
            }
        };

        let items = cart.find_related(CartItem).all(&*self.db).await?;
        Ok(CartWithItems { cart, items })
    }

    /// Adds a variant to the cart, incrementing quantity if already present.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: Uuid,
        variant_id: Uuid,
        quantity: i32,
    ) -> Result<CartWithItems, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }

        let variant = ProductVariant::find_by_id(variant_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::InvalidVariant(variant_id))?;

        let CartWithItems { cart, items } = self.get_or_create(user_id).await?;
        let now = Utc::now();

        match items.into_iter().find(|i| i.variant_id == variant_id) {
            Some(item) => {
                let current = item.quantity;
                let mut item: cart_item::ActiveModel = item.into();
                item.quantity = Set(current + quantity);
                item.updated_at = Set(now);
                item.update(&*self.db).await?;
            }
            None => {
                cart_item::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    cart_id: Set(cart.id),
                    product_id: Set(variant.product_id),
                    variant_id: Set(variant_id),
                    quantity: Set(quantity),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&*self.db)
                .await?;
            }
        }

        let mut cart_update: cart::ActiveModel = cart.into();
        cart_update.updated_at = Set(now);
        let cart = cart_update.update(&*self.db).await?;

        let items = cart.find_related(CartItem).all(&*self.db).await?;
        Ok(CartWithItems { cart, items })
    }

    /// Removes every item from the user's cart. A missing cart is a no-op.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let Some(cart) = Cart::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(());
        };

        CartItem::delete_many()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .exec(&*self.db)
            .await?;

        self.event_sender
            .send_or_log(Event::CartCleared { user_id })
            .await;

        info!(%user_id, "Cleared cart");
        Ok(())
    }
}
