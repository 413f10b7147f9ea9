use crate::{
    entities::{Product, ProductVariant},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// A client-submitted cart line. The echoed price is advisory only and is
/// never consulted when computing totals.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub variant_id: Uuid,
    pub quantity: i32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// A cart line with its price re-read from the catalog. Serialized into the
/// checkout session snapshot and copied verbatim into order items at
/// materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCartLine {
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl ValidatedCartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedCart {
    pub lines: Vec<ValidatedCartLine>,
    pub total: Decimal,
}

/// Re-derives authoritative prices and checks stock for a submitted cart.
///
/// Pure read-and-compute over the catalog: performs no writes, so callers
/// may invoke it speculatively. Stock is only checked here, not reserved;
/// the decrement happens inside the order materialization transaction.
#[derive(Clone)]
pub struct CartValidationService {
    db: Arc<DatabaseConnection>,
}

impl CartValidationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, lines))]
    pub async fn validate(&self, lines: &[CartLineRequest]) -> Result<ValidatedCart, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let mut validated = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in lines {
            if line.quantity <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Quantity for variant {} must be positive",
                    line.variant_id
                )));
            }

            let (variant, product) = ProductVariant::find_by_id(line.variant_id)
                .find_also_related(Product)
                .one(&*self.db)
                .await?
                .ok_or(ServiceError::InvalidVariant(line.variant_id))?;

            let product_name = product
                .map(|p| p.name)
                .unwrap_or_else(|| variant.name.clone());

            if line.quantity > variant.stock_quantity {
                return Err(ServiceError::InsufficientStock {
                    name: product_name,
                    requested: line.quantity,
                    available: variant.stock_quantity,
                });
            }

            let validated_line = ValidatedCartLine {
                product_id: variant.product_id,
                variant_id: variant.id,
                product_name,
                quantity: line.quantity,
                unit_price: variant.price,
            };
            total += validated_line.subtotal();
            validated.push(validated_line);
        }

        Ok(ValidatedCart {
            lines: validated,
            total,
        })
    }
}
