use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable staging record for a not-yet-confirmed purchase attempt.
///
/// The primary key doubles as the payment gateway's transaction reference,
/// so a webhook event can be correlated back to the session that initiated
/// it. A session is deleted the moment it is promoted to an order; its
/// continued existence is the sole guard that makes promotion at-most-once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checkout_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Validated cart snapshot: JSON-encoded `Vec<ValidatedCartLine>`,
    /// prices re-read from the catalog at validation time.
    #[sea_orm(column_type = "Json")]
    pub lines: Json,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Uuid,
    pub payment_method: PaymentMethod,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Redirect-based card payment through the gateway
    #[sea_orm(string_value = "card")]
    #[serde(rename = "gateway-card", alias = "card")]
    Card,
    /// Cash on delivery; confirmed without a gateway round trip
    #[sea_orm(string_value = "cod")]
    #[serde(rename = "cod", alias = "cash-on-delivery")]
    CashOnDelivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Awaiting payment confirmation
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Gateway reported failure/abandonment; kept for reconciliation
    #[sea_orm(string_value = "failed")]
    Failed,
}
