pub mod paystack;

use crate::errors::ServiceError;
use async_trait::async_trait;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

pub use paystack::PaystackGateway;

/// Request to open a transaction with the payment provider.
#[derive(Debug, Clone, Serialize)]
pub struct InitializePayment {
    pub email: String,
    /// Amount in major currency units; converted to minor units on the wire.
    pub amount: Decimal,
    /// Our checkout session id, used by the provider to correlate events.
    pub reference: String,
    /// Browser redirect target after the hosted payment page.
    pub callback_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitializedPayment {
    pub authorization_url: String,
    pub access_code: Option<String>,
    pub reference: String,
}

/// Result of a server-side transaction lookup.
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    pub success: bool,
    pub amount_minor: i64,
    /// Full provider response, persisted on the order for audit.
    pub raw: serde_json::Value,
}

/// Thin client over the external payment provider.
///
/// The trait seam exists so the webhook re-verification path can be
/// exercised in tests without network access.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize(
        &self,
        request: InitializePayment,
    ) -> Result<InitializedPayment, ServiceError>;

    async fn verify(&self, reference: &str) -> Result<VerifiedTransaction, ServiceError>;
}

/// Converts a major-unit amount to integer minor units (e.g. 100.00 → 10000).
///
/// The conversion must be exact: an amount with sub-minor-unit precision is
/// rejected rather than rounded, so a session total can never drift from
/// what the gateway charges.
pub fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    let minor = amount * Decimal::ONE_HUNDRED;
    if !minor.fract().is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "Amount {amount} has sub-minor-unit precision"
        )));
    }
    minor.trunc().to_i64().ok_or_else(|| {
        ServiceError::ValidationError(format!("Amount {amount} out of representable range"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_exact_amounts() {
        assert_eq!(to_minor_units(dec!(100.00)).unwrap(), 10_000);
        assert_eq!(to_minor_units(dec!(0.01)).unwrap(), 1);
        assert_eq!(to_minor_units(dec!(49.99)).unwrap(), 4_999);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
        assert_eq!(to_minor_units(dec!(1250)).unwrap(), 125_000);
    }

    #[test]
    fn rejects_sub_minor_precision() {
        assert!(to_minor_units(dec!(10.005)).is_err());
        assert!(to_minor_units(dec!(0.001)).is_err());
    }

    #[test]
    fn trailing_zero_scale_is_still_exact() {
        // 50.0000 as stored in a Decimal(19, 4) column
        assert_eq!(to_minor_units(dec!(50.0000)).unwrap(), 5_000);
    }
}
