use super::{to_minor_units, InitializePayment, InitializedPayment, PaymentGateway, VerifiedTransaction};
use crate::{config::AppConfig, errors::ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Paystack-style HTTPS client: bearer secret key, `POST
/// /transaction/initialize`, `GET /transaction/verify/{reference}`.
pub struct PaystackGateway {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl PaystackGateway {
    pub fn new(secret_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.gateway_secret_key.clone(), cfg.gateway_base_url.clone())
    }
}

#[derive(Serialize)]
struct InitializeBody<'a> {
    email: &'a str,
    /// Minor currency units, per the provider's API contract
    amount: i64,
    reference: &'a str,
    callback_url: &'a str,
}

#[derive(Deserialize)]
struct Envelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: Option<String>,
    reference: String,
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn initialize(
        &self,
        request: InitializePayment,
    ) -> Result<InitializedPayment, ServiceError> {
        let amount = to_minor_units(request.amount)?;
        let body = InitializeBody {
            email: &request.email,
            amount,
            reference: &request.reference,
            callback_url: &request.callback_url,
        };

        let response = self
            .client
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("gateway unreachable: {e}")))?;

        let envelope: Envelope<InitializeData> = response
            .json()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("malformed gateway response: {e}")))?;

        if !envelope.status {
            return Err(ServiceError::PaymentInitFailed(envelope.message));
        }
        let data = envelope.data.ok_or_else(|| {
            ServiceError::ExternalServiceError("gateway response missing data".to_string())
        })?;

        info!(reference = %data.reference, "Payment transaction initialized");
        Ok(InitializedPayment {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference: data.reference,
        })
    }

    #[instrument(skip(self))]
    async fn verify(&self, reference: &str) -> Result<VerifiedTransaction, ServiceError> {
        let response = self
            .client
            .get(format!("{}/transaction/verify/{reference}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("gateway unreachable: {e}")))?;

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("malformed gateway response: {e}")))?;

        let data = raw.get("data").ok_or_else(|| {
            ServiceError::ExternalServiceError("gateway response missing data".to_string())
        })?;
        let status = data.get("status").and_then(|s| s.as_str()).unwrap_or("");
        let amount_minor = data.get("amount").and_then(|a| a.as_i64()).ok_or_else(|| {
            ServiceError::ExternalServiceError("gateway response missing amount".to_string())
        })?;

        Ok(VerifiedTransaction {
            success: status == "success",
            amount_minor,
            raw,
        })
    }
}
