use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::env_config::MercadoPagoConfig;
use crate::error::{AppError, Res};

/// Typed client for the Mercado Pago REST API.
///
/// Only the calls the reconciliation flow needs are wrapped: preference
/// creation, payment lookup and the account ("who am I") probe. Responses
/// are deserialized into explicit shapes; anything that does not match is
/// surfaced as a gateway error instead of leaking undefined fields.
pub struct MercadoPago {
    http: reqwest::Client,
    access_token: String,
    api_url: String,
}

impl MercadoPago {
    /// Builds a client from deployment configuration.
    ///
    /// Fails with a configuration error when no access token is set, so
    /// callers bail out before making any outbound request.
    pub fn from_config(config: &MercadoPagoConfig) -> Res<Self> {
        if config.access_token.is_empty() {
            return Err(AppError::Config(
                "MERCADO_PAGO_ACCESS_TOKEN not configured in environment variables".to_string(),
            ));
        }
        Ok(MercadoPago {
            http: reqwest::Client::new(),
            access_token: config.access_token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Registers a checkout preference and returns its id and redirect url.
    pub async fn create_preference(&self, preference: &CreatePreference) -> Res<PreferenceCreated> {
        if let Ok(body) = serde_json::to_string(preference) {
            log::debug!("Creating preference: {}", body);
        }

        let response = self
            .http
            .post(format!("{}/checkout/preferences", self.api_url))
            .bearer_auth(&self.access_token)
            .json(preference)
            .send()
            .await?;

        let status = response.status();
        log::info!("Mercado Pago preference response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Mercado Pago preference creation failed: {}", body);
            return Err(AppError::Gateway(format!(
                "failed to create payment preference: {}",
                body
            )));
        }

        let created: PreferenceCreated = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("malformed preference response: {}", e)))?;

        if created.id.is_empty() || created.init_point.is_empty() {
            return Err(AppError::Gateway(
                "preference response missing id or init_point".to_string(),
            ));
        }

        log::info!("Preference created: {}", created.id);
        Ok(created)
    }

    /// Fetches the authoritative payment record by id.
    ///
    /// Webhook notifications are only a "go look" signal; the status acted
    /// on always comes from this call.
    pub async fn get_payment(&self, payment_id: &str) -> Res<Payment> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{}", self.api_url, payment_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Failed to get payment {}: {}", payment_id, body);
            return Err(AppError::Gateway(format!(
                "failed to get payment details: {}",
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("malformed payment response: {}", e)))
    }

    /// Read-only credential probe against the account endpoint.
    pub async fn get_account(&self) -> Res<Account> {
        let response = self
            .http
            .get(format!("{}/users/me", self.api_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED || !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!("invalid access token: {}", body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("malformed account response: {}", e)))
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePreference {
    pub items: Vec<PreferenceItem>,
    pub payer: PreferencePayer,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub notification_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PreferenceMetadata>,
}

#[derive(Debug, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    pub currency_id: String,
    pub unit_price: f64,
}

#[derive(Debug, Serialize)]
pub struct PreferencePayer {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Free-form metadata attached to the preference; the gateway echoes it
/// back on the resulting payment record.
#[derive(Debug, Serialize)]
pub struct PreferenceMetadata {
    pub cadence: String,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceCreated {
    pub id: String,
    pub init_point: String,
}

#[derive(Debug, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default)]
    pub cadence: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_deserializes_with_metadata() {
        let payment: Payment = serde_json::from_str(
            r#"{
                "id": 555,
                "status": "approved",
                "external_reference": "u1_p1",
                "metadata": { "cadence": "yearly" }
            }"#,
        )
        .unwrap();
        assert_eq!(payment.id, 555);
        assert_eq!(payment.status, "approved");
        assert_eq!(payment.external_reference.as_deref(), Some("u1_p1"));
        assert_eq!(payment.metadata.cadence.as_deref(), Some("yearly"));
    }

    #[test]
    fn payment_deserializes_without_optional_fields() {
        let payment: Payment =
            serde_json::from_str(r#"{ "id": 1, "status": "rejected" }"#).unwrap();
        assert!(payment.external_reference.is_none());
        assert!(payment.metadata.cadence.is_none());
    }

    #[test]
    fn preference_serializes_without_empty_metadata() {
        let preference = CreatePreference {
            items: vec![PreferenceItem {
                title: "Assinatura Premium".to_string(),
                quantity: 1,
                currency_id: "BRL".to_string(),
                unit_price: 29.90,
            }],
            payer: PreferencePayer {
                email: "member@example.com".to_string(),
            },
            back_urls: BackUrls {
                success: "https://app.example.com/ok".to_string(),
                failure: "https://app.example.com/fail".to_string(),
                pending: "https://app.example.com/pending".to_string(),
            },
            auto_return: "approved".to_string(),
            external_reference: "u1_p1".to_string(),
            notification_url: "https://api.example.com/api/pay/webhook".to_string(),
            metadata: None,
        };

        let value = serde_json::to_value(&preference).unwrap();
        assert!(value.get("metadata").is_none());
        assert_eq!(value["items"][0]["quantity"], 1);
        assert_eq!(value["external_reference"], "u1_p1");
    }

    #[test]
    fn missing_access_token_fails_before_any_request() {
        let config = MercadoPagoConfig {
            access_token: String::new(),
            api_url: "https://api.mercadopago.com".to_string(),
            billing_currency: "BRL".to_string(),
        };
        assert!(matches!(
            MercadoPago::from_config(&config),
            Err(AppError::Config(_))
        ));
    }
}
