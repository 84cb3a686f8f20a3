use db::models::plan::Cadence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    /// Display name only; never used for correlation.
    pub plan_name: String,
    pub price: f64,
    /// Billing cadence picked at checkout; forwarded to the gateway as
    /// preference metadata so the webhook can size the period.
    #[serde(default)]
    pub cadence: Option<Cadence>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub preference_id: String,
    pub init_point: String,
}

/// Notification body the gateway posts to the webhook. The id arrives as a
/// number or a string depending on the notification channel.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    pub id: NotificationId,
    pub topic: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NotificationId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationId::Number(id) => write!(f, "{}", id),
            NotificationId::Text(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_id_accepts_number_and_string() {
        let n: WebhookNotification =
            serde_json::from_str(r#"{"id": 555, "topic": "payment"}"#).unwrap();
        assert_eq!(n.id.to_string(), "555");

        let s: WebhookNotification =
            serde_json::from_str(r#"{"id": "555", "topic": "payment"}"#).unwrap();
        assert_eq!(s.id.to_string(), "555");
    }

    #[test]
    fn checkout_request_cadence_is_optional() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"plan_id": "p1", "plan_name": "Premium", "price": 29.90}"#,
        )
        .unwrap();
        assert!(req.cadence.is_none());

        let req: CheckoutRequest = serde_json::from_str(
            r#"{"plan_id": "p1", "plan_name": "Premium", "price": 299.0, "cadence": "yearly"}"#,
        )
        .unwrap();
        assert_eq!(req.cadence, Some(Cadence::Yearly));
    }
}
