use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Write model for the webhook's create-or-update of a subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionUpsert {
    pub user_id: Uuid,
    pub plan_id: String,
    pub payment_id: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}
