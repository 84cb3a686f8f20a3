use db::models::{plan::SubscriptionPlan, subscription::Subscription};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubscriptionPlansResponse {
    pub plans: Vec<SubscriptionPlan>,
}

#[derive(Debug, Serialize)]
pub struct UserSubscriptionResponse {
    pub subscription: Subscription,
}
