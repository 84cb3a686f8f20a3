use common::error::Res;
use db::models::{plan::SubscriptionPlan, subscription::Subscription};
use sqlx::PgPool;
use uuid::Uuid;

/// Active plans as shown on the pricing page.
pub async fn get_subscription_plans(pool: &PgPool) -> Res<Vec<SubscriptionPlan>> {
    db::plan::list_active_plans(pool).await
}

/// The caller's subscription row, if the webhook has ever activated one.
pub async fn get_user_subscription(pool: &PgPool, user_id: Uuid) -> Res<Option<Subscription>> {
    db::subscription::get_subscription_by_user(pool, user_id).await
}
