use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::models::plan::SubscriptionPlan;

pub async fn list_active_plans<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<SubscriptionPlan>> {
    sqlx::query_as::<_, SubscriptionPlan>(
        "SELECT * FROM subscription_plans WHERE active ORDER BY price_monthly",
    )
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
