use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::subscription::SubscriptionUpsert,
    models::subscription::{Subscription, SubscriptionStatus},
};

/// Activates (or renews) the subscription for a user in a single atomic
/// statement keyed on `user_id`.
///
/// The `WHERE` guard makes webhook replays converge: a duplicate delivery
/// of an already-recorded payment id changes nothing, while a new payment
/// id replaces the period window. [`apply_upsert`] is the in-memory twin
/// of this conflict rule; the two must stay in step.
pub async fn upsert_active_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SubscriptionUpsert,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO subscriptions
            (user_id, plan_id, status, mercado_pago_payment_id, current_period_start, current_period_end)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
        SET plan_id = EXCLUDED.plan_id,
            status = EXCLUDED.status,
            mercado_pago_payment_id = EXCLUDED.mercado_pago_payment_id,
            current_period_start = EXCLUDED.current_period_start,
            current_period_end = EXCLUDED.current_period_end
        WHERE subscriptions.mercado_pago_payment_id IS DISTINCT FROM EXCLUDED.mercado_pago_payment_id
        "#,
    )
    .bind(data.user_id)
    .bind(&data.plan_id)
    .bind(SubscriptionStatus::Active.as_str())
    .bind(&data.payment_id)
    .bind(data.period_start)
    .bind(data.period_end)
    .execute(executor)
    .await
    .map(|_| ())
    .map_err(AppError::from)
}

pub async fn get_subscription_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Row state after applying a webhook write to the user's stored row.
///
/// Mirrors the conflict rule of [`upsert_active_subscription`]: a write
/// carrying an already-recorded payment id leaves the row untouched, any
/// other write replaces the plan, payment id and period window.
pub fn apply_upsert(existing: Option<Subscription>, update: &SubscriptionUpsert) -> Subscription {
    match existing {
        Some(row) if row.mercado_pago_payment_id == update.payment_id => row,
        Some(row) => Subscription {
            id: row.id,
            user_id: row.user_id,
            plan_id: update.plan_id.clone(),
            status: SubscriptionStatus::Active.as_str().to_string(),
            mercado_pago_payment_id: update.payment_id.clone(),
            current_period_start: update.period_start,
            current_period_end: update.period_end,
        },
        None => Subscription {
            id: Uuid::new_v4(),
            user_id: update.user_id,
            plan_id: update.plan_id.clone(),
            status: SubscriptionStatus::Active.as_str().to_string(),
            mercado_pago_payment_id: update.payment_id.clone(),
            current_period_start: update.period_start,
            current_period_end: update.period_end,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn upsert_for(payment_id: &str, start: chrono::DateTime<Utc>) -> SubscriptionUpsert {
        SubscriptionUpsert {
            user_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            plan_id: "p1".to_string(),
            payment_id: payment_id.to_string(),
            period_start: start,
            period_end: start + Duration::days(30),
        }
    }

    #[test]
    fn first_payment_creates_an_active_row() {
        let now = Utc::now();
        let row = apply_upsert(None, &upsert_for("555", now));

        assert_eq!(row.status, "active");
        assert_eq!(row.plan_id, "p1");
        assert_eq!(row.mercado_pago_payment_id, "555");
        assert_eq!(row.current_period_end, now + Duration::days(30));
    }

    #[test]
    fn duplicate_delivery_does_not_extend_the_period() {
        let now = Utc::now();
        let row = apply_upsert(None, &upsert_for("555", now));

        // Same payment id arrives again later; the webhook recomputes the
        // window from its own processing time.
        let replay = upsert_for("555", now + Duration::hours(6));
        let after_replay = apply_upsert(Some(row.clone()), &replay);

        assert_eq!(after_replay.id, row.id);
        assert_eq!(after_replay.current_period_start, row.current_period_start);
        assert_eq!(after_replay.current_period_end, row.current_period_end);
    }

    #[test]
    fn replays_converge_to_one_state() {
        let now = Utc::now();
        let update = upsert_for("555", now);

        let once = apply_upsert(None, &update);
        let twice = apply_upsert(Some(once.clone()), &update);

        assert_eq!(once.id, twice.id);
        assert_eq!(once.current_period_end, twice.current_period_end);
        assert_eq!(once.mercado_pago_payment_id, twice.mercado_pago_payment_id);
    }

    #[test]
    fn new_payment_replaces_the_window() {
        let now = Utc::now();
        let row = apply_upsert(None, &upsert_for("555", now));

        let renewal_start = now + Duration::days(29);
        let mut renewal = upsert_for("777", renewal_start);
        renewal.plan_id = "premium_yearly".to_string();

        let renewed = apply_upsert(Some(row.clone()), &renewal);

        assert_eq!(renewed.id, row.id, "renewal must not create a second row");
        assert_eq!(renewed.user_id, row.user_id);
        assert_eq!(renewed.plan_id, "premium_yearly");
        assert_eq!(renewed.mercado_pago_payment_id, "777");
        assert_eq!(renewed.current_period_end, renewal_start + Duration::days(30));
    }
}
