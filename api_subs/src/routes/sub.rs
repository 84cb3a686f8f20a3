use std::sync::Arc;

use actix_web::{Responder, get, web};
use sqlx::PgPool;

use common::{error::AppError, error::Res, http::Success, jwt::Claims};

use crate::{
    dtos::sub::{SubscriptionPlansResponse, UserSubscriptionResponse},
    services,
};

/// Lists the active subscription plans. Public: the pricing page shows
/// plans to visitors before login.
#[get("/plans")]
pub async fn get_plans(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let plans = services::sub::get_subscription_plans(&pool).await?;
    Success::ok(SubscriptionPlansResponse { plans })
}

/// Retrieves the authenticated user's subscription, as reconciled by the
/// payment webhook.
///
/// # Output
/// - Success: 200 with `{subscription}`
/// - Error: 404 when no payment has ever activated one
#[get("/current")]
pub async fn get_current(
    claims: web::ReqData<Claims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let subscription = services::sub::get_user_subscription(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No subscription found".to_string()))?;

    Success::ok(UserSubscriptionResponse { subscription })
}
