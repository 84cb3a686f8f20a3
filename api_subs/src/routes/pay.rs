use std::sync::Arc;

use actix_web::{HttpResponse, Responder, post, web};
use sqlx::PgPool;

use common::{
    env_config::Config, error::Res, http::Success, jwt::Claims, mercadopago::MercadoPago,
};

use crate::{
    dtos::pay::{CheckoutRequest, CheckoutResponse, VerifyResponse, WebhookAck, WebhookNotification},
    services,
};

/// Registers a checkout preference with Mercado Pago for the authenticated
/// user and returns the redirect url the client must open.
///
/// # Input
/// - `claims`: identity claims injected by the auth middleware
/// - `req`: JSON payload `{plan_id, plan_name, price, cadence?}`
/// - `config`: application configuration with the gateway credential
///
/// # Output
/// - Success: 200 with `{preference_id, init_point}`
/// - Error: 400 with `{error}` when the credential is missing, the price is
///   invalid, or the gateway rejects the request; 401 from the middleware
///   when the caller is not authenticated
///
/// # Side effects
/// None on local state; the only side effect is a pending checkout intent
/// inside the gateway. Payment confirmation arrives later via the webhook.
#[post("/checkout")]
async fn post_checkout(
    claims: web::ReqData<Claims>,
    req: web::Json<CheckoutRequest>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let gateway = MercadoPago::from_config(&config.mercado_pago)?;
    let preference = services::pay::build_preference(&claims, &req, &config)?;

    log::info!(
        "Creating checkout preference for user {} and plan {}",
        claims.sub,
        req.plan_id
    );

    let created = gateway.create_preference(&preference).await?;

    Success::ok(CheckoutResponse {
        preference_id: created.id,
        init_point: created.init_point,
    })
}

/// Receives payment notifications from the gateway.
///
/// Public by design: the gateway does not authenticate, trust comes from
/// re-fetching the payment by id and correlating via its external
/// reference. This url is what preferences carry as `notification_url`.
///
/// Replays are safe: the subscription upsert converges to the same state
/// for duplicate deliveries of one payment. Errors return non-2xx so the
/// gateway retries the delivery.
#[post("/webhook")]
async fn post_webhook(
    req: web::Json<WebhookNotification>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let notification = req.into_inner();
    log::info!(
        "Webhook delivery: id={} topic={}",
        notification.id,
        notification.topic
    );

    services::pay::process_notification(
        &pool,
        &config,
        &notification.id.to_string(),
        &notification.topic,
    )
    .await?;

    Success::ok(WebhookAck { success: true })
}

/// Checks whether the configured gateway credential is valid.
///
/// Read-only "who am I" probe used by the admin settings screen. Never
/// mutates state and never returns the credential itself.
#[post("/verify")]
async fn post_verify(config: web::Data<Arc<Config>>) -> Res<HttpResponse> {
    let gateway = match MercadoPago::from_config(&config.mercado_pago) {
        Ok(gateway) => gateway,
        Err(error) => {
            return Ok(HttpResponse::BadRequest().json(VerifyResponse {
                configured: false,
                user_id: None,
                email: None,
                error: Some(error.to_string()),
            }));
        }
    };

    match gateway.get_account().await {
        Ok(account) => Ok(HttpResponse::Ok().json(VerifyResponse {
            configured: true,
            user_id: Some(account.id),
            email: Some(account.email),
            error: None,
        })),
        Err(error) => Ok(HttpResponse::BadRequest().json(VerifyResponse {
            configured: false,
            user_id: None,
            email: None,
            error: Some(error.to_string()),
        })),
    }
}
