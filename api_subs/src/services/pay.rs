use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    env_config::Config,
    error::{AppError, Res},
    jwt::Claims,
    mercadopago::{
        BackUrls, CreatePreference, MercadoPago, Payment, PreferenceItem, PreferenceMetadata,
        PreferencePayer,
    },
};
use db::{dtos::subscription::SubscriptionUpsert, models::plan::Cadence};

use crate::{dtos::pay::CheckoutRequest, misc::reference};

const PAYMENT_TOPIC: &str = "payment";
const APPROVED_STATUS: &str = "approved";

/// Assembles the checkout preference for an authenticated caller.
///
/// Pure with respect to external services: credential resolution and the
/// outbound call stay with the caller.
pub fn build_preference(
    claims: &Claims,
    req: &CheckoutRequest,
    config: &Config,
) -> Res<CreatePreference> {
    if !req.price.is_finite() || req.price <= 0.0 {
        return Err(AppError::Validation(
            "price must be a positive number".to_string(),
        ));
    }

    let subscription_page = format!(
        "{}/dashboard/member/subscription",
        config.web_app_url.trim_end_matches('/')
    );

    Ok(CreatePreference {
        items: vec![PreferenceItem {
            title: format!("Assinatura {}", req.plan_name),
            quantity: 1,
            currency_id: config.mercado_pago.billing_currency.clone(),
            unit_price: req.price,
        }],
        payer: PreferencePayer {
            email: claims.email.clone(),
        },
        back_urls: BackUrls {
            success: format!("{}?status=success", subscription_page),
            failure: format!("{}?status=failure", subscription_page),
            pending: format!("{}?status=pending", subscription_page),
        },
        auto_return: APPROVED_STATUS.to_string(),
        external_reference: reference::build(&claims.sub.to_string(), &req.plan_id),
        notification_url: format!(
            "{}/api/pay/webhook",
            config.public_base_url.trim_end_matches('/')
        ),
        metadata: req.cadence.map(|cadence| PreferenceMetadata {
            cadence: cadence.as_str().to_string(),
        }),
    })
}

/// Derives the subscription write from an authoritative payment record.
///
/// Returns `Ok(None)` for any status other than approved: those deliveries
/// are acknowledged without touching the subscription row. The period
/// length comes from the cadence the preference carried as metadata,
/// falling back to the configured default.
pub fn subscription_update_from_payment(
    payment: &Payment,
    now: DateTime<Utc>,
    default_period_days: i64,
) -> Res<Option<SubscriptionUpsert>> {
    if payment.status != APPROVED_STATUS {
        return Ok(None);
    }

    let external_reference = payment.external_reference.as_deref().ok_or_else(|| {
        AppError::Validation(format!(
            "approved payment {} has no external reference",
            payment.id
        ))
    })?;

    let (user_id, plan_id) = reference::parse(external_reference)?;
    let user_id = Uuid::parse_str(&user_id).map_err(|_| {
        AppError::Validation(format!("external reference user id is not a uuid: {}", user_id))
    })?;

    let period_days = payment
        .metadata
        .cadence
        .as_deref()
        .and_then(Cadence::parse)
        .map(Cadence::period_days)
        .unwrap_or(default_period_days);

    Ok(Some(SubscriptionUpsert {
        user_id,
        plan_id,
        payment_id: payment.id.to_string(),
        period_start: now,
        period_end: now + Duration::days(period_days),
    }))
}

/// Handles one webhook delivery end to end.
///
/// The notification body is only a signal; the status acted on is always
/// re-fetched from the gateway. Deliveries are independent: order does not
/// matter because the upsert converges on the fetched record.
pub async fn process_notification(
    pool: &PgPool,
    config: &Config,
    id: &str,
    topic: &str,
) -> Res<()> {
    let gateway = MercadoPago::from_config(&config.mercado_pago)?;

    if topic != PAYMENT_TOPIC {
        log::debug!("Ignoring webhook topic: {}", topic);
        return Ok(());
    }

    let payment = gateway.get_payment(id).await?;
    log::info!("Payment {} reported as {}", payment.id, payment.status);

    if let Some(update) = subscription_update_from_payment(
        &payment,
        Utc::now(),
        config.subscription_period_days,
    )? {
        let user_id = update.user_id;
        let plan_id = update.plan_id.clone();
        db::subscription::upsert_active_subscription(pool, update).await?;
        log::info!(
            "Subscription activated for user {} with plan {}",
            user_id,
            plan_id
        );
    }

    Ok(())
}
