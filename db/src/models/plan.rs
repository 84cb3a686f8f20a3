use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A subscription plan as sold on the pricing page. Read-only from the
/// reconciliation flow's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_monthly: f64,
    pub price_yearly: f64,
    pub features: Vec<String>,
    pub active: bool,
}

/// Billing cadence chosen at checkout. Carried to the gateway as preference
/// metadata so the webhook can size the period window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Monthly,
    Yearly,
}

impl Cadence {
    pub fn period_days(self) -> i64 {
        match self {
            Cadence::Monthly => 30,
            Cadence::Yearly => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(Cadence::Monthly),
            "yearly" => Some(Cadence::Yearly),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_maps_to_period_days() {
        assert_eq!(Cadence::Monthly.period_days(), 30);
        assert_eq!(Cadence::Yearly.period_days(), 365);
    }

    #[test]
    fn cadence_parses_known_values_only() {
        assert_eq!(Cadence::parse("monthly"), Some(Cadence::Monthly));
        assert_eq!(Cadence::parse("yearly"), Some(Cadence::Yearly));
        assert_eq!(Cadence::parse("weekly"), None);
    }
}
