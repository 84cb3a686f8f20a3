use common::error::{AppError, Res};

/// Builds the correlation string attached to a checkout preference and
/// echoed back on the payment record.
///
/// The `{user_id}_{plan_id}` wire format is load-bearing: payments created
/// before a format change would reconcile against the old encoding, so it
/// must not change without a migration plan.
pub fn build(user_id: &str, plan_id: &str) -> String {
    format!("{}_{}", user_id, plan_id)
}

/// Splits an external reference back into `(user_id, plan_id)`.
///
/// Splits on the first underscore only: user ids are UUIDs and cannot
/// contain one, while plan ids may.
pub fn parse(reference: &str) -> Res<(String, String)> {
    let (user_id, plan_id) = reference.split_once('_').ok_or_else(|| {
        AppError::Validation(format!("malformed external reference: {}", reference))
    })?;

    if user_id.is_empty() || plan_id.is_empty() {
        return Err(AppError::Validation(format!(
            "malformed external reference: {}",
            reference
        )));
    }

    Ok((user_id.to_string(), plan_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_user_and_plan() {
        let reference = build("u1", "p1");
        assert_eq!(reference, "u1_p1");
        assert_eq!(parse(&reference).unwrap(), ("u1".to_string(), "p1".to_string()));
    }

    #[test]
    fn plan_id_may_contain_underscores() {
        let reference = build("550e8400-e29b-41d4-a716-446655440000", "premium_yearly");
        let (user_id, plan_id) = parse(&reference).unwrap();
        assert_eq!(user_id, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(plan_id, "premium_yearly");
    }

    #[test]
    fn rejects_reference_without_separator() {
        assert!(parse("justoneid").is_err());
    }

    #[test]
    fn rejects_empty_sides() {
        assert!(parse("_p1").is_err());
        assert!(parse("u1_").is_err());
        assert!(parse("_").is_err());
    }
}
