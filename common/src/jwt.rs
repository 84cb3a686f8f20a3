use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Res};

/// Claims carried by the identity provider's access token.
///
/// The provider signs tokens with HS256; `sub` is the user id and `email`
/// is the address checkout preferences are billed to.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

/// Extracts claims from an identity token, verifying signature and expiry.
pub fn validate_token(token: &str, secret: &str) -> Res<Claims> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Issues a token the way the identity provider does. Used by tests and
/// local tooling; production tokens come from the provider itself.
pub fn generate_token(user_id: Uuid, email: &str, secret: &str) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(1))
        .ok_or_else(|| AppError::Internal("invalid expiry timestamp".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, "member@example.com", "secret").unwrap();
        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "member@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(Uuid::new_v4(), "member@example.com", "secret").unwrap();
        assert!(validate_token(&token, "other").is_err());
    }
}
