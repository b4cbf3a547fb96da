use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;
use uuid::Uuid;

use shared_models::session::SessionClaims;

/// Admin sessions last 12 hours before the cookie is rejected.
pub const SESSION_TTL_HOURS: i64 = 12;

pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Issue a signed session token for a logged-in admin.
pub fn create_session_token(
    admin_id: Uuid,
    email: &str,
    secret: &str,
) -> Result<(String, SessionClaims), String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let now = Utc::now();
    let claims = SessionClaims {
        sub: admin_id,
        email: email.to_string(),
        csrf: generate_csrf_token(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign session token: {}", e))?;

    Ok((token, claims))
}

/// Validate a session token and return its claims. Expiry is enforced by
/// `jsonwebtoken`'s default validation.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Session token rejected: {}", e);
        "Invalid or expired session".to_string()
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret-long-enough-for-hs256";

    #[test]
    fn issued_token_validates() {
        let id = Uuid::new_v4();
        let (token, claims) = create_session_token(id, "owner@example.com", SECRET).unwrap();

        let decoded = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.email, "owner@example.com");
        assert_eq!(decoded.csrf, claims.csrf);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = create_session_token(Uuid::new_v4(), "owner@example.com", SECRET).unwrap();
        assert!(validate_session_token(&token, "other-secret").is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(create_session_token(Uuid::new_v4(), "a@b.c", "").is_err());
        assert!(validate_session_token("x.y.z", "").is_err());
    }

    #[test]
    fn csrf_tokens_are_unique() {
        assert_ne!(generate_csrf_token(), generate_csrf_token());
    }
}
