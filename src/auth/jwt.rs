/// Access Token Issuing and Verification
///
/// HS256-signed JWTs carrying `{iss: "chirpy", sub, iat, exp}`. Validity
/// is derived from signature and expiry alone; nothing is persisted.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::{AppError, AuthError};

/// Issue a signed access token for `user_id`, valid for `ttl`
///
/// # Errors
/// Returns `AppError::Internal` if signing fails
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify an access token and return its subject
///
/// Bad signature, wrong algorithm, wrong issuer, expiry and a missing or
/// non-UUID subject all collapse into `AuthError::TokenInvalid`.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        AuthError::TokenInvalid
    })?;

    // jsonwebtoken accepts exp == now; tokens are only valid strictly before exp
    if claims.is_expired() {
        tracing::debug!("JWT validation error: token expired");
        return Err(AuthError::TokenInvalid);
    }

    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn sign_raw(payload: &serde_json::Value, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to sign payload")
    }

    #[test]
    fn test_issue_and_verify_token() {
        let user_id = Uuid::new_v4();

        let token = issue_access_token(user_id, SECRET, Duration::hours(1))
            .expect("Failed to generate token");
        let subject = verify_access_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();

        let result = verify_access_token(&token, "randomSecret");
        assert_eq!(result, Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_zero_ttl_token_is_expired() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::zero()).unwrap();
        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_expired_token() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-30)).unwrap();
        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_access_token("invalid.token.here", SECRET);
        assert_eq!(result, Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_tampered_token() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();

        let tampered = format!("{}X", token);
        assert_eq!(verify_access_token(&tampered, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_wrong_issuer() {
        let now = chrono::Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({
                "iss": "someone-else",
                "sub": Uuid::new_v4().to_string(),
                "iat": now,
                "exp": now + 3600,
            }),
            Algorithm::HS256,
            SECRET,
        );

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_non_uuid_subject() {
        let now = chrono::Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({ "iss": ISSUER, "sub": "not-a-uuid", "iat": now, "exp": now + 3600 }),
            Algorithm::HS256,
            SECRET,
        );

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_missing_subject() {
        let now = chrono::Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({ "iss": ISSUER, "iat": now, "exp": now + 3600 }),
            Algorithm::HS256,
            SECRET,
        );

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let now = chrono::Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({
                "iss": ISSUER,
                "sub": Uuid::new_v4().to_string(),
                "iat": now,
                "exp": now + 3600,
            }),
            Algorithm::HS512,
            SECRET,
        );

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_repeat_issue_for_same_subject_verifies() {
        let user_id = Uuid::new_v4();
        let first = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();
        let second = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();

        assert_eq!(verify_access_token(&first, SECRET).unwrap(), user_id);
        assert_eq!(verify_access_token(&second, SECRET).unwrap(), user_id);
    }
}
