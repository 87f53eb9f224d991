/// Password Hashing and Verification
///
/// Salted, self-describing bcrypt digests (`$2b$<cost>$...`). The cost
/// factor is tunable through `AuthSettings::bcrypt_cost`.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password with the default bcrypt cost
///
/// # Errors
/// Returns `AppError::Internal` only when the underlying salt source or
/// hashing primitive fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hash a password with an explicit bcrypt cost (4..=31)
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its digest
///
/// Returns `false` for a wrong password and for a digest that cannot be
/// parsed; callers treat both as the same mismatch. The comparison itself
/// is constant-time inside bcrypt.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match verify(password, digest) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!("Password digest could not be checked: {}", e);
            false
        }
    }
}

/// Digest checked in place of a missing account
///
/// Generated once at startup with the configured cost, so an unknown email
/// costs the same bcrypt work as a wrong password.
#[derive(Debug, Clone)]
pub struct DecoyDigest(String);

impl DecoyDigest {
    pub fn generate(cost: u32) -> Result<Self, AppError> {
        let filler = uuid::Uuid::new_v4().to_string();
        hash_password_with_cost(&filler, cost).map(DecoyDigest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a login attempt against the stored digest, if any
///
/// With no stored digest the decoy is verified and the result discarded;
/// the answer is always `false`.
pub fn verify_credentials(password: &str, stored: Option<&str>, decoy: &DecoyDigest) -> bool {
    verify_credentials_with(password, stored, decoy, verify_password)
}

fn verify_credentials_with<F>(
    password: &str,
    stored: Option<&str>,
    decoy: &DecoyDigest,
    verify: F,
) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    match stored {
        Some(digest) => verify(password, digest),
        None => {
            let _ = verify(password, decoy.as_str());
            false
        }
    }
}
