/// Access Token Claims
///
/// The signed payload of an access token: registered JWT claims only
/// (RFC 7519), with the subject decoded straight into a `Uuid` so a
/// missing or non-UUID subject fails at decode time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer stamped into, and required on, every access token
pub const ISSUER: &str = "chirpy";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user identity)
    pub sub: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `user_id` valid for `ttl` from now
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            iss: ISSUER.to_string(),
            sub: user_id,
            iat: now,
            exp: now + ttl.num_seconds(),
        }
    }

    /// A token is valid strictly before `exp`
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp <= now
    }
}
