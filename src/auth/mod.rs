/// Authentication module
///
/// Password hashing, access token issuing/verification, refresh token
/// management, `Authorization` header parsing and the authorization guard
/// that composes them.

mod claims;
mod credentials;
mod guard;
mod jwt;
mod password;
mod refresh_token;

pub use claims::{Claims, ISSUER};
pub use credentials::{extract_api_key, extract_bearer};
pub use guard::{
    authorize_ownership, authorize_webhook, refresh_session, resolve_session, RefreshedSession,
};
pub use jwt::{issue_access_token, verify_access_token};
pub use password::{
    hash_password, hash_password_with_cost, verify_credentials, verify_password, DecoyDigest,
};
pub use refresh_token::{
    generate_refresh_token, hash_token, issue_refresh_token, lookup_refresh_token,
    revoke_refresh_token, RefreshTokenRecord, RefreshTokenState, REFRESH_TOKEN_BYTES,
};
