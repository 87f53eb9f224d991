/// Authorization Header Parsing
///
/// Accepts exactly `<Scheme> <credential>`: one ASCII space, two parts,
/// case-sensitive scheme word. No other whitespace is tolerated.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, API_KEY_SCHEME)
}

fn extract_credential(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    // Non-visible-ASCII header bytes cannot be a well-formed credential
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [word, credential] if *word == scheme && !credential.is_empty() => {
            Ok(credential.to_string())
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
