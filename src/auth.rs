//! Password hashing and API key issuance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::CredentialError;

const PASSWORD_SCHEME: &str = "sha256";

/// Claims carried by an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyClaims {
    /// User the key is bound to.
    pub uid: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Unique key id.
    pub jti: String,
}

/// Hashes a password with a random salt; an empty password stays empty.
///
/// Stored form: `sha256$<salt>$<hex digest>`.
pub fn hash_password(password: &str) -> String {
    if password.is_empty() {
        return String::new();
    }

    let salt = Uuid::new_v4().simple().to_string();
    format!(
        "{}${}${}",
        PASSWORD_SCHEME,
        salt,
        digest(&[salt.as_bytes(), password.as_bytes()])
    )
}

/// Checks a password against a stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(PASSWORD_SCHEME), Some(salt), Some(hash)) => {
            digest(&[salt.as_bytes(), password.as_bytes()]) == hash
        }
        _ => false,
    }
}

/// Generates a random signing secret.
pub fn generate_secret() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Issues an API key bound to `username`, signed with `secret`.
pub fn issue_api_key(username: &str, secret: &str) -> Result<String, CredentialError> {
    if username.is_empty() {
        return Err(CredentialError::MissingUsername);
    }

    let claims = ApiKeyClaims {
        uid: username.to_string(),
        iat: Utc::now().timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let payload = serde_json::to_vec(&claims)
        .map(hex::encode)
        .map_err(|e| CredentialError::ClaimsEncoding(e.to_string()))?;
    let signature = sign(&payload, secret);

    Ok(format!("{}.{}", payload, signature))
}

/// Verifies an API key and returns its claims.
pub fn verify_api_key(token: &str, secret: &str) -> Option<ApiKeyClaims> {
    let (payload, signature) = token.split_once('.')?;
    if sign(payload, secret) != signature {
        return None;
    }

    let bytes = hex::decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn sign(payload: &str, secret: &str) -> String {
    digest(&[secret.as_bytes(), &b"."[..], payload.as_bytes()])
}

fn digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
