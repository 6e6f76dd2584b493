// This project was developed with assistance from GitHub Copilot
// JWKS document construction

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use rsa::traits::PublicKeyParts;

use crate::key_management::KeyRegistry;
use crate::types::{JsonWebKey, JwksResponse, KeyPair};

/// Build the JWKS document as of `now`.
///
/// A key is published only while `expires_at > now`; expired keys are left
/// out entirely rather than flagged. An empty key list is a valid document.
pub fn build_jwks(registry: &KeyRegistry, now: DateTime<Utc>) -> JwksResponse {
    let keys = registry
        .keys()
        .filter(|key| key.is_valid(now))
        .map(to_jwk)
        .collect();

    JwksResponse { keys }
}

/// RSA public key as an RS256 signature JWK
pub fn to_jwk(key: &KeyPair) -> JsonWebKey {
    let n = key.public_key.n().to_bytes_be();
    let e = key.public_key.e().to_bytes_be();

    JsonWebKey {
        kty: "RSA".to_string(),
        key_use: "sig".to_string(),
        alg: "RS256".to_string(),
        kid: key.kid.clone(),
        n: URL_SAFE_NO_PAD.encode(n),
        e: URL_SAFE_NO_PAD.encode(e),
    }
}
