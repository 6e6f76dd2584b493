// This project was developed with assistance from GitHub Copilot
// Data structures for the JWKS server

use chrono::{DateTime, Utc};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

/// RSA key pair with metadata.
///
/// Immutable once generated. Whether it is expired is always computed
/// against a caller-supplied instant, see [`KeyPair::is_expired`].
pub struct KeyPair {
    pub(crate) kid: String,                // Key ID (random hex, unrelated to key material)
    pub(crate) private_key: RsaPrivateKey, // Only read while signing
    pub(crate) public_key: RsaPublicKey,   // Published through the JWKS document
    pub(crate) expires_at: DateTime<Utc>,  // Expiry timestamp
}

/// JSON Web Key structure for JWKS response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String, // Key type (RSA)
    #[serde(rename = "use")]
    pub key_use: String, // Key usage (sig for signature)
    pub alg: String, // Algorithm (RS256)
    pub kid: String, // Key ID
    pub n: String,   // Modulus (base64url)
    pub e: String,   // Exponent (base64url)
}

/// JWKS response format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<JsonWebKey>,
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject
    pub iat: i64,    // Issued at
    pub exp: i64,    // Expires at
}

/// Auth endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub kid: String,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
