// This project was developed with assistance from GitHub Copilot
// JWT issuance: key selection, expiration policy and RS256 signing

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};

use crate::error::JwksError;
use crate::key_management::KeyRegistry;
use crate::types::{Claims, KeyPair};

/// Nominal lifetime of a token issued on the normal path
pub const TOKEN_LIFETIME_MINUTES: i64 = 15;

/// How the `exp` claim is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// `min(now + 15m, key.expires_at)`
    ShortLived,
    /// Exactly `key.expires_at`, even if that is already in the past
    FullKeyValidity,
}

impl ExpiryPolicy {
    pub fn expiration(self, key: &KeyPair, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ExpiryPolicy::ShortLived => {
                let candidate = now + Duration::minutes(TOKEN_LIFETIME_MINUTES);
                candidate.min(key.expires_at)
            }
            ExpiryPolicy::FullKeyValidity => key.expires_at,
        }
    }
}

/// Which key signs a token, together with the expiry policy that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    Active,
    Expired,
}

impl SigningMode {
    pub fn from_expired_flag(expired: bool) -> Self {
        if expired {
            SigningMode::Expired
        } else {
            SigningMode::Active
        }
    }

    pub fn key(self, registry: &KeyRegistry) -> &KeyPair {
        match self {
            SigningMode::Active => registry.active(),
            SigningMode::Expired => registry.expired(),
        }
    }

    pub fn policy(self) -> ExpiryPolicy {
        match self {
            SigningMode::Active => ExpiryPolicy::ShortLived,
            SigningMode::Expired => ExpiryPolicy::FullKeyValidity,
        }
    }
}

/// A freshly signed compact JWT
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub kid: String,
    pub claims: Claims,
}

/// Sign a token for `subject` with `key`.
///
/// `iat` is always `now`; `exp` follows `policy`. The header carries the
/// key's id as `kid` so verifiers can find the matching JWK.
pub fn issue(
    key: &KeyPair,
    now: DateTime<Utc>,
    policy: ExpiryPolicy,
    subject: &str,
) -> Result<IssuedToken, JwksError> {
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: policy.expiration(key, now).timestamp(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(key.kid.clone());

    // Convert private key to PEM format for jsonwebtoken
    let private_key_pem = key
        .private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| JwksError::SigningFailed(format!("pkcs8 encode: {}", e)))?;
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| JwksError::SigningFailed(format!("encoding key: {}", e)))?;

    let token = encode(&header, &claims, &encoding_key)
        .map_err(|e| JwksError::SigningFailed(format!("jwt encode: {}", e)))?;

    Ok(IssuedToken {
        token,
        kid: key.kid.clone(),
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::to_jwk;
    use chrono::TimeZone;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
    use std::sync::OnceLock;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn registry() -> &'static KeyRegistry {
        static REGISTRY: OnceLock<KeyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| KeyRegistry::new(t0()).expect("registry init failed"))
    }

    fn verify(token: &str, key: &KeyPair) -> Claims {
        let jwk = to_jwk(key);
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).unwrap();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        decode::<Claims>(token, &decoding_key, &validation)
            .expect("signature should verify")
            .claims
    }

    #[test]
    fn test_short_lived_policy() {
        let key = registry().active();

        let now = t0() + Duration::hours(1);
        assert_eq!(
            ExpiryPolicy::ShortLived.expiration(key, now),
            t0() + Duration::minutes(75)
        );

        // Clamped to the key's own expiry near the end of its window.
        let late = t0() + Duration::hours(23) + Duration::minutes(50);
        assert_eq!(
            ExpiryPolicy::ShortLived.expiration(key, late),
            t0() + Duration::hours(24)
        );

        let exact = key.expires_at() - Duration::minutes(TOKEN_LIFETIME_MINUTES);
        assert_eq!(
            ExpiryPolicy::ShortLived.expiration(key, exact),
            key.expires_at()
        );
    }

    #[test]
    fn test_full_validity_policy_is_not_clamped() {
        let key = registry().expired();
        let now = t0() + Duration::hours(5);
        assert_eq!(
            ExpiryPolicy::FullKeyValidity.expiration(key, now),
            t0() - Duration::hours(24)
        );
    }

    #[test]
    fn test_signing_mode_selection() {
        let registry = registry();

        let active = SigningMode::from_expired_flag(false);
        assert_eq!(active, SigningMode::Active);
        assert_eq!(active.key(registry).kid(), registry.active().kid());
        assert_eq!(active.policy(), ExpiryPolicy::ShortLived);

        let expired = SigningMode::from_expired_flag(true);
        assert_eq!(expired, SigningMode::Expired);
        assert_eq!(expired.key(registry).kid(), registry.expired().kid());
        assert_eq!(expired.policy(), ExpiryPolicy::FullKeyValidity);
    }

    #[test]
    fn test_issue_active_token() {
        let key = registry().active();
        let now = t0() + Duration::hours(1);

        let issued = issue(key, now, ExpiryPolicy::ShortLived, "fake-user").unwrap();
        assert_eq!(issued.kid, key.kid());

        let header = decode_header(&issued.token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some(key.kid()));

        let claims = verify(&issued.token, key);
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, "fake-user");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, (t0() + Duration::minutes(75)).timestamp());
    }

    #[test]
    fn test_issue_expired_token_still_verifies() {
        let key = registry().expired();
        let now = t0() + Duration::hours(3);

        let issued = issue(key, now, ExpiryPolicy::FullKeyValidity, "fake-user").unwrap();
        let header = decode_header(&issued.token).unwrap();
        assert_eq!(header.kid.as_deref(), Some(key.kid()));

        let claims = verify(&issued.token, key);
        assert_eq!(claims.exp, (t0() - Duration::hours(24)).timestamp());
        assert!(claims.exp < claims.iat);
    }

    #[test]
    fn test_token_does_not_verify_with_other_key() {
        let registry = registry();
        let issued = issue(
            registry.active(),
            t0(),
            ExpiryPolicy::ShortLived,
            "fake-user",
        )
        .unwrap();

        let jwk = to_jwk(registry.expired());
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).unwrap();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        assert!(decode::<Claims>(&issued.token, &decoding_key, &validation).is_err());
    }

    #[test]
    fn test_undersized_key_is_signing_failed() {
        // Generates fine, but RS256 signing needs a modulus of at least 2048 bits.
        let key = KeyPair::generate(1024, t0() + Duration::hours(24)).unwrap();

        let result = issue(&key, t0(), ExpiryPolicy::ShortLived, "fake-user");
        assert!(matches!(result, Err(JwksError::SigningFailed(msg)) if msg.contains("jwt encode")));
    }
}
