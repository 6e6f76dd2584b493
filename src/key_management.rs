// This project was developed with assistance from GitHub Copilot
// Key management functionality for the JWKS server

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::JwksError;
use crate::types::KeyPair;

/// RSA modulus size for every generated key
pub const KEY_SIZE_BITS: usize = 2048;

/// How long the active key stays valid after startup
pub const ACTIVE_KEY_VALIDITY_HOURS: i64 = 24;

/// How long before startup the expired key stopped being valid
pub const EXPIRED_KEY_AGE_HOURS: i64 = 24;

const KID_BYTES: usize = 16;

impl KeyPair {
    /// Generate a new RSA key pair that expires at `expires_at`.
    ///
    /// `expires_at` may already be in the past.
    pub fn generate(bits: usize, expires_at: DateTime<Utc>) -> Result<Self, JwksError> {
        Self::generate_with_rng(&mut OsRng, bits, expires_at)
    }

    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        bits: usize,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, JwksError> {
        // The kid is drawn on its own so it says nothing about the key material.
        let mut kid_bytes = [0u8; KID_BYTES];
        rng.try_fill_bytes(&mut kid_bytes)
            .map_err(|e| JwksError::KeyGenerationFailed(format!("kid entropy: {}", e)))?;

        let private_key = RsaPrivateKey::new(rng, bits)
            .map_err(|e| JwksError::KeyGenerationFailed(format!("rsa keygen: {}", e)))?;
        let public_key = RsaPublicKey::from(&private_key);

        Ok(KeyPair {
            kid: hex::encode(kid_bytes),
            private_key,
            public_key,
            expires_at,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// A key expiring exactly at `now` counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check if the key pair is still valid (not expired)
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }
}

/// The two signing keys the server holds for its whole lifetime.
pub struct KeyRegistry {
    active: KeyPair,
    expired: KeyPair,
}

impl KeyRegistry {
    /// Generate the active key (valid for 24h from `now`) and the expired key
    /// (expired 24h before `now`). Any failure aborts construction.
    pub fn new(now: DateTime<Utc>) -> Result<Self, JwksError> {
        Self::new_with_rng(&mut OsRng, now)
    }

    pub fn new_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, JwksError> {
        let active = KeyPair::generate_with_rng(
            &mut *rng,
            KEY_SIZE_BITS,
            now + Duration::hours(ACTIVE_KEY_VALIDITY_HOURS),
        )?;
        let expired = KeyPair::generate_with_rng(
            &mut *rng,
            KEY_SIZE_BITS,
            now - Duration::hours(EXPIRED_KEY_AGE_HOURS),
        )?;

        tracing::info!(
            active_kid = %active.kid,
            active_expires_at = %active.expires_at,
            expired_kid = %expired.kid,
            expired_expires_at = %expired.expires_at,
            "Signing keys generated"
        );

        Ok(Self::from_keys(active, expired))
    }

    pub(crate) fn from_keys(active: KeyPair, expired: KeyPair) -> Self {
        Self { active, expired }
    }

    pub fn active(&self) -> &KeyPair {
        &self.active
    }

    pub fn expired(&self) -> &KeyPair {
        &self.expired
    }

    /// All held keys in a stable order (active first)
    pub fn keys(&self) -> impl Iterator<Item = &KeyPair> {
        [&self.active, &self.expired].into_iter()
    }
}
