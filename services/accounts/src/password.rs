//! Credential hashing
//!
//! Passwords are stored as Argon2id PHC strings. The string carries the
//! algorithm, version, cost parameters and salt, so verification always
//! uses the parameters a secret was created with, even after the configured
//! cost changes.

use std::sync::Arc;

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2 cost configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HasherConfig {
    /// Create a new HasherConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PASSWORD_HASH_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `PASSWORD_HASH_ITERATIONS`: Number of passes (default: 2)
    /// - `PASSWORD_HASH_PARALLELISM`: Degree of parallelism (default: 1)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: env_u32("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_u32("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_u32("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        })
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Hashes and verifies passwords
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    /// Secret with the configured cost that no login password is checked
    /// against for real; verified when the account does not exist
    decoy: Arc<str>,
}

impl CredentialHasher {
    /// Build a hasher, rejecting cost parameters Argon2 does not accept
    pub fn new(config: &HasherConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid password hashing parameters: {}", e))?;
        let mut hasher = Self {
            params,
            decoy: Arc::from(""),
        };
        hasher.decoy = Arc::from(hasher.hash("decoy-password-never-matches")?);
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!("Failed to hash password: {}", e)
            })?
            .to_string();
        Ok(hash)
    }

    /// Check a plaintext candidate against a stored secret.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable secret is an error.
    pub fn verify(&self, plain: &str, secret: &str) -> Result<bool> {
        let parsed = PasswordHash::new(secret).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!("Failed to parse password hash: {}", e)
        })?;

        match self.argon2().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!(error = %e, "argon2 verify_password error");
                Err(anyhow::anyhow!("Failed to verify password: {}", e))
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_async(&self, plain: String) -> Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain)).await?
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_async(&self, plain: String, secret: String) -> Result<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &secret)).await?
    }

    /// Spend one verification on the decoy secret and discard the outcome
    pub async fn verify_decoy_async(&self, plain: String) -> Result<()> {
        self.verify_async(plain, self.decoy.to_string()).await?;
        Ok(())
    }
}
