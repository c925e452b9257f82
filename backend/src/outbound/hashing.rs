//! Argon2id adapter for the password hashing port.

use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::domain::{Password, PasswordHash, PasswordHashError, PasswordHasher};

/// Argon2id hasher producing PHC strings with a fresh salt per call.
///
/// Verification reads the cost parameters embedded in the stored hash, so
/// changing the configured cost never invalidates existing hashes.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2PasswordHasher {
    /// Hasher using the argon2 crate's default cost.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit cost overrides; `None` keeps the default.
    ///
    /// # Examples
    /// ```
    /// use notekeeper::outbound::hashing::Argon2PasswordHasher;
    ///
    /// let cheap = Argon2PasswordHasher::with_cost(Some(8), Some(1), Some(1));
    /// assert!(cheap.is_ok());
    /// assert!(Argon2PasswordHasher::with_cost(Some(1), None, None).is_err());
    /// ```
    pub fn with_cost(
        memory_kib: Option<u32>,
        iterations: Option<u32>,
        parallelism: Option<u32>,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            iterations.unwrap_or(Params::DEFAULT_T_COST),
            parallelism.unwrap_or(Params::DEFAULT_P_COST),
            None,
        )
        .map_err(|err| PasswordHashError::new(format!("invalid argon2 cost: {err}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|phc| PasswordHash::from_phc(phc.to_string()))
            .map_err(|err| PasswordHashError::new(err.to_string()))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> bool {
        let Ok(parsed) = PhcString::new(hash.as_phc()) else {
            return false;
        };
        self.argon2()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
