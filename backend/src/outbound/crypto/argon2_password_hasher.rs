//! Argon2id password hashing.
//!
//! Hashes are stored in PHC string format, so parameters and salt travel with
//! the hash and older hashes keep verifying if defaults change.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    rand_core::OsRng,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// [`PasswordHasher`] backed by Argon2id with library defaults.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn hash_round_trips_through_verify(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("correct horse").expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("secret").expect("hash");
        let second = hasher.hash("secret").expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn malformed_hash_is_reported(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("secret", &PasswordHash::new("plaintext"))
            .expect_err("malformed");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
