//! Argon2id implementation of [`CredentialHasher`].

use argon2::Argon2;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id hasher with the crate's default parameters.
///
/// Hashes are stored as PHC strings, so parameters can change later without
/// invalidating existing hashes.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Hasher using the recommended Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new()
    }

    #[rstest]
    fn hashes_verify_only_their_own_password(hasher: Argon2Hasher) {
        let hash = hasher.hash("correct horse").expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2Hasher) {
        let first = hasher.hash("password1").expect("hash");
        let second = hasher.hash("password1").expect("hash");

        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hashes_are_errors(hasher: Argon2Hasher) {
        let err = hasher
            .verify("password1", &PasswordHash::new("plaintext".to_owned()))
            .expect_err("malformed");

        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }
}
