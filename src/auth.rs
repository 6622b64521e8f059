use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AuthError;

/// The admin's shared password, held as an Argon2 PHC string.
#[derive(Clone)]
pub struct AdminAuth {
    hash: String,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth").finish_non_exhaustive()
    }
}

impl AdminAuth {
    /// Fails if `hash` is not a parsable PHC string.
    pub fn new(hash: impl Into<String>) -> Result<Self, AuthError> {
        let hash = hash.into();
        PasswordHash::new(&hash).map_err(|e| AuthError::InvalidHash(e.to_string()))?;
        Ok(Self { hash })
    }

    pub fn verify(&self, password: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Hash `password` into the PHC string expected in configuration.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Low-cost hash so tests stay fast in debug builds. Verification reads the
/// parameters from the PHC string, so `AdminAuth` accepts it as usual.
#[cfg(test)]
pub(crate) fn cheap_hash(password: &str) -> String {
    use argon2::{Algorithm, Params, Version};

    let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .expect("hashing succeeds")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));

        let auth = AdminAuth::new(hash).unwrap();
        assert!(auth.verify("correct horse"));
        assert!(!auth.verify("battery staple"));
        assert!(!auth.verify(""));
    }

    #[test]
    fn verifies_hash_with_custom_params() {
        let auth = AdminAuth::new(cheap_hash("pw")).unwrap();
        assert!(auth.verify("pw"));
        assert!(!auth.verify("PW"));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(cheap_hash("pw"), cheap_hash("pw"));
    }

    #[test]
    fn rejects_unparsable_hash() {
        let err = AdminAuth::new("plaintext-password").unwrap_err();
        assert!(matches!(err, AuthError::InvalidHash(_)));
    }

    #[test]
    fn debug_hides_hash() {
        let auth = AdminAuth::new(hash_password("pw").unwrap()).unwrap();
        assert!(!format!("{auth:?}").contains("argon2"));
    }
}
