//! Password hasher.
//!
//! Hashes are Argon2id PHC strings with a random per-password salt from
//! [`OsRng`], so the parameters and salt travel with the stored hash and two
//! hashes of the same password never compare equal.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password into a self-describing PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored value is not a
/// parseable PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").expect("hashing should succeed");

        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
        let verified = verify_password("secret1", &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("secret1").expect("hashing should succeed");
        assert!(
            matches!(verify_password("secret2", &hash), Ok(false)),
            "wrong password should not verify"
        );
        assert!(
            matches!(verify_password("", &hash), Ok(false)),
            "empty password should not verify"
        );
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b, "salts should differ between hashes");
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
        assert!(verify_password("secret1", "").is_err());
    }
}
