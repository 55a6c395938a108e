//! Password utilities
//!
//! Passwords are only stored as argon2 hashes

use argon2::Argon2;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;

/// Generate a new password
pub fn generate() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

/// Hash a given password
///
/// The result is a PHC string, salt and parameters included
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let hashed_password = argon2.hash_password(password.as_bytes(), &salt)?;

    Ok(hashed_password.to_string())
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::PasswordHash;
    use argon2::password_hash::PasswordVerifier;

    use super::*;

    #[test]
    fn test_generate() {
        let first = generate();
        let second = generate();

        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash() {
        let hashed_password = hash("verysecret").unwrap();
        assert!(hashed_password.starts_with("$argon2"));
        assert_ne!(hashed_password, hash("verysecret").unwrap());

        let parsed_hash = PasswordHash::new(&hashed_password).unwrap();
        let argon2 = Argon2::default();

        assert!(
            argon2
                .verify_password(b"verysecret", &parsed_hash)
                .is_ok()
        );
        assert!(argon2.verify_password(b"nope", &parsed_hash).is_err());
    }
}
