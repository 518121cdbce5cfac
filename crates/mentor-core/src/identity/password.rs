//! Credential rules and password hashing.

use crate::error::{MentorError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;

pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be at least 8 characters, contain a special character, a capital letter, a number, and no spaces";

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// Characters the realtime database rejects in keys.
const FORBIDDEN_USERNAME_CHARS: &[char] = &['.', '$', '#', '[', ']', '/'];

/// Checks the signup password policy.
pub fn validate_password(password: &str) -> Result<()> {
    let long_enough = password.chars().count() >= 8;
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_space = password.chars().any(char::is_whitespace);

    if long_enough && has_special && has_upper && has_digit && !has_space {
        Ok(())
    } else {
        Err(MentorError::validation(PASSWORD_POLICY_MESSAGE))
    }
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password == confirmation {
        Ok(())
    } else {
        Err(MentorError::validation(PASSWORD_MISMATCH_MESSAGE))
    }
}

/// Usernames double as database keys.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(MentorError::validation("Username must not be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(MentorError::validation("Username must not contain spaces"));
    }
    if username.contains(FORBIDDEN_USERNAME_CHARS) {
        return Err(MentorError::validation(
            "Username must not contain any of . $ # [ ] /",
        ));
    }
    Ok(())
}

/// Hashes `password` with Argon2id and a fresh random salt.
///
/// Returns the PHC string, which embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MentorError::internal(format!("Failed to hash password: {}", e)))
}

/// Returns `true` if `password` re-hashes to `stored_hash`.
///
/// An unparsable stored hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("[Identity] Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Abc123!@").is_ok());

        for weak in ["abc12345", "Abc12345", "abc123!@", "Abcdef!@", "Ab1!", "Abc 123!@"] {
            let err = validate_password(weak).unwrap_err();
            assert_eq!(err.to_string(), PASSWORD_POLICY_MESSAGE, "{weak}");
        }
    }

    #[test]
    fn test_confirmation_mismatch() {
        assert!(validate_confirmation("Abc123!@", "Abc123!@").is_ok());
        let err = validate_confirmation("Abc123!@", "Abc123!#").unwrap_err();
        assert_eq!(err.to_string(), PASSWORD_MISMATCH_MESSAGE);
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("al ice").is_err());
        assert!(validate_username("alice.smith").is_err());
        assert!(validate_username("a/b").is_err());
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("Abc123!@").unwrap();
        let second = hash_password("Abc123!@").unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("Abc123!@"));
        assert!(verify_password("Abc123!@", &first));
        assert!(verify_password("Abc123!@", &second));
        assert!(!verify_password("Abc123!#", &first));
    }

    #[test]
    fn test_unparsable_hash_never_matches() {
        assert!(!verify_password("Abc123!@", "Abc123!@"));
        assert!(!verify_password("", ""));
    }
}
