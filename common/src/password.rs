use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{AppError, Res};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates the platform password policy: minimum length and at least one digit.
pub fn validate_password_policy(password: &str) -> Res<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "Password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_short_passwords() {
        assert!(validate_password_policy("a1b2c3").is_err());
    }

    #[test]
    fn policy_requires_a_digit() {
        assert!(validate_password_policy("longenoughbutnodigit").is_err());
    }

    #[test]
    fn policy_accepts_valid_password() {
        assert!(validate_password_policy("correct horse 1").is_ok());
    }

    #[test]
    fn hash_roundtrip_verifies() {
        let hash = hash_password("s3cret-passw0rd").unwrap();
        assert!(verify_password("s3cret-passw0rd", &hash));
        assert!(!verify_password("wrong-passw0rd", &hash));
    }
}
