//! Password Hashing and Verification
//!
//! Credential store primitives:
//! - Argon2id hashing with a fixed cost (see [`ARGON2_MEMORY_KIB`])
//! - Zeroization of clear text passwords
//! - Verification that tells a wrong password apart from a corrupted hash
//! - Optional application-wide pepper (Argon2 secret input)
//!
//! The sign-up policy ([`ClearTextPassword::new`]) is separate from the
//! login path ([`ClearTextPassword::for_verification`]): login input is
//! never rejected by policy, it simply fails to verify.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted at sign-up
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Argon2id memory cost in KiB.
///
/// Together with [`ARGON2_ITERATIONS`] and [`ARGON2_PARALLELISM`] this is
/// the OWASP baseline (m=19 MiB, t=2, p=1). It is a deliberate time/security
/// trade-off: a verification costs roughly 50-150 ms on commodity hardware
/// in an optimised build. Not configurable at runtime; raising it only
/// affects new hashes because verification reads the cost from the PHC
/// string.
pub const ARGON2_MEMORY_KIB: u32 = 19_456;

/// Argon2id time cost (passes over memory)
pub const ARGON2_ITERATIONS: u32 = 2;

/// Argon2id lanes
pub const ARGON2_PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Sign-up password policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Hashing / verification failures.
///
/// A wrong password is NOT an error: [`HashedPassword::verify`] returns
/// `Ok(false)` for it.
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing could not complete (entropy or resource failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a parsable PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Stored hash parsed but could not be checked (unsupported algorithm, bad params)
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password, NFKC normalized, zeroized on drop.
///
/// Deliberately not `Clone`; `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a new password against the sign-up policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::for_verification(raw);
        let normalized = candidate.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count code points, not bytes
        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Wrap a login attempt. Only normalizes; never fails.
    pub fn for_verification(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with a fresh 128-bit salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = hasher(pepper)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse-checked constructor
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        parse_phc(&hash)?;
        Ok(Self { hash })
    }

    /// Wrap a value read back from storage without checking it.
    ///
    /// A corrupted value surfaces later as `InvalidHashFormat` from
    /// [`verify`](Self::verify), which is where callers can tell it apart
    /// from a wrong password.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash.
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash itself is
    /// unusable. Comparison is constant time inside `argon2`.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<bool, PasswordHashError> {
        let parsed = parse_phc(&self.hash)?;

        let argon2 =
            hasher(pepper).map_err(|e| PasswordHashError::VerificationFailed(e.to_string()))?;

        match argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::VerificationFailed(e.to_string())),
        }
    }

    /// True when the hash was produced with another algorithm or cost
    pub fn needs_rehash(&self) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(params) => {
                params.m_cost() != ARGON2_MEMORY_KIB
                    || params.t_cost() != ARGON2_ITERATIONS
                    || params.p_cost() != ARGON2_PARALLELISM
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// PHC string of an Argon2 family hash that carries an output
fn parse_phc(hash: &str) -> Result<PasswordHash<'_>, PasswordHashError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

    let is_argon2 = [Algorithm::Argon2id, Algorithm::Argon2i, Algorithm::Argon2d]
        .iter()
        .any(|a| parsed.algorithm == a.ident());
    if !is_argon2 || parsed.hash.is_none() {
        return Err(PasswordHashError::InvalidHashFormat);
    }

    Ok(parsed)
}

fn hasher(pepper: Option<&[u8]>) -> Result<Argon2<'_>, argon2::Error> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        None,
    )?;
    match pepper {
        Some(secret) => Argon2::new_with_secret(secret, Algorithm::Argon2id, Version::V0x13, params),
        None => Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_policy_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_policy_whitespace_only() {
        let result = ClearTextPassword::new("          ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_policy_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_verification_input_skips_policy() {
        // "wrong" would fail the sign-up policy but is still a valid attempt
        let attempt = ClearTextPassword::for_verification("wrong".to_string());
        assert_eq!(attempt.as_bytes(), b"wrong");
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("secret123".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None).unwrap());

        let other = ClearTextPassword::for_verification("secret124".to_string());
        assert!(!hashed.verify(&other, None).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let password = ClearTextPassword::new("secret123".to_string()).unwrap();
        let first = password.hash(None).unwrap();
        let second = password.hash(None).unwrap();
        assert_ne!(first.as_phc_string(), second.as_phc_string());
        assert!(first.as_phc_string().starts_with("$argon2id$"));
        assert!(!first.needs_rehash());
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::new("TestPassword123!".to_string()).unwrap();
        let pepper = b"my_secret_pepper".as_slice();
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)).unwrap());
        assert!(!hashed.verify(&password, None).unwrap());
        assert!(!hashed.verify(&password, Some(b"wrong_pepper".as_slice())).unwrap());
    }

    #[test]
    fn test_corrupted_hash_is_an_error_not_a_mismatch() {
        let stored = HashedPassword::from_stored("$argon2id$garbage");
        let attempt = ClearTextPassword::for_verification("secret123".to_string());
        assert!(matches!(
            stored.verify(&attempt, None),
            Err(PasswordHashError::InvalidHashFormat)
        ));
        assert!(stored.needs_rehash());
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
        assert!(HashedPassword::from_phc_string("$argon2id$garbage").is_err());
        assert!(HashedPassword::from_phc_string("$pbkdf2$i=1000$c2FsdHNhbHQ$aGFzaGhhc2g").is_err());
    }

    #[test]
    fn test_hash_without_output_is_an_error() {
        let password = ClearTextPassword::new("secret123".to_string()).unwrap();
        let full = password.hash(None).unwrap();
        // Strip the trailing `$<hash>` segment, leaving params and salt
        let phc = full.as_phc_string();
        let truncated = &phc[..phc.rfind('$').unwrap()];

        let stored = HashedPassword::from_stored(truncated);
        assert!(matches!(
            stored.verify(&password, None),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width digits normalize to ASCII
        let a = ClearTextPassword::for_verification("ｐａｓｓ１２３".to_string());
        let b = ClearTextPassword::for_verification("pass123".to_string());
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_verification("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
