//! PBKDF2-HMAC-SHA256 password hashes in the modular-crypt format
//! `$pbkdf2-sha256$<rounds>$<salt>$<checksum>`.
//!
//! Salt and checksum use the "adapted" base64 alphabet (`.` in place of `+`,
//! no padding), so hashes written by other tools for the same user table
//! verify here and the other way round.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::constants::{DEFAULT_PBKDF2_ROUNDS, HASH_SIZE, PBKDF2_SHA256_IDENT, SALT_SIZE};
use crate::error::PasswordError;

/// A parsed password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub rounds: u32,
    pub salt: Vec<u8>,
    pub checksum: Vec<u8>,
}

impl PasswordHash {
    pub fn parse(encoded: &str) -> Result<Self, PasswordError> {
        let mut parts = encoded.split('$');

        // leading '$' yields an empty first segment
        if parts.next() != Some("") {
            return Err(PasswordError::MalformedHash);
        }

        let ident = parts.next().ok_or(PasswordError::MalformedHash)?;
        if ident != PBKDF2_SHA256_IDENT {
            return Err(PasswordError::UnsupportedScheme(ident.to_string()));
        }

        let rounds_str = parts.next().ok_or(PasswordError::MalformedHash)?;
        let rounds: u32 = rounds_str
            .parse()
            .map_err(|_| PasswordError::InvalidRounds(rounds_str.to_string()))?;
        if rounds == 0 {
            return Err(PasswordError::InvalidRounds(rounds_str.to_string()));
        }

        let salt = ab64_decode(parts.next().ok_or(PasswordError::MalformedHash)?)?;
        let checksum = ab64_decode(parts.next().ok_or(PasswordError::MalformedHash)?)?;

        if parts.next().is_some() || checksum.len() != HASH_SIZE {
            return Err(PasswordError::MalformedHash);
        }

        Ok(Self {
            rounds,
            salt,
            checksum,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "${}${}${}${}",
            PBKDF2_SHA256_IDENT,
            self.rounds,
            ab64_encode(&self.salt),
            ab64_encode(&self.checksum)
        )
    }

    /// Constant-time check of `password` against this hash.
    pub fn matches(&self, password: &str) -> bool {
        let derived = derive(password.as_bytes(), &self.salt, self.rounds);
        derived[..].ct_eq(&self.checksum[..]).unwrap_u8() == 1
    }
}

/// Hash a password with a fresh random salt and the default round count.
pub fn hash_password(password: &str) -> String {
    hash_password_with_rounds(password, DEFAULT_PBKDF2_ROUNDS)
}

pub fn hash_password_with_rounds(password: &str, rounds: u32) -> String {
    let mut salt = vec![0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let rounds = rounds.max(1);
    let checksum = derive(password.as_bytes(), &salt, rounds).to_vec();

    PasswordHash {
        rounds,
        salt,
        checksum,
    }
    .encode()
}

/// Verify `password` against an encoded hash.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    Ok(PasswordHash::parse(encoded)?.matches(password))
}

/// Spend the same work as a default-round verification and discard the result.
/// Used when there is no stored hash to check against.
pub fn dummy_verify(password: &str) {
    let salt = [0u8; SALT_SIZE];
    let _ = derive(password.as_bytes(), &salt, DEFAULT_PBKDF2_ROUNDS);
}

fn derive(password: &[u8], salt: &[u8], rounds: u32) -> [u8; HASH_SIZE] {
    let mut out = [0u8; HASH_SIZE];
    pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut out);
    out
}

fn ab64_encode(data: &[u8]) -> String {
    STANDARD_NO_PAD.encode(data).replace('+', ".")
}

fn ab64_decode(data: &str) -> Result<Vec<u8>, PasswordError> {
    let standard = data.trim_end_matches('=').replace('.', "+");
    Ok(STANDARD_NO_PAD.decode(standard)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Generated independently with PBKDF2-HMAC-SHA256 over salt 00..0f.
    const HUNTER2_1000: &str =
        "$pbkdf2-sha256$1000$AAECAwQFBgcICQoLDA0ODw$9VUOiRGfWTzTZixtfaW9P3qQ4lzS3CIfWKYWbHcnU9M";
    const PASSWORD_29000: &str =
        "$pbkdf2-sha256$29000$AAECAwQFBgcICQoLDA0ODw$oQniwjLkYbajNGr0RGSng8udgXKplgpN15LZNV56KTQ";

    #[test]
    fn test_known_vectors_verify() {
        assert!(verify_password("hunter2", HUNTER2_1000).unwrap());
        assert!(verify_password("password", PASSWORD_29000).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        assert!(!verify_password("hunter3", HUNTER2_1000).unwrap());
        assert!(!verify_password("", PASSWORD_29000).unwrap());
    }

    #[test]
    fn test_hash_then_verify() {
        let encoded = hash_password_with_rounds("s3cret", 1000);
        assert!(encoded.starts_with("$pbkdf2-sha256$1000$"));
        assert!(verify_password("s3cret", &encoded).unwrap());
        assert!(!verify_password("S3cret", &encoded).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password_with_rounds("same", 10);
        let b = hash_password_with_rounds("same", 10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_encode_preserves_text() {
        let parsed = PasswordHash::parse(HUNTER2_1000).unwrap();
        assert_eq!(parsed.rounds, 1000);
        assert_eq!(parsed.salt, (0u8..16).collect::<Vec<_>>());
        assert_eq!(parsed.encode(), HUNTER2_1000);
    }

    #[test]
    fn test_malformed_hashes() {
        assert_eq!(
            PasswordHash::parse("plaintext"),
            Err(PasswordError::MalformedHash)
        );
        assert!(matches!(
            PasswordHash::parse("$bcrypt$10$abc$def"),
            Err(PasswordError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            PasswordHash::parse("$pbkdf2-sha256$0$AAEC$AAEC"),
            Err(PasswordError::InvalidRounds(_))
        ));
        assert_eq!(
            PasswordHash::parse("$pbkdf2-sha256$10$AAECAwQFBgcICQoLDA0ODw$AAEC"),
            Err(PasswordError::MalformedHash)
        );
    }
}
