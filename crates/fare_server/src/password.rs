//! Salted credential hashing. The store never holds plaintext passwords.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hex-encoded salt and SHA-256(salt || password) digest, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub salt: String,
    pub digest: String,
}

/// Hash a password under a fresh random salt.
pub fn hash_password(password: &str) -> PasswordRecord {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    PasswordRecord {
        salt: hex::encode(salt),
        digest: digest_hex(&salt, password),
    }
}

/// Verify a password against a stored record.
pub fn verify_password(record: &PasswordRecord, password: &str) -> bool {
    let Ok(salt) = hex::decode(&record.salt) else {
        return false;
    };
    constant_time_eq(
        digest_hex(&salt, password).as_bytes(),
        record.digest.as_bytes(),
    )
}

fn digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Comparison that does not short-circuit on the first mismatching byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
