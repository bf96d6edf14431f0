//! Cryptographic Utilities
//!
//! Nonces for the token cipher, unguessable upload names, and the
//! comparison used when a refresh token is matched against its session.

use rand::{RngCore, rngs::OsRng};
use uuid::Uuid;

/// Fill a fixed-size buffer from the OS RNG
pub fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Upload file name `<uuid v4>.<ext>`; unique without a lookup
pub fn random_file_name(ext: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

/// タイミング攻撃対策の比較（長さの違いは即 false）
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonces_differ() {
        let a: [u8; 12] = random_array();
        let b: [u8; 12] = random_array();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_file_name() {
        let name = random_file_name("webp");
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "webp");
        assert_eq!(stem.len(), 32);
        assert!(Uuid::parse_str(stem).is_ok());
        assert_ne!(name, random_file_name("webp"));
    }

    #[test]
    fn test_refresh_token_comparison() {
        let stored = b"v2.local.abc";
        assert!(constant_time_eq(stored, b"v2.local.abc"));
        assert!(!constant_time_eq(stored, b"v2.local.abd"));
        assert!(!constant_time_eq(stored, b"v2.local.ab"));
    }
}
