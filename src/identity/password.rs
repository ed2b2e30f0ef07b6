use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const ROUNDS: u32 = 10_000;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Iterated SHA-256 over salt and password.
fn stretch(salt: &[u8], password: &str) -> [u8; 32] {
    let mut block: [u8; 32] = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .into();
    for _ in 1..ROUNDS {
        block = Sha256::new().chain_update(block).chain_update(salt).finalize().into();
    }
    block
}

/// Hashes `password` under a fresh random salt. Returns `<salt>$<digest>`, hex encoded.
pub(crate) fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    format!("{}${}", to_hex(&salt), to_hex(&stretch(&salt, password)))
}

pub(crate) fn verify(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let (Some(salt), Some(digest)) = (from_hex(salt), from_hex(digest)) else {
        return false;
    };
    let computed = stretch(&salt, password);
    // Constant-time comparison.
    computed.len() == digest.len() && computed.iter().zip(&digest).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash("hunter2");
        let b = hash("hunter2");
        assert_ne!(a, b);

        let (salt, digest) = a.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(digest.len(), 64);

        assert!(verify("hunter2", &a));
        assert!(verify("hunter2", &b));
        assert!(!verify("hunter3", &a));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify("hunter2", ""));
        assert!(!verify("hunter2", "nodollar"));
        assert!(!verify("hunter2", "zz$00"));
        assert!(!verify("hunter2", "abc$00"));
    }
}
