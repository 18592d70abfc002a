// ============================
// authgate-backend-lib/src/auth/token_generator.rs
// ============================
//! Secure session-key generation.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Session keys carry 32 bytes (256 bits) of OS entropy
const SESSION_KEY_BYTES: usize = 32;

/// Generate an opaque session key from OS entropy, base64 url-safe
/// encoded without padding.
pub fn generate_session_key() -> String {
    generate_key_with_size(SESSION_KEY_BYTES)
}

/// Generate a random key of `bytes` bytes of entropy.
pub fn generate_key_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        // Two keys must never collide
        let key1 = generate_session_key();
        let key2 = generate_session_key();

        assert_ne!(key1, key2);

        // 32 bytes of entropy in unpadded base64 is 43 characters
        assert_eq!(key1.len(), 43);

        let small = generate_key_with_size(16);
        let large = generate_key_with_size(64);

        assert!(small.len() < key1.len());
        assert!(large.len() > key1.len());
    }
}
