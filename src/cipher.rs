//! AES-CBC helpers for small secrets that travel through untrusted hands.
//!
//! The ciphertext is a random IV followed by the PKCS#7 padded payload. The key
//! length picks the AES variant: 16, 24 or 32 bytes.
//!
//! There is no authentication: a tampered ciphertext usually fails on padding, but
//! not always. The identifier codecs in this crate never use this module.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use thiserror::Error;
use tracing::debug;

pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("Invalid key length {0}, expected 16, 24 or 32 bytes")]
    InvalidKeyLength(usize),
    #[error("Invalid ciphertext length {0}")]
    InvalidLength(usize),
    #[error("Invalid padding")]
    InvalidPadding,
}

/// Encrypts `plaintext` under `key` with a fresh random IV.
///
/// # Examples
///
/// ```
/// use urlid_rs::cipher;
///
/// let key = b"0123456789abcdef";
/// let ciphertext = cipher::encrypt(b"attack at dawn", key).unwrap();
/// assert_eq!(ciphertext.len(), 32);
/// assert_eq!(cipher::decrypt(&ciphertext, key).unwrap(), b"attack at dawn");
/// ```
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut iv = [0u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let body = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, &iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, &iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, &iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        n => return Err(CipherError::InvalidKeyLength(n)),
    }
    .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;

    let mut ciphertext = Vec::with_capacity(BLOCK_SIZE + body.len());
    ciphertext.extend_from_slice(&iv);
    ciphertext.extend_from_slice(&body);
    Ok(ciphertext)
}

/// Decrypts the output of [`encrypt`].
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    // IV plus at least one block of padded payload, in whole blocks.
    if ciphertext.len() < 2 * BLOCK_SIZE || ciphertext.len() % BLOCK_SIZE != 0 {
        debug!(length = ciphertext.len(), "rejected ciphertext length");
        return Err(CipherError::InvalidLength(ciphertext.len()));
    }
    let (iv, body) = ciphertext.split_at(BLOCK_SIZE);

    let plaintext = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(body)),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(body)),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(body)),
        n => return Err(CipherError::InvalidKeyLength(n)),
    }
    .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;

    plaintext.map_err(|_| {
        debug!("rejected ciphertext padding");
        CipherError::InvalidPadding
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_128: &[u8] = b"0123456789abcdef";
    const KEY_192: &[u8] = b"0123456789abcdef01234567";
    const KEY_256: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_roundtrips() {
        let messages: [&[u8]; 4] = [b"", b"x", b"exactly 16 bytes", &[0xa5; 100]];
        for key in [KEY_128, KEY_192, KEY_256] {
            for message in messages {
                let ciphertext = encrypt(message, key).unwrap();
                assert_eq!(decrypt(&ciphertext, key).unwrap(), message);
            }
        }
    }

    #[test]
    fn test_lengths() {
        // Padding always adds something, a full block when already aligned.
        assert_eq!(encrypt(b"", KEY_128).unwrap().len(), 32);
        assert_eq!(encrypt(b"15 bytes long..", KEY_128).unwrap().len(), 32);
        assert_eq!(encrypt(b"exactly 16 bytes", KEY_128).unwrap().len(), 48);
    }

    #[test]
    fn test_random_iv() {
        let first = encrypt(b"same message", KEY_256).unwrap();
        let second = encrypt(b"same message", KEY_256).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            encrypt(b"message", b"short key"),
            Err(CipherError::InvalidKeyLength(9))
        );

        let ciphertext = encrypt(b"message", KEY_128).unwrap();
        assert_eq!(
            decrypt(&ciphertext, &KEY_256[..20]),
            Err(CipherError::InvalidKeyLength(20))
        );
        assert_eq!(
            decrypt(&ciphertext[..16], KEY_128),
            Err(CipherError::InvalidLength(16))
        );
        assert_eq!(
            decrypt(&ciphertext[..31], KEY_128),
            Err(CipherError::InvalidLength(31))
        );

        // A wrong key garbles the padding, or at the very least the message.
        let wrong_key: Vec<u8> = KEY_128.iter().rev().copied().collect();
        match decrypt(&ciphertext, &wrong_key) {
            Ok(plaintext) => assert_ne!(plaintext, b"message"),
            Err(e) => assert_eq!(e, CipherError::InvalidPadding),
        }
    }
}
