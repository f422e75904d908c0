//! Positional base 64 encoding over an [`Alphabet`], most significant digit first.
//!
//! Zero encodes as the single symbol for digit 0; no other value gets leading
//! zero digits. The free functions use [`Alphabet::global`].

use num_bigint::BigUint;
use num_traits::Zero;

use crate::alphabet::{Alphabet, BASE};
use crate::Error;

// u64::MAX needs 11 base 64 digits.
const MAX_U64_DIGITS: usize = 11;

impl Alphabet {
    /// Encodes `t` in base 64.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlid_rs::Alphabet;
    ///
    /// let alphabet = Alphabet::default();
    /// assert_eq!(alphabet.encode_u64(0), "X");
    /// assert_eq!(alphabet.encode_u64(64), "bX");
    /// ```
    pub fn encode_u64(&self, mut t: u64) -> String {
        if t == 0 {
            return self.symbol_at(0).to_string();
        }
        let mut buf = [0u8; MAX_U64_DIGITS];
        let mut i = buf.len();
        while t > 0 {
            i -= 1;
            buf[i] = self.symbols[(t % BASE as u64) as usize];
            t /= BASE as u64;
        }
        buf[i..].iter().map(|&b| b as char).collect()
    }

    /// Decodes a base 64 string into a `u64`.
    ///
    /// The empty string decodes to zero. Values above `u64::MAX` are an
    /// [`Error::Overflow`] rather than wrapping.
    pub fn decode_u64(&self, s: &str) -> Result<u64, Error> {
        s.chars()
            .enumerate()
            .try_fold(0u64, |t, (position, character)| {
                let digit = self
                    .index_of(character)
                    .ok_or(Error::InvalidAlphabetChar { character, position })?;
                t.checked_mul(BASE as u64)
                    .and_then(|t| t.checked_add(digit as u64))
                    .ok_or(Error::Overflow)
            })
    }

    /// Encodes an integer of any size in base 64.
    pub fn encode_big(&self, t: &BigUint) -> String {
        if t.is_zero() {
            return self.symbol_at(0).to_string();
        }
        t.to_radix_be(BASE as u32)
            .into_iter()
            .map(|digit| self.symbol_at(digit as usize))
            .collect()
    }

    /// Decodes a base 64 string of any length. The empty string decodes to zero.
    pub fn decode_big(&self, s: &str) -> Result<BigUint, Error> {
        let digits = self.digits(s)?;
        let t = BigUint::from_radix_be(&digits, BASE as u32)
            .expect("Digits should be below the radix");
        Ok(t)
    }

    fn digits(&self, s: &str) -> Result<Vec<u8>, Error> {
        s.chars()
            .enumerate()
            .map(|(position, character)| {
                self.index_of(character)
                    .ok_or(Error::InvalidAlphabetChar { character, position })
            })
            .collect()
    }
}

/// Encodes `t` with the global alphabet.
pub fn encode_u64(t: u64) -> String {
    Alphabet::global().encode_u64(t)
}

/// Decodes `s` with the global alphabet.
pub fn decode_u64(s: &str) -> Result<u64, Error> {
    Alphabet::global().decode_u64(s)
}
