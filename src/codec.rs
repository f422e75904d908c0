use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::{Alphabet, Config, Error};

static GLOBAL_CODEC: Lazy<Codec> = Lazy::new(|| Codec::new(Config::global()));

/// Link ID encoder/decoder.
///
/// Maps a `u64` entity ID to a short token that hides how IDs are allocated:
///
/// ```text
/// v = ((id * p1 + a) << s) * p2
/// ```
///
/// rendered in base 64. All arithmetic is unbounded, so every step inverts exactly.
/// This is obfuscation, not encryption: anyone holding the parameters can decode
/// and forge tokens.
pub struct Codec {
    alphabet: Alphabet,
    multiplier1: BigUint,
    multiplier2: BigUint,
    addend: BigUint,
    shift: usize,
}

impl Codec {
    /// Creates a new `Codec` from the alphabet and parameters in `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlid_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new());
    /// ```
    pub fn new(config: &Config) -> Codec {
        let (multiplier1, multiplier2) = config.multipliers;
        Codec {
            alphabet: config.alphabet.clone(),
            multiplier1: BigUint::from(multiplier1),
            multiplier2: BigUint::from(multiplier2),
            addend: BigUint::from(config.addend),
            shift: config.shift as usize,
        }
    }

    /// The codec built from [`Config::global`].
    pub fn global() -> &'static Codec {
        &GLOBAL_CODEC
    }

    /// Encodes `id` into a link token.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlid_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new());
    /// assert_eq!(codec.encode(12345), "yNQRDJ52kpKxxX");
    /// ```
    pub fn encode(&self, id: u64) -> String {
        self.alphabet.encode_big(&self.obfuscate(id))
    }

    fn obfuscate(&self, id: u64) -> BigUint {
        ((BigUint::from(id) * &self.multiplier1 + &self.addend) << self.shift) * &self.multiplier2
    }

    /// Decodes a link token back into the ID it was made from.
    ///
    /// Tokens that were not produced by a codec with the same configuration are
    /// rejected rather than mapped to some other ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlid_rs::{Codec, Config, Error};
    ///
    /// let codec = Codec::new(&Config::new());
    /// assert_eq!(codec.decode("yNQRDJ52kpKxxX"), Ok(12345));
    /// assert_eq!(codec.decode("yNQRDJ52kpKxxb"), Err(Error::InexactInverse));
    /// ```
    pub fn decode(&self, token: &str) -> Result<u64, Error> {
        let result = self
            .alphabet
            .decode_big(token)
            .and_then(|v| self.deobfuscate(v));
        if let Err(error) = &result {
            debug!(token, %error, "rejected link id token");
        }
        result
    }

    fn deobfuscate(&self, v: BigUint) -> Result<u64, Error> {
        let v = exact_div(&v, &self.multiplier2)?;

        // The low `shift` bits were shifted in as zeroes.
        if v.trailing_zeros().is_some_and(|zeros| zeros < self.shift as u64) {
            return Err(Error::InexactInverse);
        }
        let v = v >> self.shift;

        if v < self.addend {
            return Err(Error::InexactInverse);
        }
        let v = exact_div(&(v - &self.addend), &self.multiplier1)?;

        v.to_u64().ok_or(Error::Overflow)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new(&Config::default())
    }
}

fn exact_div(n: &BigUint, d: &BigUint) -> Result<BigUint, Error> {
    if !(n % d).is_zero() {
        return Err(Error::InexactInverse);
    }
    Ok(n / d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{distributions::Uniform, Rng, SeedableRng};
    use tracing_test::traced_test;

    const P1: u64 = 687724237;
    const P2: u64 = 890234203;
    const A: u64 = 6066941;

    #[test]
    fn test_defaults() {
        let codec = Codec::new(&Config::new());
        let test_cases = vec![
            (0, "DcG3wWLPzX"),
            (1, "b9MM-2SnIDwX"),
            (2, "iRlSJJGO5G0X"),
            (123, "iiIRvCfc40ssX"),
            (12345, "yNQRDJ52kpKxxX"),
            (u64::MAX, "tOkRkTNvQ3z2shklPIHsBX"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(codec.encode(input), expected);
            assert_eq!(codec.decode(expected).unwrap(), input);
        }
    }

    #[test]
    fn test_custom_config() {
        let config = Config::new()
            .alphabet("abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-_")
            .unwrap()
            .multipliers(1_000_003, 998_244_353)
            .unwrap()
            .addend(17)
            .shift(3)
            .unwrap();
        let codec = Codec::new(&config);
        let default_codec = Codec::default();

        for id in [0, 1, 2, 99, 1 << 40, u64::MAX] {
            let encoded = codec.encode(id);
            assert_ne!(encoded, default_codec.encode(id));
            assert_eq!(codec.decode(&encoded).unwrap(), id);
        }

        // Tokens of one configuration don't decode under another.
        assert!(default_codec.decode(&codec.encode(12345)).is_err());
    }

    #[test]
    fn test_zero_shift() {
        let codec = Codec::new(&Config::new().shift(0).unwrap());
        for id in [0, 1, u64::MAX] {
            assert_eq!(codec.decode(&codec.encode(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_decode_errors() {
        let codec = Codec::default();

        // Invalid characters aren't allowed.
        assert_eq!(
            codec.decode("DcG3w+LPzX"),
            Err(Error::InvalidAlphabetChar {
                character: '+',
                position: 5
            })
        );

        // Tampering with the last digit breaks divisibility by p2.
        assert_eq!(codec.decode("DcG3wWLPzb"), Err(Error::InexactInverse));
        assert_eq!(codec.decode("DcG3wWLPzY"), Err(Error::InexactInverse));

        // Empty and zero tokens are below the addend.
        assert_eq!(codec.decode(""), Err(Error::InexactInverse));
        assert_eq!(codec.decode("X"), Err(Error::InexactInverse));

        // And just to validate the above, check that the correct string does decode.
        assert_eq!(codec.decode("DcG3wWLPzX"), Ok(0));
    }

    #[test]
    fn test_decode_rejects_each_inexact_step() {
        let codec = Codec::default();
        let p1 = BigUint::from(P1);
        let p2 = BigUint::from(P2);
        let a = BigUint::from(A);

        // Divisible by p2 but with low bits set below the shift.
        let token = codec.alphabet.encode_big(&(BigUint::from(5u8) * &p2));
        assert_eq!(codec.decode(&token), Err(Error::InexactInverse));

        // Shift is clean but the value is below the addend.
        let token = codec.alphabet.encode_big(&((BigUint::from(1u8) << 7usize) * &p2));
        assert_eq!(codec.decode(&token), Err(Error::InexactInverse));

        // Everything clean except the final division by p1.
        let token = codec.alphabet.encode_big(&(((&a + 1u8) << 7usize) * &p2));
        assert_eq!(codec.decode(&token), Err(Error::InexactInverse));

        // A well-formed value whose ID needs more than 64 bits.
        let too_big = (BigUint::from(1u8) << 64usize) * &p1 + &a;
        let token = codec.alphabet.encode_big(&((too_big << 7usize) * &p2));
        assert_eq!(codec.decode(&token), Err(Error::Overflow));
    }

    #[test]
    #[traced_test]
    fn test_rejection_is_logged() {
        let codec = Codec::default();
        assert!(codec.decode("DcG3wWLPzb").is_err());
        assert!(logs_contain("rejected link id token"));
    }

    #[test]
    fn test_injective() {
        let codec = Codec::default();
        let mut seen = HashSet::new();
        for id in 0..10_000u64 {
            assert!(seen.insert(codec.encode(id)), "Collision at id: {}", id);
        }
        for id in (u64::MAX - 1_000)..=u64::MAX {
            assert!(seen.insert(codec.encode(id)), "Collision at id: {}", id);
        }
    }

    #[test]
    fn test_sequential_ids_look_unrelated() {
        let codec = Codec::default();
        let first = codec.encode(1000);
        let second = codec.encode(1001);
        assert_ne!(first[..4], second[..4]);
    }

    #[test]
    fn test_random_roundtrips() {
        let codec = Codec::default();
        let mut rng = StdRng::seed_from_u64(42);
        let range = Uniform::new_inclusive(0u64, u64::MAX);

        for _ in 0..10_000 {
            let number = rng.sample(range);
            let encoded = codec.encode(number);
            let decoded = codec.decode(&encoded).expect("Decoding failed");

            assert_eq!(decoded, number, "Failed at number: {}", number);
        }
    }
}
