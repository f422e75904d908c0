use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::alphabet::Alphabet;
use crate::Error;

/// Seed of the content hash. Clients computing hashes on their side must use the same one.
pub const HASH_SEED: u32 = 0xa9401e9f;

const HEX_LENGTH: usize = 32;

// 22 base 64 digits cover 128 bits.
const MAX_URL_LENGTH: usize = 22;

/// An opaque 128 bit content identifier, held as two signed 64 bit halves.
///
/// A hash with either half zero is reserved to mean "unset", see [`Hash128::is_valid`].
///
/// # Examples
///
/// ```
/// use urlid_rs::Hash128;
///
/// let hash = Hash128::new(123419281928712, 98172938701286);
/// assert_eq!(hash.to_hex(), "083275ca3f700000e64923ab49590000");
/// assert_eq!(hash.encode_url(), "G_E6LnEABXXwyOJvpRR");
/// assert_eq!(Hash128::decode_url("G_E6LnEABXXwyOJvpRR").unwrap(), hash);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash128 {
    pub h1: i64,
    pub h2: i64,
}

impl Hash128 {
    pub const fn new(h1: i64, h2: i64) -> Hash128 {
        Hash128 { h1, h2 }
    }

    /// Hashes `data` with MurmurHash3 x64/128 seeded with [`HASH_SEED`].
    pub fn of(data: &[u8]) -> Hash128 {
        Hash128::from_reader(data).expect("Reading from a slice should not fail")
    }

    /// Hashes everything `reader` yields.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Hash128> {
        let t = murmur3::murmur3_x64_128(&mut reader, HASH_SEED)?;
        Ok(Hash128::from_u128(t))
    }

    /// True if both halves are non-zero.
    pub fn is_valid(&self) -> bool {
        self.h1 != 0 && self.h2 != 0
    }

    /// Splits `t` into `h1 = t mod 2^64` and `h2 = t >> 64`.
    pub const fn from_u128(t: u128) -> Hash128 {
        Hash128 {
            h1: t as u64 as i64,
            h2: (t >> 64) as u64 as i64,
        }
    }

    /// The value as one unsigned integer, `h1 + h2 * 2^64`.
    pub const fn to_u128(self) -> u128 {
        (self.h1 as u64 as u128) | ((self.h2 as u64 as u128) << 64)
    }

    /// The 16 bytes in the order the hex form shows them.
    pub fn to_bytes(self) -> [u8; 16] {
        // Byte-swapping a half and printing it big endian is printing its little endian bytes.
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.h1.to_le_bytes());
        bytes[8..].copy_from_slice(&self.h2.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Hash128 {
        let mut h1 = [0u8; 8];
        let mut h2 = [0u8; 8];
        h1.copy_from_slice(&bytes[..8]);
        h2.copy_from_slice(&bytes[8..]);
        Hash128 {
            h1: i64::from_le_bytes(h1),
            h2: i64::from_le_bytes(h2),
        }
    }

    /// Formats the hash as 32 lowercase hex digits.
    pub fn to_hex(self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses 32 hex digits of either case.
    pub fn from_hex(s: &str) -> Result<Hash128, Error> {
        if !is_valid_format(s) {
            return Err(Error::MalformedHex);
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::MalformedHex)?;
        Ok(Hash128::from_bytes(bytes))
    }

    /// Encodes the hash as a base 64 token of at most 22 symbols, using the global alphabet.
    pub fn encode_url(&self) -> String {
        self.encode_url_with(Alphabet::global())
    }

    pub fn encode_url_with(&self, alphabet: &Alphabet) -> String {
        let mut t = self.to_u128();
        if t == 0 {
            return alphabet.symbol_at(0).to_string();
        }
        let mut buf = [0u8; MAX_URL_LENGTH];
        let mut i = buf.len();
        while t != 0 {
            i -= 1;
            buf[i] = alphabet.symbols[(t & 0x3f) as usize];
            t >>= 6;
        }
        buf[i..].iter().map(|&b| b as char).collect()
    }

    /// Decodes a token made by [`Hash128::encode_url`].
    pub fn decode_url(s: &str) -> Result<Hash128, Error> {
        Hash128::decode_url_with(s, Alphabet::global())
    }

    pub fn decode_url_with(s: &str, alphabet: &Alphabet) -> Result<Hash128, Error> {
        let t = alphabet.decode_big(s)?.to_u128().ok_or(Error::Overflow)?;
        Ok(Hash128::from_u128(t))
    }
}

/// Checks that `s` is exactly 32 hex digits. Says nothing about the value.
pub fn is_valid_format(s: &str) -> bool {
    s.len() == HEX_LENGTH && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash128 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash128::from_hex(s)
    }
}

impl From<Hash128> for Uuid {
    fn from(hash: Hash128) -> Self {
        Uuid::from_bytes(hash.to_bytes())
    }
}

impl From<Uuid> for Hash128 {
    fn from(uuid: Uuid) -> Self {
        Hash128::from_bytes(*uuid.as_bytes())
    }
}

impl Serialize for Hash128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Hash128::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
