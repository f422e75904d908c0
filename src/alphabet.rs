use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Config, ConfigError};

/// Number of symbols in an alphabet, and the radix of every encoding in this crate.
pub const BASE: usize = 64;

/// The symbol set every alphabet is a permutation of.
const SYMBOLS: &[u8; BASE] = b"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

const NOT_A_MEMBER: u8 = 0xff;

/// A fixed bijection between 64 URL safe symbols and the digits `0..64`.
///
/// Tokens are only portable between processes that use the same alphabet, so a
/// deployment picks one permutation and keeps it forever.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    pub(crate) symbols: [u8; BASE],
    index: [u8; 128],
}

impl Alphabet {
    /// The built-in permutation used unless the configuration says otherwise.
    pub const DEFAULT: Alphabet =
        Alphabet::build(b"Xbiy9GKPREJhNnUjt4mpdTfac80WwvzeB5lkM_D-sI6gxV73rSLY1CuQoAHq2FZO");

    const fn build(symbols: &[u8; BASE]) -> Alphabet {
        let mut index = [NOT_A_MEMBER; 128];
        let mut i = 0;
        while i < BASE {
            index[symbols[i] as usize] = i as u8;
            i += 1;
        }
        Alphabet {
            symbols: *symbols,
            index,
        }
    }

    /// Creates an alphabet from a permutation of `[a-z0-9A-Z-_]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlid_rs::Alphabet;
    ///
    /// let alphabet =
    ///     Alphabet::new("abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-_").unwrap();
    /// assert_eq!(alphabet.symbol_at(26), '0');
    /// assert!(Alphabet::new("abc").is_err());
    /// ```
    pub fn new(symbols: &str) -> Result<Alphabet, ConfigError> {
        let symbols: &[u8; BASE] = symbols
            .as_bytes()
            .try_into()
            .map_err(|_| ConfigError::InvalidAlphabet)?;
        let mut seen = [false; 128];
        for &b in symbols {
            if !is_symbol(b) || seen[b as usize] {
                return Err(ConfigError::InvalidAlphabet);
            }
            seen[b as usize] = true;
        }
        Ok(Alphabet::build(symbols))
    }

    /// Draws a new random permutation.
    ///
    /// Use this once to mint the alphabet of a new deployment, then store
    /// `as_str()` in its configuration. Tokens encoded with one shuffle cannot be
    /// decoded with another.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Alphabet {
        let mut symbols = *SYMBOLS;
        symbols.shuffle(rng);
        Alphabet::build(&symbols)
    }

    /// The alphabet of the process-wide configuration.
    pub fn global() -> &'static Alphabet {
        &Config::global().alphabet
    }

    /// Returns the symbol for `digit`.
    ///
    /// # Panics
    ///
    /// Panics if `digit` is not below [`BASE`].
    pub fn symbol_at(&self, digit: usize) -> char {
        self.symbols[digit] as char
    }

    /// Returns the digit `c` stands for, or `None` if `c` is not a member.
    pub fn index_of(&self, c: char) -> Option<u8> {
        if !c.is_ascii() {
            return None;
        }
        match self.index[c as usize] {
            NOT_A_MEMBER => None,
            digit => Some(digit),
        }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.symbols).expect("Alphabet symbols are ASCII")
    }
}

fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::DEFAULT
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}
