use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{debug, trace};

use crate::Alphabet;

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

/// Default link ID multipliers.
pub const DEFAULT_MULTIPLIERS: (u64, u64) = (687724237, 890234203);

/// Default link ID addend.
pub const DEFAULT_ADDEND: u64 = 6066941;

/// Default link ID shift, in bits.
pub const DEFAULT_SHIFT: u8 = 7;

const MAX_SHIFT: u8 = 32;

/// Configuring the urlid library.
///
/// Everything here is part of the token format: changing any of it after tokens
/// have been handed out makes those tokens undecodable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) alphabet: Alphabet,
    pub(crate) multipliers: (u64, u64),
    pub(crate) addend: u64,
    pub(crate) shift: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Alphabet must be 64 distinct symbols from [a-z0-9A-Z-_]")]
    InvalidAlphabet,
    #[error("Multipliers must be non-zero")]
    InvalidMultiplier,
    #[error("Shift must be at most {} bits", MAX_SHIFT)]
    InvalidShift,
    #[error("Global configuration is already initialized")]
    AlreadyInitialized,
}

impl Config {
    /// Creates a new configuration with the built-in alphabet and link ID parameters.
    pub fn new() -> Self {
        Config {
            alphabet: Alphabet::DEFAULT,
            multipliers: DEFAULT_MULTIPLIERS,
            addend: DEFAULT_ADDEND,
            shift: DEFAULT_SHIFT,
        }
    }

    /// Sets the alphabet, a permutation of `[a-z0-9A-Z-_]`.
    pub fn alphabet(mut self, symbols: &str) -> Result<Self, ConfigError> {
        self.alphabet = Alphabet::new(symbols)?;
        Ok(self)
    }

    /// Sets the two link ID multipliers. Large odd values spread the tokens best.
    pub fn multipliers(mut self, first: u64, second: u64) -> Result<Self, ConfigError> {
        if first == 0 || second == 0 {
            Err(ConfigError::InvalidMultiplier)
        } else {
            self.multipliers = (first, second);
            Ok(self)
        }
    }

    /// Sets the link ID addend.
    pub fn addend(mut self, addend: u64) -> Self {
        self.addend = addend;
        self
    }

    /// Sets the link ID shift in bits.
    /// The value must be between 0 and 32.
    pub fn shift(mut self, shift: u8) -> Result<Self, ConfigError> {
        if shift > MAX_SHIFT {
            Err(ConfigError::InvalidShift)
        } else {
            self.shift = shift;
            Ok(self)
        }
    }

    /// Sets the global configuration.
    ///
    /// This can succeed only once per process, and only before anything has read
    /// the global configuration, so that every encoder and decoder in the process
    /// agrees on the token format.
    pub fn set_global(config: Config) -> Result<(), ConfigError> {
        GLOBAL_CONFIG.set(config).map_err(|_| {
            debug!("global config already initialized");
            ConfigError::AlreadyInitialized
        })?;
        debug!("global config installed");
        Ok(())
    }

    /// Accesses the global configuration, installing the default one if none was set.
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(|| {
            trace!("no global config set, using defaults");
            Config::new()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.alphabet, Alphabet::DEFAULT);
        assert_eq!(config.multipliers, (687724237, 890234203));
        assert_eq!(config.addend, 6066941);
        assert_eq!(config.shift, 7);
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .multipliers(3, 5)
            .unwrap()
            .addend(0)
            .shift(32)
            .unwrap();
        assert_eq!(config.multipliers, (3, 5));
        assert_eq!(config.addend, 0);
        assert_eq!(config.shift, 32);
    }

    #[test]
    fn test_builder_errors() {
        assert_eq!(
            Config::new().alphabet("0123"),
            Err(ConfigError::InvalidAlphabet)
        );
        assert_eq!(
            Config::new().multipliers(0, 5),
            Err(ConfigError::InvalidMultiplier)
        );
        assert_eq!(
            Config::new().multipliers(3, 0),
            Err(ConfigError::InvalidMultiplier)
        );
        assert_eq!(Config::new().shift(33), Err(ConfigError::InvalidShift));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidShift.to_string(),
            "Shift must be at most 32 bits"
        );
    }
}
