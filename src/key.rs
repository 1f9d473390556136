//! Key Generator Module
//!
//! Produces random keys from a format mask and extracts keys of the same
//! shape from arbitrary strings such as file names.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::error::{Result, VfsError};

/// Character in a format mask replaced by a random alphabet character.
pub const PLACEHOLDER: char = 'X';

/// Alphabet of default keys.
pub const DEFAULT_KEY_ALPHABET: &str =
    "1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pattern matching default keys.
pub const DEFAULT_KEY_PATTERN: &str = "[0-9a-zA-Z]{32}";

// == Key Config ==
/// Alphabet, mask and validating pattern of a key.
///
/// Defaults to 32 random alphanumerics.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyConfig {
    /// Characters keys are built from, e.g. "1234567890"
    pub alphabet: String,
    /// Key mask, every `X` is replaced with a random character, e.g. "XXX-XXXXXX-XXX"
    pub format: String,
    /// Validating regex without surrounding group, e.g. "[0-9]{3}-[0-9]{6}-[0-9]{3}"
    pub pattern: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_KEY_ALPHABET.to_string(),
            format: PLACEHOLDER.to_string().repeat(32),
            pattern: DEFAULT_KEY_PATTERN.to_string(),
        }
    }
}

// == Key Generator ==
/// Random key generator and validator.
///
/// The random source is seeded once at construction and shared between
/// callers behind a mutex; it is not meant to be cryptographically secure.
#[derive(Debug)]
pub struct KeyGenerator {
    alphabet: Vec<char>,
    format: String,
    pattern: String,
    validator: Regex,
    rng: Mutex<StdRng>,
}

impl KeyGenerator {
    // == Constructor ==
    /// Creates a generator from the given configuration.
    ///
    /// Fails if the alphabet is empty or the pattern is not a valid regex.
    pub fn new(config: KeyConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a generator with a caller supplied random source.
    pub fn with_rng(config: KeyConfig, rng: StdRng) -> Result<Self> {
        let alphabet: Vec<char> = config.alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(VfsError::Config("key alphabet is empty".to_string()));
        }

        let validator = Regex::new(&format!("({})", config.pattern))
            .map_err(|e| VfsError::Config(format!("invalid key pattern: {}", e)))?;

        Ok(Self {
            alphabet,
            format: config.format,
            pattern: config.pattern,
            validator,
            rng: Mutex::new(rng),
        })
    }

    // == New Key ==
    /// Generates a random key according to the format mask.
    pub fn new_key(&self) -> String {
        let mut rng = self.rng.lock();
        self.format
            .chars()
            .map(|c| {
                if c == PLACEHOLDER {
                    self.alphabet[rng.gen_range(0..self.alphabet.len())]
                } else {
                    c
                }
            })
            .collect()
    }

    // == Validate ==
    /// Returns the first substring of `s` matching the key pattern.
    pub fn validate(&self, s: &str) -> Result<String> {
        self.validator
            .find(s)
            .map(|m| m.as_str().to_string())
            .ok_or(VfsError::KeyNotFound)
    }

    // == Pattern ==
    /// Returns the configured validating pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
