//! Generators for strings and byte sequences.

use guesswork_core::{ConfigurationError, Value};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::traits::Generator;

/// Default alphabet: letters, digits, punctuation, and whitespace.
pub const PRINTABLE: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\u{0b}\u{0c}";

/// Default inclusive length bounds for strings and bytes.
pub const DEFAULT_TEXT_MIN_LEN: usize = 0;
pub const DEFAULT_TEXT_MAX_LEN: usize = 1 << 5;

#[derive(Debug, Clone)]
struct TextSampler {
    min_length: usize,
    max_length: usize,
    alphabet: Vec<char>,
}

impl TextSampler {
    fn new(min_length: usize, max_length: usize, alphabet: &str) -> Result<Self, ConfigurationError> {
        if min_length > max_length {
            return Err(ConfigurationError::LengthBounds {
                min: min_length,
                max: max_length,
            });
        }
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(ConfigurationError::EmptyAlphabet);
        }
        Ok(Self {
            min_length,
            max_length,
            alphabet,
        })
    }

    fn sample(&self, rng: &mut ChaCha8Rng) -> String {
        let length = rng.gen_range(self.min_length..=self.max_length);
        (0..length)
            .map(|_| *self.alphabet.choose(rng).expect("alphabet is non-empty"))
            .collect()
    }
}

/// Generator for strings: uniform length in `[min, max]`, each character
/// drawn independently and uniformly from the alphabet.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    sampler: TextSampler,
}

impl StringGenerator {
    /// Creates a generator with the default lengths and alphabet.
    pub fn new() -> Self {
        Self {
            sampler: TextSampler::new(DEFAULT_TEXT_MIN_LEN, DEFAULT_TEXT_MAX_LEN, PRINTABLE)
                .expect("default text parameters are well-formed"),
        }
    }

    /// Creates a generator with explicit inclusive length bounds.
    pub fn bounded(min_length: usize, max_length: usize) -> Result<Self, ConfigurationError> {
        Ok(Self {
            sampler: TextSampler::new(min_length, max_length, PRINTABLE)?,
        })
    }

    /// Sets the alphabet characters are drawn from.
    pub fn with_alphabet(mut self, alphabet: &str) -> Result<Self, ConfigurationError> {
        self.sampler = TextSampler::new(
            self.sampler.min_length,
            self.sampler.max_length,
            alphabet,
        )?;
        Ok(self)
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for StringGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        Value::Str(self.sampler.sample(rng))
    }

    fn describe(&self) -> String {
        "str".to_string()
    }
}

/// Generator for byte sequences: samples text over the alphabet and encodes
/// it as UTF-8, so the byte form stays consistent with the string form.
#[derive(Debug, Clone)]
pub struct BytesGenerator {
    sampler: TextSampler,
}

impl BytesGenerator {
    /// Creates a generator with the default lengths and alphabet.
    pub fn new() -> Self {
        Self {
            sampler: TextSampler::new(DEFAULT_TEXT_MIN_LEN, DEFAULT_TEXT_MAX_LEN, PRINTABLE)
                .expect("default text parameters are well-formed"),
        }
    }

    /// Creates a generator with explicit inclusive length bounds.
    pub fn bounded(min_length: usize, max_length: usize) -> Result<Self, ConfigurationError> {
        Ok(Self {
            sampler: TextSampler::new(min_length, max_length, PRINTABLE)?,
        })
    }

    /// Sets the alphabet characters are drawn from.
    pub fn with_alphabet(mut self, alphabet: &str) -> Result<Self, ConfigurationError> {
        self.sampler = TextSampler::new(
            self.sampler.min_length,
            self.sampler.max_length,
            alphabet,
        )?;
        Ok(self)
    }
}

impl Default for BytesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for BytesGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        Value::Bytes(self.sampler.sample(rng).into_bytes())
    }

    fn describe(&self) -> String {
        "bytes".to_string()
    }
}
