//! Codec configuration.
//!
//! Both configurations are plain serde structs so they can be stored next
//! to the encoded data as JSON; missing fields fall back to the defaults
//! below.  Call `validate` (or the codec constructors, which do) before use.

use crate::error::ConfigError;
use crate::prng::{Lfsr, DEFAULT_POLY, DEFAULT_STATE};
use crate::reed_solomon::ReedSolomon;
use crate::validity::ValidityScreen;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Parameters of the fountain codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FountainConfig {
    /// Extra codewords as a fraction of the block count (0.5 → 50 % more).
    pub redundancy: f64,
    /// Robust soliton tuning parameter `c`.
    pub c_dist: f64,
    /// Robust soliton tuning parameter `δ`.
    pub delta: f64,
    /// Width of the seed header in bits; must be even.
    pub header_bits: u32,
    /// Candidate seeds tried per requested codeword before giving up.
    pub attempts_per_codeword: u64,
    /// Decode the produced set before returning it.
    pub verify_decodable: bool,
    /// Initial LFSR state.
    pub lfsr_state: u64,
    /// LFSR feedback polynomial.
    pub lfsr_poly: u64,
    /// Screen applied by [`FountainCodec::encode_screened`](crate::FountainCodec::encode_screened).
    pub screen: ValidityScreen,
}

impl Default for FountainConfig {
    fn default() -> Self {
        Self {
            redundancy: 0.5,
            c_dist: 0.1,
            delta: 0.5,
            header_bits: 32,
            attempts_per_codeword: 10_000,
            verify_decodable: false,
            lfsr_state: DEFAULT_STATE,
            lfsr_poly: DEFAULT_POLY,
            screen: ValidityScreen::default(),
        }
    }
}

impl FountainConfig {
    /// Checks every parameter range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.redundancy >= 0.0 && self.redundancy.is_finite()) {
            return Err(ConfigError::invalid(
                "redundancy",
                format!("{} must be a non-negative number", self.redundancy),
            ));
        }
        if self.header_bits == 0 || self.header_bits > 64 || self.header_bits % 2 != 0 {
            return Err(ConfigError::invalid(
                "header_bits",
                format!("{} must be an even width in 2..=64", self.header_bits),
            ));
        }
        if self.attempts_per_codeword == 0 {
            return Err(ConfigError::invalid("attempts_per_codeword", "must be positive"));
        }
        if !(self.delta > 0.0 && self.delta <= 1.0) {
            return Err(ConfigError::invalid("delta", format!("{} not in (0, 1]", self.delta)));
        }
        if !(self.c_dist > 0.0 && self.c_dist.is_finite()) {
            return Err(ConfigError::invalid("c_dist", format!("{} must be positive", self.c_dist)));
        }
        if !(0.5..=1.0).contains(&self.screen.max_gc_content) {
            return Err(ConfigError::invalid(
                "screen.max_gc_content",
                format!("{} not in [0.5, 1]", self.screen.max_gc_content),
            ));
        }
        Lfsr::new(self.lfsr_state, self.lfsr_poly).map(|_| ())
    }

    /// Builds the seed stream described by this configuration.
    pub fn lfsr(&self) -> Result<Lfsr, ConfigError> {
        Lfsr::new(self.lfsr_state, self.lfsr_poly)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_json(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Decode(err.to_string()))
    }
}

/// Parameters of the Reed–Solomon codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsConfig {
    /// Check symbols appended to each payload.
    pub check_size: u8,
}

impl Default for RsConfig {
    fn default() -> Self {
        Self { check_size: 3 }
    }
}

impl RsConfig {
    /// Checks the parameter range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_size == 0 {
            return Err(ConfigError::invalid("check_size", "must be positive"));
        }
        Ok(())
    }

    /// Builds the codec described by this configuration.
    pub fn build(&self) -> Result<ReedSolomon, ConfigError> {
        ReedSolomon::new(self.check_size)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_json(text)?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    serde_json::from_str(text).map_err(|err| ConfigError::Decode(err.to_string()))
}
