//! libhanseg-core
//!
//! Data models shared by the libhanseg segmenter: the prefix-trie lexicon,
//! the word frequency table with its text loaders and compiled cache, and
//! the BMES hidden Markov model. Everything here is built once at startup
//! and is read-only during segmentation.
//!
//! Public API:
//! - `TrieNode` / `Hit` - lexicon trie and its probe result
//! - `WordDict` - trie + `ln(freq/total)` table, loaders, reset, cache
//! - `HmmModel` / `State` / `MIN_PROB` - BMES probabilities
//! - `DictError` / `Result` - load-time error reporting
//! - `Config` - engine configuration with TOML helpers

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod dict;
pub use dict::{WordDict, DEFAULT_USER_FREQ, USER_DICT_SUFFIX};

pub mod errors;
pub use errors::{DictError, Result};

pub mod hmm;
pub use hmm::{HmmModel, State, MIN_PROB};

pub mod trie;
pub use trie::{Hit, TrieNode};

/// Engine configuration.
///
/// Resource paths are optional so that embedded-reader construction stays
/// possible; `Segmenter::from_config` in the `libhanseg` crate consumes
/// them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Run the Viterbi fallback on unknown multi-character spans. With the
    /// fallback off (or with no emission data loaded) those spans surface
    /// as their constituent characters.
    pub hmm_enabled: bool,

    /// Frequency assigned to user dictionary entries that do not carry one.
    pub default_user_freq: f64,

    /// File suffix scanned for when a user dictionary directory is given.
    pub user_dict_suffix: String,

    /// Log-probability handed out for missing start / transition / emission
    /// entries of the HMM.
    pub emission_floor: f64,

    /// Path of the main dictionary file (`word freq [tag]` lines).
    pub main_dict: Option<PathBuf>,

    /// Path of the HMM emission file (`prob_emit.txt` format).
    pub emit_file: Option<PathBuf>,

    /// User dictionary files merged after the main dictionary, in order.
    pub user_dicts: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hmm_enabled: true,
            default_user_freq: DEFAULT_USER_FREQ,
            user_dict_suffix: USER_DICT_SUFFIX.to_string(),
            emission_floor: MIN_PROB,
            main_dict: None,
            emit_file: None,
            user_dicts: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.hmm_enabled = false;
        config.default_user_freq = 5.0;
        config.user_dict_suffix = "lex".to_string();
        config.emission_floor = -99.0;
        config.main_dict = Some(PathBuf::from("data/dict.txt"));
        config.user_dicts.push(PathBuf::from("data/extra.dict"));

        let text = config.to_toml_string().unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert!(!back.hmm_enabled);
        assert_eq!(back.default_user_freq, 5.0);
        assert_eq!(back.user_dict_suffix, "lex");
        assert_eq!(back.emission_floor, -99.0);
        assert_eq!(back.main_dict.as_deref(), Some(std::path::Path::new("data/dict.txt")));
        assert_eq!(back.user_dicts.len(), 1);
    }

    #[test]
    fn config_defaults_match_the_model_constants() {
        let config = Config::default();
        assert!(config.hmm_enabled);
        assert_eq!(config.default_user_freq, DEFAULT_USER_FREQ);
        assert_eq!(config.user_dict_suffix, USER_DICT_SUFFIX);
        assert_eq!(config.emission_floor, MIN_PROB);
        assert!(config.main_dict.is_none());
        assert!(config.user_dicts.is_empty());
    }
}
