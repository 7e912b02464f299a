//! Host configuration read from environment variables.

use std::env;

use crate::core::{PieceGenerator, Randomizer, SimpleRng};
use crate::types::TICK_MS;

pub const DEFAULT_LOG_PATH: &str = "blockfall.log";

/// Runtime settings for the terminal host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Log file; `None` disables logging
    pub log_path: Option<String>,
    /// Frame / gravity check interval in milliseconds (always > 0)
    pub tick_ms: u32,
    pub randomizer: Randomizer,
    /// Piece stream seed; `None` seeds from entropy
    pub seed: Option<u32>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_path: Some(DEFAULT_LOG_PATH.to_string()),
            tick_ms: TICK_MS,
            randomizer: Randomizer::Uniform,
            seed: None,
        }
    }
}

impl HostConfig {
    /// Create from environment variables.
    ///
    /// - `BLOCKFALL_LOG_PATH`: log file (empty disables logging)
    /// - `BLOCKFALL_TICK_MS`: tick interval, must be > 0
    /// - `BLOCKFALL_RANDOMIZER`: `uniform` or `bag`
    /// - `BLOCKFALL_SEED`: u32 seed for a reproducible piece stream
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_path = match lookup("BLOCKFALL_LOG_PATH") {
            Some(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            None => defaults.log_path,
        };

        let tick_ms = lookup("BLOCKFALL_TICK_MS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&ms| ms > 0)
            .unwrap_or(defaults.tick_ms);

        let randomizer = lookup("BLOCKFALL_RANDOMIZER")
            .and_then(|s| Randomizer::from_str(&s))
            .unwrap_or(defaults.randomizer);

        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        Self {
            log_path,
            tick_ms,
            randomizer,
            seed,
        }
    }

    /// Piece generator for a new game under this configuration
    pub fn piece_generator(&self) -> PieceGenerator {
        let seed = self
            .seed
            .unwrap_or_else(|| SimpleRng::from_entropy().next_u32());
        PieceGenerator::from_randomizer(self.randomizer, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HostConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.log_path.as_deref(), Some(DEFAULT_LOG_PATH));
        assert_eq!(config.tick_ms, TICK_MS);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = HostConfig::from_lookup(lookup(&[
            ("BLOCKFALL_LOG_PATH", " /tmp/game.log "),
            ("BLOCKFALL_TICK_MS", "33"),
            ("BLOCKFALL_RANDOMIZER", "bag"),
            ("BLOCKFALL_SEED", "42"),
        ]));
        assert_eq!(config.log_path.as_deref(), Some("/tmp/game.log"));
        assert_eq!(config.tick_ms, 33);
        assert_eq!(config.randomizer, Randomizer::Bag);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_empty_log_path_disables_logging() {
        let config = HostConfig::from_lookup(lookup(&[("BLOCKFALL_LOG_PATH", "  ")]));
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = HostConfig::from_lookup(lookup(&[
            ("BLOCKFALL_TICK_MS", "0"),
            ("BLOCKFALL_RANDOMIZER", "srs"),
            ("BLOCKFALL_SEED", "-1"),
        ]));
        assert_eq!(config.tick_ms, TICK_MS);
        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let config = HostConfig {
            seed: Some(7),
            randomizer: Randomizer::Bag,
            ..HostConfig::default()
        };
        let mut a = config.piece_generator();
        let mut b = config.piece_generator();
        for _ in 0..14 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }
}
