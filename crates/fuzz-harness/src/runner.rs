//! Fuzz run configuration
//!
//! Case counts default low enough for `cargo test` and can be raised from
//! the environment for long soak runs:
//!
//! ```text
//! FUZZ_CASES=100000 FUZZ_SEED=42 cargo test -p fuzz-harness
//! ```

use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_CASES: u32 = 256;

/// Fuzz test configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u32,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: DEFAULT_CASES,
            max_shrink_iters: 1000,
            seed: None,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `FUZZ_CASES` and `FUZZ_SEED`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(cases) = env_number("FUZZ_CASES") {
            config.cases = cases as u32;
        }
        config.seed = env_number("FUZZ_SEED");
        debug!(?config, "fuzz config");
        config
    }

    pub fn cases(mut self, n: u32) -> Self {
        self.cases = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    /// Generate proptest config from this
    pub fn to_proptest_config(&self) -> Config {
        let mut config = Config::default();
        config.cases = self.cases;
        config.max_shrink_iters = self.max_shrink_iters;
        config
    }

    /// Test runner, deterministic when a seed is set
    pub fn runner(&self) -> TestRunner {
        let config = self.to_proptest_config();
        match self.seed {
            Some(seed) => {
                let mut bytes = [0u8; 32];
                bytes[..8].copy_from_slice(&seed.to_le_bytes());
                TestRunner::new_with_rng(config, TestRng::from_seed(RngAlgorithm::ChaCha, &bytes))
            }
            None => TestRunner::new(config),
        }
    }
}

fn env_number(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric fuzz setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::{Strategy, ValueTree};

    #[test]
    fn test_config_defaults() {
        let config = FuzzConfig::default();
        assert_eq!(config.cases, DEFAULT_CASES);
        assert_eq!(config.seed, None);
        assert_eq!(config.to_proptest_config().cases, DEFAULT_CASES);
    }

    #[test]
    fn test_builder() {
        let config = FuzzConfig::new().cases(10).seed(7);
        assert_eq!(config.cases, 10);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_seeded_runner_is_deterministic() {
        let config = FuzzConfig::new().seed(42);
        let strategy = proptest::collection::vec(0u32..1000, 16);

        let a = strategy.new_tree(&mut config.runner()).unwrap().current();
        let b = strategy.new_tree(&mut config.runner()).unwrap().current();
        assert_eq!(a, b);
    }
}
