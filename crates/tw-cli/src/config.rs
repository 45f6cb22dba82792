//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sessions longer than this many minutes are dropped as outliers.
    pub outlier_ceiling_minutes: f64,
    /// Number of bootstrap resamples for the median-difference CI.
    pub bootstrap_iterations: usize,
    /// Seed for the bootstrap RNG.
    pub bootstrap_seed: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("outlier_ceiling_minutes", &self.outlier_ceiling_minutes)
            .field("bootstrap_iterations", &self.bootstrap_iterations)
            .field("bootstrap_seed", &self.bootstrap_seed)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outlier_ceiling_minutes: tw_core::DEFAULT_CEILING_MINUTES,
            bootstrap_iterations: tw_core::stats::DEFAULT_BOOTSTRAP_ITERATIONS,
            bootstrap_seed: tw_core::stats::DEFAULT_BOOTSTRAP_SEED,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TW_*)
        figment = figment.merge(Env::prefixed("TW_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tw.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tw"))
}
