// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Configuration
//!
//! `EngineConfig` holds the deployment-tunable knobs that sit outside
//! the dispatch core itself - whether logs are JSON or human-readable,
//! and the PBKDF2 iteration floor this deployment is willing to accept.
//! `pbkdf2_min_iterations` is threaded into `Pbkdf2Module::new` by
//! `webcrypto_bootstrap::registry::default_registry`, so the module that
//! actually runs `deriveBits` enforces it, not just this config layer.
//!
//! Loaded the same way the teacher loads its settings: a typed struct,
//! `Default`, and layered sources (`adaptive_pipeline/src/infrastructure/
//! config.rs`'s design notes on "Environment-Based Configuration" and
//! "From Multiple Sources") - here built on the `config` crate's
//! `ConfigBuilder` rather than a hand-rolled TOML-only reader, since a
//! config-crate environment source is how this dispatch core accepts
//! `WEBCRYPTO_*` overrides without a second parsing path.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Emit logs as JSON instead of the human-readable default.
    pub log_json: bool,

    /// Logging verbosity; `"debug"` or `"info"`.
    pub log_level: String,

    /// The minimum `iterations` a PBKDF2 `deriveBits`/`deriveKey` call
    /// may request; wired into `Pbkdf2Module` at registry construction
    /// time, which rejects anything lower with a `Data` error.
    pub pbkdf2_min_iterations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { log_json: false, log_level: "info".to_string(), pbkdf2_min_iterations: 100_000 }
    }
}

impl EngineConfig {
    /// Loads configuration layered, lowest to highest precedence:
    /// built-in defaults, an optional `webcrypto.toml` in the current
    /// directory, then `WEBCRYPTO_*` environment variables (e.g.
    /// `WEBCRYPTO_PBKDF2_MIN_ITERATIONS=200000`).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&EngineConfig::default())?)
            .add_source(File::with_name("webcrypto").required(false))
            .add_source(Environment::with_prefix("WEBCRYPTO").separator("_"))
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_a_conservative_pbkdf2_floor() {
        let config = EngineConfig::default();
        assert_eq!(config.pbkdf2_min_iterations, 100_000);
        assert!(!config.log_json);
    }
}
