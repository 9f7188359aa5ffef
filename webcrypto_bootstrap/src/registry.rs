// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Default Registry Wiring
//!
//! Assembles the [`AlgorithmRegistry`] every deployment of this dispatch
//! core actually uses - the composition root the domain and dispatch
//! layers stay ignorant of (spec §10's algorithm modules are
//! collaborators the registry is wired to, not things those layers
//! import directly).

use std::sync::Arc;

use webcrypto::algorithms::{AesGcmModule, HkdfModule, HmacModule, Pbkdf2Module, ShaModule};
use webcrypto_domain::registry::AlgorithmRegistry;
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;

use crate::config::EngineConfig;

/// Builds the registry with every algorithm module this workspace ships,
/// wiring `Pbkdf2Module` to `config`'s iteration floor so the configured
/// minimum is enforced by the module that actually runs `deriveBits`,
/// not just logged at startup.
pub fn default_registry(config: &EngineConfig) -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();
    registry.register(Arc::new(AesGcmModule::new()));
    registry.register(Arc::new(HmacModule::new()));
    registry.register(Arc::new(HkdfModule));
    registry.register(Arc::new(Pbkdf2Module::new(config.pbkdf2_min_iterations)));
    for hash in [HashAlgorithm::Sha1, HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
        registry.register(Arc::new(ShaModule::new(hash)));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcrypto_domain::registry::Operation;

    #[test]
    fn default_registry_resolves_every_shipped_algorithm() {
        let registry = default_registry(&EngineConfig::default());
        assert!(registry.resolve("AES-GCM", Operation::Encrypt).is_ok());
        assert!(registry.resolve("HMAC", Operation::Sign).is_ok());
        assert!(registry.resolve("SHA-256", Operation::Digest).is_ok());
        assert!(registry.resolve("HKDF", Operation::DeriveBits).is_ok());
        assert!(registry.resolve("PBKDF2", Operation::DeriveBits).is_ok());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use webcrypto_domain::registry::Operation;

    proptest! {
        /// Whatever iteration floor a deployment configures, `PBKDF2`
        /// stays registered against `DeriveBits` - the floor changes what
        /// `derive_bits` accepts, never whether the module resolves.
        #[test]
        fn default_registry_always_resolves_pbkdf2_regardless_of_configured_floor(min_iterations in 1u32..10_000_000) {
            let config = EngineConfig { pbkdf2_min_iterations: min_iterations, ..EngineConfig::default() };
            let registry = default_registry(&config);
            prop_assert!(registry.resolve("PBKDF2", Operation::DeriveBits).is_ok());
        }
    }
}
