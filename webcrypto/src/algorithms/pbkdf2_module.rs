// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PBKDF2 Algorithm Module
//!
//! `deriveBits` only, same split as [`super::hkdf_module::HkdfModule`]:
//! `deriveKey` is a dispatcher-level composition, not a module method.
//!
//! Carries the deployment's iteration floor itself rather than leaving it
//! as a bootstrap-layer side channel: `Pbkdf2Module::new` takes the
//! configured minimum and `derive_bits` rejects any call asking for fewer,
//! the same way a caller-supplied IV length or IV/tag shape is rejected as
//! a `Data` error elsewhere in this module's siblings.

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::{AlgorithmModule, Operation};
use webcrypto_domain::value_objects::algorithm_params::{ParamDetail, Params};
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;
use webcrypto_domain::CryptoError;

/// Default floor applied when a module is built with [`Pbkdf2Module::default`]
/// rather than wired explicitly from an `EngineConfig` - matches
/// `EngineConfig::default().pbkdf2_min_iterations`.
pub const DEFAULT_MIN_ITERATIONS: u32 = 100_000;

pub struct Pbkdf2Module {
    min_iterations: u32,
}

impl Pbkdf2Module {
    /// Builds a module that rejects any `deriveBits` call asking for fewer
    /// than `min_iterations` rounds.
    pub fn new(min_iterations: u32) -> Self {
        Self { min_iterations }
    }
}

impl Default for Pbkdf2Module {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ITERATIONS)
    }
}

impl AlgorithmModule for Pbkdf2Module {
    fn name(&self) -> &'static str {
        "PBKDF2"
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::DeriveBits | Operation::ImportKey)
    }

    fn derive_bits(&self, base_key: &Key, params: &Params, length_bits: u32) -> Result<Vec<u8>, CryptoError> {
        let (hash, salt, iterations) = match &params.detail {
            ParamDetail::Pbkdf2Derive { hash, salt, iterations } => (*hash, salt, *iterations),
            other => return Err(CryptoError::operation(format!("PBKDF2 module received mismatched parameters: {other:?}"))),
        };
        if iterations < self.min_iterations {
            return Err(CryptoError::data(format!(
                "PBKDF2 iterations ({iterations}) is below the configured minimum of {}",
                self.min_iterations
            )));
        }
        if length_bits % 8 != 0 {
            return Err(CryptoError::data("PBKDF2 output length must be a whole number of bytes"));
        }
        let password = base_key.handle().expose();
        let mut out = vec![0u8; (length_bits / 8) as usize];
        match hash {
            HashAlgorithm::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut out),
            HashAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out),
            HashAlgorithm::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, iterations, &mut out),
            HashAlgorithm::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut out),
        }
        Ok(out)
    }

    fn import_key(
        &self,
        format: KeyFormat,
        material: &KeyMaterial,
        _params: &Params,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        if format != KeyFormat::Raw {
            return Err(CryptoError::not_supported(format!("PBKDF2 does not support format '{format}'")));
        }
        if extractable {
            return Err(CryptoError::not_supported("PBKDF2 input keying material may not be marked extractable"));
        }
        let bytes = material.as_octets()?.to_vec();
        Key::new("PBKDF2", false, usages, KeyHandle::Secret(SecretBytes::new(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcrypto_domain::value_objects::key_usage::KeyUsage;

    #[test]
    fn derive_bits_is_deterministic_for_the_same_inputs() {
        let module = Pbkdf2Module::new(1000);
        let usages = KeyUsageSet::from_usages([KeyUsage::DeriveBits]);
        let base = Key::new("PBKDF2", false, usages, KeyHandle::Secret(SecretBytes::new(b"password".to_vec()))).unwrap();
        let params = Params {
            name: "PBKDF2".to_string(),
            detail: ParamDetail::Pbkdf2Derive { hash: HashAlgorithm::Sha256, salt: b"salt".to_vec(), iterations: 1000 },
        };
        let first = module.derive_bits(&base, &params, 256).unwrap();
        let second = module.derive_bits(&base, &params, 256).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn derive_bits_rejects_an_iteration_count_below_the_configured_floor() {
        let module = Pbkdf2Module::new(100_000);
        let usages = KeyUsageSet::from_usages([KeyUsage::DeriveBits]);
        let base = Key::new("PBKDF2", false, usages, KeyHandle::Secret(SecretBytes::new(b"password".to_vec()))).unwrap();
        let params = Params {
            name: "PBKDF2".to_string(),
            detail: ParamDetail::Pbkdf2Derive { hash: HashAlgorithm::Sha256, salt: b"salt".to_vec(), iterations: 1 },
        };
        let err = module.derive_bits(&base, &params, 256).unwrap_err();
        assert!(matches!(err, CryptoError::Data(_)));
    }
}
