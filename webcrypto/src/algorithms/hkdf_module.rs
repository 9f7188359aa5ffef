// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HKDF Algorithm Module
//!
//! `deriveBits` only - `deriveKey` is composed by the dispatcher from
//! `deriveBits` plus the target algorithm's `importKey` (spec §4.4),
//! never implemented redundantly in each KDF module.

use hkdf::Hkdf;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::{AlgorithmModule, Operation};
use webcrypto_domain::value_objects::algorithm_params::{ParamDetail, Params};
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;
use webcrypto_domain::CryptoError;

#[derive(Default)]
pub struct HkdfModule;

impl AlgorithmModule for HkdfModule {
    fn name(&self) -> &'static str {
        "HKDF"
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::DeriveBits | Operation::ImportKey)
    }

    fn derive_bits(&self, base_key: &Key, params: &Params, length_bits: u32) -> Result<Vec<u8>, CryptoError> {
        let (hash, salt, info) = match &params.detail {
            ParamDetail::HkdfDerive { hash, salt, info } => (*hash, salt, info),
            other => return Err(CryptoError::operation(format!("HKDF module received mismatched parameters: {other:?}"))),
        };
        if length_bits % 8 != 0 {
            return Err(CryptoError::data("HKDF output length must be a whole number of bytes"));
        }
        let ikm = base_key.handle().expose();
        let out_len = (length_bits / 8) as usize;
        let mut okm = vec![0u8; out_len];
        match hash {
            HashAlgorithm::Sha1 => Hkdf::<Sha1>::new(Some(salt), ikm)
                .expand(info, &mut okm)
                .map_err(|_| CryptoError::operation("HKDF output length is too large for the selected hash"))?,
            HashAlgorithm::Sha256 => Hkdf::<Sha256>::new(Some(salt), ikm)
                .expand(info, &mut okm)
                .map_err(|_| CryptoError::operation("HKDF output length is too large for the selected hash"))?,
            HashAlgorithm::Sha384 => Hkdf::<Sha384>::new(Some(salt), ikm)
                .expand(info, &mut okm)
                .map_err(|_| CryptoError::operation("HKDF output length is too large for the selected hash"))?,
            HashAlgorithm::Sha512 => Hkdf::<Sha512>::new(Some(salt), ikm)
                .expand(info, &mut okm)
                .map_err(|_| CryptoError::operation("HKDF output length is too large for the selected hash"))?,
        }
        Ok(okm)
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
            return Err(CryptoError::not_supported(format!("HKDF does not support format '{format}'")));
        }
        if extractable {
            return Err(CryptoError::not_supported("HKDF input keying material may not be marked extractable"));
        }
        let bytes = material.as_octets()?.to_vec();
        Key::new("HKDF", false, usages, KeyHandle::Secret(SecretBytes::new(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcrypto_domain::value_objects::key_usage::KeyUsage;

    #[test]
    fn derive_bits_is_deterministic_for_the_same_inputs() {
        let module = HkdfModule;
        let usages = KeyUsageSet::from_usages([KeyUsage::DeriveBits]);
        let base = Key::new("HKDF", false, usages, KeyHandle::Secret(SecretBytes::new(vec![9u8; 32]))).unwrap();
        let params = Params {
            name: "HKDF".to_string(),
            detail: ParamDetail::HkdfDerive { hash: HashAlgorithm::Sha256, salt: vec![1, 2, 3], info: vec![4, 5] },
        };
        let first = module.derive_bits(&base, &params, 256).unwrap();
        let second = module.derive_bits(&base, &params, 256).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }
}
