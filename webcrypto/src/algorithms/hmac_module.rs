// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HMAC Algorithm Module
//!
//! `sign`/`verify` over SHA-1/256/384/512. `verify` never returns an
//! `Operation` error for a mismatched MAC - only a malformed key triggers
//! one - matching the error-taxonomy note in
//! `webcrypto_domain::error` that `verify` resolves `Ok(false)` rather
//! than erroring on a failed check.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::{AlgorithmModule, GeneratedKey, Operation};
use webcrypto_domain::value_objects::algorithm_params::{ParamDetail, Params};
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;
use webcrypto_domain::value_objects::jwk::JsonWebKey;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;
use webcrypto_domain::CryptoError;

pub struct HmacModule {
    rng: SystemRandom,
}

impl HmacModule {
    pub fn new() -> Self {
        Self { rng: SystemRandom::new() }
    }
}

impl Default for HmacModule {
    fn default() -> Self {
        Self::new()
    }
}

fn mac_bytes(hash: HashAlgorithm, key_bytes: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let invalid_key = |e: hmac::digest::InvalidLength| CryptoError::operation(format!("invalid HMAC key: {e}"));
    Ok(match hash {
        HashAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    })
}

/// Verifies `signature` against a freshly-keyed `Mac` over `data`,
/// constant-time via `hmac::Mac::verify_slice` - the same call the
/// corpus uses directly (`mikeleppane-chamber`'s vault crypto module).
/// A malformed key is still an `Operation` error; a mismatched tag is
/// `Ok(false)`, never an error.
fn verify_mac(hash: HashAlgorithm, key_bytes: &[u8], data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
    let invalid_key = |e: hmac::digest::InvalidLength| CryptoError::operation(format!("invalid HMAC key: {e}"));
    Ok(match hash {
        HashAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.verify_slice(signature).is_ok()
        }
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.verify_slice(signature).is_ok()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.verify_slice(signature).is_ok()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key_bytes).map_err(invalid_key)?;
            mac.update(data);
            mac.verify_slice(signature).is_ok()
        }
    })
}

impl AlgorithmModule for HmacModule {
    fn name(&self) -> &'static str {
        "HMAC"
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(
            operation,
            Operation::Sign | Operation::Verify | Operation::GenerateKey | Operation::ImportKey | Operation::ExportKey
        )
    }

    fn sign(&self, key: &Key, params: &Params, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let hash = params.detail.hash().ok_or_else(|| CryptoError::operation("HMAC module received mismatched parameters"))?;
        mac_bytes(hash, key.handle().expose(), data)
    }

    fn verify(&self, key: &Key, params: &Params, signature: &[u8], data: &[u8]) -> Result<bool, CryptoError> {
        let hash = params.detail.hash().ok_or_else(|| CryptoError::operation("HMAC module received mismatched parameters"))?;
        verify_mac(hash, key.handle().expose(), data, signature)
    }

    fn generate_key(&self, params: &Params, extractable: bool, usages: KeyUsageSet) -> Result<GeneratedKey, CryptoError> {
        let (hash, length) = match &params.detail {
            ParamDetail::HmacKeyGen { hash, length } => (*hash, *length),
            other => return Err(CryptoError::operation(format!("HMAC module received mismatched parameters: {other:?}"))),
        };
        let byte_len = length.map(|bits| (bits / 8) as usize).unwrap_or_else(|| hash.output_len());
        let mut bytes = vec![0u8; byte_len];
        self.rng.fill(&mut bytes).map_err(|_| CryptoError::operation("failed to generate random key material"))?;
        let key = Key::new("HMAC", extractable, usages, KeyHandle::Secret(SecretBytes::new(bytes)))?;
        Ok(GeneratedKey::Single(key))
    }

    fn import_key(
        &self,
        format: KeyFormat,
        material: &KeyMaterial,
        _params: &Params,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        let bytes = match format {
            KeyFormat::Raw => material.as_octets()?.to_vec(),
            KeyFormat::Jwk => {
                let jwk = material.as_jwk()?;
                let k = jwk.k.as_deref().ok_or_else(|| CryptoError::data("JWK is missing required member 'k'"))?;
                URL_SAFE_NO_PAD.decode(k).map_err(|e| CryptoError::data(format!("JWK 'k' is not valid base64url: {e}")))?
            }
            other => return Err(CryptoError::not_supported(format!("HMAC does not support format '{other}'"))),
        };
        Key::new("HMAC", extractable, usages, KeyHandle::Secret(SecretBytes::new(bytes)))
    }

    fn export_key(&self, format: KeyFormat, key: &Key) -> Result<KeyMaterial, CryptoError> {
        let bytes = key.handle().expose();
        match format {
            KeyFormat::Raw => Ok(KeyMaterial::Octets(bytes.to_vec())),
            KeyFormat::Jwk => {
                let mut jwk = JsonWebKey::oct_key(URL_SAFE_NO_PAD.encode(bytes));
                jwk.alg = Some("HS256".to_string());
                jwk.ext = Some(key.extractable());
                jwk.key_ops = Some(key.usages().iter().map(|u| u.as_str().to_string()).collect());
                Ok(KeyMaterial::Jwk(jwk))
            }
            other => Err(CryptoError::not_supported(format!("HMAC does not support format '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcrypto_domain::value_objects::key_usage::KeyUsage;

    fn params() -> Params {
        Params { name: "HMAC".to_string(), detail: ParamDetail::Hmac { hash: HashAlgorithm::Sha256 } }
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let module = HmacModule::new();
        let usages = KeyUsageSet::from_usages([KeyUsage::Sign, KeyUsage::Verify]);
        let key = Key::new("HMAC", true, usages, KeyHandle::Secret(SecretBytes::new(vec![3u8; 32]))).unwrap();
        let signature = module.sign(&key, &params(), b"message").unwrap();
        assert!(module.verify(&key, &params(), &signature, b"message").unwrap());
    }

    #[test]
    fn verify_returns_false_rather_than_erroring_on_mismatch() {
        let module = HmacModule::new();
        let usages = KeyUsageSet::from_usages([KeyUsage::Sign, KeyUsage::Verify]);
        let key = Key::new("HMAC", true, usages, KeyHandle::Secret(SecretBytes::new(vec![3u8; 32]))).unwrap();
        let signature = module.sign(&key, &params(), b"message").unwrap();
        let ok = module.verify(&key, &params(), &signature, b"different message").unwrap();
        assert!(!ok);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use webcrypto_domain::value_objects::key_usage::KeyUsage;

    fn params() -> Params {
        Params { name: "HMAC".to_string(), detail: ParamDetail::Hmac { hash: HashAlgorithm::Sha256 } }
    }

    proptest! {
        /// Any key/message pair signs and verifies; any single-byte flip in
        /// the message resolves `Ok(false)`, never an error.
        #[test]
        fn sign_then_verify_round_trips_for_arbitrary_inputs(
            key_bytes in proptest::collection::vec(any::<u8>(), 16..64),
            message in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let module = HmacModule::new();
            let usages = KeyUsageSet::from_usages([KeyUsage::Sign, KeyUsage::Verify]);
            let key = Key::new("HMAC", true, usages, KeyHandle::Secret(SecretBytes::new(key_bytes))).unwrap();
            let signature = module.sign(&key, &params(), &message).unwrap();
            prop_assert!(module.verify(&key, &params(), &signature, &message).unwrap());

            let mut tampered = message.clone();
            if tampered.is_empty() {
                tampered.push(0);
            } else {
                tampered[0] ^= 0xff;
            }
            prop_assert!(!module.verify(&key, &params(), &signature, &tampered).unwrap());
        }
    }
}
