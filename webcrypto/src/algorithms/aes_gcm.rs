// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AES-GCM Algorithm Module
//!
//! One of the concrete algorithm modules that give the dispatch core a
//! real target to exercise end to end (spec §10). Supports 128- and
//! 256-bit keys; 192-bit AES-GCM is not registered because the `aes-gcm`
//! crate only enables it behind an extra feature this workspace doesn't
//! turn on.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::{AlgorithmModule, GeneratedKey, Operation};
use webcrypto_domain::value_objects::algorithm_params::{ParamDetail, Params};
use webcrypto_domain::value_objects::jwk::JsonWebKey;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;
use webcrypto_domain::CryptoError;

pub struct AesGcmModule {
    rng: SystemRandom,
}

impl AesGcmModule {
    pub fn new() -> Self {
        Self { rng: SystemRandom::new() }
    }
}

impl Default for AesGcmModule {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the concrete cipher for the key's byte length, rejecting any
/// length this module doesn't support (spec §4.3's "wrong key size" is an
/// `Operation`-category failure, not a validator concern - the validator
/// only checks usage/format/extractability, not key-material sizing).
enum Cipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn for_key_bytes(key_bytes: &[u8]) -> Result<Self, CryptoError> {
        match key_bytes.len() {
            16 => Ok(Cipher::Aes128(Aes128Gcm::new_from_slice(key_bytes).map_err(cipher_init_error)?)),
            32 => Ok(Cipher::Aes256(Aes256Gcm::new_from_slice(key_bytes).map_err(cipher_init_error)?)),
            other => Err(CryptoError::operation(format!("unsupported AES-GCM key length: {} bytes", other))),
        }
    }

    fn encrypt(&self, nonce: &[u8], payload: Payload) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Cipher::Aes128(c) => c.encrypt(Nonce::from_slice(nonce), payload),
            Cipher::Aes256(c) => c.encrypt(Nonce::from_slice(nonce), payload),
        }
    }

    fn decrypt(&self, nonce: &[u8], payload: Payload) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Cipher::Aes128(c) => c.decrypt(Nonce::from_slice(nonce), payload),
            Cipher::Aes256(c) => c.decrypt(Nonce::from_slice(nonce), payload),
        }
    }
}

fn cipher_init_error<E: std::fmt::Display>(e: E) -> CryptoError {
    CryptoError::operation(format!("failed to initialize AES-GCM cipher: {e}"))
}

fn aes_gcm_detail(params: &Params) -> Result<(&[u8], &[u8], u8), CryptoError> {
    match &params.detail {
        ParamDetail::AesGcm { iv, additional_data, tag_length } => Ok((iv, additional_data, *tag_length)),
        other => Err(CryptoError::operation(format!("AES-GCM module received mismatched parameters: {other:?}"))),
    }
}

impl AlgorithmModule for AesGcmModule {
    fn name(&self) -> &'static str {
        "AES-GCM"
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(
            operation,
            Operation::Encrypt | Operation::Decrypt | Operation::GenerateKey | Operation::ImportKey | Operation::ExportKey
        )
    }

    fn encrypt(&self, key: &Key, params: &Params, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (iv, aad, tag_length) = aes_gcm_detail(params)?;
        if tag_length != 128 {
            return Err(CryptoError::not_supported(format!("unsupported AES-GCM tag length: {tag_length} bits")));
        }
        if iv.len() != 12 {
            return Err(CryptoError::data(format!("AES-GCM iv must be 12 bytes, got {}", iv.len())));
        }
        let cipher = Cipher::for_key_bytes(key.handle().expose())?;
        cipher
            .encrypt(iv, Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::operation("AES-GCM encryption failed"))
    }

    fn decrypt(&self, key: &Key, params: &Params, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (iv, aad, tag_length) = aes_gcm_detail(params)?;
        if tag_length != 128 {
            return Err(CryptoError::not_supported(format!("unsupported AES-GCM tag length: {tag_length} bits")));
        }
        if iv.len() != 12 {
            return Err(CryptoError::data(format!("AES-GCM iv must be 12 bytes, got {}", iv.len())));
        }
        let cipher = Cipher::for_key_bytes(key.handle().expose())?;
        cipher
            .decrypt(iv, Payload { msg: ciphertext, aad })
            .map_err(|_| CryptoError::operation("AES-GCM authentication failed"))
    }

    fn generate_key(&self, params: &Params, extractable: bool, usages: KeyUsageSet) -> Result<GeneratedKey, CryptoError> {
        let length = match &params.detail {
            ParamDetail::AesKeyGen { length } => *length,
            other => return Err(CryptoError::operation(format!("AES-GCM module received mismatched parameters: {other:?}"))),
        };
        if length != 128 && length != 256 {
            return Err(CryptoError::not_supported(format!("unsupported AES-GCM key length: {length} bits")));
        }
        let mut bytes = vec![0u8; (length / 8) as usize];
        self.rng.fill(&mut bytes).map_err(|_| CryptoError::operation("failed to generate random key material"))?;
        let key = Key::new("AES-GCM", extractable, usages, KeyHandle::Secret(SecretBytes::new(bytes)))?;
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
            other => return Err(CryptoError::not_supported(format!("AES-GCM does not support format '{other}'"))),
        };
        if bytes.len() != 16 && bytes.len() != 32 {
            return Err(CryptoError::data(format!("unsupported AES-GCM key length: {} bytes", bytes.len())));
        }
        Key::new("AES-GCM", extractable, usages, KeyHandle::Secret(SecretBytes::new(bytes)))
    }

    fn export_key(&self, format: KeyFormat, key: &Key) -> Result<KeyMaterial, CryptoError> {
        let bytes = key.handle().expose();
        match format {
            KeyFormat::Raw => Ok(KeyMaterial::Octets(bytes.to_vec())),
            KeyFormat::Jwk => {
                let alg = match bytes.len() {
                    16 => "A128GCM",
                    32 => "A256GCM",
                    _ => return Err(CryptoError::operation("key has an unsupported AES-GCM length")),
                };
                let mut jwk = JsonWebKey::oct_key(URL_SAFE_NO_PAD.encode(bytes));
                jwk.alg = Some(alg.to_string());
                jwk.ext = Some(key.extractable());
                jwk.key_ops = Some(key.usages().iter().map(|u| u.as_str().to_string()).collect());
                Ok(KeyMaterial::Jwk(jwk))
            }
            other => Err(CryptoError::not_supported(format!("AES-GCM does not support format '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcrypto_domain::value_objects::key_usage::KeyUsage;

    fn params(iv: Vec<u8>) -> Params {
        Params { name: "AES-GCM".to_string(), detail: ParamDetail::AesGcm { iv, additional_data: vec![], tag_length: 128 } }
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let module = AesGcmModule::new();
        let usages = KeyUsageSet::from_usages([KeyUsage::Encrypt, KeyUsage::Decrypt]);
        let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
        let iv = vec![1u8; 12];
        let ciphertext = module.encrypt(&key, &params(iv.clone()), b"hello world").unwrap();
        let plaintext = module.decrypt(&key, &params(iv), &ciphertext).unwrap();
        assert_eq!(plaintext, b"hello world");
    }

    #[test]
    fn decrypt_rejects_tampered_ciphertext() {
        let module = AesGcmModule::new();
        let usages = KeyUsageSet::from_usages([KeyUsage::Encrypt, KeyUsage::Decrypt]);
        let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
        let iv = vec![1u8; 12];
        let mut ciphertext = module.encrypt(&key, &params(iv.clone()), b"hello world").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        let err = module.decrypt(&key, &params(iv), &ciphertext).unwrap_err();
        assert_eq!(err.category(), "algorithm");
    }

    #[test]
    fn rejects_iv_of_the_wrong_length() {
        let module = AesGcmModule::new();
        let usages = KeyUsageSet::from_usages([KeyUsage::Encrypt]);
        let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
        let err = module.encrypt(&key, &params(vec![1u8; 8]), b"data").unwrap_err();
        assert_eq!(err.category(), "data");
    }
}
