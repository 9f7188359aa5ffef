// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end tests driving [`SubtleCrypto`] the way a caller would:
//! through the public async methods only, never the algorithm modules
//! directly.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use webcrypto::algorithms::{AesGcmModule, HkdfModule, HmacModule, Pbkdf2Module, ShaModule};
use webcrypto::SubtleCrypto;
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::{AlgorithmRegistry, GeneratedKey};
use webcrypto_domain::value_objects::algorithm_identifier::AlgorithmIdentifier;
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;

fn full_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();
    registry.register(Arc::new(AesGcmModule::new()));
    registry.register(Arc::new(HmacModule::new()));
    registry.register(Arc::new(HkdfModule));
    registry.register(Arc::new(Pbkdf2Module::default()));
    for hash in [HashAlgorithm::Sha1, HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
        registry.register(Arc::new(ShaModule::new(hash)));
    }
    registry
}

fn aes_gcm_descriptor(iv: &[u8]) -> AlgorithmIdentifier {
    AlgorithmIdentifier::WithParams {
        name: "AES-GCM".to_string(),
        params: serde_json::json!({ "name": "AES-GCM", "iv": URL_SAFE_NO_PAD.encode(iv) }),
    }
}

#[tokio::test]
async fn aes_gcm_round_trips_through_encrypt_and_decrypt() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap();
    let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
    let iv = vec![1u8; 12];

    let ciphertext = subtle.encrypt(aes_gcm_descriptor(&iv), key.clone(), b"attack at dawn".to_vec()).await.unwrap();
    let plaintext = subtle.decrypt(aes_gcm_descriptor(&iv), key, ciphertext).await.unwrap();

    assert_eq!(plaintext, b"attack at dawn");
}

#[tokio::test]
async fn encrypt_is_rejected_when_the_key_lacks_the_encrypt_usage() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["decrypt"]).unwrap();
    let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
    let iv = vec![1u8; 12];

    let err = subtle.encrypt(aes_gcm_descriptor(&iv), key, b"data".to_vec()).await.unwrap_err();
    assert!(err.is_access_control_error());
}

#[tokio::test]
async fn export_key_is_rejected_when_the_key_is_not_extractable() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap();
    let key = Key::new("AES-GCM", false, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();

    let err = subtle.export_key(KeyFormat::Raw, key).await.unwrap_err();
    assert!(err.is_access_control_error());
}

#[tokio::test]
async fn wrap_key_then_unwrap_key_recovers_the_original_key_bytes() {
    let subtle = SubtleCrypto::new(full_registry());
    let wrapping_usages = KeyUsageSet::from_tokens(["wrapKey", "unwrapKey"]).unwrap();
    let wrapping_key =
        Key::new("AES-GCM", true, wrapping_usages, KeyHandle::Secret(SecretBytes::new(vec![9u8; 32]))).unwrap();

    let payload_usages = KeyUsageSet::from_tokens(["sign", "verify"]).unwrap();
    let key_to_wrap =
        Key::new("HMAC", true, payload_usages.clone(), KeyHandle::Secret(SecretBytes::new(vec![5u8; 32]))).unwrap();

    let iv = vec![2u8; 12];
    let wrapped =
        subtle.wrap_key(KeyFormat::Raw, key_to_wrap, wrapping_key.clone(), aes_gcm_descriptor(&iv)).await.unwrap();

    let unwrapped = subtle
        .unwrap_key(
            KeyFormat::Raw,
            wrapped,
            aes_gcm_descriptor(&iv),
            wrapping_key,
            AlgorithmIdentifier::Name("HMAC".to_string()),
            true,
            payload_usages,
        )
        .await
        .unwrap();

    assert_eq!(unwrapped.handle().expose(), &[5u8; 32]);
}

#[tokio::test]
async fn derive_key_derives_an_aes_key_from_a_pbkdf2_base_key() {
    let subtle = SubtleCrypto::new(full_registry());
    let base_usages = KeyUsageSet::from_tokens(["deriveKey", "deriveBits"]).unwrap();
    let base_key =
        Key::new("PBKDF2", false, base_usages, KeyHandle::Secret(SecretBytes::new(b"correct horse battery staple".to_vec())))
            .unwrap();

    let derive_descriptor = AlgorithmIdentifier::WithParams {
        name: "PBKDF2".to_string(),
        params: serde_json::json!({
            "name": "PBKDF2",
            "hash": "SHA-256",
            "salt": URL_SAFE_NO_PAD.encode(b"some salt"),
            "iterations": 100_000,
        }),
    };
    let derived_key_algorithm =
        AlgorithmIdentifier::WithParams { name: "AES-GCM".to_string(), params: serde_json::json!({ "name": "AES-GCM", "length": 256 }) };

    let derived = subtle
        .derive_key(
            derive_descriptor,
            base_key,
            derived_key_algorithm,
            true,
            KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(derived.handle().expose().len(), 32);
    assert_eq!(derived.algorithm_name(), "AES-GCM");
}

#[tokio::test]
async fn derive_bits_rejects_an_iteration_count_below_the_configured_floor() {
    let subtle = SubtleCrypto::new(full_registry());
    let base_usages = KeyUsageSet::from_tokens(["deriveBits"]).unwrap();
    let base_key =
        Key::new("PBKDF2", false, base_usages, KeyHandle::Secret(SecretBytes::new(b"correct horse battery staple".to_vec())))
            .unwrap();

    let derive_descriptor = AlgorithmIdentifier::WithParams {
        name: "PBKDF2".to_string(),
        params: serde_json::json!({
            "name": "PBKDF2",
            "hash": "SHA-256",
            "salt": URL_SAFE_NO_PAD.encode(b"some salt"),
            "iterations": 1,
        }),
    };

    let err = subtle.derive_bits(derive_descriptor, base_key, 256).await.unwrap_err();
    assert_eq!(err.category(), "data");
}

#[tokio::test]
async fn unresolvable_algorithm_name_fails_before_any_usage_check() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["decrypt"]).unwrap();
    let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();

    let err = subtle.encrypt(AlgorithmIdentifier::Name("NOT-AN-ALGORITHM".to_string()), key, b"data".to_vec()).await.unwrap_err();
    assert_eq!(err.category(), "registry");
}

#[tokio::test]
async fn digest_is_deterministic_through_the_dispatcher() {
    let subtle = SubtleCrypto::new(full_registry());
    let first = subtle.digest(AlgorithmIdentifier::Name("SHA-256".to_string()), b"hello world".to_vec()).await.unwrap();
    let second = subtle.digest(AlgorithmIdentifier::Name("SHA-256".to_string()), b"hello world".to_vec()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 32);
}

#[tokio::test]
async fn generate_key_then_sign_and_verify_round_trips() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["sign", "verify"]).unwrap();
    let generated = subtle
        .generate_key(
            AlgorithmIdentifier::WithParams {
                name: "HMAC".to_string(),
                params: serde_json::json!({ "name": "HMAC", "hash": "SHA-256" }),
            },
            true,
            usages,
        )
        .await
        .unwrap();
    let key = match generated {
        GeneratedKey::Single(key) => key,
        GeneratedKey::Pair(_) => panic!("HMAC generateKey should never produce a key pair"),
    };

    let hmac_descriptor = AlgorithmIdentifier::WithParams {
        name: "HMAC".to_string(),
        params: serde_json::json!({ "name": "HMAC", "hash": "SHA-256" }),
    };
    let signature = subtle.sign(hmac_descriptor.clone(), key.clone(), b"payload".to_vec()).await.unwrap();
    let verified = subtle.verify(hmac_descriptor, key, signature, b"payload".to_vec()).await.unwrap();
    assert!(verified);
}

#[tokio::test]
async fn export_key_raw_then_import_key_raw_round_trips_through_jwk() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap();
    let key = Key::new("AES-GCM", true, usages.clone(), KeyHandle::Secret(SecretBytes::new(vec![4u8; 32]))).unwrap();

    let exported = subtle.export_key(KeyFormat::Jwk, key).await.unwrap();
    let jwk = match exported {
        KeyMaterial::Jwk(jwk) => jwk,
        KeyMaterial::Octets(_) => panic!("jwk export should never yield raw octets"),
    };

    let imported = subtle
        .import_key(KeyFormat::Jwk, KeyMaterial::Jwk(jwk), AlgorithmIdentifier::Name("AES-GCM".to_string()), true, usages)
        .await
        .unwrap();
    assert_eq!(imported.handle().expose(), &[4u8; 32]);
}

#[tokio::test]
async fn decrypting_with_a_tampered_ciphertext_fails_without_panicking() {
    let subtle = SubtleCrypto::new(full_registry());
    let usages = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap();
    let key = Key::new("AES-GCM", true, usages, KeyHandle::Secret(SecretBytes::new(vec![7u8; 32]))).unwrap();
    let iv = vec![3u8; 12];

    let mut ciphertext = subtle.encrypt(aes_gcm_descriptor(&iv), key.clone(), b"secret message".to_vec()).await.unwrap();
    let last = ciphertext.len() - 1;
    ciphertext[last] ^= 0xFF;

    let err = subtle.decrypt(aes_gcm_descriptor(&iv), key, ciphertext).await.unwrap_err();
    assert_eq!(err.category(), "algorithm");
}
