// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Normalizer
//!
//! `normalize()` turns a caller-supplied algorithm descriptor into a
//! [`Resolved`] algorithm: the canonical name, a validated [`Params`],
//! and the module reference that will actually carry out the operation
//! (spec §4.2). It is a pure function over its three arguments - no I/O,
//! no randomness, same descriptor in means same `Resolved` out (modulo
//! the registry's own contents).
//!
//! The five steps from spec §4.2 map onto this module as follows:
//! 1. string-or-object rewrite - `AlgorithmIdentifier::from` and the
//!    caller, not this module.
//! 2. registry lookup - [`AlgorithmRegistry::resolve`].
//! 3. required-member validation, by algorithm family - `parse_param_detail`.
//! 4. default application (tag length, info, additional data) - inline
//!    in each family parser.
//! 5. recursive normalization of nested `hash` members - `extract_hash`,
//!    which treats the hash vocabulary as closed (no registry round
//!    trip needed; see `value_objects::hash_algorithm`).

use crate::error::CryptoError;
use crate::registry::{AlgorithmModule, AlgorithmRegistry, Operation};
use crate::value_objects::algorithm_identifier::AlgorithmIdentifier;
use crate::value_objects::algorithm_params::{ParamDetail, Params};
use crate::value_objects::hash_algorithm::HashAlgorithm;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A fully normalized algorithm: canonical name, validated parameters,
/// and the module that will execute the operation.
#[derive(Clone)]
pub struct Resolved {
    pub params: Params,
    pub module: Arc<dyn AlgorithmModule>,
}

impl Resolved {
    pub fn canonical_name(&self) -> &str {
        &self.params.name
    }
}

/// Normalizes `descriptor` for `operation` against `registry`.
pub fn normalize(
    operation: Operation,
    descriptor: &AlgorithmIdentifier,
    registry: &AlgorithmRegistry,
) -> Result<Resolved, CryptoError> {
    let (canonical_name, module) = registry.resolve(descriptor.name(), operation)?;
    let params_json = descriptor.params();
    let detail = parse_param_detail(&canonical_name, operation, &params_json)?;
    Ok(Resolved { params: Params { name: canonical_name, detail }, module })
}

fn parse_param_detail(canonical_name: &str, operation: Operation, json: &JsonValue) -> Result<ParamDetail, CryptoError> {
    match canonical_name.to_ascii_uppercase().as_str() {
        "AES-GCM" => parse_aes_gcm(operation, json),
        "HMAC" => parse_hmac(operation, json),
        "SHA-1" | "SHA-256" | "SHA-384" | "SHA-512" => Ok(ParamDetail::Digest { hash: canonical_name.parse()? }),
        "HKDF" => parse_hkdf(operation, json),
        "PBKDF2" => parse_pbkdf2(operation, json),
        other => Err(CryptoError::not_supported(format!("no parameter parser registered for '{other}'"))),
    }
}

fn parse_aes_gcm(operation: Operation, json: &JsonValue) -> Result<ParamDetail, CryptoError> {
    match operation {
        Operation::Encrypt | Operation::Decrypt => {
            let iv = require_base64(json, "iv")?;
            let additional_data = optional_base64(json, "additionalData", Vec::new())?;
            let tag_length = optional_u8(json, "tagLength", 128)?;
            Ok(ParamDetail::AesGcm { iv, additional_data, tag_length })
        }
        Operation::GenerateKey => Ok(ParamDetail::AesKeyGen { length: require_u16(json, "length")? }),
        Operation::ImportKey | Operation::ExportKey => Ok(ParamDetail::AesImport),
        other => Err(CryptoError::not_supported(format!("AES-GCM does not support {other}"))),
    }
}

fn parse_hmac(operation: Operation, json: &JsonValue) -> Result<ParamDetail, CryptoError> {
    match operation {
        Operation::Sign | Operation::Verify => Ok(ParamDetail::Hmac { hash: extract_hash(json)? }),
        Operation::GenerateKey => {
            Ok(ParamDetail::HmacKeyGen { hash: extract_hash(json)?, length: optional_u32_opt(json, "length")? })
        }
        Operation::ImportKey | Operation::ExportKey => {
            Ok(ParamDetail::HmacImport { hash: extract_hash(json)?, length: optional_u32_opt(json, "length")? })
        }
        other => Err(CryptoError::not_supported(format!("HMAC does not support {other}"))),
    }
}

fn parse_hkdf(operation: Operation, json: &JsonValue) -> Result<ParamDetail, CryptoError> {
    match operation {
        Operation::DeriveBits | Operation::DeriveKey => Ok(ParamDetail::HkdfDerive {
            hash: extract_hash(json)?,
            salt: require_base64(json, "salt")?,
            info: optional_base64(json, "info", Vec::new())?,
        }),
        Operation::ImportKey => Ok(ParamDetail::HkdfImport),
        other => Err(CryptoError::not_supported(format!("HKDF does not support {other}"))),
    }
}

fn parse_pbkdf2(operation: Operation, json: &JsonValue) -> Result<ParamDetail, CryptoError> {
    match operation {
        Operation::DeriveBits | Operation::DeriveKey => {
            let iterations = require_u32(json, "iterations")?;
            if iterations == 0 {
                return Err(CryptoError::data("'iterations' must be at least 1"));
            }
            Ok(ParamDetail::Pbkdf2Derive { hash: extract_hash(json)?, salt: require_base64(json, "salt")?, iterations })
        }
        Operation::ImportKey => Ok(ParamDetail::Pbkdf2Import),
        other => Err(CryptoError::not_supported(format!("PBKDF2 does not support {other}"))),
    }
}

/// Reads the required `hash` member, recursively normalizing it against
/// the closed hash vocabulary (spec §4.2 step 5). Accepts either a bare
/// name or a `{ name }` object, same as any other algorithm descriptor.
fn extract_hash(json: &JsonValue) -> Result<HashAlgorithm, CryptoError> {
    let member = json
        .get("hash")
        .ok_or_else(|| CryptoError::syntax("missing required member 'hash'"))?;
    let name = match member {
        JsonValue::String(s) => s.as_str(),
        JsonValue::Object(_) => member
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| CryptoError::syntax("'hash' object is missing required member 'name'"))?,
        _ => return Err(CryptoError::syntax("'hash' must be a string or an object with a 'name' member")),
    };
    name.parse()
}

fn require_str<'a>(json: &'a JsonValue, key: &str) -> Result<&'a str, CryptoError> {
    json.get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| CryptoError::syntax(format!("missing required member '{key}'")))
}

fn require_base64(json: &JsonValue, key: &str) -> Result<Vec<u8>, CryptoError> {
    let encoded = require_str(json, key)?;
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| CryptoError::data(format!("member '{key}' is not valid base64url: {e}")))
}

fn optional_base64(json: &JsonValue, key: &str, default: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
    match json.get(key) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(JsonValue::String(s)) => {
            URL_SAFE_NO_PAD.decode(s).map_err(|e| CryptoError::data(format!("member '{key}' is not valid base64url: {e}")))
        }
        Some(_) => Err(CryptoError::syntax(format!("member '{key}' must be a base64url string"))),
    }
}

fn require_u16(json: &JsonValue, key: &str) -> Result<u16, CryptoError> {
    json.get(key)
        .and_then(JsonValue::as_u64)
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| CryptoError::syntax(format!("missing or out-of-range required member '{key}'")))
}

fn require_u32(json: &JsonValue, key: &str) -> Result<u32, CryptoError> {
    json.get(key)
        .and_then(JsonValue::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| CryptoError::syntax(format!("missing or out-of-range required member '{key}'")))
}

fn optional_u8(json: &JsonValue, key: &str, default: u8) -> Result<u8, CryptoError> {
    match json.get(key) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| CryptoError::data(format!("member '{key}' is out of range"))),
    }
}

fn optional_u32_opt(json: &JsonValue, key: &str) -> Result<Option<u32>, CryptoError> {
    match json.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| CryptoError::data(format!("member '{key}' is out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GeneratedKey;
    use crate::key::Key;
    use crate::value_objects::key_format::{KeyFormat, KeyMaterial};
    use crate::value_objects::key_usage::KeyUsageSet;
    use serde_json::json;

    struct StubAesGcm;
    impl AlgorithmModule for StubAesGcm {
        fn name(&self) -> &'static str {
            "AES-GCM"
        }
        fn supports(&self, op: Operation) -> bool {
            matches!(op, Operation::Encrypt | Operation::Decrypt | Operation::GenerateKey)
        }
        fn generate_key(&self, _p: &Params, _e: bool, _u: KeyUsageSet) -> Result<GeneratedKey, CryptoError> {
            unreachable!("not exercised by these tests")
        }
        fn import_key(
            &self,
            _f: KeyFormat,
            _m: &KeyMaterial,
            _p: &Params,
            _e: bool,
            _u: KeyUsageSet,
        ) -> Result<Key, CryptoError> {
            unreachable!("not exercised by these tests")
        }
    }

    fn registry() -> AlgorithmRegistry {
        let mut r = AlgorithmRegistry::new();
        r.register(Arc::new(StubAesGcm));
        r
    }

    #[test]
    fn normalizes_bare_name_descriptor_case_insensitively() {
        let registry = registry();
        let descriptor = AlgorithmIdentifier::WithParams {
            name: "aes-gcm".to_string(),
            params: json!({ "iv": URL_SAFE_NO_PAD.encode([0u8; 12]) }),
        };
        let resolved = normalize(Operation::Encrypt, &descriptor, &registry).unwrap();
        assert_eq!(resolved.canonical_name(), "AES-GCM");
        match resolved.params.detail {
            ParamDetail::AesGcm { tag_length, .. } => assert_eq!(tag_length, 128),
            _ => panic!("expected AesGcm detail"),
        }
    }

    #[test]
    fn rejects_descriptor_missing_required_iv() {
        let registry = registry();
        let descriptor = AlgorithmIdentifier::WithParams { name: "AES-GCM".to_string(), params: json!({}) };
        let err = normalize(Operation::Encrypt, &descriptor, &registry).unwrap_err();
        assert_eq!(err.category(), "syntax");
    }

    #[test]
    fn rejects_unsupported_operation_before_parsing_params() {
        let registry = registry();
        let descriptor = AlgorithmIdentifier::WithParams { name: "AES-GCM".to_string(), params: json!({}) };
        let err = normalize(Operation::Sign, &descriptor, &registry).unwrap_err();
        assert_eq!(err.category(), "registry");
    }
}
