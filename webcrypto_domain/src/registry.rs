// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Algorithm Registry
//!
//! The lookup table from (operation, algorithm name) to the module that
//! implements it (spec §4.1). Lookup is case-insensitive - `"aes-gcm"`
//! and `"AES-GCM"` resolve to the same entry - but the registry always
//! hands back the canonical name it was registered under, so later
//! stages (key metadata, JWK `alg`, log fields) never see caller casing.
//!
//! A module's capabilities are a property of the module itself
//! (`AlgorithmModule::supports`), not of the registry entry - the
//! registry only answers "is anything registered under this name", the
//! module answers "can it do *this*".

use crate::error::CryptoError;
use crate::key::{Key, KeyPair};
use crate::value_objects::key_format::{KeyFormat, KeyMaterial};
use crate::value_objects::key_usage::KeyUsageSet;
use crate::value_objects::Params;
use std::collections::HashMap;
use std::sync::Arc;

/// The eleven operations the dispatcher exposes (spec §5). `WrapKey` and
/// `UnwrapKey` are composite: the dispatcher never asks a module to
/// "support" them directly, it composes `ExportKey`+`Encrypt` or
/// `Decrypt`+`ImportKey` (spec §7) - they're listed here only so
/// `Operation` can serve as the key of error messages and log fields for
/// every dispatcher entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Digest,
    GenerateKey,
    ImportKey,
    ExportKey,
    DeriveBits,
    DeriveKey,
    WrapKey,
    UnwrapKey,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Digest => "digest",
            Operation::GenerateKey => "generateKey",
            Operation::ImportKey => "importKey",
            Operation::ExportKey => "exportKey",
            Operation::DeriveBits => "deriveBits",
            Operation::DeriveKey => "deriveKey",
            Operation::WrapKey => "wrapKey",
            Operation::UnwrapKey => "unwrapKey",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of `generateKey`: a single secret key for symmetric
/// algorithms, a key pair for asymmetric ones (spec §4.1).
#[derive(Debug, Clone)]
pub enum GeneratedKey {
    Single(Key),
    Pair(KeyPair),
}

/// An algorithm implementation registered under one or more operations.
///
/// Every method defaults to `CryptoError::NotSupported` so a concrete
/// module only overrides what it actually implements - the same
/// capability-probing shape the teacher's `StageExecutor` trait uses for
/// optional stage behaviors (`adaptive_pipeline_domain/src/repositories/
/// stage_executor.rs`). `supports` lets the dispatcher and the
/// wrapKey/unwrapKey fallback rule ask "can you do X" without attempting
/// X and pattern-matching the error.
pub trait AlgorithmModule: Send + Sync {
    /// Canonical name this module registers under, e.g. `"AES-GCM"`.
    fn name(&self) -> &'static str;

    fn supports(&self, operation: Operation) -> bool;

    fn encrypt(&self, _key: &Key, _params: &Params, _plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement encrypt", self.name())))
    }

    fn decrypt(&self, _key: &Key, _params: &Params, _ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement decrypt", self.name())))
    }

    fn sign(&self, _key: &Key, _params: &Params, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement sign", self.name())))
    }

    fn verify(&self, _key: &Key, _params: &Params, _signature: &[u8], _data: &[u8]) -> Result<bool, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement verify", self.name())))
    }

    fn digest(&self, _params: &Params, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement digest", self.name())))
    }

    fn generate_key(
        &self,
        _params: &Params,
        _extractable: bool,
        _usages: KeyUsageSet,
    ) -> Result<GeneratedKey, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement generateKey", self.name())))
    }

    fn import_key(
        &self,
        _format: KeyFormat,
        _material: &KeyMaterial,
        _params: &Params,
        _extractable: bool,
        _usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement importKey", self.name())))
    }

    fn export_key(&self, _format: KeyFormat, _key: &Key) -> Result<KeyMaterial, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement exportKey", self.name())))
    }

    fn derive_bits(&self, _base_key: &Key, _params: &Params, _length_bits: u32) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement deriveBits", self.name())))
    }

    /// A dedicated wrap primitive, distinct from `encrypt` (e.g. AES Key
    /// Wrap). None of this workspace's concrete modules override it, so
    /// the dispatcher's composite `wrapKey` always falls back to
    /// `encrypt` (spec §7) - the hook exists so a future module with a
    /// real wrap primitive doesn't require a dispatcher change.
    fn wrap_key(&self, _wrapping_key: &Key, _params: &Params, _key_to_wrap: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement wrapKey", self.name())))
    }

    /// The decrypt-side counterpart of `wrap_key`.
    fn unwrap_key(&self, _unwrapping_key: &Key, _params: &Params, _wrapped: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::not_supported(format!("{} does not implement unwrapKey", self.name())))
    }
}

struct RegistryEntry {
    canonical_name: String,
    module: Arc<dyn AlgorithmModule>,
}

/// The name -> module lookup table. Holds `Arc`s so the dispatcher can
/// clone a module reference into a `spawn_blocking` closure without
/// borrowing the registry across an await point.
#[derive(Default)]
pub struct AlgorithmRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under its canonical name. Registering two
    /// modules under names that only differ by case is a programming
    /// error (the second silently shadows the first), not a runtime
    /// condition this API reports.
    pub fn register(&mut self, module: Arc<dyn AlgorithmModule>) {
        let canonical_name = module.name().to_string();
        let key = canonical_name.to_ascii_uppercase();
        self.entries.insert(key, RegistryEntry { canonical_name, module });
    }

    /// Case-insensitive lookup, returning the canonical name and module.
    pub fn lookup(&self, name: &str) -> Result<(String, Arc<dyn AlgorithmModule>), CryptoError> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(|entry| (entry.canonical_name.clone(), entry.module.clone()))
            .ok_or_else(|| CryptoError::not_supported(format!("unrecognized algorithm '{name}'")))
    }

    /// Looks up `name` and confirms the resolved module supports
    /// `operation`, in one call - the shape every dispatcher entry point
    /// needs before it can normalize parameters.
    pub fn resolve(&self, name: &str, operation: Operation) -> Result<(String, Arc<dyn AlgorithmModule>), CryptoError> {
        let (canonical_name, module) = self.lookup(name)?;
        if !module.supports(operation) {
            return Err(CryptoError::not_supported(format!(
                "algorithm '{canonical_name}' does not support {operation}"
            )));
        }
        Ok((canonical_name, module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubModule;
    impl AlgorithmModule for StubModule {
        fn name(&self) -> &'static str {
            "Stub-Algo"
        }
        fn supports(&self, operation: Operation) -> bool {
            matches!(operation, Operation::Digest)
        }
    }

    #[test]
    fn lookup_is_case_insensitive_and_returns_canonical_name() {
        let mut registry = AlgorithmRegistry::new();
        registry.register(Arc::new(StubModule));
        let (canonical_name, _) = registry.lookup("stub-algo").unwrap();
        assert_eq!(canonical_name, "Stub-Algo");
    }

    #[test]
    fn resolve_rejects_unsupported_operation() {
        let mut registry = AlgorithmRegistry::new();
        registry.register(Arc::new(StubModule));
        let err = registry.resolve("Stub-Algo", Operation::Encrypt).unwrap_err();
        assert_eq!(err.category(), "registry");
    }

    #[test]
    fn lookup_rejects_unregistered_name() {
        let registry = AlgorithmRegistry::new();
        let err = registry.lookup("AES-GCM").unwrap_err();
        assert_eq!(err.category(), "registry");
    }
}
