// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Operation Dispatcher
//!
//! `SubtleCrypto` is the single entry point an application talks to (spec
//! §5): one async method per operation, normalizing and validating
//! before handing off to the resolved algorithm module.
//!
//! Every algorithm module is synchronous and CPU-bound; this dispatcher
//! is the async adapter that runs each one on the blocking thread pool
//! rather than the async runtime's worker threads, the same split the
//! teacher's `AsyncCompressionAdapter` draws between a sync domain
//! service and its async infrastructure wrapper
//! (`adaptive_pipeline/src/infrastructure/adapters/async_compression.rs`):
//! domain/algorithm code stays synchronous and portable, only the
//! execution model is async.

use std::sync::Arc;

use tokio::task::JoinError;
use tracing::instrument;

use webcrypto_domain::key::Key;
use webcrypto_domain::normalize::normalize;
use webcrypto_domain::registry::{AlgorithmRegistry, GeneratedKey, Operation};
use webcrypto_domain::validate::{
    require_algorithm_match, require_extractable, require_format_shape, require_nonempty_usages, require_usage,
};
use webcrypto_domain::value_objects::algorithm_identifier::AlgorithmIdentifier;
use webcrypto_domain::value_objects::algorithm_params::ParamDetail;
use webcrypto_domain::value_objects::jwk::JsonWebKey;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsage;
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;
use webcrypto_domain::CryptoError;

fn join_error(e: JoinError) -> CryptoError {
    CryptoError::operation(format!("algorithm module task panicked: {e}"))
}

/// The dispatch core's single public entry point.
///
/// Cloning is cheap: the registry is held behind an `Arc`, so a
/// `SubtleCrypto` can be shared across tasks/connections the way the
/// teacher shares its adapters.
#[derive(Clone)]
pub struct SubtleCrypto {
    registry: Arc<AlgorithmRegistry>,
}

impl SubtleCrypto {
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    #[instrument(skip(self, key, data, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn encrypt(&self, algorithm: AlgorithmIdentifier, key: Key, data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        let resolved = normalize(Operation::Encrypt, &algorithm, &self.registry)?;
        require_usage(&key, KeyUsage::Encrypt)?;
        require_algorithm_match(&key, resolved.canonical_name())?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.encrypt(&key, &params, &data)).await.map_err(join_error)?
    }

    #[instrument(skip(self, key, data, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn decrypt(&self, algorithm: AlgorithmIdentifier, key: Key, data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        let resolved = normalize(Operation::Decrypt, &algorithm, &self.registry)?;
        require_usage(&key, KeyUsage::Decrypt)?;
        require_algorithm_match(&key, resolved.canonical_name())?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.decrypt(&key, &params, &data)).await.map_err(join_error)?
    }

    #[instrument(skip(self, key, data, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn sign(&self, algorithm: AlgorithmIdentifier, key: Key, data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        let resolved = normalize(Operation::Sign, &algorithm, &self.registry)?;
        require_usage(&key, KeyUsage::Sign)?;
        require_algorithm_match(&key, resolved.canonical_name())?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.sign(&key, &params, &data)).await.map_err(join_error)?
    }

    /// Never resolves `Err` for a mismatched signature - only for a
    /// malformed key or descriptor (spec §9, `webcrypto_domain::error`'s
    /// module-level note on `verify`).
    #[instrument(skip(self, key, signature, data, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn verify(
        &self,
        algorithm: AlgorithmIdentifier,
        key: Key,
        signature: Vec<u8>,
        data: Vec<u8>,
    ) -> Result<bool, CryptoError> {
        let resolved = normalize(Operation::Verify, &algorithm, &self.registry)?;
        require_usage(&key, KeyUsage::Verify)?;
        require_algorithm_match(&key, resolved.canonical_name())?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.verify(&key, &params, &signature, &data)).await.map_err(join_error)?
    }

    #[instrument(skip(self, data, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn digest(&self, algorithm: AlgorithmIdentifier, data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        let resolved = normalize(Operation::Digest, &algorithm, &self.registry)?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.digest(&params, &data)).await.map_err(join_error)?
    }

    #[instrument(skip(self, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn generate_key(
        &self,
        algorithm: AlgorithmIdentifier,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<GeneratedKey, CryptoError> {
        require_nonempty_usages(&usages)?;
        let resolved = normalize(Operation::GenerateKey, &algorithm, &self.registry)?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.generate_key(&params, extractable, usages)).await.map_err(join_error)?
    }

    #[instrument(skip(self, material, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn import_key(
        &self,
        format: KeyFormat,
        material: KeyMaterial,
        algorithm: AlgorithmIdentifier,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        require_format_shape(format, &material)?;
        require_nonempty_usages(&usages)?;
        let resolved = normalize(Operation::ImportKey, &algorithm, &self.registry)?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.import_key(format, &material, &params, extractable, usages))
            .await
            .map_err(join_error)?
    }

    /// `exportKey` takes no algorithm descriptor of its own - the key
    /// already carries the algorithm name it was produced under (spec
    /// §4.1, §4.3).
    #[instrument(skip(self, key))]
    pub async fn export_key(&self, format: KeyFormat, key: Key) -> Result<KeyMaterial, CryptoError> {
        require_extractable(&key)?;
        let (_, module) = self.registry.resolve(key.algorithm_name(), Operation::ExportKey)?;
        tokio::task::spawn_blocking(move || module.export_key(format, &key)).await.map_err(join_error)?
    }

    #[instrument(skip(self, base_key, algorithm), fields(algorithm = algorithm.name()))]
    pub async fn derive_bits(
        &self,
        algorithm: AlgorithmIdentifier,
        base_key: Key,
        length_bits: u32,
    ) -> Result<Vec<u8>, CryptoError> {
        let resolved = normalize(Operation::DeriveBits, &algorithm, &self.registry)?;
        require_usage(&base_key, KeyUsage::DeriveBits)?;
        require_algorithm_match(&base_key, resolved.canonical_name())?;
        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || module.derive_bits(&base_key, &params, length_bits))
            .await
            .map_err(join_error)?
    }

    /// Composes `deriveBits` with the target algorithm's `importKey`
    /// (spec §4.4): derive exactly as many raw bits as
    /// `derived_key_algorithm` needs, then import them as a key of that
    /// algorithm. `derived_key_algorithm` reuses the `generateKey`-style
    /// descriptor shape so its key length is expressed the same way
    /// `generateKey` expresses it.
    #[instrument(skip(self, base_key, algorithm, derived_key_algorithm), fields(algorithm = algorithm.name(), derived = derived_key_algorithm.name()))]
    pub async fn derive_key(
        &self,
        algorithm: AlgorithmIdentifier,
        base_key: Key,
        derived_key_algorithm: AlgorithmIdentifier,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        let target = normalize(Operation::GenerateKey, &derived_key_algorithm, &self.registry)?;
        let length_bits = key_length_bits(&target.params.detail)?;
        let raw_bits = self.derive_bits(algorithm, base_key, length_bits).await?;
        self.import_key(KeyFormat::Raw, KeyMaterial::Octets(raw_bits), derived_key_algorithm, extractable, usages).await
    }

    /// Composite `wrapKey` (spec §4.5, §7): export the key to wrap, then
    /// encrypt those bytes with the wrapping key. Prefers a dedicated
    /// `wrapKey` capability on the resolved module; falls back to
    /// `encrypt` only when the module has no such capability - the two
    /// are never both attempted, and the fallback is never applied
    /// silently past a module that actually implements `wrapKey`.
    #[instrument(skip(self, key_to_wrap, wrapping_key, wrap_algorithm), fields(algorithm = wrap_algorithm.name()))]
    pub async fn wrap_key(
        &self,
        format: KeyFormat,
        key_to_wrap: Key,
        wrapping_key: Key,
        wrap_algorithm: AlgorithmIdentifier,
    ) -> Result<Vec<u8>, CryptoError> {
        // Step 1 (spec §4.5): normalize wrapAlgorithm, preferring a
        // dedicated `wrapKey` capability and falling back to `encrypt`
        // only when the module has neither - before any validation or
        // export runs, so a bad wrap algorithm name is reported first.
        let (_, probe_module) = self.registry.lookup(wrap_algorithm.name())?;
        let operation = if probe_module.supports(Operation::WrapKey) {
            Operation::WrapKey
        } else if probe_module.supports(Operation::Encrypt) {
            Operation::Encrypt
        } else {
            return Err(CryptoError::not_supported(format!(
                "algorithm '{}' supports neither wrapKey nor its encrypt fallback",
                wrap_algorithm.name()
            )));
        };
        let resolved = normalize(operation, &wrap_algorithm, &self.registry)?;

        // Step 2: validate before the export leg runs.
        require_usage(&wrapping_key, KeyUsage::WrapKey)?;
        require_algorithm_match(&wrapping_key, resolved.canonical_name())?;

        // Step 3: export the key to wrap (its own extractability and
        // exportKey-capability checks happen inside `export_key`).
        let material = self.export_key(format, key_to_wrap).await?;
        let plaintext = key_material_to_bytes(material)?;

        let module = resolved.module.clone();
        let params = resolved.params.clone();
        tokio::task::spawn_blocking(move || match operation {
            Operation::WrapKey => module.wrap_key(&wrapping_key, &params, &plaintext),
            Operation::Encrypt => module.encrypt(&wrapping_key, &params, &plaintext),
            _ => unreachable!("wrap_key only ever resolves to WrapKey or Encrypt"),
        })
        .await
        .map_err(join_error)?
    }

    /// Composite `unwrapKey` (spec §4.5, §7): decrypt the wrapped bytes
    /// with the unwrapping key, then import the result as
    /// `unwrapped_key_algorithm` - never the dispatcher's own
    /// `unwrapKey`, which would recurse (spec §9's resolved open
    /// question).
    #[instrument(skip(self, wrapped, unwrapping_key, unwrap_algorithm, unwrapped_key_algorithm), fields(algorithm = unwrap_algorithm.name(), unwrapped = unwrapped_key_algorithm.name()))]
    pub async fn unwrap_key(
        &self,
        format: KeyFormat,
        wrapped: Vec<u8>,
        unwrap_algorithm: AlgorithmIdentifier,
        unwrapping_key: Key,
        unwrapped_key_algorithm: AlgorithmIdentifier,
        extractable: bool,
        usages: KeyUsageSet,
    ) -> Result<Key, CryptoError> {
        // Step 1 (spec §4.5): normalize unwrapAlgorithm, falling back
        // from `unwrapKey` to `decrypt` the same way `wrap_key` falls
        // back from `wrapKey` to `encrypt`.
        let (_, probe_module) = self.registry.lookup(unwrap_algorithm.name())?;
        let operation = if probe_module.supports(Operation::UnwrapKey) {
            Operation::UnwrapKey
        } else if probe_module.supports(Operation::Decrypt) {
            Operation::Decrypt
        } else {
            return Err(CryptoError::not_supported(format!(
                "algorithm '{}' supports neither unwrapKey nor its decrypt fallback",
                unwrap_algorithm.name()
            )));
        };
        let resolved = normalize(operation, &unwrap_algorithm, &self.registry)?;

        // Step 2: normalize `unwrappedKeyAlgorithm` under `importKey`
        // eagerly - failure here is fatal and must be reported before
        // the step-3 usage/algorithm-match validation, matching spec
        // §9's resolved ordering question. The result is discarded; the
        // re-import at the end of this method normalizes it again
        // against the actual decrypted bytes.
        normalize(Operation::ImportKey, &unwrapped_key_algorithm, &self.registry)?;

        // Step 3: validate the unwrapping key.
        require_usage(&unwrapping_key, KeyUsage::UnwrapKey)?;
        require_algorithm_match(&unwrapping_key, resolved.canonical_name())?;

        let module = resolved.module.clone();
        let params = resolved.params.clone();
        let plaintext = tokio::task::spawn_blocking(move || match operation {
            Operation::UnwrapKey => module.unwrap_key(&unwrapping_key, &params, &wrapped),
            Operation::Decrypt => module.decrypt(&unwrapping_key, &params, &wrapped),
            _ => unreachable!("unwrap_key only ever resolves to UnwrapKey or Decrypt"),
        })
        .await
        .map_err(join_error)??;

        let material = match format {
            KeyFormat::Jwk => KeyMaterial::Jwk(JsonWebKey::from_canonical_json(&plaintext)?),
            _ => KeyMaterial::Octets(plaintext),
        };
        self.import_key(format, material, unwrapped_key_algorithm, extractable, usages).await
    }
}

fn key_material_to_bytes(material: KeyMaterial) -> Result<Vec<u8>, CryptoError> {
    match material {
        KeyMaterial::Octets(bytes) => Ok(bytes),
        KeyMaterial::Jwk(jwk) => Ok(jwk.to_canonical_json()?.into_bytes()),
    }
}

/// The key length a `generateKey`-shaped descriptor declares, used by
/// `derive_key` to size its `deriveBits` call.
fn key_length_bits(detail: &ParamDetail) -> Result<u32, CryptoError> {
    match detail {
        ParamDetail::AesKeyGen { length } => Ok(*length as u32),
        ParamDetail::HmacKeyGen { hash, length } => Ok(length.unwrap_or_else(|| (hash.output_len() * 8) as u32)),
        other => Err(CryptoError::not_supported(format!(
            "derived key algorithm does not define a key length: {other:?}"
        ))),
    }
}
