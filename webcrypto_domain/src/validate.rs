// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Usage / Format Validator
//!
//! The checks every dispatcher entry point runs on a `Key` before handing
//! it to an algorithm module (spec §4.3). Each check is a free function
//! rather than a method on `Key` so the dispatcher can run them in the
//! order spec §4.3 mandates - usage before algorithm-name match before
//! extractability - and attribute each failure to the right step when it
//! logs or reports an error.

use crate::error::CryptoError;
use crate::key::Key;
use crate::value_objects::key_format::{KeyFormat, KeyMaterial};
use crate::value_objects::key_usage::KeyUsage;

/// The key must be authorized for this usage (spec §4.3 step 1). This
/// check runs before the algorithm-name check: a key for the wrong
/// algorithm that also lacks the usage reports the usage failure first,
/// matching spec §9's resolved ordering question.
pub fn require_usage(key: &Key, usage: KeyUsage) -> Result<(), CryptoError> {
    if key.usages().contains(usage) {
        Ok(())
    } else {
        Err(CryptoError::invalid_access(format!("key is not authorized for usage '{usage}'")))
    }
}

/// The key's algorithm name must match the name the caller normalized
/// (spec §4.3 step 2) - an AES-GCM key can't be used where an HMAC key
/// was normalized, even if both happen to be 256-bit octet strings.
pub fn require_algorithm_match(key: &Key, canonical_name: &str) -> Result<(), CryptoError> {
    if key.algorithm_name().eq_ignore_ascii_case(canonical_name) {
        Ok(())
    } else {
        Err(CryptoError::invalid_access(format!(
            "key algorithm '{}' does not match requested algorithm '{canonical_name}'",
            key.algorithm_name()
        )))
    }
}

/// `exportKey` and the export half of `wrapKey` both require the key to
/// have been produced with `extractable: true` (spec §4.3 step 3, §4.5).
pub fn require_extractable(key: &Key) -> Result<(), CryptoError> {
    if key.extractable() {
        Ok(())
    } else {
        Err(CryptoError::invalid_access("key is not extractable"))
    }
}

/// `importKey`/`unwrapKey`'s format-vs-material precondition (spec §4.3
/// step 4, §6): the material's shape must match what the declared format
/// implies before any algorithm module sees it.
pub fn require_format_shape(format: KeyFormat, material: &KeyMaterial) -> Result<(), CryptoError> {
    material.require_shape(format)
}

/// `importKey`/`generateKey`/`unwrapKey` must not produce a key with no
/// usages (spec §4.1, restated for the validator so every producing
/// operation runs the same check rather than relying on `Key::new`'s
/// construction-time enforcement alone to surface a consistent error
/// category at the dispatcher boundary).
pub fn require_nonempty_usages(usages: &crate::value_objects::key_usage::KeyUsageSet) -> Result<(), CryptoError> {
    if usages.is_empty() {
        Err(CryptoError::syntax("a key must be produced with at least one usage"))
    } else {
        Ok(())
    }
}
