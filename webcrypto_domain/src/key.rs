// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Key Model
//!
//! `Key` is the opaque handle produced by `generateKey`/`importKey` and
//! consumed by every other operation (spec §3 A.1-A.2). The key's secret
//! material is held behind `SecretBytes`, which zeroizes on drop - the
//! same posture the teacher's encryption adapter takes on its derived
//! keys (`adaptive_pipeline/src/infrastructure/adapters/encryption.rs`).
//!
//! Construction is where the §3 "a public key's usages are restricted to
//! `encrypt`/`verify`/`wrapKey`; a private or secret key's usages are
//! restricted to the complementary set" invariant is enforced - once a
//! `Key` exists, every other module can trust its usage set without
//! re-checking which half of an asymmetric pair it belongs to.

use crate::error::CryptoError;
use crate::value_objects::key_usage::{KeyUsage, KeyUsageSet};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Which half of a key pair this key is, or whether it is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    Secret,
    Public,
    Private,
}

impl KeyType {
    /// The usage ceiling §3 assigns to this key type. A `Public` key may
    /// never carry `decrypt`, `sign`, `unwrapKey`, `deriveKey`, or
    /// `deriveBits`; a `Private`/`Secret` key may never carry `encrypt` or
    /// `verify` in the asymmetric case (symmetric `Secret` keys use both
    /// halves of the AES-GCM-style vocabulary, so they get the full set).
    pub fn allowed_usages(&self) -> &'static [KeyUsage] {
        match self {
            KeyType::Public => &[KeyUsage::Encrypt, KeyUsage::Verify, KeyUsage::WrapKey],
            KeyType::Private => &[
                KeyUsage::Decrypt,
                KeyUsage::Sign,
                KeyUsage::UnwrapKey,
                KeyUsage::DeriveKey,
                KeyUsage::DeriveBits,
            ],
            KeyType::Secret => &KeyUsage::ALL,
        }
    }
}

/// Secret octets that zeroize when dropped or explicitly cleared.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretBytes").field(&"<redacted>").finish()
    }
}

/// The actual bits behind a `Key`. Public-key material isn't secret, so
/// it isn't wrapped in `SecretBytes`.
#[derive(Debug, Clone)]
pub enum KeyHandle {
    Secret(SecretBytes),
    Private(SecretBytes),
    Public(Vec<u8>),
}

impl KeyHandle {
    pub fn key_type(&self) -> KeyType {
        match self {
            KeyHandle::Secret(_) => KeyType::Secret,
            KeyHandle::Private(_) => KeyType::Private,
            KeyHandle::Public(_) => KeyType::Public,
        }
    }

    /// Bytes to feed an algorithm module, regardless of whether they're
    /// secret or public.
    pub fn expose(&self) -> &[u8] {
        match self {
            KeyHandle::Secret(b) | KeyHandle::Private(b) => b.expose(),
            KeyHandle::Public(b) => b,
        }
    }
}

/// An opaque cryptographic key: the handle plus the metadata every
/// operation needs to decide whether it may use it.
#[derive(Debug, Clone)]
pub struct Key {
    algorithm_name: String,
    extractable: bool,
    usages: KeyUsageSet,
    handle: KeyHandle,
}

impl Key {
    /// Constructs a key, rejecting a usage set that exceeds what the
    /// handle's `KeyType` allows (spec §3's key-type/usage invariant) and
    /// rejecting an empty usage set (spec §4.1's "a key or key pair
    /// produced with no usages at all is a caller error, not a
    /// zero-capability key").
    pub fn new(
        algorithm_name: impl Into<String>,
        extractable: bool,
        usages: KeyUsageSet,
        handle: KeyHandle,
    ) -> Result<Self, CryptoError> {
        if usages.is_empty() {
            return Err(CryptoError::syntax("a key must be produced with at least one usage"));
        }
        let allowed = handle.key_type().allowed_usages();
        if !usages.is_subset_of(allowed) {
            return Err(CryptoError::syntax(format!(
                "usages are not valid for a {:?} key: allowed are {:?}",
                handle.key_type(),
                allowed
            )));
        }
        Ok(Self { algorithm_name: algorithm_name.into(), extractable, usages, handle })
    }

    pub fn key_type(&self) -> KeyType {
        self.handle.key_type()
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    pub fn extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &KeyUsageSet {
        &self.usages
    }

    pub fn handle(&self) -> &KeyHandle {
        &self.handle
    }
}

/// The result of an asymmetric `generateKey` call - kept out of scope for
/// the algorithm modules this crate ships (spec §10's concrete module
/// set is symmetric-only) but modeled here because the dispatcher's
/// `generateKey` signature must account for it (spec §4.1).
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: Key,
    pub private_key: Key,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_usage_set() {
        let err = Key::new("AES-GCM", true, KeyUsageSet::empty(), KeyHandle::Secret(SecretBytes::new(vec![0; 32])))
            .unwrap_err();
        assert_eq!(err.category(), "syntax");
    }

    #[test]
    fn rejects_decrypt_usage_on_a_public_key() {
        let usages = KeyUsageSet::from_usages([KeyUsage::Decrypt]);
        let err = Key::new("ECDSA", true, usages, KeyHandle::Public(vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.category(), "syntax");
    }

    #[test]
    fn accepts_full_usage_set_on_a_symmetric_key() {
        let usages = KeyUsageSet::from_usages([KeyUsage::Encrypt, KeyUsage::Decrypt]);
        let key = Key::new("AES-GCM", false, usages, KeyHandle::Secret(SecretBytes::new(vec![0; 32]))).unwrap();
        assert_eq!(key.key_type(), KeyType::Secret);
        assert!(!key.extractable());
    }
}
