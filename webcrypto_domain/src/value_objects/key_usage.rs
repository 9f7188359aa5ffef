// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Key Usage
//!
//! `KeyUsage` is the fixed eight-token vocabulary that authorizes a key for
//! one operation. `KeyUsageSet` is the validated, deduplicated collection
//! that actually lives on a `Key`.

use crate::error::CryptoError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One authorized operation for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    DeriveKey,
    DeriveBits,
    WrapKey,
    UnwrapKey,
}

impl KeyUsage {
    pub const ALL: [KeyUsage; 8] = [
        KeyUsage::Encrypt,
        KeyUsage::Decrypt,
        KeyUsage::Sign,
        KeyUsage::Verify,
        KeyUsage::DeriveKey,
        KeyUsage::DeriveBits,
        KeyUsage::WrapKey,
        KeyUsage::UnwrapKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
            KeyUsage::DeriveKey => "deriveKey",
            KeyUsage::DeriveBits => "deriveBits",
            KeyUsage::WrapKey => "wrapKey",
            KeyUsage::UnwrapKey => "unwrapKey",
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyUsage {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encrypt" => Ok(KeyUsage::Encrypt),
            "decrypt" => Ok(KeyUsage::Decrypt),
            "sign" => Ok(KeyUsage::Sign),
            "verify" => Ok(KeyUsage::Verify),
            "deriveKey" => Ok(KeyUsage::DeriveKey),
            "deriveBits" => Ok(KeyUsage::DeriveBits),
            "wrapKey" => Ok(KeyUsage::WrapKey),
            "unwrapKey" => Ok(KeyUsage::UnwrapKey),
            other => Err(CryptoError::syntax(format!("unrecognized key usage '{other}'"))),
        }
    }
}

/// A deduplicated, validated set of usages.
///
/// Construction is the only place the §6 "normalizes a caller-supplied
/// usage list by deduplicating and rejecting any unknown token" rule is
/// enforced; every other part of the dispatch core treats a `KeyUsageSet`
/// as already valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUsageSet(BTreeSet<KeyUsage>);

impl KeyUsageSet {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn from_usages(usages: impl IntoIterator<Item = KeyUsage>) -> Self {
        Self(usages.into_iter().collect())
    }

    /// Parses a caller-supplied list of usage tokens, deduplicating and
    /// rejecting unknown tokens with `CryptoError::Syntax`.
    pub fn from_tokens<S: AsRef<str>>(tokens: impl IntoIterator<Item = S>) -> Result<Self, CryptoError> {
        let mut set = BTreeSet::new();
        for token in tokens {
            let usage: KeyUsage = token.as_ref().parse()?;
            set.insert(usage);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, usage: KeyUsage) -> bool {
        self.0.contains(&usage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyUsage> + '_ {
        self.0.iter().copied()
    }

    /// Keeps only the usages present in `allowed`; used to enforce the
    /// public-key usage ceiling (`encrypt`, `verify`, `wrapKey`) at
    /// construction time.
    pub fn intersect(&self, allowed: &[KeyUsage]) -> Self {
        Self(self.0.iter().copied().filter(|u| allowed.contains(u)).collect())
    }

    /// True if every usage in `self` is present in `allowed`.
    pub fn is_subset_of(&self, allowed: &[KeyUsage]) -> bool {
        self.0.iter().all(|u| allowed.contains(u))
    }
}

impl FromIterator<KeyUsage> for KeyUsageSet {
    fn from_iter<T: IntoIterator<Item = KeyUsage>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tokens_dedupes_and_preserves_known_usages() {
        let set = KeyUsageSet::from_tokens(["encrypt", "decrypt", "encrypt"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(KeyUsage::Encrypt));
        assert!(set.contains(KeyUsage::Decrypt));
    }

    #[test]
    fn from_tokens_rejects_unknown_token() {
        let err = KeyUsageSet::from_tokens(["encrypt", "fly"]).unwrap_err();
        assert_eq!(err, CryptoError::syntax("unrecognized key usage 'fly'"));
    }

    #[test]
    fn intersect_drops_usages_outside_the_allowed_set() {
        let set = KeyUsageSet::from_tokens(["encrypt", "decrypt", "wrapKey"]).unwrap();
        let public_allowed = [KeyUsage::Encrypt, KeyUsage::Verify, KeyUsage::WrapKey];
        let intersected = set.intersect(&public_allowed);
        assert!(intersected.contains(KeyUsage::Encrypt));
        assert!(intersected.contains(KeyUsage::WrapKey));
        assert!(!intersected.contains(KeyUsage::Decrypt));
    }

    #[test]
    fn is_subset_of_rejects_decrypt_on_a_public_key() {
        let set = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap();
        let public_allowed = [KeyUsage::Encrypt, KeyUsage::Verify, KeyUsage::WrapKey];
        assert!(!set.is_subset_of(&public_allowed));
    }
}
