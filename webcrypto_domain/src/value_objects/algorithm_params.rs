// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Normalized Parameter Record
//!
//! `Params` is what `normalize()` (spec §4.2) produces: the canonical
//! algorithm name plus a validated, operation-and-algorithm-specific
//! `ParamDetail`. It is a pure value - no implementation reference
//! attached - so it can be constructed and compared in tests without a
//! registry (spec §9's design note: "a pure parameter record (for
//! testing) plus a separate implementation reference resolved from the
//! registry").

use crate::value_objects::hash_algorithm::HashAlgorithm;

/// The canonical algorithm name plus its validated, algorithm-specific
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub name: String,
    pub detail: ParamDetail,
}

/// Algorithm-specific members, shaped per algorithm family rather than as
/// a loosely-typed map - each variant states exactly the cross-member
/// constraints the normalizer already checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamDetail {
    /// `AES-GCM` encrypt/decrypt (and, via the wrap/unwrap fallback rule,
    /// `AES-GCM` wrapKey/unwrapKey).
    AesGcm {
        iv: Vec<u8>,
        additional_data: Vec<u8>,
        /// Authentication tag length in bits; 128 unless overridden.
        tag_length: u8,
    },
    /// `AES-GCM` generateKey.
    AesKeyGen { length: u16 },
    /// `AES-GCM` importKey/exportKey - no algorithm-specific members
    /// beyond the key length, which is implied by the material.
    AesImport,
    /// `HMAC` sign/verify.
    Hmac { hash: HashAlgorithm },
    /// `HMAC` generateKey.
    HmacKeyGen { hash: HashAlgorithm, length: Option<u32> },
    /// `HMAC` importKey/exportKey.
    HmacImport { hash: HashAlgorithm, length: Option<u32> },
    /// `SHA-*` digest, and the nested `hash` member of HMAC/HKDF/PBKDF2
    /// descriptors after recursive normalization.
    Digest { hash: HashAlgorithm },
    /// `HKDF` deriveBits/deriveKey.
    HkdfDerive { hash: HashAlgorithm, salt: Vec<u8>, info: Vec<u8> },
    /// `HKDF` importKey - the imported bytes are used as-is as input
    /// keying material; no algorithm-specific members.
    HkdfImport,
    /// `PBKDF2` deriveBits/deriveKey.
    Pbkdf2Derive { hash: HashAlgorithm, salt: Vec<u8>, iterations: u32 },
    /// `PBKDF2` importKey.
    Pbkdf2Import,
}

impl ParamDetail {
    pub fn hash(&self) -> Option<HashAlgorithm> {
        match self {
            ParamDetail::Hmac { hash }
            | ParamDetail::HmacKeyGen { hash, .. }
            | ParamDetail::HmacImport { hash, .. }
            | ParamDetail::Digest { hash }
            | ParamDetail::HkdfDerive { hash, .. }
            | ParamDetail::Pbkdf2Derive { hash, .. } => Some(*hash),
            _ => None,
        }
    }
}
