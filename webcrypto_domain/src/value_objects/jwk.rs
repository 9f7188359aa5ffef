// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JSON Web Key
//!
//! A structured representation of key material (spec §3 A.3, §6). The
//! dispatch core treats a JWK as an opaque structured object; only the
//! algorithm modules that import/export a given `kty` interpret its
//! members (`k` for `oct`, `n`/`e`/`d`/... for `RSA`, `crv`/`x`/`y` for
//! `EC`/`OKP`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,

    // Symmetric key material (`kty: "oct"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,

    // RSA members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,

    // EC / OKP members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl JsonWebKey {
    /// Builds a minimal symmetric (`kty: "oct"`) JWK from a base64url-
    /// encoded key value. Used by tests and by `AesGcmModule`/`HmacModule`
    /// export paths.
    pub fn oct_key(k: String) -> Self {
        Self {
            kty: "oct".to_string(),
            k: Some(k),
            ..Default::default()
        }
    }

    /// The UTF-8 JSON encoding used when wrapping a JWK (spec §4.5 step 4,
    /// §6): no leading whitespace, members in a stable order via serde's
    /// struct field order.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_canonical_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
