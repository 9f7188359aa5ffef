// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Key Format
//!
//! The four recognized key-material formats (spec §6). `KeyMaterial`
//! pairs a format with the octets-or-JWK it actually carries, and is the
//! type the format/material-shape check in §4.3 operates on.

use crate::error::CryptoError;
use crate::value_objects::jwk::JsonWebKey;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    Raw,
    Pkcs8,
    Spki,
    Jwk,
}

impl KeyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyFormat::Raw => "raw",
            KeyFormat::Pkcs8 => "pkcs8",
            KeyFormat::Spki => "spki",
            KeyFormat::Jwk => "jwk",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key material in the shape its format implies: an octet buffer for
/// `raw`/`pkcs8`/`spki`, a structured JWK for `jwk`.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Octets(Vec<u8>),
    Jwk(JsonWebKey),
}

impl KeyMaterial {
    /// Enforces the §4.3 format-vs-material precondition: the material's
    /// shape must match what the declared format implies.
    pub fn require_shape(&self, format: KeyFormat) -> Result<(), CryptoError> {
        match (format, self) {
            (KeyFormat::Jwk, KeyMaterial::Jwk(_)) => Ok(()),
            (KeyFormat::Jwk, KeyMaterial::Octets(_)) => {
                Err(CryptoError::type_error("format 'jwk' requires a JsonWebKey object, got an octet buffer"))
            }
            (KeyFormat::Raw | KeyFormat::Pkcs8 | KeyFormat::Spki, KeyMaterial::Octets(_)) => Ok(()),
            (KeyFormat::Raw | KeyFormat::Pkcs8 | KeyFormat::Spki, KeyMaterial::Jwk(_)) => {
                Err(CryptoError::type_error(format!(
                    "format '{format}' requires an octet buffer, got a JsonWebKey object"
                )))
            }
        }
    }

    pub fn as_octets(&self) -> Result<&[u8], CryptoError> {
        match self {
            KeyMaterial::Octets(bytes) => Ok(bytes),
            KeyMaterial::Jwk(_) => Err(CryptoError::type_error("expected an octet buffer, got a JsonWebKey object")),
        }
    }

    pub fn as_jwk(&self) -> Result<&JsonWebKey, CryptoError> {
        match self {
            KeyMaterial::Jwk(jwk) => Ok(jwk),
            KeyMaterial::Octets(_) => Err(CryptoError::type_error("expected a JsonWebKey object, got an octet buffer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_format_rejects_jwk_material() {
        let jwk = JsonWebKey::oct_key("AAAA".to_string());
        let err = KeyMaterial::Jwk(jwk).require_shape(KeyFormat::Raw).unwrap_err();
        assert_eq!(err.category(), "type");
    }

    #[test]
    fn jwk_format_rejects_octet_material() {
        let err = KeyMaterial::Octets(vec![1, 2, 3]).require_shape(KeyFormat::Jwk).unwrap_err();
        assert_eq!(err.category(), "type");
    }
}
