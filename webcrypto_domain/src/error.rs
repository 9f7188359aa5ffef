// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Crypto Error System
//!
//! The error taxonomy the dispatch core uses to report why an operation
//! could not be carried out. Every failure a caller can observe - a bad
//! algorithm name, a key missing a required usage, a malformed descriptor -
//! maps to exactly one of the six kinds here.
//!
//! ## Error Categories
//!
//! - **NotSupported**: the registry has nothing registered for the
//!   requested (operation, algorithm name) pair, or the resolved module is
//!   missing a capability the operation needs.
//! - **InvalidAccess**: the key is the wrong algorithm, lacks the required
//!   usage, or isn't extractable where extraction was requested.
//! - **Syntax**: a descriptor or usage list is malformed at the structural
//!   level (missing required member, unknown usage token, a produced key
//!   with no usages).
//! - **Data**: a member is present and well-formed at the JSON level but
//!   doesn't parse as its declared type (e.g. key material that isn't
//!   valid base64url, or an IV of the wrong length).
//! - **Type**: the supplied key material doesn't match the declared
//!   format's shape (octets expected, JWK object given, or vice versa).
//! - **Operation**: the algorithm module itself failed internally -
//!   authentication tag mismatch, bad padding, signature verification
//!   crashing rather than returning false.
//!
//! `verify` is the one operation that does not reject on a failed check:
//! a mismatched signature resolves `Ok(false)`, never `Err(CryptoError::
//! Operation(_))`. Only a malformed signature *encoding* is an error.

use thiserror::Error;

/// Errors raised by the key model, registry, normalizer, validator, and
/// dispatcher.
///
/// Each variant carries a `String` message for diagnostics; the variant
/// itself is what callers should match on; the message is not meant to be
/// parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("invalid access: {0}")]
    InvalidAccess(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("operation error: {0}")]
    Operation(String),
}

impl CryptoError {
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    pub fn invalid_access(msg: impl Into<String>) -> Self {
        Self::InvalidAccess(msg.into())
    }

    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Broad category, for logging/metrics grouping without matching on
    /// every variant at every call site.
    pub fn category(&self) -> &'static str {
        match self {
            CryptoError::NotSupported(_) => "registry",
            CryptoError::InvalidAccess(_) => "access-control",
            CryptoError::Syntax(_) => "syntax",
            CryptoError::Data(_) => "data",
            CryptoError::Type(_) => "type",
            CryptoError::Operation(_) => "algorithm",
        }
    }

    /// True for errors that indicate an access-control decision (as
    /// opposed to a malformed request or an internal algorithm failure).
    pub fn is_access_control_error(&self) -> bool {
        matches!(self, CryptoError::InvalidAccess(_))
    }
}

// Malformed descriptor JSON is a syntax error, not a data or internal
// error - the descriptor never reached the point of having semantically
// meaningful members to validate.
impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Syntax(err.to_string())
    }
}
