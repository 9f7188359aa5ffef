// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Algorithm Identifier
//!
//! The caller-supplied algorithm descriptor (spec §3 A.4): either a bare
//! name or a name plus algorithm-specific parameters. This is the typed
//! equivalent of normalizer step 1 ("if `desc` is a plain string, rewrite
//! to `{ name: desc }`") - the rewrite is a variant of the type rather
//! than a runtime branch, so a caller who only has a name can't
//! accidentally skip required-member validation by omitting `params`.

use serde_json::Value as JsonValue;

#[derive(Debug, Clone)]
pub enum AlgorithmIdentifier {
    /// Equivalent to a bare string descriptor: `{ name }` with no further
    /// members.
    Name(String),
    /// A descriptor object with a `name` and algorithm-specific members.
    WithParams { name: String, params: JsonValue },
}

impl AlgorithmIdentifier {
    pub fn name(&self) -> &str {
        match self {
            AlgorithmIdentifier::Name(name) => name,
            AlgorithmIdentifier::WithParams { name, .. } => name,
        }
    }

    /// The algorithm-specific members, or an empty object if this
    /// descriptor was a bare name.
    pub fn params(&self) -> JsonValue {
        match self {
            AlgorithmIdentifier::Name(_) => JsonValue::Object(Default::default()),
            AlgorithmIdentifier::WithParams { params, .. } => params.clone(),
        }
    }
}

impl From<&str> for AlgorithmIdentifier {
    fn from(name: &str) -> Self {
        AlgorithmIdentifier::Name(name.to_string())
    }
}

impl From<String> for AlgorithmIdentifier {
    fn from(name: String) -> Self {
        AlgorithmIdentifier::Name(name)
    }
}
