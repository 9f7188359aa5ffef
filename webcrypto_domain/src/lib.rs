// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # webcrypto-domain
//!
//! The domain layer of the webcrypto dispatch core: the key model, the
//! algorithm registry, the normalizer, and the usage/format validator.
//! Nothing in this crate performs I/O, spawns a task, or touches a
//! random-number generator - callers supply key bytes and IVs, the
//! `webcrypto` crate supplies the async adapters and concrete algorithm
//! modules that actually move bytes.
//!
//! ## Modules
//!
//! - [`error`] - the six-variant `CryptoError` taxonomy every other
//!   module reports through.
//! - [`value_objects`] - `KeyUsage`/`KeyUsageSet`, `KeyFormat`/
//!   `KeyMaterial`, `JsonWebKey`, `HashAlgorithm`, `AlgorithmIdentifier`,
//!   and the normalized `Params`/`ParamDetail` pair.
//! - [`key`] - `Key`, `KeyPair`, `KeyType`, `KeyHandle`, `SecretBytes`.
//! - [`registry`] - `Operation`, `AlgorithmModule`, `AlgorithmRegistry`,
//!   `GeneratedKey`.
//! - [`normalize`] - `normalize()` and `Resolved`.
//! - [`validate`] - the usage/algorithm-match/extractability/format
//!   checks the dispatcher runs before calling into a module.

pub mod error;
pub mod key;
pub mod normalize;
pub mod registry;
pub mod validate;
pub mod value_objects;

pub use error::CryptoError;
pub use key::{Key, KeyHandle, KeyPair, KeyType, SecretBytes};
pub use normalize::{normalize, Resolved};
pub use registry::{AlgorithmModule, AlgorithmRegistry, GeneratedKey, Operation};
