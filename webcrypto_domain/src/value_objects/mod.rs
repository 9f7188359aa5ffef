// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pure value objects: no I/O, no async runtime, no mutable shared state.

pub mod algorithm_identifier;
pub mod algorithm_params;
pub mod hash_algorithm;
pub mod jwk;
pub mod key_format;
pub mod key_usage;

pub use algorithm_identifier::AlgorithmIdentifier;
pub use algorithm_params::{ParamDetail, Params};
pub use hash_algorithm::HashAlgorithm;
pub use jwk::JsonWebKey;
pub use key_format::{KeyFormat, KeyMaterial};
pub use key_usage::{KeyUsage, KeyUsageSet};
