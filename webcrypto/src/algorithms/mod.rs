// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete `AlgorithmModule` implementations. Not part of the dispatch
//! core's own contract (spec §10 treats every algorithm as an external
//! collaborator) - these exist so the registry, normalizer, validator,
//! and dispatcher have real algorithms to exercise end to end.

pub mod aes_gcm;
pub mod hkdf_module;
pub mod hmac_module;
pub mod pbkdf2_module;
pub mod sha_module;

pub use aes_gcm::AesGcmModule;
pub use hkdf_module::HkdfModule;
pub use hmac_module::HmacModule;
pub use pbkdf2_module::Pbkdf2Module;
pub use sha_module::ShaModule;
