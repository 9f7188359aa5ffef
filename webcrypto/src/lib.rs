// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # webcrypto
//!
//! The async dispatch core: [`dispatch::SubtleCrypto`] is the single
//! entry point, built on top of [`webcrypto_domain`]'s registry,
//! normalizer, and validator and wired to this crate's concrete
//! algorithm modules.
//!
//! ## Modules
//!
//! - [`algorithms`] - AES-GCM, HMAC, SHA-1/256/384/512, HKDF, PBKDF2.
//! - [`dispatch`] - the `SubtleCrypto` operation dispatcher.
//! - [`infrastructure`] - tracing setup.

pub mod algorithms;
pub mod dispatch;
pub mod infrastructure;

pub use dispatch::SubtleCrypto;
