// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! Wires `tracing` to stderr, the same `FmtSubscriber` the teacher's own
//! binary initializes at startup. Log fields never carry key material -
//! only algorithm names, operation names, and error categories (the
//! dispatcher's `#[instrument]` attributes skip every `Key`/byte-buffer
//! parameter).

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global tracing subscriber. `verbose` maps to `DEBUG`,
/// otherwise `INFO` - the same two-level switch the teacher's CLI
/// exposes via `--verbose`.
pub fn init_tracing(verbose: bool) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    // Only the process entry point should install a global subscriber;
    // a second call (e.g. from a test harness) is a no-op rather than a
    // panic.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
