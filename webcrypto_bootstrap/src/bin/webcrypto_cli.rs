// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # webcrypto-cli
//!
//! A demonstration shell over [`webcrypto::SubtleCrypto`]: enough
//! subcommands to exercise `digest`, `generateKey`, and an
//! `encrypt`/`decrypt` round trip from a terminal, wired the way the
//! teacher's `pipeline` binary wires its CLI - `clap` derive, an
//! `EngineConfig` loaded once at startup, and `tracing`
//! initialized via [`webcrypto::infrastructure::logging::init_tracing`]
//! before any other work happens.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use clap::{Parser, Subcommand};
use tracing::info;

use webcrypto::infrastructure::logging::init_tracing;
use webcrypto::SubtleCrypto;
use webcrypto_bootstrap::{default_registry, EngineConfig};
use webcrypto_domain::key::{Key, KeyHandle, SecretBytes};
use webcrypto_domain::registry::GeneratedKey;
use webcrypto_domain::value_objects::algorithm_identifier::AlgorithmIdentifier;
use webcrypto_domain::value_objects::key_format::{KeyFormat, KeyMaterial};
use webcrypto_domain::value_objects::key_usage::KeyUsageSet;

#[derive(Parser)]
#[command(name = "webcrypto-cli")]
#[command(about = "Demonstration shell over the webcrypto dispatch core")]
#[command(version = "1.0.1")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory to run from, so a `webcrypto.toml` there is picked up
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash bytes with a digest algorithm (SHA-1/256/384/512)
    Digest {
        /// Digest algorithm name, e.g. "SHA-256"
        #[arg(short, long, default_value = "SHA-256")]
        algorithm: String,

        /// UTF-8 input to hash
        input: String,
    },

    /// Generate a symmetric key and print it base64url-encoded
    GenerateKey {
        /// Algorithm name: "AES-GCM" or "HMAC"
        #[arg(short, long, default_value = "AES-GCM")]
        algorithm: String,

        /// Key length in bits (AES-GCM: 128 or 256)
        #[arg(short, long, default_value_t = 256)]
        length: u16,
    },

    /// Encrypt UTF-8 plaintext with AES-GCM, printing base64url(iv || ciphertext)
    Encrypt {
        /// base64url-encoded raw AES key
        #[arg(short, long)]
        key: String,

        /// UTF-8 plaintext
        plaintext: String,
    },

    /// Decrypt base64url(iv || ciphertext) produced by `encrypt`
    Decrypt {
        /// base64url-encoded raw AES key
        #[arg(short, long)]
        key: String,

        /// base64url-encoded iv || ciphertext
        ciphertext: String,
    },
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(value).with_context(|| format!("{field} is not valid base64url"))
}

fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.config {
        std::env::set_current_dir(dir).with_context(|| format!("could not chdir into {}", dir.display()))?;
    }
    let config = EngineConfig::load().context("failed to load engine configuration")?;

    let verbose = cli.verbose || config.log_level.eq_ignore_ascii_case("debug");
    init_tracing(verbose);

    info!("starting webcrypto-cli, pbkdf2_min_iterations={}", config.pbkdf2_min_iterations);

    let subtle = SubtleCrypto::new(default_registry(&config));

    match cli.command {
        Commands::Digest { algorithm, input } => {
            let digest = subtle.digest(AlgorithmIdentifier::Name(algorithm), input.into_bytes()).await?;
            println!("{}", encode(&digest));
        }
        Commands::GenerateKey { algorithm, length } => {
            let params = serde_json::json!({ "name": algorithm, "length": length });
            let descriptor = AlgorithmIdentifier::WithParams { name: algorithm, params };
            let usages = KeyUsageSet::from_tokens(["encrypt", "decrypt"]).unwrap_or_else(|_| KeyUsageSet::empty());
            let generated = subtle.generate_key(descriptor, true, usages).await?;
            let key = match generated {
                GeneratedKey::Single(key) => key,
                GeneratedKey::Pair(_) => return Err(anyhow!("generate-key only supports symmetric algorithms")),
            };
            let material = subtle.export_key(KeyFormat::Raw, key).await?;
            match material {
                KeyMaterial::Octets(bytes) => println!("{}", encode(&bytes)),
                KeyMaterial::Jwk(_) => unreachable!("raw export never yields a JWK"),
            }
        }
        Commands::Encrypt { key, plaintext } => {
            let key_bytes = decode("--key", &key)?;
            let iv = random_iv();
            let handle_key = Key::new(
                "AES-GCM",
                true,
                KeyUsageSet::from_tokens(["encrypt"])?,
                KeyHandle::Secret(SecretBytes::new(key_bytes)),
            )?;
            let params = serde_json::json!({ "name": "AES-GCM", "iv": encode(&iv) });
            let descriptor = AlgorithmIdentifier::WithParams { name: "AES-GCM".to_string(), params };
            let ciphertext = subtle.encrypt(descriptor, handle_key, plaintext.into_bytes()).await?;
            let mut out = iv;
            out.extend_from_slice(&ciphertext);
            println!("{}", encode(&out));
        }
        Commands::Decrypt { key, ciphertext } => {
            let key_bytes = decode("--key", &key)?;
            let payload = decode("ciphertext", &ciphertext)?;
            if payload.len() < 12 {
                return Err(anyhow!("ciphertext is too short to contain a 12-byte iv"));
            }
            let (iv, body) = payload.split_at(12);
            let handle_key = Key::new(
                "AES-GCM",
                true,
                KeyUsageSet::from_tokens(["decrypt"])?,
                KeyHandle::Secret(SecretBytes::new(key_bytes)),
            )?;
            let params = serde_json::json!({ "name": "AES-GCM", "iv": encode(iv) });
            let descriptor = AlgorithmIdentifier::WithParams { name: "AES-GCM".to_string(), params };
            let plaintext = subtle.decrypt(descriptor, handle_key, body.to_vec()).await?;
            println!("{}", String::from_utf8_lossy(&plaintext));
        }
    }

    Ok(())
}

fn random_iv() -> Vec<u8> {
    use ring::rand::{SecureRandom, SystemRandom};
    let rng = SystemRandom::new();
    let mut iv = vec![0u8; 12];
    rng.fill(&mut iv).expect("system RNG failure generating an iv");
    iv
}
