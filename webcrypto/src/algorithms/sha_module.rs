// /////////////////////////////////////////////////////////////////////////////
// WebCrypto Dispatch Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SHA Digest Algorithm Module
//!
//! One module instance per hash, registered under the hash's own name
//! (`"SHA-256"`, not a family name) since that is what a `digest`
//! descriptor names directly (spec §4.2, §10).

use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha384, Sha512};
use webcrypto_domain::registry::{AlgorithmModule, Operation};
use webcrypto_domain::value_objects::algorithm_params::{ParamDetail, Params};
use webcrypto_domain::value_objects::hash_algorithm::HashAlgorithm;
use webcrypto_domain::CryptoError;

pub struct ShaModule {
    hash: HashAlgorithm,
}

impl ShaModule {
    pub fn new(hash: HashAlgorithm) -> Self {
        Self { hash }
    }
}

impl AlgorithmModule for ShaModule {
    fn name(&self) -> &'static str {
        self.hash.as_str()
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Digest)
    }

    fn digest(&self, params: &Params, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match &params.detail {
            ParamDetail::Digest { hash } if *hash == self.hash => {}
            other => return Err(CryptoError::operation(format!("{} module received mismatched parameters: {other:?}", self.hash))),
        }
        Ok(match self.hash {
            HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_digest_is_deterministic_and_correct_length() {
        let module = ShaModule::new(HashAlgorithm::Sha256);
        let params = Params { name: "SHA-256".to_string(), detail: ParamDetail::Digest { hash: HashAlgorithm::Sha256 } };
        let first = module.digest(&params, b"hello").unwrap();
        let second = module.digest(&params, b"hello").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), HashAlgorithm::Sha256.output_len());
    }

    #[test]
    fn different_input_yields_different_digest() {
        let module = ShaModule::new(HashAlgorithm::Sha256);
        let params = Params { name: "SHA-256".to_string(), detail: ParamDetail::Digest { hash: HashAlgorithm::Sha256 } };
        let a = module.digest(&params, b"hello").unwrap();
        let b = module.digest(&params, b"world").unwrap();
        assert_ne!(a, b);
    }
}
