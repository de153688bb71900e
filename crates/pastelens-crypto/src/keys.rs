use std::fmt;

use ::rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey},
    RsaPrivateKey,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    error::{CryptoError, KeyError, ProfileError},
    profile::{AsymmetricProfile, KeyMaterial, SymmetricAlgorithm},
};

/// Modulus size used when the caller does not ask for one.
pub const DEFAULT_RSA_BITS: usize = 2048;

const MIN_RSA_BITS: usize = 512;
const MAX_RSA_BITS: usize = 8192;

/// A freshly generated RSA key pair as base64 DER bodies, without PEM
/// header or footer lines.
#[derive(Clone, Serialize)]
pub struct RsaKeyPair {
    /// SubjectPublicKeyInfo DER, base64
    pub public_key:  String,
    /// PKCS#8 DER, base64
    pub private_key: String,
}

impl RsaKeyPair {
    /// Wraps the pair into an asymmetric profile that can both encrypt and decrypt.
    pub fn to_profile(&self, name: impl Into<String>) -> Result<AsymmetricProfile, ProfileError> {
        AsymmetricProfile::builder(name)
            .public_key(KeyMaterial::base64(self.public_key.clone()))
            .private_key(KeyMaterial::base64(self.private_key.clone()))
            .build()
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Generates an RSA key pair with a `bits`-bit modulus.
///
/// Prime generation is CPU bound and runs on tokio's blocking pool.
///
/// # Errors
/// Returns `KeyError::GenerationFailed` for unsupported sizes or when the
/// primitive fails, and `KeyError::ExportFailed` when DER export fails.
pub async fn generate_rsa_key_pair(bits: usize) -> Result<RsaKeyPair, CryptoError> {
    if !(MIN_RSA_BITS ..= MAX_RSA_BITS).contains(&bits) || bits % 8 != 0 {
        return Err(KeyError::GenerationFailed(format!("unsupported modulus size {}", bits)).into());
    }

    debug!("Generating {}-bit RSA key pair", bits);
    let key = tokio::task::spawn_blocking(move || RsaPrivateKey::new(&mut rand::thread_rng(), bits))
        .await
        .map_err(|e| KeyError::GenerationFailed(e.to_string()))?
        .map_err(|e| KeyError::GenerationFailed(e.to_string()))?;

    let private_der = key.to_pkcs8_der().map_err(|_| KeyError::ExportFailed)?;
    let public_der = key
        .to_public_key()
        .to_public_key_der()
        .map_err(|_| KeyError::ExportFailed)?;
    debug!("RSA key pair generated");

    Ok(RsaKeyPair {
        public_key:  STANDARD.encode(public_der.as_bytes()),
        private_key: STANDARD.encode(private_der.as_bytes()),
    })
}

/// Generates a random key of the algorithm's default size (AES-256, three-key 3DES).
pub fn generate_symmetric_key(algorithm: SymmetricAlgorithm) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; algorithm.default_key_size()]);
    rand::thread_rng().fill_bytes(&mut key);
    debug!("Generated {}-byte {} key", key.len(), algorithm);
    key
}

/// Generates a random IV of the algorithm's block size.
pub fn generate_iv(algorithm: SymmetricAlgorithm) -> Vec<u8> {
    let mut iv = vec![0u8; algorithm.block_size()];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}
