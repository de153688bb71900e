use ::rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    traits::PublicKeyParts,
    Pkcs1v15Encrypt,
    RsaPrivateKey,
    RsaPublicKey,
};
use tracing::trace;
use zeroize::Zeroizing;

use super::block_mode::resolve;
use crate::{
    cipher_trait::CipherAlgorithm,
    codec::Encoding,
    error::{CipherError, CryptoError},
    profile::{AsymmetricProfile, KeyMaterial},
};

/// Bytes of PKCS#1 v1.5 encryption padding overhead.
const PKCS1_OVERHEAD: usize = 11;

/// RSA with PKCS#1 v1.5 encryption padding.
///
/// Public keys are SubjectPublicKeyInfo DER (bare PKCS#1 accepted), private
/// keys PKCS#8 DER (bare PKCS#1 accepted).
pub struct RsaCipher;

impl RsaCipher {
    /// Largest message the public key of `profile` can encrypt.
    pub fn max_message_len(profile: &AsymmetricProfile) -> Result<usize, CryptoError> {
        Ok(public_key(profile)?.size().saturating_sub(PKCS1_OVERHEAD))
    }
}

impl CipherAlgorithm for RsaCipher {
    type Profile = AsymmetricProfile;

    fn encrypt_bytes(plaintext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = public_key(profile)?;
        let max = key.size().saturating_sub(PKCS1_OVERHEAD);
        if plaintext.len() > max {
            return Err(CipherError::PlaintextTooLong {
                len: plaintext.len(),
                max,
            }
            .into());
        }
        trace!("RSA-{} encrypting {} bytes", key.size() * 8, plaintext.len());
        let mut rng = rand::thread_rng();
        key.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| CipherError::Asymmetric(e.to_string()).into())
    }

    fn decrypt_bytes(ciphertext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = private_key(profile)?;
        trace!("RSA-{} decrypting {} bytes", key.size() * 8, ciphertext.len());
        key.decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|e| CipherError::Asymmetric(e.to_string()).into())
    }
}

impl crate::cipher_trait::private::Sealed for RsaCipher {}

/// DER bytes of an RSA key. Text given with the identity chain is read as base64.
fn der_bytes(material: &KeyMaterial, what: &'static str) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    if material.encoding().is_identity() {
        Encoding::Base64
            .decode(material.value())
            .map(Zeroizing::new)
            .map_err(|source| {
                CipherError::KeyResolution {
                    what,
                    source,
                }
            })
    }
    else {
        resolve(material, what)
    }
}

fn public_key(profile: &AsymmetricProfile) -> Result<RsaPublicKey, CryptoError> {
    let material = profile.public_key().ok_or(CipherError::MissingKeyMaterial {
        what: "public key",
    })?;
    let der = der_bytes(material, "public key")?;
    let key = RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|e| CipherError::Asymmetric(format!("unreadable public key: {}", e)))?;
    Ok(key)
}

fn private_key(profile: &AsymmetricProfile) -> Result<RsaPrivateKey, CryptoError> {
    let material = profile.private_key().ok_or(CipherError::MissingKeyMaterial {
        what: "private key",
    })?;
    let der = der_bytes(material, "private key")?;
    let key = RsaPrivateKey::from_pkcs8_der(&der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
        .map_err(|e| CipherError::Asymmetric(format!("unreadable private key: {}", e)))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use ::rsa::{
        pkcs1::EncodeRsaPublicKey,
        pkcs8::{EncodePrivateKey, EncodePublicKey},
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use super::*;

    static KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap());

    fn spki_base64() -> String { STANDARD.encode(KEY.to_public_key().to_public_key_der().unwrap().as_bytes()) }

    fn pkcs8_base64() -> String { STANDARD.encode(KEY.to_pkcs8_der().unwrap().as_bytes()) }

    fn full_profile() -> AsymmetricProfile {
        AsymmetricProfile::builder("rsa")
            .public_key(KeyMaterial::text(spki_base64()))
            .private_key(KeyMaterial::base64(pkcs8_base64()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let profile = full_profile();
        let ciphertext = RsaCipher::encrypt_bytes(b"Hello, world!", &profile).unwrap();
        assert_eq!(ciphertext.len(), 128);
        assert_eq!(RsaCipher::decrypt_bytes(&ciphertext, &profile).unwrap(), b"Hello, world!");
    }

    #[test]
    fn test_pkcs1_public_key_fallback() {
        let pkcs1 = STANDARD.encode(KEY.to_public_key().to_pkcs1_der().unwrap().as_bytes());
        let profile = AsymmetricProfile::builder("rsa")
            .public_key(KeyMaterial::base64(pkcs1))
            .build()
            .unwrap();
        assert!(RsaCipher::encrypt_bytes(b"data", &profile).is_ok());
    }

    #[test]
    fn test_message_too_long() {
        let profile = full_profile();
        assert_eq!(RsaCipher::max_message_len(&profile).unwrap(), 117);
        let result = RsaCipher::encrypt_bytes(&[b'a'; 118], &profile);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::PlaintextTooLong {
                len: 118,
                max: 117,
            }))
        ));
    }

    #[test]
    fn test_direction_requires_matching_key() {
        let public_only = AsymmetricProfile::builder("rsa")
            .public_key(KeyMaterial::text(spki_base64()))
            .build()
            .unwrap();
        let result = RsaCipher::decrypt_bytes(&[0u8; 128], &public_only);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::MissingKeyMaterial {
                what: "private key",
            }))
        ));
    }

    #[test]
    fn test_garbage_ciphertext_fails() {
        let profile = full_profile();
        let result = RsaCipher::decrypt_bytes(&[7u8; 128], &profile);
        assert!(matches!(result, Err(CryptoError::Cipher(CipherError::Asymmetric(_)))));
    }

    #[test]
    fn test_unreadable_key() {
        let profile = AsymmetricProfile::builder("rsa")
            .public_key(KeyMaterial::base64("AAAA"))
            .build()
            .unwrap();
        let result = RsaCipher::encrypt_bytes(b"data", &profile);
        assert!(matches!(result, Err(CryptoError::Cipher(CipherError::Asymmetric(_)))));
    }
}
