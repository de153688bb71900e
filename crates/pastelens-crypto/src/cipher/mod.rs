//! The cipher engine: encoding chains around the algorithm primitives.
//!
//! Encryption decodes the plaintext through the profile's plaintext chain
//! (unless it is the identity), runs the primitive and encodes the raw
//! output through the ciphertext chain. Decryption mirrors those steps.

pub mod aes;
mod block_mode;
pub mod des;
pub mod rsa;

use tracing::trace;
use zeroize::Zeroizing;

pub use self::{aes::AesCipher, des::DesCipher, rsa::RsaCipher};
use crate::{
    cipher_trait::CipherAlgorithm,
    error::{CipherError, CryptoError},
    profile::{BlockMode, CipherProfile, SymmetricAlgorithm},
};

/// Encrypts `plaintext` with `profile` and returns the encoded ciphertext.
///
/// # Errors
///
/// Fails when the plaintext does not decode through a non-identity plaintext
/// chain, when key material is missing or invalid, or when the primitive
/// rejects the input (unaligned input without padding, RSA message too long).
pub fn encrypt(plaintext: &str, profile: &CipherProfile) -> Result<String, CryptoError> {
    let chain = profile.plaintext_encoding();
    let payload = if chain.is_identity() {
        Zeroizing::new(plaintext.as_bytes().to_vec())
    }
    else {
        Zeroizing::new(chain.decode(plaintext)?)
    };
    let raw = encrypt_bytes(&payload, profile)?;
    trace!("Encrypted {} bytes with profile '{}'", payload.len(), profile.name());
    Ok(profile.ciphertext_encoding().encode(&raw))
}

/// Decrypts `ciphertext` with `profile` and returns the plaintext text.
///
/// With the identity plaintext chain the recovered bytes must be UTF-8;
/// otherwise they are re-encoded through the plaintext chain.
///
/// # Errors
///
/// Everything [`decrypt_raw`] reports, plus [`CipherError::MalformedPlaintext`]
/// for non-UTF-8 output under the identity chain.
pub fn decrypt(ciphertext: &str, profile: &CipherProfile) -> Result<String, CryptoError> {
    let raw = decrypt_raw(ciphertext, profile)?;
    let chain = profile.plaintext_encoding();
    if chain.is_identity() {
        String::from_utf8(raw).map_err(|_| CipherError::MalformedPlaintext.into())
    }
    else {
        Ok(chain.encode(&raw))
    }
}

/// Decrypts `ciphertext` with `profile` and returns the recovered bytes
/// without any plaintext-side conversion.
///
/// CTR output has its trailing zero bytes trimmed. This is a known
/// limitation: a genuine plaintext ending in NUL bytes loses them.
///
/// # Errors
///
/// Fails when the ciphertext does not decode through the ciphertext chain,
/// when key material cannot be resolved, or when the primitive rejects the
/// ciphertext (alignment, padding, RSA failure).
pub fn decrypt_raw(ciphertext: &str, profile: &CipherProfile) -> Result<Vec<u8>, CryptoError> {
    let raw = profile.ciphertext_encoding().decode(ciphertext.trim())?;
    let mut plaintext = decrypt_bytes(&raw, profile)?;
    if let CipherProfile::Symmetric(symmetric) = profile {
        if symmetric.mode() == BlockMode::Ctr {
            let kept = plaintext.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
            plaintext.truncate(kept);
        }
    }
    Ok(plaintext)
}

fn encrypt_bytes(data: &[u8], profile: &CipherProfile) -> Result<Vec<u8>, CryptoError> {
    match profile {
        CipherProfile::Symmetric(p) => {
            match p.algorithm() {
                SymmetricAlgorithm::Aes => AesCipher::encrypt_bytes(data, p),
                SymmetricAlgorithm::Des => DesCipher::encrypt_bytes(data, p),
            }
        },
        CipherProfile::Asymmetric(p) => RsaCipher::encrypt_bytes(data, p),
    }
}

fn decrypt_bytes(data: &[u8], profile: &CipherProfile) -> Result<Vec<u8>, CryptoError> {
    match profile {
        CipherProfile::Symmetric(p) => {
            match p.algorithm() {
                SymmetricAlgorithm::Aes => AesCipher::decrypt_bytes(data, p),
                SymmetricAlgorithm::Des => DesCipher::decrypt_bytes(data, p),
            }
        },
        CipherProfile::Asymmetric(p) => RsaCipher::decrypt_bytes(data, p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::{Encoding, EncodingChain},
        error::DecodeError,
        profile::{KeyMaterial, Padding, SymmetricProfile},
    };

    fn aes(mode: BlockMode, padding: Padding, key: &str) -> CipherProfile {
        SymmetricProfile::builder("aes")
            .mode(mode)
            .padding(padding)
            .key(KeyMaterial::text(key))
            .iv(KeyMaterial::text("fedcba9876543210"))
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_round_trip_every_mode_and_padding() {
        let message = "Meet me at the usual place at ten.";
        for mode in BlockMode::ALL {
            for padding in [Padding::Pkcs7, Padding::AnsiX923, Padding::Iso7816, Padding::Zero] {
                let profile = aes(mode, padding, "0123456789abcdef");
                let ciphertext = encrypt(message, &profile).unwrap();
                assert!(Encoding::Base64.decode(&ciphertext).is_ok());
                assert_eq!(decrypt(&ciphertext, &profile).unwrap(), message, "{} {}", mode, padding);
            }
        }
    }

    #[test]
    fn test_ciphertext_chain_applied_in_order() {
        let profile: CipherProfile = SymmetricProfile::builder("chained")
            .key(KeyMaterial::text("0123456789abcdef"))
            .iv(KeyMaterial::text("fedcba9876543210"))
            .ciphertext_encoding("BASE64,URL".parse().unwrap())
            .build()
            .unwrap()
            .into();
        let ciphertext = encrypt("a message long enough to need several blocks", &profile).unwrap();
        assert!(!ciphertext.contains('='));
        assert!(!ciphertext.contains('/'));
        assert_eq!(
            decrypt(&ciphertext, &profile).unwrap(),
            "a message long enough to need several blocks"
        );
    }

    #[test]
    fn test_text_ciphertext_chain_cannot_be_built() {
        let build = |chain: &str| {
            SymmetricProfile::builder("cbc")
                .key(KeyMaterial::text("0123456789abcdef"))
                .iv(KeyMaterial::text("fedcba9876543210"))
                .ciphertext_encoding(chain.parse().unwrap())
                .build()
        };
        assert!(build("TEXT").is_err());

        let profile: CipherProfile = build("BASE64,TEXT").unwrap().into();
        let ciphertext = encrypt("attack at dawn", &profile).unwrap();
        assert_eq!(decrypt(&ciphertext, &profile).unwrap(), "attack at dawn");
    }

    #[test]
    fn test_plaintext_chain_decodes_before_encrypting() {
        let profile: CipherProfile = SymmetricProfile::builder("binary")
            .mode(BlockMode::Ecb)
            .key(KeyMaterial::text("0123456789abcdef"))
            .plaintext_encoding(EncodingChain::single(Encoding::Hex))
            .build()
            .unwrap()
            .into();
        let ciphertext = encrypt("00ff10", &profile).unwrap();
        assert_eq!(decrypt_raw(&ciphertext, &profile).unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(decrypt(&ciphertext, &profile).unwrap(), "00ff10");

        let result = encrypt("not hex", &profile);
        assert!(matches!(result, Err(CryptoError::Decode(DecodeError::Hex(_)))));
    }

    #[test]
    fn test_non_utf8_plaintext_is_malformed() {
        let binary: CipherProfile = SymmetricProfile::builder("binary")
            .mode(BlockMode::Ecb)
            .key(KeyMaterial::text("0123456789abcdef"))
            .plaintext_encoding(EncodingChain::single(Encoding::Hex))
            .build()
            .unwrap()
            .into();
        let text: CipherProfile = SymmetricProfile::builder("text")
            .mode(BlockMode::Ecb)
            .key(KeyMaterial::text("0123456789abcdef"))
            .build()
            .unwrap()
            .into();
        let ciphertext = encrypt("c328", &binary).unwrap();
        let result = decrypt(&ciphertext, &text);
        assert!(matches!(result, Err(CryptoError::Cipher(CipherError::MalformedPlaintext))));
    }

    #[test]
    fn test_ctr_trims_trailing_zero_bytes() {
        let profile = aes(BlockMode::Ctr, Padding::None, "0123456789abcdef");
        let ciphertext = encrypt("abc\0\0", &profile).unwrap();
        assert_eq!(decrypt(&ciphertext, &profile).unwrap(), "abc");

        let ofb = aes(BlockMode::Ofb, Padding::None, "0123456789abcdef");
        let ciphertext = encrypt("abc\0\0", &ofb).unwrap();
        assert_eq!(decrypt(&ciphertext, &ofb).unwrap(), "abc\0\0");
    }

    #[test]
    fn test_wrong_key_stream_mode_yields_noise() {
        let right = aes(BlockMode::Cfb, Padding::None, "0123456789abcdef");
        let wrong = aes(BlockMode::Cfb, Padding::None, "fedcba9876543210");
        let ciphertext = encrypt("hello stream cipher", &right).unwrap();
        let recovered = decrypt_raw(&ciphertext, &wrong).unwrap();
        assert_eq!(recovered.len(), "hello stream cipher".len());
        assert_ne!(recovered, b"hello stream cipher");
    }

    #[test]
    fn test_wrong_key_validating_padding_never_recovers() {
        let right = aes(BlockMode::Cbc, Padding::Pkcs7, "0123456789abcdef");
        let wrong = aes(BlockMode::Cbc, Padding::Pkcs7, "fedcba9876543210");
        let ciphertext = encrypt("hello block cipher", &right).unwrap();
        assert_ne!(decrypt(&ciphertext, &wrong).ok().as_deref(), Some("hello block cipher"));
    }

    #[test]
    fn test_ciphertext_not_in_chain_encoding() {
        let profile = aes(BlockMode::Cbc, Padding::Pkcs7, "0123456789abcdef");
        let result = decrypt("not base64!", &profile);
        assert!(matches!(result, Err(CryptoError::Decode(_))));
    }

    #[test]
    fn test_key_resolution_failure() {
        let profile: CipherProfile = SymmetricProfile::builder("bad key")
            .mode(BlockMode::Ecb)
            .key(KeyMaterial::hex("xyz"))
            .build()
            .unwrap()
            .into();
        let result = encrypt("data", &profile);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::KeyResolution {
                what: "key",
                ..
            }))
        ));
    }
}
