use tracing::trace;

use super::block_mode::{block_cipher_modes, resolve_iv, resolve_key};
use crate::{
    cipher_trait::CipherAlgorithm,
    error::{CipherError, CryptoError},
    profile::SymmetricProfile,
};

block_cipher_modes!(encrypt_aes128, decrypt_aes128, ::aes::Aes128, ::ctr::Ctr128BE<::aes::Aes128>);
block_cipher_modes!(encrypt_aes192, decrypt_aes192, ::aes::Aes192, ::ctr::Ctr128BE<::aes::Aes192>);
block_cipher_modes!(encrypt_aes256, decrypt_aes256, ::aes::Aes256, ::ctr::Ctr128BE<::aes::Aes256>);

/// AES in any of the supported modes. The variant (128/192/256) follows the
/// resolved key length; the CTR counter is the whole 16-byte IV, big-endian.
pub struct AesCipher;

impl CipherAlgorithm for AesCipher {
    type Profile = SymmetricProfile;

    fn encrypt_bytes(plaintext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = resolve_key(profile)?;
        let iv = resolve_iv(profile)?;
        trace!("AES-{}-{} encrypting {} bytes", key.len() * 8, profile.mode(), plaintext.len());
        let ciphertext = match key.len() {
            16 => encrypt_aes128(profile.mode(), profile.padding(), &key, &iv, plaintext),
            24 => encrypt_aes192(profile.mode(), profile.padding(), &key, &iv, plaintext),
            32 => encrypt_aes256(profile.mode(), profile.padding(), &key, &iv, plaintext),
            actual => {
                Err(CipherError::InvalidKeyLength {
                    algorithm: "AES",
                    actual,
                })
            },
        }?;
        Ok(ciphertext)
    }

    fn decrypt_bytes(ciphertext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = resolve_key(profile)?;
        let iv = resolve_iv(profile)?;
        trace!("AES-{}-{} decrypting {} bytes", key.len() * 8, profile.mode(), ciphertext.len());
        let plaintext = match key.len() {
            16 => decrypt_aes128(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            24 => decrypt_aes192(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            32 => decrypt_aes256(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            actual => {
                Err(CipherError::InvalidKeyLength {
                    algorithm: "AES",
                    actual,
                })
            },
        }?;
        Ok(plaintext)
    }
}

impl crate::cipher_trait::private::Sealed for AesCipher {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::{Encoding, EncodingChain},
        profile::{BlockMode, KeyMaterial, Padding, SymmetricAlgorithm},
    };

    fn profile(key_hex: &str, mode: BlockMode, padding: Padding) -> SymmetricProfile {
        SymmetricProfile::builder("aes")
            .algorithm(SymmetricAlgorithm::Aes)
            .mode(mode)
            .padding(padding)
            .key(KeyMaterial::hex(key_hex))
            .iv(KeyMaterial::hex("000102030405060708090a0b0c0d0e0f"))
            .ciphertext_encoding(EncodingChain::single(Encoding::Hex))
            .build()
            .unwrap()
    }

    #[test]
    fn test_fips197_known_answer() {
        // FIPS-197 appendix C.1
        let profile = profile("000102030405060708090a0b0c0d0e0f", BlockMode::Ecb, Padding::None);
        let plaintext = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let ciphertext = AesCipher::encrypt_bytes(&plaintext, &profile).unwrap();
        assert_eq!(hex::encode(&ciphertext), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(AesCipher::decrypt_bytes(&ciphertext, &profile).unwrap(), plaintext);
    }

    #[test]
    fn test_all_key_sizes_and_modes() {
        let keys = [
            "000102030405060708090a0b0c0d0e0f",
            "000102030405060708090a0b0c0d0e0f1011121314151617",
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        ];
        let data = b"The quick brown fox jumps over the lazy dog";
        for key in keys {
            for mode in BlockMode::ALL {
                let profile = profile(key, mode, Padding::Pkcs7);
                let ciphertext = AesCipher::encrypt_bytes(data, &profile).unwrap();
                assert_ne!(ciphertext.as_slice(), data.as_slice());
                let plaintext = AesCipher::decrypt_bytes(&ciphertext, &profile).unwrap();
                assert_eq!(plaintext, data, "AES {} {}", key.len() * 4, mode);
            }
        }
    }

    #[test]
    fn test_stream_modes_preserve_length() {
        for mode in [BlockMode::Cfb, BlockMode::Ofb, BlockMode::Ctr] {
            let profile = profile("000102030405060708090a0b0c0d0e0f", mode, Padding::None);
            let ciphertext = AesCipher::encrypt_bytes(b"odd length!", &profile).unwrap();
            assert_eq!(ciphertext.len(), 11);
        }
    }

    #[test]
    fn test_invalid_key_length() {
        let profile = profile("0001020304", BlockMode::Cbc, Padding::Pkcs7);
        let result = AesCipher::encrypt_bytes(b"data", &profile);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::InvalidKeyLength {
                algorithm: "AES",
                actual:    5,
            }))
        ));
    }

    #[test]
    fn test_invalid_iv_length() {
        let profile = SymmetricProfile::builder("aes")
            .key(KeyMaterial::text("0123456789abcdef"))
            .iv(KeyMaterial::text("short"))
            .build()
            .unwrap();
        let result = AesCipher::encrypt_bytes(b"data", &profile);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::InvalidIvLength {
                expected: 16,
                actual:   5,
            }))
        ));
    }

    #[test]
    fn test_unaligned_input_without_padding() {
        let profile = profile("000102030405060708090a0b0c0d0e0f", BlockMode::Cbc, Padding::None);
        let result = AesCipher::encrypt_bytes(b"not sixteen", &profile);
        assert!(matches!(
            result,
            Err(CryptoError::Cipher(CipherError::UnalignedInput {
                len:        11,
                block_size: 16,
            }))
        ));

        let result = AesCipher::decrypt_bytes(&[0u8; 17], &profile);
        assert!(matches!(result, Err(CryptoError::Cipher(CipherError::MalformedCiphertext(_)))));
    }
}
