use tracing::trace;

use super::block_mode::{block_cipher_modes, resolve_iv, resolve_key};
use crate::{
    cipher_trait::CipherAlgorithm,
    error::{CipherError, CryptoError},
    profile::SymmetricProfile,
};

block_cipher_modes!(encrypt_des, decrypt_des, ::des::Des, ::ctr::Ctr64BE<::des::Des>);
block_cipher_modes!(encrypt_tdes2, decrypt_tdes2, ::des::TdesEde2, ::ctr::Ctr64BE<::des::TdesEde2>);
block_cipher_modes!(encrypt_tdes3, decrypt_tdes3, ::des::TdesEde3, ::ctr::Ctr64BE<::des::TdesEde3>);

/// DES family cipher: an 8-byte key selects single DES, 16 bytes two-key
/// Triple DES (EDE2) and 24 bytes three-key Triple DES (EDE3).
pub struct DesCipher;

impl CipherAlgorithm for DesCipher {
    type Profile = SymmetricProfile;

    fn encrypt_bytes(plaintext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = resolve_key(profile)?;
        let iv = resolve_iv(profile)?;
        trace!("DES ({} key bytes) {} encrypting {} bytes", key.len(), profile.mode(), plaintext.len());
        let ciphertext = match key.len() {
            8 => encrypt_des(profile.mode(), profile.padding(), &key, &iv, plaintext),
            16 => encrypt_tdes2(profile.mode(), profile.padding(), &key, &iv, plaintext),
            24 => encrypt_tdes3(profile.mode(), profile.padding(), &key, &iv, plaintext),
            actual => {
                Err(CipherError::InvalidKeyLength {
                    algorithm: "DES",
                    actual,
                })
            },
        }?;
        Ok(ciphertext)
    }

    fn decrypt_bytes(ciphertext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError> {
        let key = resolve_key(profile)?;
        let iv = resolve_iv(profile)?;
        trace!("DES ({} key bytes) {} decrypting {} bytes", key.len(), profile.mode(), ciphertext.len());
        let plaintext = match key.len() {
            8 => decrypt_des(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            16 => decrypt_tdes2(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            24 => decrypt_tdes3(profile.mode(), profile.padding(), &key, &iv, ciphertext),
            actual => {
                Err(CipherError::InvalidKeyLength {
                    algorithm: "DES",
                    actual,
                })
            },
        }?;
        Ok(plaintext)
    }
}

impl crate::cipher_trait::private::Sealed for DesCipher {}
