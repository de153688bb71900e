//! Mode and padding plumbing shared by the block ciphers.

use ::aes::cipher::{
    block_padding::{AnsiX923, Iso7816, NoPadding, Pkcs7, ZeroPadding},
    BlockDecryptMut,
    BlockEncryptMut,
};
use zeroize::Zeroizing;

use crate::{
    error::{CipherError, CryptoError},
    profile::{KeyMaterial, Padding, SymmetricProfile},
};

pub(crate) fn ensure_aligned(len: usize, block_size: usize) -> Result<(), CipherError> {
    if len % block_size == 0 {
        Ok(())
    }
    else {
        Err(CipherError::UnalignedInput {
            len,
            block_size,
        })
    }
}

/// Pads and encrypts with any block mode that processes whole blocks.
pub(crate) fn pad_encrypt<E: BlockEncryptMut>(encryptor: E, padding: Padding, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let ciphertext = match padding {
        Padding::Pkcs7 => encryptor.encrypt_padded_vec_mut::<Pkcs7>(data),
        Padding::AnsiX923 => encryptor.encrypt_padded_vec_mut::<AnsiX923>(data),
        Padding::Iso7816 => encryptor.encrypt_padded_vec_mut::<Iso7816>(data),
        Padding::Zero => encryptor.encrypt_padded_vec_mut::<ZeroPadding>(data),
        Padding::None => {
            ensure_aligned(data.len(), E::block_size())?;
            encryptor.encrypt_padded_vec_mut::<NoPadding>(data)
        },
    };
    Ok(ciphertext)
}

/// Decrypts and unpads with any block mode that processes whole blocks.
pub(crate) fn unpad_decrypt<D: BlockDecryptMut>(decryptor: D, padding: Padding, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    if let Err(e) = ensure_aligned(data.len(), D::block_size()) {
        return Err(CipherError::MalformedCiphertext(e.to_string()));
    }
    let plaintext = match padding {
        Padding::Pkcs7 => decryptor.decrypt_padded_vec_mut::<Pkcs7>(data),
        Padding::AnsiX923 => decryptor.decrypt_padded_vec_mut::<AnsiX923>(data),
        Padding::Iso7816 => decryptor.decrypt_padded_vec_mut::<Iso7816>(data),
        Padding::Zero => decryptor.decrypt_padded_vec_mut::<ZeroPadding>(data),
        Padding::None => decryptor.decrypt_padded_vec_mut::<NoPadding>(data),
    };
    plaintext.map_err(|_| CipherError::BadPadding)
}

/// Resolves the key of a symmetric profile and checks its length.
pub(crate) fn resolve_key(profile: &SymmetricProfile) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let key = resolve(profile.key(), "key")?;
    let algorithm = profile.algorithm();
    if !algorithm.key_sizes().contains(&key.len()) {
        return Err(CipherError::InvalidKeyLength {
            algorithm: algorithm.name(),
            actual:    key.len(),
        }
        .into());
    }
    Ok(key)
}

/// Resolves the IV of a symmetric profile. ECB needs none and gets an empty slice.
pub(crate) fn resolve_iv(profile: &SymmetricProfile) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if !profile.mode().requires_iv() {
        return Ok(Zeroizing::new(Vec::new()));
    }
    let material = profile.iv().ok_or(CipherError::MissingKeyMaterial {
        what: "iv",
    })?;
    let iv = resolve(material, "iv")?;
    let expected = profile.algorithm().block_size();
    if iv.len() != expected {
        return Err(CipherError::InvalidIvLength {
            expected,
            actual: iv.len(),
        }
        .into());
    }
    Ok(iv)
}

pub(crate) fn resolve(material: &KeyMaterial, what: &'static str) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    material.resolve().map_err(|source| {
        CipherError::KeyResolution {
            what,
            source,
        }
    })
}

/// Generates `encrypt`/`decrypt` functions for one concrete block cipher.
///
/// `$ctr` is the CTR flavour matching the cipher's block size.
macro_rules! block_cipher_modes {
    ($encrypt:ident, $decrypt:ident, $cipher:ty, $ctr:ty) => {
        fn $encrypt(
            mode: $crate::profile::BlockMode,
            padding: $crate::profile::Padding,
            key: &[u8],
            iv: &[u8],
            data: &[u8],
        ) -> Result<Vec<u8>, $crate::error::CipherError> {
            use ::aes::cipher::{AsyncStreamCipher, KeyInit, KeyIvInit, StreamCipher};

            use $crate::{cipher::block_mode::pad_encrypt, error::CipherError, profile::BlockMode};

            let invalid = |e: ::aes::cipher::InvalidLength| CipherError::MalformedCiphertext(e.to_string());
            match mode {
                BlockMode::Cbc => pad_encrypt(cbc::Encryptor::<$cipher>::new_from_slices(key, iv).map_err(invalid)?, padding, data),
                BlockMode::Ecb => pad_encrypt(ecb::Encryptor::<$cipher>::new_from_slice(key).map_err(invalid)?, padding, data),
                BlockMode::Cfb => {
                    let mut buf = data.to_vec();
                    cfb_mode::Encryptor::<$cipher>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .encrypt(&mut buf);
                    Ok(buf)
                },
                BlockMode::Ofb => {
                    let mut buf = data.to_vec();
                    ofb::Ofb::<$cipher>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                },
                BlockMode::Ctr => {
                    let mut buf = data.to_vec();
                    <$ctr>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                },
            }
        }

        fn $decrypt(
            mode: $crate::profile::BlockMode,
            padding: $crate::profile::Padding,
            key: &[u8],
            iv: &[u8],
            data: &[u8],
        ) -> Result<Vec<u8>, $crate::error::CipherError> {
            use ::aes::cipher::{AsyncStreamCipher, KeyInit, KeyIvInit, StreamCipher};

            use $crate::{cipher::block_mode::unpad_decrypt, error::CipherError, profile::BlockMode};

            let invalid = |e: ::aes::cipher::InvalidLength| CipherError::MalformedCiphertext(e.to_string());
            match mode {
                BlockMode::Cbc => unpad_decrypt(cbc::Decryptor::<$cipher>::new_from_slices(key, iv).map_err(invalid)?, padding, data),
                BlockMode::Ecb => unpad_decrypt(ecb::Decryptor::<$cipher>::new_from_slice(key).map_err(invalid)?, padding, data),
                BlockMode::Cfb => {
                    let mut buf = data.to_vec();
                    cfb_mode::Decryptor::<$cipher>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .decrypt(&mut buf);
                    Ok(buf)
                },
                BlockMode::Ofb => {
                    let mut buf = data.to_vec();
                    ofb::Ofb::<$cipher>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                },
                BlockMode::Ctr => {
                    let mut buf = data.to_vec();
                    <$ctr>::new_from_slices(key, iv)
                        .map_err(invalid)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                },
            }
        }
    };
}

pub(crate) use block_cipher_modes;
