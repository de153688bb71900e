//! # Pastelens Crypto
//!
//! Reversible transforms for the Pastelens content engine: compound
//! binary-to-text encoding chains and a symmetric/asymmetric cipher engine
//! driven by named profiles.
//!
//! ## Design Principles
//!
//! - **Profiles are validated once**: a [`CipherProfile`] can only be built through a builder or
//!   deserialization path that enforces its invariants (non-empty key, IV for chaining modes, no
//!   padding on stream-like modes).
//! - **Sealed primitives**: [`CipherAlgorithm`] is implemented for AES, DES/3DES and RSA only.
//! - **Typed errors**: codec, cipher, profile and key failures each have their own enum under
//!   [`CryptoError`], so callers trying several candidates can tell them apart.
//! - **Key hygiene**: resolved key bytes and key text are zeroized when dropped.
//!
//! ## Usage
//!
//! ```rust
//! use pastelens_crypto::{decrypt, encrypt, BlockMode, CipherProfile, KeyMaterial, SymmetricProfile};
//!
//! let profile: CipherProfile = SymmetricProfile::builder("notes")
//!     .mode(BlockMode::Cbc)
//!     .key(KeyMaterial::text("0123456789abcdef"))
//!     .iv(KeyMaterial::text("fedcba9876543210"))
//!     .build()
//!     .unwrap()
//!     .into();
//!
//! let ciphertext = encrypt("hello", &profile).unwrap();
//! assert_eq!(decrypt(&ciphertext, &profile).unwrap(), "hello");
//! ```

pub mod cipher;
pub mod cipher_trait;
pub mod codec;
pub mod error;
pub mod keys;
pub mod profile;

pub use cipher::{decrypt, decrypt_raw, encrypt, AesCipher, DesCipher, RsaCipher};
pub use cipher_trait::CipherAlgorithm;
pub use codec::{decode, detect_and_decode, encode, DecodedCandidate, Encoding, EncodingChain};
pub use error::{CipherError, CryptoError, DecodeError, KeyError, ProfileError};
pub use keys::{generate_iv, generate_rsa_key_pair, generate_symmetric_key, RsaKeyPair, DEFAULT_RSA_BITS};
pub use profile::{
    AsymmetricProfile,
    AsymmetricProfileBuilder,
    BlockMode,
    CipherProfile,
    KeyMaterial,
    Padding,
    SymmetricAlgorithm,
    SymmetricProfile,
    SymmetricProfileBuilder,
};
