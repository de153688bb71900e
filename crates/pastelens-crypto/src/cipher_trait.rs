use crate::error::CryptoError;

/// Core trait for the cipher primitives behind the engine.
///
/// Implementations work on raw bytes only. Key/IV resolution happens inside
/// the implementation because each algorithm validates its own key forms;
/// plaintext and ciphertext encoding chains are applied by the engine in
/// [`crate::cipher`]. The trait is sealed: the engine dispatches over a
/// closed set of algorithms.
pub trait CipherAlgorithm: private::Sealed {
    /// Profile type carrying the algorithm's parameters.
    type Profile;

    /// Encrypts raw plaintext bytes.
    ///
    /// # Errors
    /// Returns `CipherError` wrapped in `CryptoError` when key material is
    /// missing or invalid, or when the input cannot be processed.
    fn encrypt_bytes(plaintext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts raw ciphertext bytes.
    ///
    /// # Errors
    /// Returns `CipherError` wrapped in `CryptoError` when key material is
    /// invalid, the ciphertext is malformed or its padding does not check.
    fn decrypt_bytes(ciphertext: &[u8], profile: &Self::Profile) -> Result<Vec<u8>, CryptoError>;
}

// Sealing the trait to keep the algorithm set closed
pub(crate) mod private {
    pub trait Sealed {}
}
