/// Top-level error type for all pastelens-crypto operations.
///
/// Codec failures, cipher failures, profile validation failures and key
/// management failures each have their own sub-enum so callers that try
/// several candidate interpretations can tell "this encoding did not fit"
/// apart from "this profile could not decrypt".
///
/// Error messages never include key bytes or recovered plaintext.
#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    /// Text did not satisfy an encoding step of a chain
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Encryption or decryption failed
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// A cipher profile violates its invariants
    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),

    /// Key generation or export failed
    #[error("Key management error: {0}")]
    KeyManagement(#[from] KeyError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a single step of an encoding chain.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Hex input was malformed (odd length or non-hex digit)
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Base64 input was malformed (alphabet, length or padding)
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A `%` escape was truncated or not followed by two hex digits
    #[error("invalid percent-encoding at byte {position}")]
    PercentEncoding {
        position: usize,
    },

    /// An intermediate layer of the chain was not UTF-8 text
    #[error("layer {layer} of the encoding chain is not valid UTF-8")]
    NotText {
        layer: usize,
    },

    /// The encoding name is not part of the catalog
    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),
}

/// Errors raised by the cipher engine.
#[derive(thiserror::Error, Debug)]
pub enum CipherError {
    /// The profile lacks the key material this direction needs
    #[error("key material missing: {what}")]
    MissingKeyMaterial {
        what: &'static str,
    },

    /// Key or IV text could not be decoded to bytes
    #[error("{what} could not be resolved: {source}")]
    KeyResolution {
        what: &'static str,
        #[source]
        source: DecodeError,
    },

    /// Key length does not match any variant of the algorithm
    #[error("invalid key length for {algorithm}: {actual} bytes")]
    InvalidKeyLength {
        algorithm: &'static str,
        actual:    usize,
    },

    /// IV length does not match the cipher block size
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength {
        expected: usize,
        actual:   usize,
    },

    /// Input to an unpadded block mode is not a multiple of the block size
    #[error("input of {len} bytes is not aligned to the {block_size}-byte block size")]
    UnalignedInput {
        len:        usize,
        block_size: usize,
    },

    /// The ciphertext could not be processed by the primitive
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Padding did not validate after block decryption
    #[error("padding check failed")]
    BadPadding,

    /// Decrypted bytes are not valid UTF-8 text
    #[error("decrypted data is not valid UTF-8 text")]
    MalformedPlaintext,

    /// The message does not fit the RSA modulus
    #[error("plaintext of {len} bytes exceeds the {max}-byte limit of the key")]
    PlaintextTooLong {
        len: usize,
        max: usize,
    },

    /// RSA operation failed or the key material was rejected
    #[error("asymmetric operation failed: {0}")]
    Asymmetric(String),
}

/// Errors raised while validating a cipher profile.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Profile has no name
    #[error("profile name must not be empty")]
    EmptyName,

    /// Symmetric profile has an empty key
    #[error("profile '{0}' requires a non-empty key")]
    EmptyKey(String),

    /// The mode chains blocks and needs an IV
    #[error("profile '{name}' uses {mode} which requires an IV")]
    MissingIv {
        name: String,
        mode: &'static str,
    },

    /// Asymmetric profile carries neither key
    #[error("profile '{0}' requires a public or a private key")]
    MissingAsymmetricKey(String),

    /// Ciphertext chain does not start with a binary-to-text encoding
    #[error("profile '{0}' needs a ciphertext encoding that starts with HEX, BASE64, BASE64_URL or URL")]
    TextCiphertext(String),

    /// Unknown algorithm, mode or padding identifier
    #[error("unknown {kind} '{value}'")]
    Unknown {
        kind:  &'static str,
        value: String,
    },
}

/// Errors raised by key generation.
#[derive(thiserror::Error, Debug)]
pub enum KeyError {
    /// Key generation failed
    #[error("key generation failed: {0}")]
    GenerationFailed(String),

    /// Key export failed
    #[error("key export failed")]
    ExportFailed,
}
