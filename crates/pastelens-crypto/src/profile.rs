use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    codec::{Encoding, EncodingChain},
    error::{DecodeError, ProfileError},
};

/// Symmetric block cipher families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SymmetricAlgorithm {
    /// AES-128/192/256, selected by key length
    Aes,
    /// Single DES or two/three-key Triple DES, selected by key length
    #[serde(alias = "3DES", alias = "TDES")]
    Des,
}

impl SymmetricAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes => "AES",
            Self::Des => "DES",
        }
    }

    /// Block size in bytes; also the required IV length.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Aes => 16,
            Self::Des => 8,
        }
    }

    /// Accepted key lengths in bytes.
    pub const fn key_sizes(self) -> &'static [usize] {
        match self {
            Self::Aes => &[16, 24, 32],
            Self::Des => &[8, 16, 24],
        }
    }

    /// Key length used when generating fresh keys.
    pub const fn default_key_size(self) -> usize {
        match self {
            Self::Aes => 32,
            Self::Des => 24,
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for SymmetricAlgorithm {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AES" => Ok(Self::Aes),
            "DES" | "3DES" | "TDES" => Ok(Self::Des),
            _ => {
                Err(ProfileError::Unknown {
                    kind:  "algorithm",
                    value: s.to_owned(),
                })
            },
        }
    }
}

/// Block cipher mode of operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockMode {
    Cbc,
    Ecb,
    Cfb,
    Ofb,
    Ctr,
}

impl BlockMode {
    pub const ALL: [Self; 5] = [Self::Cbc, Self::Ecb, Self::Cfb, Self::Ofb, Self::Ctr];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cbc => "CBC",
            Self::Ecb => "ECB",
            Self::Cfb => "CFB",
            Self::Ofb => "OFB",
            Self::Ctr => "CTR",
        }
    }

    /// Stream-like modes take input of any length and never pad.
    pub const fn is_stream_like(self) -> bool { matches!(self, Self::Cfb | Self::Ofb | Self::Ctr) }

    pub const fn requires_iv(self) -> bool { !matches!(self, Self::Ecb) }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for BlockMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ProfileError::Unknown {
                    kind:  "mode",
                    value: s.to_owned(),
                }
            })
    }
}

/// Block padding scheme for CBC and ECB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Padding {
    #[default]
    Pkcs7,
    AnsiX923,
    Iso7816,
    Zero,
    None,
}

impl Padding {
    pub const ALL: [Self; 5] = [Self::Pkcs7, Self::AnsiX923, Self::Iso7816, Self::Zero, Self::None];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pkcs7 => "PKCS7",
            Self::AnsiX923 => "ANSI_X923",
            Self::Iso7816 => "ISO7816",
            Self::Zero => "ZERO",
            Self::None => "NONE",
        }
    }

    /// True when unpadding rejects most wrong-key outputs.
    pub const fn validates(self) -> bool { matches!(self, Self::Pkcs7 | Self::AnsiX923 | Self::Iso7816) }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Padding {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|padding| padding.name() == normalized || padding.name().replace('_', "") == normalized)
            .ok_or_else(|| {
                ProfileError::Unknown {
                    kind:  "padding",
                    value: s.to_owned(),
                }
            })
    }
}

/// Key, IV or RSA key text together with the chain that turns it into bytes.
///
/// The text is wiped when the material is dropped and never shows up in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    value:    String,
    #[serde(default)]
    encoding: EncodingChain,
}

impl KeyMaterial {
    pub fn new(value: impl Into<String>, encoding: EncodingChain) -> Self {
        Self {
            value: value.into(),
            encoding,
        }
    }

    /// Key text used verbatim as UTF-8 bytes.
    pub fn text(value: impl Into<String>) -> Self { Self::new(value, EncodingChain::identity()) }

    pub fn hex(value: impl Into<String>) -> Self { Self::new(value, EncodingChain::single(Encoding::Hex)) }

    pub fn base64(value: impl Into<String>) -> Self { Self::new(value, EncodingChain::single(Encoding::Base64)) }

    pub fn value(&self) -> &str { &self.value }

    pub const fn encoding(&self) -> &EncodingChain { &self.encoding }

    pub fn is_empty(&self) -> bool { self.value.trim().is_empty() }

    /// Decodes the text through its chain into raw key bytes.
    pub fn resolve(&self) -> Result<Zeroizing<Vec<u8>>, DecodeError> { self.encoding.decode(&self.value).map(Zeroizing::new) }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("value", &"[REDACTED]")
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) { self.value.zeroize(); }
}

fn default_ciphertext_encoding() -> EncodingChain { EncodingChain::single(Encoding::Base64) }

/// A validated AES or DES profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetricProfile {
    name:                String,
    algorithm:           SymmetricAlgorithm,
    mode:                BlockMode,
    padding:             Padding,
    key:                 KeyMaterial,
    iv:                  Option<KeyMaterial>,
    plaintext_encoding:  EncodingChain,
    ciphertext_encoding: EncodingChain,
}

impl SymmetricProfile {
    pub fn builder(name: impl Into<String>) -> SymmetricProfileBuilder { SymmetricProfileBuilder::new(name) }

    pub fn name(&self) -> &str { &self.name }

    pub const fn algorithm(&self) -> SymmetricAlgorithm { self.algorithm }

    pub const fn mode(&self) -> BlockMode { self.mode }

    /// Padding in effect; always [`Padding::None`] for stream-like modes.
    pub const fn padding(&self) -> Padding { self.padding }

    pub const fn key(&self) -> &KeyMaterial { &self.key }

    pub const fn iv(&self) -> Option<&KeyMaterial> { self.iv.as_ref() }

    pub const fn plaintext_encoding(&self) -> &EncodingChain { &self.plaintext_encoding }

    pub const fn ciphertext_encoding(&self) -> &EncodingChain { &self.ciphertext_encoding }
}

/// Builder for [`SymmetricProfile`]. Defaults to AES-CBC with PKCS7 padding,
/// identity plaintext encoding and base64 ciphertext encoding.
#[derive(Debug)]
pub struct SymmetricProfileBuilder {
    name:                String,
    algorithm:           SymmetricAlgorithm,
    mode:                BlockMode,
    padding:             Padding,
    key:                 Option<KeyMaterial>,
    iv:                  Option<KeyMaterial>,
    plaintext_encoding:  EncodingChain,
    ciphertext_encoding: EncodingChain,
}

impl SymmetricProfileBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name:                name.into(),
            algorithm:           SymmetricAlgorithm::Aes,
            mode:                BlockMode::Cbc,
            padding:             Padding::Pkcs7,
            key:                 None,
            iv:                  None,
            plaintext_encoding:  EncodingChain::identity(),
            ciphertext_encoding: default_ciphertext_encoding(),
        }
    }

    pub const fn algorithm(mut self, algorithm: SymmetricAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub const fn mode(mut self, mode: BlockMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn key(mut self, key: KeyMaterial) -> Self {
        self.key = Some(key);
        self
    }

    pub fn iv(mut self, iv: KeyMaterial) -> Self {
        self.iv = Some(iv);
        self
    }

    pub fn plaintext_encoding(mut self, chain: EncodingChain) -> Self {
        self.plaintext_encoding = chain;
        self
    }

    pub fn ciphertext_encoding(mut self, chain: EncodingChain) -> Self {
        self.ciphertext_encoding = chain;
        self
    }

    /// Validates the profile.
    ///
    /// # Errors
    ///
    /// Fails when the name or key is empty, when a mode other than ECB
    /// has no IV, or when the ciphertext chain does not start with a
    /// binary-to-text encoding. Key and IV lengths are checked when the profile is used,
    /// since they depend on the key encoding.
    pub fn build(self) -> Result<SymmetricProfile, ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let key = match self.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ProfileError::EmptyKey(self.name)),
        };
        let iv = self.iv.filter(|iv| !iv.is_empty());
        if self.mode.requires_iv() && iv.is_none() {
            return Err(ProfileError::MissingIv {
                name: self.name,
                mode: self.mode.name(),
            });
        }
        if !is_binary_safe(&self.ciphertext_encoding) {
            return Err(ProfileError::TextCiphertext(self.name));
        }
        let padding = if self.mode.is_stream_like() {
            Padding::None
        }
        else {
            self.padding
        };

        Ok(SymmetricProfile {
            name: self.name,
            algorithm: self.algorithm,
            mode: self.mode,
            padding,
            key,
            iv,
            plaintext_encoding: self.plaintext_encoding,
            ciphertext_encoding: self.ciphertext_encoding,
        })
    }
}

/// A validated RSA (PKCS#1 v1.5) profile.
///
/// Keys are DER bodies. Key material declared with the identity chain is read
/// as base64, the form key generation and most tools print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsymmetricProfile {
    name:                String,
    public_key:          Option<KeyMaterial>,
    private_key:         Option<KeyMaterial>,
    plaintext_encoding:  EncodingChain,
    ciphertext_encoding: EncodingChain,
}

impl AsymmetricProfile {
    pub fn builder(name: impl Into<String>) -> AsymmetricProfileBuilder {
        AsymmetricProfileBuilder {
            name:                name.into(),
            public_key:          None,
            private_key:         None,
            plaintext_encoding:  EncodingChain::identity(),
            ciphertext_encoding: default_ciphertext_encoding(),
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub const fn public_key(&self) -> Option<&KeyMaterial> { self.public_key.as_ref() }

    pub const fn private_key(&self) -> Option<&KeyMaterial> { self.private_key.as_ref() }

    pub const fn plaintext_encoding(&self) -> &EncodingChain { &self.plaintext_encoding }

    pub const fn ciphertext_encoding(&self) -> &EncodingChain { &self.ciphertext_encoding }
}

#[derive(Debug)]
pub struct AsymmetricProfileBuilder {
    name:                String,
    public_key:          Option<KeyMaterial>,
    private_key:         Option<KeyMaterial>,
    plaintext_encoding:  EncodingChain,
    ciphertext_encoding: EncodingChain,
}

impl AsymmetricProfileBuilder {
    pub fn public_key(mut self, key: KeyMaterial) -> Self {
        self.public_key = Some(key);
        self
    }

    pub fn private_key(mut self, key: KeyMaterial) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn plaintext_encoding(mut self, chain: EncodingChain) -> Self {
        self.plaintext_encoding = chain;
        self
    }

    pub fn ciphertext_encoding(mut self, chain: EncodingChain) -> Self {
        self.ciphertext_encoding = chain;
        self
    }

    /// Validates the profile.
    ///
    /// # Errors
    ///
    /// Fails when the name is empty, when neither key is present or when
    /// the ciphertext chain does not start with a binary-to-text encoding. Whether
    /// the right key exists for a direction is checked at use.
    pub fn build(self) -> Result<AsymmetricProfile, ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let public_key = self.public_key.filter(|key| !key.is_empty());
        let private_key = self.private_key.filter(|key| !key.is_empty());
        if public_key.is_none() && private_key.is_none() {
            return Err(ProfileError::MissingAsymmetricKey(self.name));
        }
        if !is_binary_safe(&self.ciphertext_encoding) {
            return Err(ProfileError::TextCiphertext(self.name));
        }
        Ok(AsymmetricProfile {
            name: self.name,
            public_key,
            private_key,
            plaintext_encoding: self.plaintext_encoding,
            ciphertext_encoding: self.ciphertext_encoding,
        })
    }
}

/// A named cipher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "RawProfile")]
pub enum CipherProfile {
    Symmetric(SymmetricProfile),
    Asymmetric(AsymmetricProfile),
}

impl CipherProfile {
    pub fn name(&self) -> &str {
        match self {
            Self::Symmetric(p) => p.name(),
            Self::Asymmetric(p) => p.name(),
        }
    }

    pub const fn is_asymmetric(&self) -> bool { matches!(self, Self::Asymmetric(_)) }

    pub const fn plaintext_encoding(&self) -> &EncodingChain {
        match self {
            Self::Symmetric(p) => p.plaintext_encoding(),
            Self::Asymmetric(p) => p.plaintext_encoding(),
        }
    }

    pub const fn ciphertext_encoding(&self) -> &EncodingChain {
        match self {
            Self::Symmetric(p) => p.ciphertext_encoding(),
            Self::Asymmetric(p) => p.ciphertext_encoding(),
        }
    }

    /// True when a wrong key makes decryption fail instead of yielding noise.
    ///
    /// RSA rejects wrong keys through its PKCS#1 padding check, as do CBC and
    /// ECB with a validating padding. Stream-like modes and `ZERO`/`NONE`
    /// padding always "succeed", so their output needs a readability check.
    pub const fn fails_hard_on_wrong_key(&self) -> bool {
        match self {
            Self::Symmetric(p) => !p.mode().is_stream_like() && p.padding().validates(),
            Self::Asymmetric(_) => true,
        }
    }
}

impl From<SymmetricProfile> for CipherProfile {
    fn from(profile: SymmetricProfile) -> Self { Self::Symmetric(profile) }
}

impl From<AsymmetricProfile> for CipherProfile {
    fn from(profile: AsymmetricProfile) -> Self { Self::Asymmetric(profile) }
}

/// Raw cipher output is arbitrary bytes, so the first ciphertext step must be
/// a byte-total encoding. A leading `TEXT` step would replace invalid UTF-8.
fn is_binary_safe(chain: &EncodingChain) -> bool {
    chain
        .steps()
        .first()
        .is_some_and(|step| *step != Encoding::Text)
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawProfile {
    Symmetric(RawSymmetric),
    Asymmetric(RawAsymmetric),
}

#[derive(Serialize, Deserialize)]
struct RawSymmetric {
    name:                String,
    algorithm:           SymmetricAlgorithm,
    mode:                BlockMode,
    #[serde(default)]
    padding:             Padding,
    key:                 KeyMaterial,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iv:                  Option<KeyMaterial>,
    #[serde(default)]
    plaintext_encoding:  EncodingChain,
    #[serde(default = "default_ciphertext_encoding")]
    ciphertext_encoding: EncodingChain,
}

#[derive(Serialize, Deserialize)]
struct RawAsymmetric {
    name:                String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_key:          Option<KeyMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key:         Option<KeyMaterial>,
    #[serde(default)]
    plaintext_encoding:  EncodingChain,
    #[serde(default = "default_ciphertext_encoding")]
    ciphertext_encoding: EncodingChain,
}

impl TryFrom<RawProfile> for CipherProfile {
    type Error = ProfileError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        match raw {
            RawProfile::Symmetric(raw) => {
                let mut builder = SymmetricProfile::builder(raw.name)
                    .algorithm(raw.algorithm)
                    .mode(raw.mode)
                    .padding(raw.padding)
                    .key(raw.key)
                    .plaintext_encoding(raw.plaintext_encoding)
                    .ciphertext_encoding(raw.ciphertext_encoding);
                if let Some(iv) = raw.iv {
                    builder = builder.iv(iv);
                }
                builder.build().map(Self::Symmetric)
            },
            RawProfile::Asymmetric(raw) => {
                let mut builder = AsymmetricProfile::builder(raw.name)
                    .plaintext_encoding(raw.plaintext_encoding)
                    .ciphertext_encoding(raw.ciphertext_encoding);
                if let Some(key) = raw.public_key {
                    builder = builder.public_key(key);
                }
                if let Some(key) = raw.private_key {
                    builder = builder.private_key(key);
                }
                builder.build().map(Self::Asymmetric)
            },
        }
    }
}

impl From<CipherProfile> for RawProfile {
    fn from(profile: CipherProfile) -> Self {
        match profile {
            CipherProfile::Symmetric(p) => {
                Self::Symmetric(RawSymmetric {
                    name:                p.name,
                    algorithm:           p.algorithm,
                    mode:                p.mode,
                    padding:             p.padding,
                    key:                 p.key,
                    iv:                  p.iv,
                    plaintext_encoding:  p.plaintext_encoding,
                    ciphertext_encoding: p.ciphertext_encoding,
                })
            },
            CipherProfile::Asymmetric(p) => {
                Self::Asymmetric(RawAsymmetric {
                    name:                p.name,
                    public_key:          p.public_key,
                    private_key:         p.private_key,
                    plaintext_encoding:  p.plaintext_encoding,
                    ciphertext_encoding: p.ciphertext_encoding,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let profile = SymmetricProfile::builder("default")
            .key(KeyMaterial::text("0123456789abcdef"))
            .iv(KeyMaterial::text("fedcba9876543210"))
            .build()
            .unwrap();
        assert_eq!(profile.algorithm(), SymmetricAlgorithm::Aes);
        assert_eq!(profile.mode(), BlockMode::Cbc);
        assert_eq!(profile.padding(), Padding::Pkcs7);
        assert!(profile.plaintext_encoding().is_identity());
        assert_eq!(profile.ciphertext_encoding(), &EncodingChain::single(Encoding::Base64));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = SymmetricProfile::builder("p")
            .key(KeyMaterial::text("  "))
            .mode(BlockMode::Ecb)
            .build();
        assert_eq!(result, Err(ProfileError::EmptyKey("p".to_owned())));
    }

    #[test]
    fn test_iv_required_except_ecb() {
        let result = SymmetricProfile::builder("p")
            .key(KeyMaterial::text("k"))
            .mode(BlockMode::Ofb)
            .build();
        assert!(matches!(result, Err(ProfileError::MissingIv { mode: "OFB", .. })));

        let ecb = SymmetricProfile::builder("p")
            .key(KeyMaterial::text("k"))
            .mode(BlockMode::Ecb)
            .build();
        assert!(ecb.is_ok());
    }

    #[test]
    fn test_stream_modes_drop_padding() {
        for mode in [BlockMode::Cfb, BlockMode::Ofb, BlockMode::Ctr] {
            let profile = SymmetricProfile::builder("s")
                .key(KeyMaterial::text("k"))
                .iv(KeyMaterial::text("iv"))
                .mode(mode)
                .padding(Padding::Pkcs7)
                .build()
                .unwrap();
            assert_eq!(profile.padding(), Padding::None);
            assert!(!CipherProfile::from(profile).fails_hard_on_wrong_key());
        }
    }

    #[test]
    fn test_fails_hard_on_wrong_key() {
        let build = |padding| {
            CipherProfile::from(
                SymmetricProfile::builder("b")
                    .key(KeyMaterial::text("k"))
                    .iv(KeyMaterial::text("iv"))
                    .padding(padding)
                    .build()
                    .unwrap(),
            )
        };
        assert!(build(Padding::Pkcs7).fails_hard_on_wrong_key());
        assert!(build(Padding::Iso7816).fails_hard_on_wrong_key());
        assert!(!build(Padding::Zero).fails_hard_on_wrong_key());
        assert!(!build(Padding::None).fails_hard_on_wrong_key());
    }

    #[test]
    fn test_asymmetric_requires_a_key() {
        let result = AsymmetricProfile::builder("rsa").build();
        assert_eq!(result, Err(ProfileError::MissingAsymmetricKey("rsa".to_owned())));

        let profile = AsymmetricProfile::builder("rsa")
            .public_key(KeyMaterial::base64("MIIB"))
            .build()
            .unwrap();
        assert!(profile.private_key().is_none());
    }

    #[test]
    fn test_profile_json_round_trip() {
        let json = r#"{
            "type": "symmetric",
            "name": "legacy",
            "algorithm": "DES",
            "mode": "CBC",
            "padding": "ANSI_X923",
            "key": { "value": "0011223344556677", "encoding": ["HEX"] },
            "iv": { "value": "initvect" },
            "ciphertext_encoding": ["HEX"]
        }"#;
        let profile: CipherProfile = serde_json::from_str(json).unwrap();
        let CipherProfile::Symmetric(ref symmetric) = profile
        else {
            panic!("expected a symmetric profile");
        };
        assert_eq!(symmetric.algorithm(), SymmetricAlgorithm::Des);
        assert_eq!(symmetric.padding(), Padding::AnsiX923);
        assert!(symmetric.plaintext_encoding().is_identity());

        let encoded = serde_json::to_string(&profile).unwrap();
        let back: CipherProfile = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_invalid_profile_json_rejected() {
        let json = r#"{
            "type": "symmetric",
            "name": "broken",
            "algorithm": "AES",
            "mode": "CTR",
            "key": { "value": "0123456789abcdef" }
        }"#;
        let err = serde_json::from_str::<CipherProfile>(json).unwrap_err();
        assert!(err.to_string().contains("requires an IV"));
    }

    #[test]
    fn test_text_ciphertext_chain_rejected() {
        let text_first: EncodingChain = "TEXT,BASE64".parse().unwrap();
        for chain in [EncodingChain::single(Encoding::Text), EncodingChain::identity(), text_first] {
            let result = SymmetricProfile::builder("cbc")
                .key(KeyMaterial::text("0123456789abcdef"))
                .iv(KeyMaterial::text("fedcba9876543210"))
                .ciphertext_encoding(chain.clone())
                .build();
            assert_eq!(result, Err(ProfileError::TextCiphertext("cbc".to_owned())));

            let result = AsymmetricProfile::builder("rsa")
                .public_key(KeyMaterial::base64("MIIB"))
                .ciphertext_encoding(chain)
                .build();
            assert_eq!(result, Err(ProfileError::TextCiphertext("rsa".to_owned())));
        }

        let trailing_text: EncodingChain = "BASE64,TEXT".parse().unwrap();
        let profile = SymmetricProfile::builder("cbc")
            .key(KeyMaterial::text("0123456789abcdef"))
            .iv(KeyMaterial::text("fedcba9876543210"))
            .ciphertext_encoding(trailing_text)
            .build();
        assert!(profile.is_ok());
    }

    #[test]
    fn test_text_ciphertext_json_rejected() {
        let json = r#"{
            "type": "symmetric",
            "name": "raw",
            "mode": "CBC",
            "key": { "value": "0123456789abcdef" },
            "iv": { "value": "fedcba9876543210" },
            "ciphertext_encoding": ["TEXT"]
        }"#;
        let err = serde_json::from_str::<CipherProfile>(json).unwrap_err();
        assert!(err.to_string().contains("needs a ciphertext encoding"));
    }

    #[test]
    fn test_key_material_debug_is_redacted() {
        let key = KeyMaterial::text("super secret");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("super secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("aes".parse::<SymmetricAlgorithm>().unwrap(), SymmetricAlgorithm::Aes);
        assert_eq!("3des".parse::<SymmetricAlgorithm>().unwrap(), SymmetricAlgorithm::Des);
        assert_eq!("ctr".parse::<BlockMode>().unwrap(), BlockMode::Ctr);
        assert_eq!("ansix923".parse::<Padding>().unwrap(), Padding::AnsiX923);
        assert_eq!("iso-7816".parse::<Padding>().unwrap_err().to_string(), "unknown padding 'iso-7816'");
        assert_eq!("zero".parse::<Padding>().unwrap(), Padding::Zero);
    }
}
