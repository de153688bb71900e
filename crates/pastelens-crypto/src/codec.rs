use std::{borrow::Cow, fmt, str::FromStr};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use percent_encoding::{percent_decode_str, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::DecodeError;

/// A single reversible byte <-> text encoding.
///
/// `Text` is the identity step: bytes are read as UTF-8 text. Every other
/// encoding is total over arbitrary bytes and produces ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Encoding {
    #[serde(alias = "UTF8", alias = "RAW")]
    Text,
    Hex,
    Base64,
    #[serde(alias = "BASE64URL")]
    Base64Url,
    Url,
}

impl Encoding {
    /// Every encoding in catalog order.
    pub const ALL: [Self; 5] = [Self::Text, Self::Hex, Self::Base64, Self::Base64Url, Self::Url];

    /// Canonical identifier used in profile files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Hex => "HEX",
            Self::Base64 => "BASE64",
            Self::Base64Url => "BASE64_URL",
            Self::Url => "URL",
        }
    }

    /// Encodes raw bytes into this encoding's textual form.
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Text => String::from_utf8_lossy(data).into_owned(),
            Self::Hex => hex::encode(data),
            Self::Base64 => STANDARD.encode(data),
            Self::Base64Url => URL_SAFE_NO_PAD.encode(data),
            Self::Url => percent_encode(data),
        }
    }

    /// Decodes text produced by [`Encoding::encode`] back into raw bytes.
    ///
    /// Hex and both base64 variants ignore ASCII whitespace so wrapped blobs
    /// pasted from terminals or e-mails still decode.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::Text => Ok(text.as_bytes().to_vec()),
            Self::Hex => Ok(hex::decode(strip_whitespace(text).as_ref())?),
            Self::Base64 => Ok(STANDARD.decode(strip_whitespace(text).as_ref())?),
            Self::Base64Url => {
                let mut padded = strip_whitespace(text).into_owned();
                while padded.len() % 4 != 0 {
                    padded.push('=');
                }
                Ok(URL_SAFE.decode(padded)?)
            },
            Self::Url => percent_decode(text),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Encoding {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "TEXT" | "UTF8" | "UTF_8" | "RAW" => Ok(Self::Text),
            "HEX" => Ok(Self::Hex),
            "BASE64" => Ok(Self::Base64),
            "BASE64_URL" | "BASE64URL" => Ok(Self::Base64Url),
            "URL" => Ok(Self::Url),
            _ => Err(DecodeError::UnknownEncoding(s.to_owned())),
        }
    }
}

/// An ordered list of encodings applied and reversed as a unit.
///
/// Encoding applies the steps in order: the first step turns the payload
/// bytes into text and each later step re-encodes the previous text.
/// Decoding walks the chain backwards. The empty chain is the identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodingChain(Vec<Encoding>);

impl EncodingChain {
    /// Creates a chain from its steps, outermost last.
    pub const fn new(steps: Vec<Encoding>) -> Self { Self(steps) }

    /// The identity chain: payloads are plain UTF-8 text.
    pub const fn identity() -> Self { Self(Vec::new()) }

    /// A chain with a single step.
    pub fn single(encoding: Encoding) -> Self { Self(vec![encoding]) }

    /// Returns the steps in application order.
    pub fn steps(&self) -> &[Encoding] { &self.0 }

    /// True when the chain leaves text untouched.
    pub fn is_identity(&self) -> bool { self.0.iter().all(|step| *step == Encoding::Text) }

    /// Applies every step in order and returns the final text.
    pub fn encode(&self, data: &[u8]) -> String {
        let mut steps = self.0.iter();
        let Some(first) = steps.next()
        else {
            return Encoding::Text.encode(data);
        };
        let mut text = first.encode(data);
        for step in steps {
            text = step.encode(text.as_bytes());
        }
        text
    }

    /// Reverses every step, innermost last, and returns the payload bytes.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let mut current = text.as_bytes().to_vec();
        for (layer, step) in self.0.iter().enumerate().rev() {
            let input = std::str::from_utf8(&current).map_err(|_| {
                DecodeError::NotText {
                    layer,
                }
            })?;
            current = step.decode(input)?;
        }
        Ok(current)
    }
}

impl From<Encoding> for EncodingChain {
    fn from(encoding: Encoding) -> Self { Self::single(encoding) }
}

impl fmt::Display for EncodingChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(Encoding::Text.name());
        }
        let names: Vec<&str> = self.0.iter().map(|step| step.name()).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for EncodingChain {
    type Err = DecodeError;

    /// Parses `"HEX,BASE64"` or `"HEX+BASE64"`; an empty string is the identity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split([',', '+'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Encoding::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Encodes `data` through `chain`.
pub fn encode(data: &[u8], chain: &EncodingChain) -> String { chain.encode(data) }

/// Decodes `text` through `chain`.
pub fn decode(text: &str, chain: &EncodingChain) -> Result<Vec<u8>, DecodeError> { chain.decode(text) }

/// One successful interpretation found by [`detect_and_decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCandidate {
    pub encoding: Encoding,
    pub bytes:    Vec<u8>,
}

/// Tries each binary-to-text encoding on `text` and keeps the ones that decode.
///
/// Candidates are tried in the order base64, URL-safe base64, hex, percent
/// encoding; a candidate that yields the same bytes as an earlier one is
/// dropped. Failures are expected and only traced.
pub fn detect_and_decode(text: &str) -> Vec<DecodedCandidate> {
    let text = text.trim();
    let mut candidates: Vec<DecodedCandidate> = Vec::new();
    if text.is_empty() {
        return candidates;
    }

    for encoding in [Encoding::Base64, Encoding::Base64Url, Encoding::Hex, Encoding::Url] {
        if encoding == Encoding::Url && !text.contains('%') {
            continue;
        }
        match encoding.decode(text) {
            Ok(bytes) if bytes.is_empty() => {},
            Ok(bytes) => {
                if candidates.iter().all(|c| c.bytes != bytes) {
                    candidates.push(DecodedCandidate {
                        encoding,
                        bytes,
                    });
                }
            },
            Err(e) => trace!("{} candidate rejected: {}", encoding, e),
        }
    }
    candidates
}

/// Everything except the bytes `encodeURIComponent` leaves untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn percent_encode(data: &[u8]) -> String { percent_encoding::percent_encode(data, COMPONENT).to_string() }

/// Decodes percent escapes, failing on a `%` not followed by two hex digits.
fn percent_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();
    let malformed = text.match_indices('%').map(|(position, _)| position).find(|&position| {
        !bytes
            .get(position + 1 .. position + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit))
    });
    if let Some(position) = malformed {
        return Err(DecodeError::PercentEncoding {
            position,
        });
    }
    Ok(percent_decode_str(text).collect())
}

fn strip_whitespace(text: &str) -> Cow<'_, str> {
    if text.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    }
    else {
        Cow::Borrowed(text)
    }
}
