use clap::Args;
use pastelens_crypto::{detect_and_decode, EncodingChain};
use serde::Serialize;
use tracing::{debug, warn};

use super::{read_input, Context};

/// Arguments for the encode command.
#[derive(Args, Clone, Debug)]
pub struct EncodeArgs {
    /// Text to encode; read from stdin when omitted
    pub input: Option<String>,
    /// Encoding chain, applied left to right (e.g. `HEX,BASE64`)
    #[arg(short, long, default_value = "BASE64")]
    pub chain: EncodingChain,
}

/// Arguments for the decode command.
#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Text to decode; read from stdin when omitted
    pub input: Option<String>,
    /// Encoding chain the text was produced with; every encoding is tried when omitted
    #[arg(short, long)]
    pub chain: Option<EncodingChain>,
}

#[derive(Serialize)]
struct Decoded {
    encoding: String,
    /// UTF-8 text, or lowercase hex when the bytes are not UTF-8
    text:     String,
    utf8:     bool,
}

impl Decoded {
    fn new(encoding: String, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => {
                Self {
                    encoding,
                    text,
                    utf8: true,
                }
            },
            Err(e) => {
                Self {
                    encoding,
                    text: hex::encode(e.into_bytes()),
                    utf8: false,
                }
            },
        }
    }
}

/// Encode the input's UTF-8 bytes through the chain.
pub async fn run_encode(args: EncodeArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    debug!("Encoding {} bytes through {}", text.len(), args.chain);
    let encoded = args.chain.encode(text.as_bytes());
    ctx.render(&encoded, String::clone)
}

/// Decode the input through the chain, or list every encoding that decodes it.
pub async fn run_decode(args: DecodeArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    let decoded: Vec<Decoded> = match args.chain {
        Some(chain) => vec![Decoded::new(chain.to_string(), chain.decode(&text)?)],
        None => {
            detect_and_decode(&text)
                .into_iter()
                .map(|candidate| Decoded::new(candidate.encoding.to_string(), candidate.bytes))
                .collect()
        },
    };
    if decoded.is_empty() {
        warn!("No encoding decodes the input");
    }
    ctx.render(&decoded, |decoded| {
        decoded
            .iter()
            .map(|d| {
                let suffix = if d.utf8 { "" } else { " (hex)" };
                format!("{}{}: {}", d.encoding, suffix, d.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
