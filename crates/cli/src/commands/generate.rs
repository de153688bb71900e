use clap::{Args, Subcommand};
use pastelens_crypto::{
    generate_iv,
    generate_rsa_key_pair,
    generate_symmetric_key,
    CryptoError,
    Encoding,
    RsaKeyPair,
    SymmetricAlgorithm,
    DEFAULT_RSA_BITS,
};
use tracing::info;

use super::Context;

/// Arguments for the gen command.
#[derive(Args)]
pub struct GenArgs {
    #[command(subcommand)]
    /// The gen subcommand to execute.
    pub subcommand: GenCommands,
}

/// Enumeration of gen subcommands.
#[derive(Subcommand)]
pub enum GenCommands {
    /// Generate an RSA key pair as base64 DER bodies.
    ///
    /// The public key is SubjectPublicKeyInfo, the private key PKCS#8, both
    /// without PEM header or footer lines.
    Rsa(RsaArgs),
    /// Generate a random symmetric key of the algorithm's default size.
    Key(SymmetricArgs),
    /// Generate a random IV of the algorithm's block size.
    Iv(SymmetricArgs),
}

/// Arguments for the gen rsa command.
#[derive(Args)]
pub struct RsaArgs {
    /// Modulus size in bits
    #[arg(long, default_value_t = DEFAULT_RSA_BITS)]
    pub bits:    usize,
    /// Also store the pair as an asymmetric profile with this name
    #[arg(long, value_name = "NAME")]
    pub save_as: Option<String>,
}

/// Arguments for the gen key and gen iv commands.
#[derive(Args)]
pub struct SymmetricArgs {
    /// Block cipher the material is for: AES or DES
    #[arg(short, long, default_value = "AES")]
    pub algorithm: SymmetricAlgorithm,
    /// Output encoding
    #[arg(short, long, default_value = "HEX")]
    pub encoding:  Encoding,
}

/// Run the gen command.
pub async fn run(args: GenArgs, ctx: &Context) -> pastelens::Result<String> {
    match args.subcommand {
        GenCommands::Rsa(rsa_args) => run_rsa(rsa_args, ctx).await,
        GenCommands::Key(key_args) => {
            let key = generate_symmetric_key(key_args.algorithm);
            let encoded = key_args.encoding.encode(&key);
            ctx.render(&encoded, String::clone)
        },
        GenCommands::Iv(iv_args) => {
            let iv = generate_iv(iv_args.algorithm);
            let encoded = iv_args.encoding.encode(&iv);
            ctx.render(&encoded, String::clone)
        },
    }
}

/// Run the gen rsa command.
///
/// With `--save-as` the pair is upserted into the `--profiles` file.
pub async fn run_rsa(args: RsaArgs, ctx: &Context) -> pastelens::Result<String> {
    let pair = generate_rsa_key_pair(args.bits).await?;

    if let Some(name) = &args.save_as {
        let mut store = ctx.store().await?;
        let profile = pair.to_profile(name.as_str()).map_err(CryptoError::from)?;
        store.upsert(profile.into());
        store.save().await?;
        info!("Saved RSA profile '{}' to {:?}", name, store.path());
    }

    ctx.render(&pair, |pair: &RsaKeyPair| {
        format!("public:  {}\nprivate: {}", pair.public_key, pair.private_key)
    })
}
