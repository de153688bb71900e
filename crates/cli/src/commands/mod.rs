//! Command handlers for the Pastelens CLI.
//!
//! Each submodule implements one subcommand. Handlers build their output as a
//! string so tests can check it without capturing stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pastelens::{ClassifierConfig, JsonProfileStore, PastelensError};
use pastelens_crypto::CipherProfile;
use serde::Serialize;
use tokio::io::AsyncReadExt as _;
use tracing::debug;

/// Classify command module.
pub mod classify;
/// Encode and decode command module.
pub mod codec;
/// Encrypt and decrypt command module.
pub mod crypt;
/// Generate command module.
pub mod generate;
/// Inspect command module.
pub mod inspect;

/// The CLI for the Pastelens content classifier.
///
/// Classifies pasted text, shows the transform for its kind, runs encoding
/// chains and exercises cipher profiles.
#[derive(Parser)]
#[command(name = "pastelens")]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Output logs and results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (can be used multiple times: -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON file holding the cipher profiles, in sweep order
    #[arg(long, value_name = "FILE", global = true)]
    pub profiles: Option<PathBuf>,
}

/// Enumeration of all available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Classify text into one content kind.
    ///
    /// Input is read from the argument, or from stdin when it is omitted.
    Classify(classify::ClassifyArgs),
    /// Classify text and show the transform for its kind.
    Inspect(inspect::InspectArgs),
    /// Encode text through an encoding chain.
    Encode(codec::EncodeArgs),
    /// Decode text through an encoding chain, or try every encoding.
    Decode(codec::DecodeArgs),
    /// Encrypt text with a stored profile.
    Encrypt(crypt::CryptArgs),
    /// Decrypt text with a stored profile.
    Decrypt(crypt::CryptArgs),
    /// Generate keys and IVs.
    #[command(visible_alias = "gen")]
    Generate(generate::GenArgs),
}

/// Classifier tunables shared by `classify` and `inspect`.
#[derive(Args, Clone, Debug)]
pub struct ClassifierArgs {
    /// Printable ratio a non-validating decryption must reach
    #[arg(long, default_value_t = pastelens::DEFAULT_READABLE_THRESHOLD)]
    pub threshold:      f64,
    /// Minimum base64 length before RSA profiles are tried first
    #[arg(long, default_value_t = 50)]
    pub rsa_min_length: usize,
}

impl ClassifierArgs {
    pub const fn config(&self) -> ClassifierConfig {
        ClassifierConfig {
            readable_threshold: self.threshold,
            rsa_min_length:     self.rsa_min_length,
        }
    }
}

/// Global options every handler can see.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub json:          bool,
    pub profiles_path: Option<PathBuf>,
}

impl Context {
    /// Opens the profile store named by `--profiles`.
    pub async fn store(&self) -> pastelens::Result<JsonProfileStore> {
        let path = self.profiles_path.as_ref().ok_or_else(|| {
            PastelensError::ConfigError {
                message: "no profile file given, pass --profiles <FILE>".to_owned(),
            }
        })?;
        JsonProfileStore::open(path).await
    }

    /// Profiles in sweep order; empty without `--profiles`.
    pub async fn profiles(&self) -> pastelens::Result<Vec<CipherProfile>> {
        match &self.profiles_path {
            Some(path) => Ok(JsonProfileStore::open(path).await?.profiles().to_vec()),
            None => Ok(Vec::new()),
        }
    }

    /// Looks up one profile by name.
    pub async fn profile(&self, name: &str) -> pastelens::Result<CipherProfile> {
        self.store().await?.get(name).cloned().ok_or_else(|| {
            PastelensError::ConfigError {
                message: format!("profile '{}' not found", name),
            }
        })
    }

    /// Renders `value` as pretty JSON in JSON mode, or with `human` otherwise.
    pub fn render<T: Serialize>(&self, value: &T, human: impl FnOnce(&T) -> String) -> pastelens::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        }
        else {
            Ok(human(value))
        }
    }
}

/// Returns the argument, or all of stdin with one trailing newline removed.
pub async fn read_input(input: Option<String>) -> pastelens::Result<String> {
    if let Some(input) = input {
        return Ok(input);
    }
    debug!("Reading input from stdin");
    let mut buffer = String::new();
    tokio::io::stdin().read_to_string(&mut buffer).await?;
    Ok(strip_newline(buffer))
}

fn strip_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Writes a command's output to stdout.
pub fn emit(output: &str) {
    #[allow(clippy::print_stdout, reason = "CLI output")]
    {
        println!("{}", output);
    }
}

/// Execute the specified CLI command.
///
/// # Arguments
/// * `cli` - The parsed CLI arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or a `PastelensError` on failure.
pub async fn run_command(cli: Cli) -> pastelens::Result<()> {
    let ctx = Context {
        json:          cli.json,
        profiles_path: cli.profiles,
    };

    let output = match cli.command {
        Commands::Classify(args) => classify::run(args, &ctx).await?,
        Commands::Inspect(args) => inspect::run(args, &ctx).await?,
        Commands::Encode(args) => codec::run_encode(args, &ctx).await?,
        Commands::Decode(args) => codec::run_decode(args, &ctx).await?,
        Commands::Encrypt(args) => crypt::run_encrypt(args, &ctx).await?,
        Commands::Decrypt(args) => crypt::run_decrypt(args, &ctx).await?,
        Commands::Generate(args) => generate::run(args, &ctx).await?,
    };
    emit(&output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["pastelens", "classify", "1111111111"]).unwrap();
        match cli.command {
            Commands::Classify(args) => assert_eq!(args.input.as_deref(), Some("1111111111")),
            _ => panic!("Expected Classify command"),
        }

        let cli = Cli::try_parse_from(["pastelens", "encode", "--chain", "HEX,BASE64", "hi"]).unwrap();
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.chain.to_string(), "HEX,BASE64");
                assert_eq!(args.input.as_deref(), Some("hi"));
            },
            _ => panic!("Expected Encode command"),
        }

        let cli = Cli::try_parse_from(["pastelens", "decrypt", "--profile", "notes", "abc"]).unwrap();
        match cli.command {
            Commands::Decrypt(args) => assert_eq!(args.profile, "notes"),
            _ => panic!("Expected Decrypt command"),
        }

        assert!(Cli::try_parse_from(["pastelens", "encode", "--chain", "ROT13", "hi"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["pastelens", "-vv", "classify", "x", "--json", "--profiles", "p.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.profiles, Some(PathBuf::from("p.json")));
    }

    #[test]
    fn test_gen_alias() {
        let cli = Cli::try_parse_from(["pastelens", "gen", "iv", "--algorithm", "DES"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn test_strip_newline() {
        assert_eq!(strip_newline("abc\n".to_owned()), "abc");
        assert_eq!(strip_newline("abc\r\n".to_owned()), "abc");
        assert_eq!(strip_newline("abc\n\n".to_owned()), "abc\n");
        assert_eq!(strip_newline("abc".to_owned()), "abc");
    }

    #[tokio::test]
    async fn test_context_without_profiles() {
        let ctx = Context::default();
        assert!(ctx.profiles().await.unwrap().is_empty());
        assert!(matches!(ctx.store().await, Err(PastelensError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_read_input_prefers_argument() {
        assert_eq!(read_input(Some("given".to_owned())).await.unwrap(), "given");
    }
}
