use clap::Args;
use pastelens_crypto::{decrypt, encrypt};
use tracing::info;

use super::{read_input, Context};

/// Arguments for the encrypt and decrypt commands.
#[derive(Args, Clone, Debug)]
pub struct CryptArgs {
    /// Text to process; read from stdin when omitted
    pub input:   Option<String>,
    /// Name of the profile in the `--profiles` file
    #[arg(short, long)]
    pub profile: String,
}

/// Encrypt the input with the named profile.
pub async fn run_encrypt(args: CryptArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    let profile = ctx.profile(&args.profile).await?;
    let ciphertext = encrypt(&text, &profile)?;
    info!("Encrypted input with profile '{}'", profile.name());
    ctx.render(&ciphertext, String::clone)
}

/// Decrypt the input with the named profile.
pub async fn run_decrypt(args: CryptArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    let profile = ctx.profile(&args.profile).await?;
    let plaintext = decrypt(&text, &profile)?;
    info!("Decrypted input with profile '{}'", profile.name());
    ctx.render(&plaintext, String::clone)
}

#[cfg(test)]
mod tests {
    use pastelens::{JsonProfileStore, PastelensError};
    use pastelens_crypto::{BlockMode, KeyMaterial, Padding, SymmetricAlgorithm, SymmetricProfile};
    use tempfile::tempdir;

    use super::*;

    async fn context(temp_dir: &tempfile::TempDir) -> Context {
        let path = temp_dir.path().join("profiles.json");
        let mut store = JsonProfileStore::open(&path).await.unwrap();
        store.upsert(
            SymmetricProfile::builder("legacy")
                .algorithm(SymmetricAlgorithm::Des)
                .mode(BlockMode::Cbc)
                .padding(Padding::Iso7816)
                .key(KeyMaterial::hex("0123456789abcdeffedcba98765432100011223344556677"))
                .iv(KeyMaterial::hex("0001020304050607"))
                .build()
                .unwrap()
                .into(),
        );
        store.save().await.unwrap();
        Context {
            json:          false,
            profiles_path: Some(path),
        }
    }

    fn args(input: &str, profile: &str) -> CryptArgs {
        CryptArgs {
            input:   Some(input.to_owned()),
            profile: profile.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_encrypt_then_decrypt() {
        let temp_dir = tempdir().unwrap();
        let ctx = context(&temp_dir).await;

        let ciphertext = run_encrypt(args("legacy systems", "legacy"), &ctx).await.unwrap();
        assert_ne!(ciphertext, "legacy systems");
        let plaintext = run_decrypt(args(&ciphertext, "legacy"), &ctx).await.unwrap();
        assert_eq!(plaintext, "legacy systems");
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let temp_dir = tempdir().unwrap();
        let ctx = context(&temp_dir).await;
        let result = run_encrypt(args("x", "missing"), &ctx).await;
        assert!(matches!(result, Err(PastelensError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_decrypt_garbage_fails() {
        let temp_dir = tempdir().unwrap();
        let ctx = context(&temp_dir).await;
        let result = run_decrypt(args("not base64!", "legacy"), &ctx).await;
        assert!(matches!(result, Err(PastelensError::Crypto { .. })));
    }
}
