use clap::Args;
use pastelens::{Classification, Classifier, Evidence};
use tracing::info;

use super::{read_input, ClassifierArgs, Context};

/// Arguments for the classify command.
#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// Text to classify; read from stdin when omitted
    pub input:      Option<String>,
    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

/// Classify the input against the configured profiles.
///
/// Prints the content kind, and for ciphertext also the profile that
/// decrypted it and the recovered plaintext.
pub async fn run(args: ClassifyArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    let profiles = ctx.profiles().await?;
    let classification = Classifier::new(args.classifier.config()).classify(&text, &profiles);
    info!("Classified input as {}", classification.kind);
    ctx.render(&classification, human)
}

fn human(classification: &Classification) -> String {
    match &classification.evidence {
        Evidence::Decrypted {
            profile,
            plaintext,
        } => format!("{} (profile '{}')\n{}", classification.kind, profile, plaintext),
        Evidence::Rule {
            ..
        }
        | Evidence::Fallback => classification.kind.to_string(),
    }
}
