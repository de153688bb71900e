use clap::Args;
use pastelens::Inspection;

use super::{read_input, ClassifierArgs, Context};

/// Arguments for the inspect command.
#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Text to inspect; read from stdin when omitted
    pub input:      Option<String>,
    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

/// Classify the input and show the transform for its kind.
pub async fn run(args: InspectArgs, ctx: &Context) -> pastelens::Result<String> {
    let text = read_input(args.input).await?;
    let profiles = ctx.profiles().await?;
    let inspection = pastelens::inspect(&text, &profiles, &args.classifier.config(), chrono::Utc::now())?;
    ctx.render(&inspection, human)
}

fn human(inspection: &Inspection) -> String {
    let detail = serde_json::to_string_pretty(&inspection.detail).unwrap_or_default();
    format!("{}\n{}", inspection.classification.kind, detail)
}
