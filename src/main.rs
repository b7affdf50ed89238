//! Submits one suggestion read as JSON from stdin, e.g.
//!
//! ```text
//! echo '{"projectName":"Zeta","description":"A new layer-2 rollup project","officialLink":"https://zeta.example"}' \
//!     | airdrop-relay
//! ```
//!
//! Prints the submission result as JSON on stdout and the user-facing message
//! on stderr.

use std::io::Read;

use airdrop_relay::{AppConfig, SubmissionPipeline, SuggestionInput, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.log_level, config.log_json);
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let input: SuggestionInput = serde_json::from_str(&raw)?;

    let pipeline = SubmissionPipeline::from_config(&config)?;
    let result = pipeline.submit(&input).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("{}", result.message());
    if !result.status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
