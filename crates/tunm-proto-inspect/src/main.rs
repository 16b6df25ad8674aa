//! tunm-proto-inspect
//!
//! Usage: `tunm-proto-inspect <file> [--encoding raw|hex|base64] [--config <codec.yaml>]`
//!
//! Prints the decoded envelope as JSON. Set `RUST_LOG=debug` for codec events.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tunm_proto_core::{Codec, ProtoError, Result};
use tunm_proto_inspect::{inspect, Cli};

fn run(cli: Cli) -> Result<()> {
    let codec = match &cli.config {
        Some(path) => Codec::from_config_file(path)?,
        None => Codec::default(),
    };

    let input = fs::read(&cli.path)
        .map_err(|e| ProtoError::Io(format!("read {} failed: {e}", cli.path.display())))?;
    let bytes = cli.encoding.decode(&input)?;
    tracing::debug!(path = %cli.path.display(), bytes = bytes.len(), "input loaded");

    let report = inspect(&codec, &bytes)?;
    let out = serde_json::to_string_pretty(&report)
        .map_err(|e| ProtoError::Io(format!("render failed: {e}")))?;
    println!("{out}");
    Ok(())
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(class = e.class().as_str(), "{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
