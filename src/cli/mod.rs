pub mod build;
pub mod check;
pub mod completions;
pub mod init;
pub mod validate;

use clap::{Parser, Subcommand};

/// ptasm - r/place template assembler
#[derive(Parser, Debug)]
#[command(name = "ptasm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble canvases, masks and group exports from template.json files
    Build(build::BuildArgs),

    /// Check template files without loading images
    Validate(validate::ValidateArgs),

    /// Report how far an image is from the palette
    Check(check::CheckArgs),

    /// Initialize a ptasm project (generates ptasm.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Current unix time, used when no `--now` is given.
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
