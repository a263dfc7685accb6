use clap::Parser;
use miette::Result;
use ptasm::cli::{Cli, Commands};
use ptasm::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => ptasm::cli::build::run(args, &printer)?,
        Commands::Validate(args) => ptasm::cli::validate::run(args, &printer)?,
        Commands::Check(args) => ptasm::cli::check::run(args, &printer)?,
        Commands::Init(args) => ptasm::cli::init::run(args, &printer)?,
        Commands::Completions(args) => ptasm::cli::completions::run(args)?,
    }

    Ok(())
}
