use anyhow::Result;
use clap::Parser;
use invoicer::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
