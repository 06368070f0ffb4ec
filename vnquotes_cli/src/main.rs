mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use vnquotes_lib::ClientConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "vnquotes")]
#[command(about = "Compare HOSE and HNX end-of-day prices between two dates")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Percentage change per symbol between two trading dates
    Compare(commands::compare::CompareArgs),
    /// Quotes of one exchange for one date
    Quotes(commands::quotes::QuotesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vnquotes=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "md" | "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = ClientConfig::from_env();

    match &cli.command {
        Commands::Compare(args) => commands::compare::run(args, config, &format).await?,
        Commands::Quotes(args) => commands::quotes::run(args, config, &format).await?,
    }

    Ok(())
}
