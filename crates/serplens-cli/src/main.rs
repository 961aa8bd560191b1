use anyhow::{Context, Result};
use clap::Parser;
use serplens_cli::{APP_NAME, render_summary};
use serplens_core::Analyzer;
use serplens_core::config::{Settings, SettingsArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Compare a page against the top search results for a keyword")]
#[command(version)]
#[command(after_help = "Developed by Pon Datalab")]
struct Cli {
    /// Search keyword
    keyword: String,

    /// Page to compare against the results
    url: String,

    /// Print the analysis as JSON instead of a summary
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let analyzer = Analyzer::new(Settings::from(cli.settings))?;

    let result = analyzer.analyze(&cli.keyword, &cli.url).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("failed to encode result")?;
        println!("{json}");
    } else {
        print!("{}", render_summary(cli.keyword.trim(), &result));
    }

    Ok(())
}
