//! Anime Browser - browse the Kitsu anime catalog from the terminal
//!
//! Loads the first page of the catalog (or a search), then reads commands
//! from stdin: search, filter by status or age rating, page through results
//! and open record details.

use anime_browser::terminal::HELP_TEXT;
use anime_browser::{Command, Formatter, SessionController, TerminalRenderer};
use anyhow::{Context, Result};
use clap::Parser;
use kitsu_client::{CatalogSource, KitsuClient};
use shared::{Config, FilterCriteria, LogConfig};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Anime Browser CLI arguments
#[derive(Parser, Debug)]
#[command(name = "anime-browser")]
#[command(about = "Search, filter and page through the Kitsu anime catalog")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Initial search term
    #[arg(short, long)]
    search: Option<String>,

    /// Initial status filter (current, finished, tba, unreleased, upcoming)
    #[arg(long)]
    status: Option<String>,

    /// Initial age rating filter (G, PG, R, R18)
    #[arg(long)]
    rating: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_settings("anime_browser", &config.logging);
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
        log_config.console = true;
    }
    shared::logging::init(log_config)?;

    info!("Anime browser starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    let client = KitsuClient::from_config(&config.catalog)
        .context("Failed to create Kitsu client")?;
    let formatter = Formatter::new(config.browser.date_format.clone())
        .context("Invalid browser.date_format")?;
    let page_size = NonZeroUsize::new(config.browser.page_size)
        .context("browser.page_size must be greater than zero")?;
    let criteria = FilterCriteria::from_inputs(
        args.status.as_deref().unwrap_or(""),
        args.rating.as_deref().unwrap_or(""),
    )
    .context("Invalid filter arguments")?;

    let renderer = TerminalRenderer::new(std::io::stdout());
    let mut controller = SessionController::new(client, renderer, formatter, page_size);

    controller
        .load(args.search.as_deref().unwrap_or(""), criteria)
        .await;

    run_prompt(&mut controller).await?;

    info!("Anime browser finished");
    Ok(())
}

/// Read and dispatch commands until `quit` or end of input
async fn run_prompt<S, W>(controller: &mut SessionController<S, TerminalRenderer<W>>) -> Result<()>
where
    S: CatalogSource,
    W: Write,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type `help` for commands.");

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Search(term) => {
                controller.on_search_submitted(&term).await;
            }
            Command::Status(value) => {
                let rating = controller.session().criteria.rating.clone().unwrap_or_default();
                match FilterCriteria::from_inputs(&value, &rating) {
                    Ok(criteria) => {
                        controller.on_filter_changed(criteria).await;
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Command::Rating(value) => {
                let status = controller
                    .session()
                    .criteria
                    .status
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                match FilterCriteria::from_inputs(&status, &value) {
                    Ok(criteria) => {
                        controller.on_filter_changed(criteria).await;
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Command::Next => {
                if !controller.on_page_next() {
                    println!("No next page");
                }
            }
            Command::Prev => {
                if !controller.on_page_previous() {
                    println!("No previous page");
                }
            }
            Command::Show(id) => {
                if let Err(e) = controller.on_record_selected(&id) {
                    println!("{}", e);
                }
            }
            Command::Help => print!("{}", HELP_TEXT),
            Command::Quit => break,
        }
    }

    Ok(())
}
