use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use taller::api::{HttpStore, MemoryStore, WorkshopStore};
use taller::app::App;
use taller::config::Config;
use taller::logging;

#[derive(Parser)]
#[command(name = "taller")]
#[command(about = "Terminal catalog manager for workshop programs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Use a built-in demo catalog instead of the remote service
    #[arg(long)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog to stdout
    List {
        /// Only show workshops whose category contains this text
        #[arg(short = 'c', long)]
        category: Option<String>,
    },
}

fn build_store(config: &Config, demo: bool) -> Result<Arc<dyn WorkshopStore>> {
    if demo {
        return Ok(Arc::new(MemoryStore::seeded()));
    }
    let timeout = Duration::from_secs(config.api.request_timeout_secs);
    let store = HttpStore::new(config.api.base_url.clone(), timeout)?;
    Ok(Arc::new(store))
}

// Everything runs cooperatively on one thread; repository calls are the
// only suspension points.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    let store = build_store(&config, cli.demo)?;

    match cli.command {
        Some(Commands::List { category }) => {
            let workshops = store.list().await?;
            let needle = category.unwrap_or_default().to_lowercase();
            for workshop in workshops
                .iter()
                .filter(|w| w.category.to_lowercase().contains(&needle))
            {
                println!(
                    "{:>4}  {:<32}  {:<14}  {}",
                    workshop.id,
                    workshop.name,
                    workshop.category,
                    workshop.start_date.format("%Y-%m-%d")
                );
            }
            Ok(())
        }
        None => {
            if let Some(ref path) = logging_handle.log_file_path {
                tracing::info!(path = %path.display(), "logging to file");
            }
            let mut app = App::new(config, store);
            app.run().await
        }
    }
}
