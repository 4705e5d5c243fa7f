use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitosanitario::{Args, Consola};
use infrastructure::AppConfig;

async fn run() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();

    // Configuration first: it carries the default log filter
    let mut config = AppConfig::load(&args.config_dir)?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(config_dir = %args.config_dir, database = %config.database.url, "Starting");

    let consola = Consola::abrir(&config).await?;
    let resultado = consola.ejecutar(args.comando).await;
    consola.cerrar().await;

    println!("{}", resultado?);
    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
