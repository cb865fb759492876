use anyhow::Result;
use clap::{Parser, Subcommand};
use poolservice::Config;

/// poolservice - Pool cleaning route and billing manager
#[derive(Parser)]
#[command(name = "poolservice")]
#[command(about = "Weekly visit scheduling and billing for a pool cleaning business", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    poolservice::observability::init_observability(
        "poolservice",
        &config.observability.log_level,
        config.observability.json,
    )?;

    match cli.command {
        Commands::Serve { host, port } => poolservice::server::serve(config, host, port).await,
        Commands::Migrate => poolservice::migrate::migrate(&config).await,
        Commands::Reset => poolservice::migrate::reset(&config).await,
    }
}
