use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use skirmish_florist::{
    combat::Commander,
    config::ConfigLoader,
    florist::JsonRepository,
    logging,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Combat roster demo and florist HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Group a warrior and a wizard, move the group and print both units
    Demo,
    /// Serve the florist API over the JSON store
    Serve(ServeArgs),
}

#[derive(Debug, clap::Args)]
struct ServeArgs {
    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding flowers.json and invoices.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Demo => {
            logging::init("warn")?;
            demo()
        }
        Command::Serve(args) => serve(args),
    }
}

fn demo() -> Result<()> {
    let mut commander = Commander::new();
    let warrior = commander.create_warrior();
    let wizard = commander.create_wizard();

    let group = commander.create_group();
    commander.add(group, warrior)?;
    commander.add(group, wizard)?;

    commander.move_to(group, 3, 6)?;

    println!("{}", commander.display(warrior)?);
    println!("{}", commander.display(wizard)?);
    Ok(())
}

fn serve(args: ServeArgs) -> Result<()> {
    let loader = ConfigLoader::new(".");
    let mut config = loader.load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    logging::init(&config.logging.level)?;
    info!(data_dir = %config.storage.data_dir.display(), "starting florist API");

    let repo = JsonRepository::new(config.storage.flowers_path(), config.storage.invoices_path())?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::run(WebServerConfig {
        repo,
        host: config.server.host,
        port: config.server.port,
    }))
}
