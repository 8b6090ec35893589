mod args;
mod config;
mod global;
mod handlers;

use args::{ConfigArgs, DecodeArgs, EncodeArgs, OptionsArgs, RemoveArgs, RenameArgs};
use clap::{Parser, Subcommand};
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "colenc")]
#[command(version)]
#[command(about = "Swap column names for safe synthetic identifiers in scripts and option documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode column names in script text or a JSON document
    Encode(EncodeArgs),
    /// Restore column names in script text or a JSON document
    Decode(DecodeArgs),
    /// Annotate and encode column names in an analysis options document
    Options(OptionsArgs),
    /// Rename columns in a script
    Rename(RenameArgs),
    /// Replace removed columns in a script with an error call
    Remove(RemoveArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    cli.global.init_logging();

    let config = config::load_config(cli.global.config.as_deref())?;

    match cli.command {
        Commands::Encode(args) => handlers::encode::handle(args, &cli.global, &config),
        Commands::Decode(args) => handlers::decode::handle(args, &cli.global, &config),
        Commands::Options(args) => handlers::options::handle(args, &cli.global, &config),
        Commands::Rename(args) => handlers::rename::handle(args, &cli.global, &config),
        Commands::Remove(args) => handlers::remove::handle(args, &cli.global, &config),
        Commands::Config(args) => handlers::config::handle(args, &cli.global, &config),
    }
}
