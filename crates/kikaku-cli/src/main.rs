mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::project::ProjectSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kikaku",
    about = "Guided project-planning service — wizard progress, plans, and brainstorming assists",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: ~/.kikaku)
    #[arg(long, global = true, env = "KIKAKU_DATA")]
    data: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "8710")]
        port: u16,

        /// Run without the LLM assist endpoints
        #[arg(long)]
        no_assist: bool,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_data_root(cli.data.as_deref());

    let result = match cli.command {
        Commands::Serve { port, no_assist } => cmd::serve::run(&root, port, no_assist),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
