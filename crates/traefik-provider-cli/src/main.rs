//! terraform-provider-traefik - manage Traefik custom resources from configuration files

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;
mod state;
mod util;

use commands::Globals;

#[derive(Parser)]
#[command(name = "terraform-provider-traefik")]
#[command(version)]
#[command(about = "Manage Traefik Middleware and TraefikService objects", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Provider configuration file (default: <config dir>/traefik-provider/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Kubeconfig file
    #[arg(long, global = true, env = "TRAEFIK_PROVIDER_KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true, env = "TRAEFIK_PROVIDER_CONTEXT")]
    context: Option<String>,

    /// Never contact a cluster; only manifests can be rendered
    #[arg(long, global = true, env = "TRAEFIK_PROVIDER_OFFLINE")]
    offline: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource and data source type names
    Types,

    /// Print the OpenAPI schema behind a type
    Schema {
        /// Type name
        type_name: String,

        /// Output JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Validate a resource configuration without contacting the cluster
    Validate {
        /// Resource type name
        type_name: String,

        /// Configuration file
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
    },

    /// Render a configuration as a YAML manifest
    Manifest {
        /// Type name (with or without the `_manifest` suffix)
        type_name: String,

        /// Configuration file
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
    },

    /// Create or update an object
    Apply {
        /// Resource type name
        type_name: String,

        /// Configuration file
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// State file
        #[arg(long)]
        state: PathBuf,
    },

    /// Refresh state from the cluster
    Refresh {
        /// Resource type name
        type_name: String,

        /// State file
        #[arg(long)]
        state: PathBuf,
    },

    /// Delete an object and its state
    Destroy {
        /// Resource type name
        type_name: String,

        /// State file
        #[arg(long)]
        state: PathBuf,
    },

    /// Adopt an existing object
    Import {
        /// Resource type name
        type_name: String,

        /// Object identifier, `namespace/name`
        id: String,

        /// State file to create
        #[arg(long)]
        state: PathBuf,
    },

    /// Read an object through the data source, printing JSON
    Read {
        /// Data source type name
        type_name: String,

        /// Object identifier, `namespace/name`
        id: String,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let globals = Globals {
        config: cli.config,
        kubeconfig: cli.kubeconfig,
        context: cli.context,
        offline: cli.offline,
    };

    let result = match cli.command {
        Commands::Types => commands::types::run(),
        Commands::Schema { type_name, json } => commands::schema::run(&type_name, json),
        Commands::Validate { type_name, file } => commands::validate::run(&type_name, &file),
        Commands::Manifest { type_name, file } => commands::manifest::run(&type_name, &file).await,
        Commands::Apply {
            type_name,
            file,
            state,
        } => commands::apply::run(&globals, &type_name, &file, &state).await,
        Commands::Refresh { type_name, state } => {
            commands::refresh::run(&globals, &type_name, &state).await
        }
        Commands::Destroy { type_name, state } => {
            commands::destroy::run(&globals, &type_name, &state).await
        }
        Commands::Import {
            type_name,
            id,
            state,
        } => commands::import::run(&globals, &type_name, &id, &state).await,
        Commands::Read { type_name, id } => commands::read::run(&globals, &type_name, &id).await,
    };

    if let Err(err) = result {
        if !err.is_reported() {
            eprintln!("{:?}", miette::Report::new(err.clone()));
        }
        std::process::exit(err.exit_code());
    }
}
