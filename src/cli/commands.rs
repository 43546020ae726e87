use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tareas")]
#[command(version, about = "A multi-tenant task and category store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding one JSON document per tenant
    #[arg(long, global = true, env = "TAREAS_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "tareas=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Interface to bind
        #[arg(long, env = "TAREAS_BIND", default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(long, short, env = "TAREAS_PORT", default_value_t = 5000)]
        port: u16,
    },

    /// Print a tenant's full document as JSON
    Show {
        /// Tenant identifier
        tenant: String,
    },

    /// List a tenant's categories
    Categories {
        /// Tenant identifier
        tenant: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a tenant's tasks as JSON, optionally only those in one category
    Tasks {
        /// Tenant identifier
        tenant: String,

        /// Exact category name to filter on
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Fold one tenant's document into another and delete the source
    Merge {
        /// Tenant whose document is folded in and then deleted
        source: String,

        /// Tenant that receives the merged document
        destination: String,
    },
}

impl Commands {
    /// Default log filter for the command when neither RUST_LOG nor --log-level is set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Commands::Serve { .. } => "info",
            _ => "warn",
        }
    }
}
