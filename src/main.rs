use clap::Parser;
use tareas::cli::{
    handle_categories, handle_merge, handle_serve, handle_show, handle_tasks, Cli, Commands,
};
use tareas::{ServerConfig, StoreConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| cli.command.default_log_level().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir;
    let result = match cli.command {
        Commands::Serve { bind, port } => handle_serve(ServerConfig {
            store: StoreConfig::new(data_dir),
            bind,
            port,
            log_level,
        }),
        Commands::Show { tenant } => handle_show(&data_dir, &tenant),
        Commands::Categories { tenant, json } => handle_categories(&data_dir, &tenant, json),
        Commands::Tasks { tenant, category } => handle_tasks(&data_dir, &tenant, category),
        Commands::Merge {
            source,
            destination,
        } => handle_merge(&data_dir, &source, &destination),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
