use clap::Parser;
use std::sync::Arc;

use worklens::cli::{Cli, Commands, commands};
use worklens::config::Settings;
use worklens::indexing::WorkspaceIndexer;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // For non-init commands, check if the workspace is initialized
    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    let mut logging = settings.logging.clone();
    if settings.debug {
        logging.default = "debug".to_string();
    }
    worklens::logging::init_with_config(&logging);

    // Commands that never touch the index
    match &cli.command {
        Commands::Init { force } => {
            commands::run_init(*force);
            return;
        }
        Commands::Config => {
            commands::run_config(&settings);
            return;
        }
        Commands::Diff {
            path,
            candidate,
            context,
        } => {
            commands::run_diff(&settings.documents_root(), path, candidate, *context);
            return;
        }
        _ => {}
    }

    let settings = Arc::new(settings);
    let indexer = match WorkspaceIndexer::new(settings.clone()) {
        Ok(indexer) => indexer,
        Err(e) => {
            eprintln!("Failed to open index: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Index { path } => commands::run_index(&indexer, path).await,
        Commands::List { entity_type, json } => commands::run_list(&indexer, entity_type, json),
        Commands::Get { id, json } => commands::run_get(&indexer, &id, json),
        Commands::Apply {
            path,
            candidate,
            no_backup,
        } => commands::run_apply(&indexer, &path, &candidate, no_backup).await,
        Commands::Restore { path } => commands::run_restore(&indexer, &path).await,
        Commands::Watch => commands::run_watch(Arc::new(indexer), &settings).await,
        Commands::Status => commands::run_status(&indexer, &settings),

        // Already handled above
        Commands::Init { .. } | Commands::Config | Commands::Diff { .. } => unreachable!(),
    }
}
