//! clip-history CLI entry point

use std::process::ExitCode;

use clap::Parser;

use clip_history::cli::{
    app::{load_merged_config, run_clear, run_copy, run_delete, run_list, run_watch, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use clip_history::domain::config::AppConfig;
use clip_history::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Config management does not need the merged config
    if let Commands::Config { action } = cli.command {
        init_logging("warn", cli.verbose);
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        store_path: cli
            .store
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
        ..Default::default()
    };

    // Merge config
    let config = match load_merged_config(cli_config).await {
        Ok(config) => config,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    init_logging(config.log_level_or_default(), cli.verbose);

    match cli.command {
        Commands::Watch => run_watch(&config).await,
        Commands::List(args) => run_list(&config, &args).await,
        Commands::Copy { index } => run_copy(&config, index).await,
        Commands::Delete { index, all } => run_delete(&config, index, all).await,
        Commands::Clear => run_clear(&config).await,
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}
