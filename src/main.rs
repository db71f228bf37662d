mod app;
mod cli;
mod config;
mod consts;
mod error;
mod installer;
mod modules;
mod output;
mod results;
mod web;

use clap::Parser;

use cli::{Cli, detect_mode};
use config::Config;
use error::AppError;

#[actix_web::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse().with_config(&Config::load());

    if let Err(err) = try_main(cli).await {
        eprintln!("adaptyst-analyser: error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn try_main(cli: Cli) -> Result<(), AppError> {
    if !cli.path.exists() {
        return Err(AppError::PathMissing {
            path: cli.path.clone(),
        });
    }
    if !cli.path.is_dir() {
        return Err(AppError::NotADirectory {
            path: cli.path.clone(),
        });
    }

    let mode = detect_mode(&cli.path, cli.list);
    app::run(cli, mode).await
}
