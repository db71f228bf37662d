//! Top-level command dispatch

use std::fs;
use std::path::PathBuf;

use crate::cli::{Cli, Mode, validate_address, validate_stylesheet};
use crate::error::AppError;
use crate::installer::{self, InstallOptions};
use crate::modules::ModuleRegistry;
use crate::output::print_session_table;
use crate::results::scan_sessions;
use crate::web::{self, AppState};

pub(crate) async fn run(cli: Cli, mode: Mode) -> Result<(), AppError> {
    match mode {
        Mode::Install => {
            let name = installer::install(
                &cli.path,
                InstallOptions {
                    update: cli.update,
                    development: cli.development,
                    force_reinstall: cli.force_reinstall,
                },
            )?;
            println!("adaptyst-analyser: {name} installed successfully");
            Ok(())
        }
        Mode::List => {
            let ids = scan_sessions(&cli.path);
            if ids.is_empty() {
                println!("No analysis sessions found.");
                return Ok(());
            }
            print_session_table(&ids, cli.use_color());
            Ok(())
        }
        Mode::Serve => {
            validate_address(cli.address())?;
            if let Some(stylesheet) = &cli.stylesheet {
                validate_stylesheet(stylesheet)?;
            }

            // Modules are optional; a data directory may not exist yet.
            let (registry, modules_web) = match installer::data_dir() {
                Ok(data_root) => (
                    ModuleRegistry::discover(&data_root.join("modules")),
                    data_root.join("web").join("modules"),
                ),
                Err(_) => (ModuleRegistry::default(), PathBuf::new()),
            };

            let state = AppState {
                storage: fs::canonicalize(&cli.path)?,
                title: cli.title().to_string(),
                stylesheet: cli.stylesheet.clone(),
                registry,
                modules_web,
            };
            web::run(cli.address(), state).await.map_err(AppError::from)
        }
    }
}
