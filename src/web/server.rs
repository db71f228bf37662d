//! HTTP server setup

use actix_web::{App, HttpServer, web};
use log::info;
use std::path::PathBuf;

use crate::modules::ModuleRegistry;

use super::routes;

/// Shared state of all request handlers.
pub(crate) struct AppState {
    /// Absolute path of the results directory
    pub(crate) storage: PathBuf,
    pub(crate) title: String,
    pub(crate) stylesheet: Option<String>,
    pub(crate) registry: ModuleRegistry,
    /// Web assets of the installed modules (`<data>/web/modules`)
    pub(crate) modules_web: PathBuf,
}

pub(crate) async fn run(address: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!(
        "serving results from {} on http://{}",
        state.storage.display(),
        address
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind(address)?
    .run()
    .await
}
