//! Request handlers
//!
//! Session-scoped routes treat any metadata problem as 404; only a module
//! backend that exists but fails to run surfaces as 500.

use actix_web::{HttpResponse, Responder, web};
use log::{debug, error};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::modules::ModuleRequest;
use crate::results::{SessionResults, scan_sessions};

use super::pages;
use super::server::AppState;

/// `/modules/` is claimed before the session routes, so a session folder
/// with that exact name cannot be browsed.
pub(crate) fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/modules/{path:.*}").route(web::get().to(module_asset)))
        .service(web::resource("/{identifier}/").route(web::get().to(graph)))
        .service(
            web::resource("/{identifier}/{path:.*}")
                .route(web::get().to(artifact))
                .route(web::post().to(dispatch)),
        );
}

/// GET `/` - the session list page.
async fn index(state: web::Data<AppState>) -> impl Responder {
    let ids = scan_sessions(&state.storage);
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::index_page(
            &state.title,
            state.stylesheet.as_deref(),
            &ids,
        ))
}

/// GET `/<identifier>/` - the system graph of one session.
async fn graph(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let identifier = path.into_inner();
    let session = match SessionResults::open(&state.storage, &identifier) {
        Ok(session) => session,
        Err(err) => {
            debug!("rejecting session {identifier}: {err}");
            return HttpResponse::NotFound().finish();
        }
    };

    debug!("serving the system graph of {}", session.identifier());
    match session.graph_json() {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(err) => {
            error!("building the system graph of {identifier} failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET `/<identifier>/<path>` - a stored artifact of one session.
async fn artifact(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (identifier, relative) = path.into_inner();
    let Ok(session) = SessionResults::open(&state.storage, &identifier) else {
        return HttpResponse::NotFound().finish();
    };
    let Some(file) = session.artifact_path(&relative) else {
        return HttpResponse::NotFound().finish();
    };

    match fs::read(&file) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(content_type_for(&relative))
            .body(bytes),
        Err(err) => {
            error!("reading {} failed: {err}", file.display());
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET `/modules/<name>/<path>` - a web asset of an installed module.
async fn module_asset(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let relative = path.into_inner();
    let Some(file) = resolve_under(&state.modules_web, &relative) else {
        return HttpResponse::NotFound().finish();
    };

    match fs::read(&file) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(content_type_for(&relative))
            .body(bytes),
        Err(err) => {
            error!("reading {} failed: {err}", file.display());
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// POST `/<identifier>/<entity>/<node>/<module>` - run a module backend.
///
/// The tail resource is shared with `artifact`; anything other than exactly
/// three segments after the identifier is not a dispatch URL.
async fn dispatch(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    form: web::Form<HashMap<String, String>>,
) -> impl Responder {
    let (identifier, tail) = path.into_inner();
    let mut segments = tail.split('/');
    let (Some(entity), Some(node), Some(module), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return HttpResponse::NotFound().finish();
    };

    let session = match SessionResults::open(&state.storage, &identifier) {
        Ok(session) => session,
        Err(err) => {
            debug!("rejecting session {identifier}: {err}");
            return HttpResponse::NotFound().finish();
        }
    };

    // The node must exist, belong to the entity named in the URL, and
    // declare the module as one of its backends.
    let Some((node_entity, backends)) = session.node_info(node) else {
        return HttpResponse::NotFound().finish();
    };
    if node_entity != entity || !backends.iter().any(|b| *b == module) {
        return HttpResponse::NotFound().finish();
    }
    let Some(backend) = state.registry.get(module) else {
        debug!("{module} is not installed");
        return HttpResponse::NotFound().finish();
    };

    let values = form.into_inner();
    let request = ModuleRequest {
        session: session.path(),
        entity,
        node,
        values: &values,
    };

    match backend.process(&request) {
        Ok(response) => HttpResponse::Ok()
            .content_type(response.content_type)
            .body(response.body),
        Err(err) => {
            error!("dispatch to {module} failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Resolve a URL tail to a file under `root`, refusing anything that would
/// escape it.
fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let rel = Path::new(relative);
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let path = root.join(rel);
    path.is_file().then_some(path)
}

fn content_type_for(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "yml" | "yaml" => "application/yaml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "txt" | "log" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
