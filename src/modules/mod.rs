//! Installed analysis modules
//!
//! A module is an installed plugin bundle providing a `process` entry point
//! plus web assets. The viewer only relays requests and responses; it never
//! interprets what a module produces.

pub(crate) mod backend;
pub(crate) mod registry;

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ModuleError;

pub(crate) use registry::ModuleRegistry;

/// Request forwarded to a module's `process` entry point.
#[derive(Debug, Serialize)]
pub(crate) struct ModuleRequest<'a> {
    /// Absolute path of the session directory
    pub(crate) session: &'a Path,
    pub(crate) entity: &'a str,
    pub(crate) node: &'a str,
    /// Form values of the POST request, passed through untouched
    pub(crate) values: &'a HashMap<String, String>,
}

/// Module-defined output, relayed to the client verbatim.
#[derive(Debug)]
pub(crate) struct ModuleResponse {
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

/// Backend of one installed module.
pub(crate) trait ModuleBackend: Send + Sync {
    /// Module name as declared at install time
    fn name(&self) -> &str;

    /// Run the module's `process` entry point with the given request
    fn process(&self, request: &ModuleRequest<'_>) -> Result<ModuleResponse, ModuleError>;
}
