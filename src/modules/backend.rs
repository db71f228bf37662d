//! Subprocess module backend
//!
//! Installed bundles ship their `process` entry point as a Python script.
//! It runs as a subprocess per request: the request arrives as JSON on
//! stdin, the response is whatever the script writes to stdout.

use log::{debug, error};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::consts::BACKEND_ENTRY;
use crate::error::ModuleError;

use super::{ModuleBackend, ModuleRequest, ModuleResponse};

pub(crate) struct SubprocessBackend {
    name: String,
    entry: PathBuf,
}

impl SubprocessBackend {
    /// Backend for the module installed at `module_dir`, which must contain
    /// the `process` entry point.
    pub(crate) fn new(name: String, module_dir: &std::path::Path) -> Self {
        Self {
            entry: module_dir.join(BACKEND_ENTRY),
            name,
        }
    }
}

impl ModuleBackend for SubprocessBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, request: &ModuleRequest<'_>) -> Result<ModuleResponse, ModuleError> {
        let input = serde_json::to_vec(request)?;

        debug!("dispatching to {} ({})", self.name, self.entry.display());
        let mut child = Command::new("python3")
            .arg(&self.entry)
            .current_dir(self.entry.parent().unwrap_or_else(|| "/".as_ref()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ModuleError::Launch {
                name: self.name.clone(),
                source,
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(&input)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            error!(
                "backend of {} failed: {}",
                self.name,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(ModuleError::Failed {
                name: self.name.clone(),
                status: output.status,
            });
        }

        Ok(ModuleResponse {
            content_type: sniff_content_type(&output.stdout),
            body: output.stdout,
        })
    }
}

/// Modules return either JSON or an HTML fragment; pick the content type
/// from the first non-whitespace byte.
fn sniff_content_type(body: &[u8]) -> &'static str {
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => "application/json",
        _ => "text/html; charset=utf-8",
    }
}
