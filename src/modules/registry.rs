//! Module registry
//!
//! Discovers installed modules under the application data directory and
//! provides lookup by name.

use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::consts::BACKEND_ENTRY;

use super::ModuleBackend;
use super::backend::SubprocessBackend;

#[derive(Default)]
pub(crate) struct ModuleRegistry {
    modules: HashMap<String, SubprocessBackend>,
}

impl ModuleRegistry {
    /// Enumerate the installed modules: every direct subdirectory of
    /// `modules_dir` carrying a `process` entry point.
    pub(crate) fn discover(modules_dir: &Path) -> Self {
        let mut modules = HashMap::new();

        let Ok(entries) = fs::read_dir(modules_dir) else {
            info!("no modules installed ({})", modules_dir.display());
            return Self::default();
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !path.join(BACKEND_ENTRY).is_file() {
                warn!("{name} has no {BACKEND_ENTRY}, skipping");
                continue;
            }
            modules.insert(name.clone(), SubprocessBackend::new(name, &path));
        }

        info!("registered {} module(s)", modules.len());
        Self { modules }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&dyn ModuleBackend> {
        self.modules.get(name).map(|m| m as &dyn ModuleBackend)
    }
}
