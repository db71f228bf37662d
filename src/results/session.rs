//! Stored sessions
//!
//! Opening one session (topology, node backends, per-entity exit codes) and
//! scanning a results root for all valid sessions.

use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::consts::{DIRMETA_FILE, SYSTEM_FILE};
use crate::error::ResultsError;

use super::colours::ColourCache;
use super::identifier::Identifier;
use super::system::{self, SystemDescription};

/// Per-entity `dirmeta.json`; only the exit code matters to the viewer.
#[derive(Debug, Deserialize)]
struct EntityMeta {
    exit_code: Option<i32>,
}

/// The results of one performance analysis session stored inside a results
/// directory.
pub(crate) struct SessionResults {
    path: PathBuf,
    identifier: Identifier,
    system: SystemDescription,
    /// node name -> (owning entity, backend module names)
    node_backends: HashMap<String, (String, Vec<String>)>,
}

impl SessionResults {
    /// Open the session stored in `<storage>/<folder>`, validating its
    /// metadata and its system description.
    pub(crate) fn open(storage: &Path, folder: &str) -> Result<Self, ResultsError> {
        if !is_plain_folder_name(folder) {
            return Err(ResultsError::MetadataMissing {
                path: storage.join(DIRMETA_FILE),
            });
        }

        let path = storage.join(folder);
        let identifier = Identifier::from_dir(&path)?;

        let text = fs::read_to_string(path.join(SYSTEM_FILE))?;
        let system: SystemDescription = serde_yaml::from_str(&text)?;

        let mut node_backends = HashMap::new();
        for (entity, spec) in &system.entities {
            for (node, settings) in &spec.nodes {
                node_backends.insert(
                    node.clone(),
                    (entity.clone(), settings.backend.names().to_vec()),
                );
            }
        }

        Ok(Self {
            path,
            identifier,
            system,
            node_backends,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The entity a node belongs to and the modules declared as its backends.
    pub(crate) fn node_info(&self, node: &str) -> Option<(&str, &[String])> {
        self.node_backends
            .get(node)
            .map(|(entity, backends)| (entity.as_str(), backends.as_slice()))
    }

    /// Exit codes recorded in the per-entity `dirmeta.json` files. Entities
    /// without one (still running, or never launched) are absent.
    pub(crate) fn entity_exit_codes(&self) -> HashMap<String, i32> {
        let mut codes = HashMap::new();
        for entity in self.system.entities.keys() {
            let meta_path = self.path.join(entity).join(DIRMETA_FILE);
            if let Ok(text) = fs::read_to_string(&meta_path)
                && let Ok(meta) = serde_json::from_str::<EntityMeta>(&text)
                && let Some(code) = meta.exit_code
            {
                codes.insert(entity.clone(), code);
            }
        }
        codes
    }

    /// Serialize the system graph, assigning colours to entities that have
    /// none cached yet and persisting the sidecar cache.
    pub(crate) fn graph_json(&self) -> Result<String, ResultsError> {
        let mut cache = ColourCache::load(&self.path);
        let mut rng = rand::thread_rng();
        for entity in self.system.entities.keys() {
            cache.ensure(entity, &mut rng);
        }
        cache.save(&self.path)?;

        let payload = system::graph_payload(&self.system, cache.colours(), &self.entity_exit_codes());
        Ok(payload.to_string())
    }

    /// Resolve a stored artifact path, refusing anything that would escape
    /// the session directory.
    pub(crate) fn artifact_path(&self, relative: &str) -> Option<PathBuf> {
        let rel = Path::new(relative);
        if !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }

        let path = self.path.join(rel);
        path.is_file().then_some(path)
    }
}

/// A folder parameter coming from a URL is a single path segment; anything
/// that still looks like a traversal is rejected outright.
fn is_plain_folder_name(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
}

/// Scan a results root for valid sessions, newest first. Folders without a
/// readable `dirmeta.json` are skipped.
pub(crate) fn scan_sessions(storage: &Path) -> Vec<Identifier> {
    let Ok(entries) = fs::read_dir(storage) else {
        return Vec::new();
    };

    let folders: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    let mut ids: Vec<Identifier> = folders
        .par_iter()
        .filter_map(|dir| Identifier::from_dir(dir).ok())
        .collect();
    ids.sort();
    ids
}
