//! Entity colour assignment
//!
//! Every entity of a session gets its own pastel colour. Assignments are
//! cached to a sidecar file next to the session data so that colours stay
//! stable across page reloads.

use rand::Rng;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::consts::COLOURS_FILE;

/// Colour assignments of one session, backed by `entity_colours.json`.
#[derive(Debug, Default)]
pub(crate) struct ColourCache {
    assigned: BTreeMap<String, String>,
    dirty: bool,
}

impl ColourCache {
    /// Load the sidecar cache; an unreadable or corrupt cache is treated as
    /// empty and the colours are assigned from scratch.
    pub(crate) fn load(session_dir: &Path) -> Self {
        let assigned = fs::read_to_string(session_dir.join(COLOURS_FILE))
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self {
            assigned,
            dirty: false,
        }
    }

    /// Assign a colour to `entity` unless the cache already has one. New
    /// colours never collide with a cached one.
    pub(crate) fn ensure<R: Rng>(&mut self, entity: &str, rng: &mut R) {
        if self.assigned.contains_key(entity) {
            return;
        }

        // The palette has 9^3 colours; sessions have far fewer entities.
        let mut colour = pastel(rng);
        while self.assigned.values().any(|c| *c == colour) {
            colour = pastel(rng);
        }

        self.assigned.insert(entity.to_string(), colour);
        self.dirty = true;
    }

    pub(crate) fn colours(&self) -> &BTreeMap<String, String> {
        &self.assigned
    }

    /// Rewrite the sidecar file if any colour was assigned since loading.
    pub(crate) fn save(&self, session_dir: &Path) -> std::io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(&self.assigned)?;
        fs::write(session_dir.join(COLOURS_FILE), text)
    }
}

/// One pastel colour: each RGB channel drawn from {100, 110, ..., 180}.
fn pastel<R: Rng>(rng: &mut R) -> String {
    let channel = |rng: &mut R| 100 + rng.gen_range(0..9) * 10;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rng),
        channel(rng),
        channel(rng)
    )
}
