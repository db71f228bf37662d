//! Invocation mode detection
//!
//! One binary covers the viewer and the module installer; the mode is decided
//! from the layout of the supplied path, the way the companion setup script
//! of the profiler does it.

use std::path::Path;

use crate::installer;

/// What a single invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Start the web viewer over a results directory
    Serve,
    /// Print the session listing and exit
    List,
    /// Install the module bundle at the supplied path
    Install,
}

pub(crate) fn detect_mode(path: &Path, list: bool) -> Mode {
    if installer::is_module_bundle(path) {
        Mode::Install
    } else if list {
        Mode::List
    } else {
        Mode::Serve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn results_directory_serves() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect_mode(dir.path(), false), Mode::Serve);
        assert_eq!(detect_mode(dir.path(), true), Mode::List);
    }

    #[test]
    fn bundle_layout_installs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        fs::create_dir(dir.path().join("python")).unwrap();
        fs::write(dir.path().join("metadata.yml"), "name: demo\n").unwrap();
        assert_eq!(detect_mode(dir.path(), false), Mode::Install);
        // bundle layout wins even when -l is passed
        assert_eq!(detect_mode(dir.path(), true), Mode::Install);
    }

    #[test]
    fn partial_bundle_layout_is_not_a_bundle() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        fs::create_dir(dir.path().join("python")).unwrap();
        assert_eq!(detect_mode(dir.path(), false), Mode::Serve);
    }
}
