//! Module bundle installer
//!
//! Copies a module bundle (backend code + web assets + metadata) into the
//! application's runtime directories. Development mode symlinks the bundle
//! contents instead, so edits take effect without reinstalling.

pub(crate) mod metadata;

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::consts::{APP_DIR, BACKEND_ENTRY, DEPS_FILE, METADATA_FILE, PYTHON_DIR, WEB_DIR};
use crate::error::InstallError;

pub(crate) use metadata::{Dependency, ModuleMetadata};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InstallOptions {
    /// Update/reinstall if the module is already installed (`-u`)
    pub(crate) update: bool,
    /// Development (editable) mode: symlink instead of copying (`-d`)
    pub(crate) development: bool,
    /// Remove any existing installation first (`--force-reinstall`)
    pub(crate) force_reinstall: bool,
}

/// A dependency version recorded in the shared manifest, with the module
/// that brought it in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct DepRecord {
    pub(crate) version: String,
    pub(crate) module: String,
}

/// Shared manifest of the dependencies declared by all installed modules.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct DepsManifest {
    #[serde(default)]
    pub(crate) python: BTreeMap<String, DepRecord>,
    #[serde(default)]
    pub(crate) js: BTreeMap<String, DepRecord>,
}

/// True when the path has the layout of a module bundle rather than a
/// results directory.
pub(crate) fn is_module_bundle(path: &Path) -> bool {
    path.join(WEB_DIR).is_dir()
        && path.join(PYTHON_DIR).is_dir()
        && path.join(METADATA_FILE).is_file()
}

/// Root of the application's runtime directories.
pub(crate) fn data_dir() -> Result<PathBuf, InstallError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(InstallError::NoDataDir)
}

/// Install the bundle at `bundle` into the application data directory.
/// Returns the module name on success.
pub(crate) fn install(bundle: &Path, opts: InstallOptions) -> Result<String, InstallError> {
    install_into(bundle, &data_dir()?, opts, &mut prompt_overwrite)
}

/// The install procedure with the target root and the conflict prompt
/// injected. `confirm` is consulted for every dependency conflict outside
/// development mode.
pub(crate) fn install_into(
    bundle: &Path,
    data_root: &Path,
    opts: InstallOptions,
    confirm: &mut dyn FnMut(&Dependency, &DepRecord) -> bool,
) -> Result<String, InstallError> {
    let web_path = validated_dir(&bundle.join(WEB_DIR))?;
    let python_path = validated_dir(&bundle.join(PYTHON_DIR))?;
    let metadata_path = bundle.join(METADATA_FILE);
    if !metadata_path.exists() {
        return Err(InstallError::ComponentMissing {
            path: metadata_path,
        });
    }
    if !metadata_path.is_file() {
        return Err(InstallError::NotAFile {
            path: metadata_path,
        });
    }

    let entry_point = python_path.join(BACKEND_ENTRY);
    if !entry_point.is_file() {
        return Err(InstallError::ComponentMissing { path: entry_point });
    }
    if !web_path.join("settings.html").is_file() {
        eprintln!(
            "adaptyst-analyser: warning: {} does not contain a \"settings.html\" file, \
             there will be no settings available for this module on the client side",
            web_path.display()
        );
    }

    let text = fs::read_to_string(&metadata_path)?;
    let metadata = ModuleMetadata::parse(&text).map_err(|e| InstallError::Yaml {
        path: metadata_path,
        reason: e.to_string(),
    })?;
    metadata.validate(env!("CARGO_PKG_VERSION"))?;

    let module_dir = data_root.join("modules").join(&metadata.name);
    let module_web_dir = data_root.join("web").join("modules").join(&metadata.name);

    if module_dir.exists() || module_web_dir.exists() {
        if !(opts.update || opts.force_reinstall) {
            return Err(InstallError::AlreadyInstalled {
                name: metadata.name,
            });
        }
        for dir in [&module_dir, &module_web_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }
    }

    fs::create_dir_all(&module_dir)?;
    fs::create_dir_all(&module_web_dir)?;

    install_entries(&web_path, &module_web_dir, opts.development)?;
    install_entries(&python_path, &module_dir, opts.development)?;

    merge_dependencies(data_root, &metadata, opts.development, confirm)?;

    Ok(metadata.name)
}

fn validated_dir(path: &Path) -> Result<PathBuf, InstallError> {
    if !path.exists() {
        return Err(InstallError::ComponentMissing {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(InstallError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

/// Place every entry of `src` into `dst`: symlinks in development mode,
/// copies otherwise (resolving symlinked sources first).
fn install_entries(src: &Path, dst: &Path, development: bool) -> Result<(), InstallError> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());

        if development {
            symlink_entry(&fs::canonicalize(entry.path())?, &target)?;
        } else {
            let source = if entry.path().is_symlink() {
                fs::canonicalize(entry.path())?
            } else {
                entry.path()
            };
            copy_recursive(&source, &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn symlink_entry(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn symlink_entry(source: &Path, target: &Path) -> std::io::Result<()> {
    // No symlink privilege guarantees outside Unix; fall back to copying.
    copy_recursive_io(source, target)
}

fn copy_recursive(src: &Path, dst: &Path) -> Result<(), InstallError> {
    copy_recursive_io(src, dst).map_err(InstallError::Io)
}

fn copy_recursive_io(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive_io(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)?;
    }
    Ok(())
}

/// Merge the bundle's declared dependencies into the shared manifest.
///
/// A dependency already recorded at a different version by another module is
/// a conflict: the prompt decides whether the new version wins, except in
/// development mode where it always does.
pub(crate) fn merge_dependencies(
    data_root: &Path,
    metadata: &ModuleMetadata,
    development: bool,
    confirm: &mut dyn FnMut(&Dependency, &DepRecord) -> bool,
) -> Result<(), InstallError> {
    let manifest_path = data_root.join(DEPS_FILE);
    let mut manifest: DepsManifest = match fs::read_to_string(&manifest_path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(_) => DepsManifest::default(),
    };

    for (declared, recorded) in [
        (&metadata.dependencies.python, &mut manifest.python),
        (&metadata.dependencies.js, &mut manifest.js),
    ] {
        for dep in declared {
            let record = DepRecord {
                version: dep.version.clone(),
                module: metadata.name.clone(),
            };
            match recorded.get(&dep.name) {
                Some(existing)
                    if existing.version != dep.version && existing.module != metadata.name =>
                {
                    if development || confirm(dep, existing) {
                        recorded.insert(dep.name.clone(), record);
                    } else {
                        debug!(
                            "keeping {} {} (declared by {})",
                            dep.name, existing.version, existing.module
                        );
                    }
                }
                _ => {
                    recorded.insert(dep.name.clone(), record);
                }
            }
        }
    }

    let text = serde_json::to_string_pretty(&manifest).map_err(std::io::Error::from)?;
    fs::write(manifest_path, text).map_err(InstallError::Io)
}

/// Interactive `[y/N]` conflict prompt on the controlling terminal.
fn prompt_overwrite(dep: &Dependency, existing: &DepRecord) -> bool {
    eprint!(
        "adaptyst-analyser: {} is already provided at version {} by {}, \
         overwrite with version {}? [y/N] ",
        dep.name, existing.version, existing.module, dep.version
    );
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}
