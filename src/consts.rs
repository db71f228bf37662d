/// Session metadata file expected in every valid session directory
pub(crate) const DIRMETA_FILE: &str = "dirmeta.json";

/// System topology description, relative to a session directory
pub(crate) const SYSTEM_FILE: &str = "system/system.yml";

/// Sidecar cache of entity colour assignments, relative to a session directory
pub(crate) const COLOURS_FILE: &str = "entity_colours.json";

/// Metadata descriptor of a module bundle
pub(crate) const METADATA_FILE: &str = "metadata.yml";

/// Web assets directory of a module bundle
pub(crate) const WEB_DIR: &str = "web";

/// Backend code directory of a module bundle
pub(crate) const PYTHON_DIR: &str = "python";

/// Backend entry point inside a bundle's python directory
pub(crate) const BACKEND_ENTRY: &str = "analysis.py";

/// Shared dependency manifest kept next to the installed modules
pub(crate) const DEPS_FILE: &str = "dependencies.json";

/// Subdirectory of the platform data directory holding installed modules
pub(crate) const APP_DIR: &str = "adaptyst-analyser";

pub(crate) const DEFAULT_ADDRESS: &str = "127.0.0.1:8000";

pub(crate) const DEFAULT_TITLE: &str = "Adaptyst Analyser";
