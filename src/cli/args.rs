//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};
use crate::consts::{DEFAULT_ADDRESS, DEFAULT_TITLE};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "adaptyst-analyser")]
#[command(about = "Adaptyst Analyser web server and module installer", version)]
pub(crate) struct Cli {
    /// Path to a results directory, or to a module bundle to install
    #[arg(value_name = "PATH")]
    pub(crate) path: PathBuf,

    /// Address and port to bind to, default: 127.0.0.1:8000
    #[arg(short, long, value_name = "ADDR")]
    pub(crate) address: Option<String>,

    /// Page title used by the viewer
    #[arg(short, long, value_name = "TITLE")]
    pub(crate) title: Option<String>,

    /// Extra stylesheet reference injected into rendered pages
    #[arg(short = 'b', long = "stylesheet", value_name = "CSS")]
    pub(crate) stylesheet: Option<String>,

    /// List the sessions stored under PATH and exit
    #[arg(short, long)]
    pub(crate) list: bool,

    /// Update/reinstall the module if it is already installed
    #[arg(short, long)]
    pub(crate) update: bool,

    /// Install the module in development (editable) mode
    #[arg(short = 'd', long = "dev")]
    pub(crate) development: bool,

    /// Remove any existing installation of the module before installing
    #[arg(long)]
    pub(crate) force_reinstall: bool,

    /// Color output mode for terminal listings
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.address.is_none() {
            self.address = config.address.clone();
        }
        if self.title.is_none() {
            self.title = config.title.clone();
        }
        if self.stylesheet.is_none() {
            self.stylesheet = config.stylesheet.clone();
        }

        if let Some(color) = config.color
            && matches!(self.color, ColorMode::Auto)
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        self
    }

    pub(crate) fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    pub(crate) fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub(crate) fn use_color(&self) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Check that `-a` carries a host:port pair the socket layer can bind.
pub(crate) fn validate_address(value: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidAddress {
        input: value.to_string(),
    };

    let (host, port) = value.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(())
}

/// `-b` values end up inside a link attribute of every rendered page; refuse
/// anything that could break out of it.
pub(crate) fn validate_stylesheet(value: &str) -> Result<(), AppError> {
    for ch in value.chars() {
        if matches!(ch, '<' | '>' | '"' | '\'' | '\\') || ch.is_control() {
            return Err(AppError::DisallowedStylesheet { found: ch });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parse CLI")
    }

    #[test]
    fn defaults_without_config() {
        let cli = parse(&["adaptyst-analyser", "results"]);
        assert_eq!(cli.address(), "127.0.0.1:8000");
        assert_eq!(cli.title(), "Adaptyst Analyser");
        assert!(cli.stylesheet.is_none());
        assert!(!cli.list);
        assert!(!cli.update);
        assert!(!cli.development);
        assert!(!cli.force_reinstall);
    }

    #[test]
    fn config_fills_unset_values_only() {
        let config = Config {
            address: Some("0.0.0.0:9000".to_string()),
            title: Some("Cluster".to_string()),
            stylesheet: None,
            color: Some(ConfigColorMode::Never),
        };
        let cli = parse(&["adaptyst-analyser", "results", "-t", "Mine"]).with_config(&config);
        assert_eq!(cli.address(), "0.0.0.0:9000");
        assert_eq!(cli.title(), "Mine");
        assert!(!cli.use_color());
    }

    #[test]
    fn short_flags_map_to_modes() {
        let cli = parse(&[
            "adaptyst-analyser",
            "bundle",
            "-u",
            "-d",
            "--force-reinstall",
        ]);
        assert!(cli.update);
        assert!(cli.development);
        assert!(cli.force_reinstall);
    }

    #[test]
    fn validate_address_accepts_host_port() {
        assert!(validate_address("127.0.0.1:8000").is_ok());
        assert!(validate_address("0.0.0.0:80").is_ok());
        assert!(validate_address("[::1]:8000").is_ok());
        assert!(validate_address("myhost:9999").is_ok());
    }

    #[test]
    fn validate_address_rejects_garbage() {
        assert!(validate_address("nonsense").is_err());
        assert!(validate_address(":8000").is_err());
        assert!(validate_address("host:port").is_err());
        assert!(validate_address("host:99999").is_err());
    }

    #[test]
    fn validate_stylesheet_allows_plain_references() {
        assert!(validate_stylesheet("custom.css").is_ok());
        assert!(validate_stylesheet("/static/theme-dark.css").is_ok());
    }

    #[test]
    fn validate_stylesheet_rejects_markup_characters() {
        for bad in ["<script>", "a\"b", "a'b", "a\\b", "a\nb"] {
            assert!(validate_stylesheet(bad).is_err(), "accepted {bad:?}");
        }
    }
}
