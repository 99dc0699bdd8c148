//! Configuration management.
//!
//! A TOML file is parsed into [`ConfigFile`], whose sections are all
//! optional, and then layered over [`DreamportConfig::default`]. Command-line
//! flags are applied on top by the binary.

use crate::io::formats::{DEFAULT_DELIMITER, RowEncoding};
use crate::services::{DateZone, ExportOptions, ImportOptions, KNOWN_MISSING_TAG};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DREAMPORT_CONFIG_PATH";

/// Main configuration for dreamport.
#[derive(Debug, Clone, Default)]
pub struct DreamportConfig {
    /// Journal import settings.
    pub import: ImportSettings,
    /// Row export settings.
    pub export: ExportSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Journal import settings.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Delimited journal export.
    pub entries: PathBuf,
    /// Label list, one per line.
    pub labels: PathBuf,
    /// Sample collection supplying the templates.
    pub sample: PathBuf,
    /// Generated collection.
    pub output: PathBuf,
    /// Field and record delimiter.
    pub delimiter: String,
    /// Zone used for calendar dates; local unless configured.
    pub timezone: DateZone,
    /// Pretty-print the generated collection.
    pub pretty: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            entries: PathBuf::from("dream_info"),
            labels: PathBuf::from("labels_info"),
            sample: PathBuf::from("bk.lucidity"),
            output: PathBuf::from("generated.lucidity"),
            delimiter: DEFAULT_DELIMITER.to_string(),
            timezone: DateZone::Local,
            pretty: false,
        }
    }
}

impl ImportSettings {
    /// Returns the service options these settings describe.
    #[must_use]
    pub fn options(&self) -> ImportOptions {
        ImportOptions::default()
            .with_delimiter(self.delimiter.clone())
            .with_timezone(self.timezone)
            .with_pretty(self.pretty)
    }
}

/// Row export settings.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Tag identifiers known to be referenced but never defined.
    pub ignored_tag_ids: Vec<String>,
    /// Base64-encode date, lucidity and nightmare fields.
    pub encode_numeric_fields: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            ignored_tag_ids: vec![KNOWN_MISSING_TAG.to_string()],
            encode_numeric_fields: false,
        }
    }
}

impl ExportSettings {
    /// Returns the row encoding.
    #[must_use]
    pub const fn encoding(&self) -> RowEncoding {
        RowEncoding {
            encode_numeric_fields: self.encode_numeric_fields,
        }
    }

    /// Returns the service options these settings describe.
    #[must_use]
    pub fn options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_ignored_tag_ids(self.ignored_tag_ids.clone())
            .with_encoding(self.encoding())
    }
}

/// Logging settings, applied by [`crate::observability`].
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive.
    pub filter: Option<String>,
    /// Log file; standard error when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Import section.
    pub import: Option<ConfigFileImport>,
    /// Export section.
    pub export: Option<ConfigFileExport>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Import section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileImport {
    /// Entries path.
    pub entries: Option<String>,
    /// Labels path.
    pub labels: Option<String>,
    /// Sample collection path.
    pub sample: Option<String>,
    /// Output path.
    pub output: Option<String>,
    /// Delimiter token.
    pub delimiter: Option<String>,
    /// `utc` or `local`.
    pub timezone: Option<String>,
    /// Pretty output.
    pub pretty: Option<bool>,
}

/// Export section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileExport {
    /// Known-missing tag identifiers.
    pub ignored_tag_ids: Option<Vec<String>>,
    /// Encode scalar fields.
    pub encode_numeric_fields: Option<bool>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Output format.
    pub format: Option<String>,
    /// Filter directive.
    pub filter: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl DreamportConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown time zone.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::operation("read_config_file", format!("{}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Self::from_config_file(file)
    }

    /// Resolves and loads configuration.
    ///
    /// Uses `explicit` if given, then the path in `DREAMPORT_CONFIG_PATH`,
    /// then [`Self::load_default`].
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Self::load_from_file(Path::new(&path));
        }
        Ok(Self::load_default())
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/dreamport/` on macOS)
    /// 2. XDG config dir (`~/.config/dreamport/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("dreamport").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("dreamport")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `DreamportConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(import) = file.import {
            let settings = &mut config.import;
            if let Some(v) = import.entries {
                settings.entries = PathBuf::from(v);
            }
            if let Some(v) = import.labels {
                settings.labels = PathBuf::from(v);
            }
            if let Some(v) = import.sample {
                settings.sample = PathBuf::from(v);
            }
            if let Some(v) = import.output {
                settings.output = PathBuf::from(v);
            }
            if let Some(v) = import.delimiter {
                settings.delimiter = v;
            }
            if let Some(v) = import.timezone {
                settings.timezone = DateZone::parse(&v).ok_or_else(|| {
                    Error::InvalidInput(format!("unknown timezone '{v}', expected utc or local"))
                })?;
            }
            if let Some(v) = import.pretty {
                settings.pretty = v;
            }
        }
        if let Some(export) = file.export {
            if let Some(v) = export.ignored_tag_ids {
                config.export.ignored_tag_ids = v;
            }
            if let Some(v) = export.encode_numeric_fields {
                config.export.encode_numeric_fields = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging.format = logging.format;
            config.logging.filter = logging.filter;
            config.logging.file = logging.file.map(PathBuf::from);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DreamportConfig::new();
        assert_eq!(config.import.entries, PathBuf::from("dream_info"));
        assert_eq!(config.import.labels, PathBuf::from("labels_info"));
        assert_eq!(config.import.sample, PathBuf::from("bk.lucidity"));
        assert_eq!(config.import.output, PathBuf::from("generated.lucidity"));
        assert_eq!(config.import.delimiter, "多");
        assert_eq!(config.import.timezone, DateZone::Local);
        assert_eq!(config.export.ignored_tag_ids, vec![KNOWN_MISSING_TAG]);
        assert!(!config.export.encode_numeric_fields);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = DreamportConfig::from_toml(
            r#"
            [import]
            output = "out.json"
            timezone = "utc"

            [export]
            encode_numeric_fields = true
            "#,
        )
        .unwrap();

        assert_eq!(config.import.output, PathBuf::from("out.json"));
        assert_eq!(config.import.timezone, DateZone::Utc);
        assert_eq!(config.import.entries, PathBuf::from("dream_info"));
        assert!(config.export.encoding().encode_numeric_fields);
        assert_eq!(config.export.ignored_tag_ids, vec![KNOWN_MISSING_TAG]);
    }

    #[test]
    fn test_logging_section() {
        let config = DreamportConfig::from_toml(
            r#"
            [logging]
            format = "json"
            filter = "dreamport=trace"
            file = "/tmp/dreamport.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.logging.filter.as_deref(), Some("dreamport=trace"));
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/dreamport.log")));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let err = DreamportConfig::from_toml("[import]\ntimezone = \"mars\"").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(DreamportConfig::from_toml("[import\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\nignored_tag_ids = []\n").unwrap();

        let config = DreamportConfig::load(Some(&path)).unwrap();
        assert!(config.export.ignored_tag_ids.is_empty());
        assert!(config.export.options().ignored_tag_ids.is_empty());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = DreamportConfig::load(Some(Path::new("/nonexistent/dreamport.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn test_import_options() {
        let mut settings = ImportSettings::default();
        settings.delimiter = "|".to_string();
        settings.pretty = true;
        let options = settings.options();
        assert_eq!(options.delimiter, "|");
        assert!(options.pretty);
    }
}
