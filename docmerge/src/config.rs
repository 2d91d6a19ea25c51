//! Merge configuration.
//!
//! `MergeConfig` carries the paths and extension the orchestrator works
//! with. Defaults reproduce the classic desktop layout: a `MergeIn` folder
//! as input, `統合ファイル.pdf` as the fixed-layout output, and `temp.docx`
//! as the native-format backup, all on the user's desktop.
//!
//! An optional ini file at `<config dir>/docmerge/config.ini` overrides the
//! defaults; CLI flags override both.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Input folder name under the desktop directory.
pub const DEFAULT_INPUT_DIR_NAME: &str = "MergeIn";

/// Fixed-layout output filename.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "統合ファイル.pdf";

/// Native-format backup filename.
pub const DEFAULT_BACKUP_FILE_NAME: &str = "temp.docx";

/// Native document extension accepted by the indexer.
pub const DEFAULT_EXTENSION: &str = "docx";

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No desktop directory could be resolved for default paths.
    #[error("could not resolve the desktop directory; pass explicit paths")]
    DesktopNotFound,

    /// The configuration file exists but could not be parsed.
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Paths and filters for one merge run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeConfig {
    /// Directory scanned (non-recursively) for numbered input documents.
    pub input_dir: PathBuf,

    /// Fixed-layout (PDF) output path, overwritten on each run.
    pub output_path: PathBuf,

    /// Native-format backup path, overwritten on each run.
    pub backup_path: PathBuf,

    /// Native document extension (without dot) accepted as input.
    pub extension: String,
}

impl MergeConfig {
    /// Create a config with explicit paths and the default extension.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        backup_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            backup_path: backup_path.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Create the default desktop-based config.
    pub fn from_desktop() -> Result<Self, ConfigError> {
        let desktop = dirs::desktop_dir().ok_or(ConfigError::DesktopNotFound)?;
        Ok(Self::new(
            desktop.join(DEFAULT_INPUT_DIR_NAME),
            desktop.join(DEFAULT_OUTPUT_FILE_NAME),
            desktop.join(DEFAULT_BACKUP_FILE_NAME),
        ))
    }

    /// Set the accepted native extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    /// Set the fixed-layout output path.
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Set the native-format backup path.
    pub fn with_backup_path(mut self, backup_path: impl Into<PathBuf>) -> Self {
        self.backup_path = backup_path.into();
        self
    }
}

/// Path of the user configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docmerge")
        .join("config.ini")
}

/// `[merge]` section of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeSection {
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub extension: Option<String>,
}

/// `[engine]` section of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineSection {
    /// Engine backend name: `pandoc` or `memory`.
    pub backend: Option<String>,
    /// Converter command for the pandoc backend.
    pub command: Option<String>,
}

/// Parsed user configuration file.
///
/// A missing file is not an error; every field stays unset and defaults
/// apply. A present but malformed file is reported so a typo does not
/// silently fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub merge: MergeSection,
    pub engine: EngineSection,
}

impl ConfigFile {
    /// Load the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        let get = |section: &str, key: &str| {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        Self {
            merge: MergeSection {
                input_dir: get("merge", "input_dir").map(PathBuf::from),
                output: get("merge", "output").map(PathBuf::from),
                backup: get("merge", "backup").map(PathBuf::from),
                extension: get("merge", "extension").map(str::to_string),
            },
            engine: EngineSection {
                backend: get("engine", "backend").map(str::to_string),
                command: get("engine", "command").map(str::to_string),
            },
        }
    }

    /// Apply file settings on top of a base merge config.
    pub fn apply_to(&self, mut config: MergeConfig) -> MergeConfig {
        if let Some(input_dir) = &self.merge.input_dir {
            config.input_dir = input_dir.clone();
        }
        if let Some(output) = &self.merge.output {
            config.output_path = output.clone();
        }
        if let Some(backup) = &self.merge.backup {
            config.backup_path = backup.clone();
        }
        if let Some(extension) = &self.merge.extension {
            config.extension = extension.clone();
        }
        config
    }
}
