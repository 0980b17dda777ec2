//! Reading and first-run creation of the settings file.
//!
//! A missing file is written out with every default and a comment per
//! section. An existing file is never regenerated: tables it lacks are
//! appended in place with `toml_edit`, so hand edits, comments and key
//! order survive. Unknown tables are reported and left alone.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use super::settings::{ConfigSection, InvalidSetting, Settings};

/// Errors that can occur while loading or writing the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse config for editing: {0}")]
    EditParse(#[from] toml_edit::TomlError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid setting {0}")]
    Invalid(#[from] InvalidSetting),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file path and the settings read from it.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Nothing is read until [`load`](Self::load) or
    /// [`load_or_create`](Self::load_or_create).
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Read and validate an existing file without touching it.
    pub fn load(&mut self) -> ConfigResult<()> {
        let content = self.read()?;
        self.settings = self.parse(&content)?;
        Ok(())
    }

    /// Like [`load`](Self::load), but writes a default file when there is
    /// none and appends any missing sections to an existing one.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        let content = match self.read() {
            Ok(content) => content,
            Err(ConfigError::NotFound(_)) => {
                tracing::info!("Creating default config {}", self.config_path.display());
                self.settings = Settings::default();
                return self.save();
            }
            Err(e) => return Err(e),
        };

        self.settings = self.parse(&content)?;

        let mut doc: DocumentMut = content.parse()?;
        warn_unknown_tables(&doc, &self.config_path);

        let added = append_missing_sections(&mut doc, &self.settings)?;
        if !added.is_empty() {
            tracing::info!(
                "Adding default sections [{}] to {}",
                added.join("], ["),
                self.config_path.display()
            );
            self.write(&doc.to_string())?;
        }

        Ok(())
    }

    /// Write the current settings as a fresh, commented file.
    pub fn save(&self) -> ConfigResult<()> {
        let doc = render(&self.settings)?;
        self.write(&doc.to_string())
    }

    fn read(&self) -> ConfigResult<String> {
        fs::read_to_string(&self.config_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound(self.config_path.clone())
            } else {
                ConfigError::Io {
                    path: self.config_path.clone(),
                    source,
                }
            }
        })
    }

    fn parse(&self, content: &str) -> ConfigResult<Settings> {
        let settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the file via a sibling temp file and a rename.
    fn write(&self, content: &str) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        };

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");
        let written = fs::File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(content.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp_path, &self.config_path));

        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written.map_err(io_err)
    }
}

/// One section of `settings` as a standalone table headed by its comment.
fn section_table(settings: &Settings, section: ConfigSection) -> ConfigResult<Table> {
    let body = match section {
        ConfigSection::Paths => toml::to_string(&settings.paths)?,
        ConfigSection::Tools => toml::to_string(&settings.tools)?,
        ConfigSection::Audio => toml::to_string(&settings.audio)?,
        ConfigSection::Frames => toml::to_string(&settings.frames)?,
        ConfigSection::Logging => toml::to_string(&settings.logging)?,
    };
    let parsed: DocumentMut = body.parse()?;

    // Fresh table: no document position, so it sorts after existing tables
    let mut table = Table::new();
    for (key, item) in parsed.iter() {
        table.insert(key, item.clone());
    }
    table
        .decor_mut()
        .set_prefix(format!("\n{}\n", section.comment()));
    Ok(table)
}

fn render(settings: &Settings) -> ConfigResult<DocumentMut> {
    let mut doc = DocumentMut::new();
    for (i, section) in ConfigSection::ALL.into_iter().enumerate() {
        let mut table = section_table(settings, section)?;
        if i == 0 {
            table
                .decor_mut()
                .set_prefix(format!("# clipprep configuration\n\n{}\n", section.comment()));
        }
        doc.insert(section.table_name(), Item::Table(table));
    }
    Ok(doc)
}

/// Append every known section `doc` lacks, returning their names.
fn append_missing_sections(
    doc: &mut DocumentMut,
    settings: &Settings,
) -> ConfigResult<Vec<&'static str>> {
    let mut added = Vec::new();
    for section in ConfigSection::ALL {
        if !doc.contains_key(section.table_name()) {
            doc.insert(section.table_name(), Item::Table(section_table(settings, section)?));
            added.push(section.table_name());
        }
    }
    Ok(added)
}

fn warn_unknown_tables(doc: &DocumentMut, path: &Path) {
    for (key, _) in doc.iter() {
        if !ConfigSection::ALL.iter().any(|s| s.table_name() == key) {
            tracing::warn!("Ignoring unknown section [{}] in {}", key, path.display());
        }
    }
}
