//! Where the SRD markdown corpus lives on disk.

use std::path::{Path, PathBuf};

/// Environment variable overriding the corpus directory.
pub const SRD_DIR_ENV: &str = "SRD_DIR";

/// Default corpus directory, relative to the working directory.
pub const DEFAULT_SRD_DIR: &str = "srd";

/// Default file holding the monster stat blocks.
pub const DEFAULT_MONSTERS_FILE: &str = "12_MonstersA-Z.md";

/// Default file holding the animal stat blocks.
pub const DEFAULT_ANIMALS_FILE: &str = "13_Animals.md";

/// Default file holding the spell descriptions.
pub const DEFAULT_SPELLS_FILE: &str = "07_Spells.md";

/// Configuration for locating the reference corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrdConfig {
    /// Directory containing the SRD markdown files.
    pub srd_dir: PathBuf,

    /// Monster stat blocks, one `##` heading per creature.
    pub monsters_file: String,

    /// Animal stat blocks, one `##` heading per creature.
    pub animals_file: String,

    /// Spell descriptions, one `####` heading per spell.
    pub spells_file: String,
}

impl Default for SrdConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SRD_DIR)
    }
}

impl SrdConfig {
    /// Create a config rooted at `srd_dir` with the standard file names.
    pub fn new(srd_dir: impl Into<PathBuf>) -> Self {
        Self {
            srd_dir: srd_dir.into(),
            monsters_file: DEFAULT_MONSTERS_FILE.to_string(),
            animals_file: DEFAULT_ANIMALS_FILE.to_string(),
            spells_file: DEFAULT_SPELLS_FILE.to_string(),
        }
    }

    /// Build a config from the environment.
    ///
    /// Reads `SRD_DIR`; everything else keeps its default. Callers that want
    /// `.env` support load it before calling this.
    pub fn from_env() -> Self {
        match std::env::var(SRD_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir.trim()),
            _ => Self::default(),
        }
    }

    /// Set the corpus directory.
    pub fn with_srd_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.srd_dir = dir.into();
        self
    }

    /// Set the monster file name.
    pub fn with_monsters_file(mut self, name: impl Into<String>) -> Self {
        self.monsters_file = name.into();
        self
    }

    /// Set the animal file name.
    pub fn with_animals_file(mut self, name: impl Into<String>) -> Self {
        self.animals_file = name.into();
        self
    }

    /// Set the spell file name.
    pub fn with_spells_file(mut self, name: impl Into<String>) -> Self {
        self.spells_file = name.into();
        self
    }

    pub fn monsters_path(&self) -> PathBuf {
        self.srd_dir.join(&self.monsters_file)
    }

    pub fn animals_path(&self) -> PathBuf {
        self.srd_dir.join(&self.animals_file)
    }

    pub fn spells_path(&self) -> PathBuf {
        self.srd_dir.join(&self.spells_file)
    }

    /// Whether `path` is one of the three files served through lookup tools
    /// rather than placed in the rules context.
    pub fn is_tool_backed(&self, path: &Path) -> bool {
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => [&self.monsters_file, &self.animals_file, &self.spells_file]
                .iter()
                .any(|file| file.as_str() == name),
            None => false,
        }
    }
}
