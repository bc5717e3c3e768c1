//! A filesystem backed key-value store
//!
//! The [`Directory`] keeps every key in its own `<key>.json` file under a root
//! directory, alongside the `config.toml` that configures the dashboard.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{domain::Config, storage::KeyValueStore};

/// A directory of JSON files, one per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// The root of the directory values are stored in.
    root: PathBuf,
}

impl Directory {
    /// Opens a directory at the given path.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a key is stored in.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// The path of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Loads the configuration, using the defaults if there is no
    /// `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.toml` exists but is invalid.
    pub fn config(&self) -> Result<Config, String> {
        Config::load_or_default(&self.root)
    }
}

impl KeyValueStore for Directory {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: String) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        // Write to a sibling file first so a failed write never truncates the
        // existing collection.
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }
}
