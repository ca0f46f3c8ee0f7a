use crate::ports::catalog_store::{
    CatalogSnapshot, CatalogStore as CatalogStoreTrait, PersistenceError, Result,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::codec::{decode_snapshot, encode_snapshot};

/// JSON file implementation of CatalogStore
///
/// The whole catalog is read and written as a single JSON document.
/// File handles are scoped to each call and released on every exit path.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            location: self.location(),
            source,
        }
    }
}

impl CatalogStoreTrait for CatalogStore {
    /// Read and parse the catalog file
    ///
    /// A missing file is reported as `SourceMissing` so callers can start empty.
    fn load(&self) -> Result<CatalogSnapshot> {
        let contents = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PersistenceError::SourceMissing {
                location: self.location(),
            },
            _ => self.io_error(e),
        })?;

        decode_snapshot(&contents).map_err(|e| PersistenceError::Parse {
            location: self.location(),
            source: Box::new(e),
        })
    }

    /// Serialize the catalog and write it, creating parent directories when needed
    fn save(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        let json = encode_snapshot(snapshot).map_err(|e| PersistenceError::Parse {
            location: self.location(),
            source: Box::new(e),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
