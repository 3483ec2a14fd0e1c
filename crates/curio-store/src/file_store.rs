//! File-backed collection store: one JSON document per collection key,
//! replaced atomically via a temp file and rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use curio_core::{CollectionKey, CollectionStore, CurioResult, StoreError};

/// Stores each collection as `<dir>/<key>.json`.
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes writers; the rename itself is atomic, the guard keeps
    // two concurrent writers from racing on the temp file.
    write_guard: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> CurioResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            dir,
            write_guard: Mutex::new(()),
        })
    }

    fn path_for(&self, key: CollectionKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl CollectionStore for JsonFileStore {
    fn read_raw(&self, key: CollectionKey) -> CurioResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                path: path.display().to_string(),
                source: e,
            }
            .into()),
        }
    }

    fn write_raw(&self, key: CollectionKey, json: &str) -> CurioResult<()> {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key.as_str()));

        let io_err = |e: std::io::Error, p: &Path| StoreError::Io {
            path: p.display().to_string(),
            source: e,
        };

        let mut file = fs::File::create(&tmp).map_err(|e| io_err(e, &tmp))?;
        file.write_all(json.as_bytes()).map_err(|e| io_err(e, &tmp))?;
        file.sync_all().map_err(|e| io_err(e, &tmp))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(e, &path))?;
        tracing::debug!("store: wrote {} ({} bytes)", key, json.len());
        Ok(())
    }
}
