use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, error, info};

use crate::document::{self, ConfigDocument};
use crate::errors::StoreError;
use crate::point::{PointField, RespawnPoint};

/// File-backed respawn point store.
///
/// Holds only the path; every call opens, uses and closes its own handles.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and an empty file if they are missing.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        let result = self.create_if_missing();
        if let Err(err) = &result {
            error!("Could not create {}: {err}", self.path.display());
        }
        result
    }

    fn create_if_missing(&self) -> Result<(), StoreError> {
        self.ensure_parent_dir()?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                info!("Created {} as it didn't exist.", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads and parses the whole file. A missing file reads as empty.
    pub fn load(&self) -> Result<ConfigDocument, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(ConfigDocument::parse(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(ConfigDocument::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Value stored for `world`/`field`; `Ok(None)` if there is no such entry.
    pub fn read(&self, world: &str, field: PointField) -> Result<Option<String>, StoreError> {
        let document = self.load()?;
        Ok(document.get(world, field).map(str::to_string))
    }

    /// Upserts a single field.
    pub fn write(&self, world: &str, field: PointField, value: &str) -> Result<(), StoreError> {
        check_world(world)?;
        self.update(|document| {
            document.upsert(world, field, value);
        })?;
        debug!("Stored {world}.location.{field} = {value}");
        Ok(())
    }

    /// Upserts all five fields of `point` in one locked rewrite.
    pub fn write_point(&self, world: &str, point: &RespawnPoint) -> Result<(), StoreError> {
        check_world(world)?;
        self.update(|document| {
            for (field, value) in point.fields() {
                document.upsert(world, field, &value);
            }
        })?;
        debug!("Stored respawn point for world '{world}': {point:?}");
        Ok(())
    }

    /// Respawn point of `world`, `Ok(None)` if it is missing or incomplete.
    pub fn get_point(&self, world: &str) -> Result<Option<RespawnPoint>, StoreError> {
        let document = self.load()?;
        RespawnPoint::from_document(&document, world)
    }

    /// Worlds that have a complete, well-formed respawn point.
    pub fn configured_worlds(&self) -> Result<Vec<String>, StoreError> {
        let document = self.load()?;
        let worlds = document
            .worlds()
            .into_iter()
            .filter(|world| matches!(RespawnPoint::from_document(&document, world), Ok(Some(_))))
            .map(str::to_string)
            .collect();
        Ok(worlds)
    }

    /// Read-modify-write under the store lock.
    fn update<F>(&self, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ConfigDocument),
    {
        self.with_lock(|| {
            let mut document = self.load()?;
            edit(&mut document);
            self.persist(&document)
        })
    }

    /// `<file><suffix>` next to the store file.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn tmp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Runs `f` while holding an exclusive lock on the sidecar lock file.
    fn with_lock<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce() -> Result<R, StoreError>,
    {
        self.ensure_parent_dir()?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        FileExt::lock_exclusive(&file).map_err(StoreError::Lock)?;
        let res = f();
        FileExt::unlock(&file).map_err(StoreError::Lock)?;
        res
    }

    fn ensure_parent_dir(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Writes a temp file next to the target and renames it into place.
    fn persist(&self, document: &ConfigDocument) -> Result<(), StoreError> {
        let tmp = self.tmp_path();
        let mut f = File::create(&tmp)?;
        f.write_all(document.render().as_bytes())?;
        f.sync_all()?;
        std::fs::rename(&tmp, &self.path)?;

        // Directories cannot be opened for syncing on Windows.
        if cfg!(unix) {
            if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                File::open(dir)?.sync_all()?;
            }
        }
        Ok(())
    }
}

fn check_world(world: &str) -> Result<(), StoreError> {
    if document::is_storable_world(world) {
        Ok(())
    } else {
        Err(StoreError::InvalidWorld {
            world: world.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_file_sits_next_to_store() {
        let store = ConfigStore::new("/data/VoidRespawn/config.yml");
        assert_eq!(
            store.lock_path(),
            PathBuf::from("/data/VoidRespawn/config.yml.lock")
        );
    }

    #[test]
    fn temp_file_is_per_store_file() {
        let yml = ConfigStore::new("/data/VoidRespawn/config.yml");
        let txt = ConfigStore::new("/data/VoidRespawn/config.txt");

        assert_eq!(yml.tmp_path(), PathBuf::from("/data/VoidRespawn/config.yml.tmp"));
        assert_ne!(yml.tmp_path(), txt.tmp_path());
    }

    #[test]
    fn ensure_exists_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("nested").join("config.yml"));

        store.ensure_exists().unwrap();
        std::fs::write(store.path(), "world.location.x: 1.0\n").unwrap();
        store.ensure_exists().unwrap();

        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "world.location.x: 1.0\n"
        );
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("config.yml"));

        assert_eq!(store.read("world", PointField::X).unwrap(), None);
        assert_eq!(store.get_point("world").unwrap(), None);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("config.yml"));

        store.write("world", PointField::X, "1.0").unwrap();

        assert!(!tmp.path().join("config.yml.tmp").exists());
    }
}
