//! Sled-backed local content store.

use crate::port::{KeyValueStore, StoreError};
use sled::{Db, Tree};
use std::path::Path;

const STORE_TREE_NAME: &str = "local_storage";

pub struct SledKeyValueStore {
    _db: Db,
    tree: Tree,
}

impl SledKeyValueStore {
    /// Open or create a sled database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        Self::with_db(db)
    }

    /// Open with an existing sled database instance.
    pub fn with_db(db: Db) -> Result<Self, StoreError> {
        let tree = db.open_tree(STORE_TREE_NAME)?;
        Ok(Self { _db: db, tree })
    }

    fn decode(key: &[u8], value: &[u8]) -> Result<String, StoreError> {
        String::from_utf8(value.to_vec()).map_err(|_| StoreError::Encoding {
            key: String::from_utf8_lossy(key).into_owned(),
        })
    }
}

impl KeyValueStore for SledKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(key.as_bytes(), &bytes)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for result in self.tree.scan_prefix(prefix.as_bytes()) {
            let (key, _) = result?;
            keys.push(Self::decode(&key, &key)?);
        }
        Ok(keys)
    }
}
