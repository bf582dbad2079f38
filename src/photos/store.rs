//! JSON document store. Every [`DocumentStore::open`] reloads the backing
//! file and holds the handle's lock until the [`Collection`] is dropped;
//! separate processes sharing the file are not coordinated.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::PhotoResult;
use crate::photos::{NewPhoto, PhotoRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    collections: Vec<CollectionData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionData {
    name: String,
    #[serde(default)]
    max_id: u64,
    #[serde(default)]
    data: Vec<PhotoRecord>,
}

impl CollectionData {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_id: 0,
            data: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    collection_name: String,
    lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: PathBuf, collection_name: impl Into<String>) -> Self {
        Self {
            path,
            collection_name: collection_name.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or empty backing file is an empty database.
    pub async fn open(&self) -> PhotoResult<Collection<'_>> {
        let guard = self.lock.lock().await;
        let mut database = load_database(&self.path).await?;
        let index = match database
            .collections
            .iter()
            .position(|collection| collection.name == self.collection_name)
        {
            Some(index) => index,
            None => {
                database
                    .collections
                    .push(CollectionData::empty(&self.collection_name));
                database.collections.len() - 1
            }
        };
        tracing::debug!(
            path = %self.path.display(),
            collection = %self.collection_name,
            records = database.collections[index].data.len(),
            "loaded photo store"
        );
        Ok(Collection {
            _guard: guard,
            path: &self.path,
            database,
            index,
        })
    }
}

pub struct Collection<'a> {
    _guard: MutexGuard<'a, ()>,
    path: &'a Path,
    database: Database,
    index: usize,
}

impl Collection<'_> {
    fn data(&self) -> &CollectionData {
        &self.database.collections[self.index]
    }

    pub fn insert(&mut self, photo: NewPhoto) -> PhotoRecord {
        let collection = &mut self.database.collections[self.index];
        collection.max_id += 1;
        let record = photo.into_record(collection.max_id, Utc::now());
        collection.data.push(record.clone());
        record
    }

    pub fn get(&self, id: u64) -> Option<&PhotoRecord> {
        self.data().data.iter().find(|record| record.id == id)
    }

    pub fn all(&self) -> &[PhotoRecord] {
        &self.data().data
    }

    pub fn len(&self) -> usize {
        self.data().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().data.is_empty()
    }

    pub async fn persist(&self) -> PhotoResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(&self.database)?;
        let tmp_path = temp_path(self.path);
        fs::write(&tmp_path, payload).await?;
        fs::rename(&tmp_path, self.path).await?;
        tracing::debug!(path = %self.path.display(), records = self.len(), "persisted photo store");
        Ok(())
    }
}

async fn load_database(path: &Path) -> PhotoResult<Database> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Database::default()),
        Err(err) => return Err(err.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Database::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}
