use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.base_dir).await
    }

    /// Creates a fresh file for writing. Fails if the name is already taken.
    pub async fn create_new(&self, filename: &str) -> std::io::Result<File> {
        self.ensure_dir().await?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.resolve_path(filename))
            .await
    }

    pub async fn open(&self, filename: &str) -> std::io::Result<(File, u64)> {
        let file = File::open(self.resolve_path(filename)).await?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    pub async fn remove(&self, filename: &str) -> std::io::Result<()> {
        match fs::remove_file(self.resolve_path(filename)).await {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    /// Deletes everything inside the upload directory but keeps the
    /// directory itself. Returns the number of entries removed.
    pub async fn clean(&self) -> std::io::Result<usize> {
        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err),
        };
        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                fs::remove_dir_all(entry.path()).await?;
            } else {
                fs::remove_file(entry.path()).await?;
            }
            removed += 1;
        }
        Ok(removed)
    }

    /// Stored names are flat; anything that looks like a path is reduced to
    /// its final component.
    pub fn resolve_path(&self, filename: &str) -> PathBuf {
        let name = Path::new(filename)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        self.base_dir.join(name)
    }
}
