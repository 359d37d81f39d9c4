//! Where the marker list lives between sessions.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::MarkerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Nothing has been persisted yet (first run).
    Missing,
}

pub trait MarkerRepository {
    fn load(&mut self, store: &mut MarkerStore) -> Result<LoadOutcome>;
    fn save(&mut self, store: &MarkerStore) -> Result<()>;
}

/// Plain text file, one `x,y,label,color` line per marker.
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarkerRepository for FileRepository {
    fn load(&mut self, store: &mut MarkerStore) -> Result<LoadOutcome> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to open {}", self.path.display()))
            }
        };

        let count = store
            .load_from(BufReader::new(file))
            .with_context(|| format!("Failed to read markers from {}", self.path.display()))?;
        Ok(LoadOutcome::Loaded(count))
    }

    fn save(&mut self, store: &MarkerStore) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        store
            .save_to(BufWriter::new(file))
            .with_context(|| format!("Failed to write markers to {}", self.path.display()))
    }
}


#[cfg(test)]
mod tests {
    use super::{FileRepository, LoadOutcome, MarkerRepository};
    use crate::marker::MarkerColor;
    use crate::store::MarkerStore;

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FileRepository::new(dir.path().join("markers.txt"));
        let mut store = MarkerStore::new();
        assert_eq!(repo.load(&mut store).unwrap(), LoadOutcome::Missing);
        assert!(store.is_empty());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.txt");
        std::fs::write(&path, "1,1,stale,red\n2,2,stale,red\n").unwrap();

        let mut repo = FileRepository::new(&path);
        let mut store = MarkerStore::new();
        store.add(3.0, 4.0, "fresh", MarkerColor::Blue);
        repo.save(&store).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3,4,fresh,blue\n");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FileRepository::new(dir.path().join("nested").join("markers.txt"));

        let mut store = MarkerStore::new();
        store.add(10.0, 20.0, "a", MarkerColor::Red);
        store.add(30.0, 40.0, "b", MarkerColor::Blue);
        repo.save(&store).unwrap();

        let mut loaded = MarkerStore::new();
        assert_eq!(repo.load(&mut loaded).unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(loaded, store);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a marker file.
        let mut repo = FileRepository::new(dir.path());
        let mut store = MarkerStore::new();
        assert!(repo.load(&mut store).is_err());
        assert!(repo.save(&store).is_err());
    }
}
