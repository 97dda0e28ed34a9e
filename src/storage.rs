use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record stored in a [`Collection`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Directory name this document kind persists under.
    const NAME: &'static str;

    /// The unique id of this document.
    fn id(&self) -> u64;
}

/// An in-memory collection of documents with per-record locking,
/// optionally mirrored as one TOML file per record on disk.
///
/// Mutations through [`Collection::update`] happen under a single
/// record write lock, so a check-then-modify sequence inside the
/// closure is atomic with respect to other requests touching the
/// same document.
pub struct Collection<T> {
    dir: Option<PathBuf>,
    entries: RwLock<Vec<RwLock<T>>>,
    /// An index cache for getting the slot of an id.
    index: DashMap<u64, usize>,
}

impl<T: Document> Collection<T> {
    /// Read a collection from `{data_dir}/{NAME}`, creating the
    /// directory when it does not exist yet.
    pub fn open(data_dir: &Path) -> io::Result<Self> {
        let dir = data_dir.join(T::NAME);
        std::fs::create_dir_all(&dir)?;

        let mut entries = Vec::new();
        let index = DashMap::new();

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "toml") {
                continue;
            }

            let doc: T = match toml::from_str(&std::fs::read_to_string(&path)?) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!("skipping {}: {}", path.display(), err);
                    continue;
                }
            };

            index.insert(doc.id(), entries.len());
            entries.push(RwLock::new(doc));
        }

        Ok(Self {
            dir: Some(dir),
            entries: RwLock::new(entries),
            index,
        })
    }

    /// A collection that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            entries: RwLock::new(Vec::new()),
            index: DashMap::new(),
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the document with the given id.
    pub fn with<R>(&self, id: u64, f: impl FnOnce(&T) -> R) -> Option<R> {
        let slot = *self.index.get(&id)?;
        let entries = self.entries.read();
        let doc = entries.get(slot)?.read();
        // The slot may be stale if a removal raced the index lookup.
        if doc.id() != id {
            return None;
        }
        Some(f(&doc))
    }

    /// Mutate the document with the given id under its write lock,
    /// persisting afterwards when the closure succeeds.
    pub fn update<R, E>(
        &self,
        id: u64,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let slot = *self.index.get(&id)?;
        let entries = self.entries.read();
        let mut doc = entries.get(slot)?.write();
        if doc.id() != id {
            return None;
        }

        let result = f(&mut doc);
        if result.is_ok() {
            self.persist(&doc);
        }
        Some(result)
    }

    /// Insert a document. Returns `false` when the id is already taken.
    pub fn insert(&self, doc: T) -> bool {
        let mut entries = self.entries.write();
        if self.index.contains_key(&doc.id()) {
            return false;
        }

        self.index.insert(doc.id(), entries.len());
        self.persist(&doc);
        entries.push(RwLock::new(doc));
        true
    }

    /// Remove the document with the given id.
    pub fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.write();
        let Some((_, slot)) = self.index.remove(&id) else {
            return false;
        };
        entries.remove(slot);

        // Every slot behind the removed one shifted down.
        self.index.clear();
        for (slot, entry) in entries.iter().enumerate() {
            self.index.insert(entry.read().id(), slot);
        }

        self.delete_file(id);
        true
    }

    /// Visit every document, collecting the non-`None` results.
    pub fn select<R>(&self, mut f: impl FnMut(&T) -> Option<R>) -> Vec<R> {
        self.entries
            .read()
            .iter()
            .filter_map(|entry| f(&entry.read()))
            .collect()
    }

    /// Find the id of the first document matching the predicate.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<u64> {
        self.entries.read().iter().find_map(|entry| {
            let doc = entry.read();
            pred(&doc).then(|| doc.id())
        })
    }

    /// Write the record's file while its lock is still held, so a
    /// later snapshot never loses to an earlier one on disk.
    fn persist(&self, doc: &T) {
        let Some(dir) = &self.dir else { return };

        match toml::to_string(doc) {
            Ok(data) => {
                let path = dir.join(format!("{}.toml", doc.id()));
                if let Err(err) = std::fs::write(&path, data) {
                    tracing::error!("failed to persist {}: {}", path.display(), err);
                }
            }
            Err(err) => tracing::error!("failed to serialize {} {}: {}", T::NAME, doc.id(), err),
        }
    }

    fn delete_file(&self, id: u64) {
        let Some(dir) = &self.dir else { return };

        let path = dir.join(format!("{}.toml", id));
        if let Err(err) = std::fs::remove_file(&path) {
            tracing::error!("failed to remove {}: {}", path.display(), err);
        }
    }
}

/// A fresh document id, kept within TOML's signed integer range.
pub fn random_id() -> u64 {
    rand::thread_rng().gen_range(1..i64::MAX as u64)
}
