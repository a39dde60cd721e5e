//! Catalog store.
//!
//! All records live in a single [`Catalog`] guarded by one `RwLock`. Every
//! mutation runs its uniqueness and reference checks and its writes under the
//! write lock, so a check can never be invalidated before the write lands.
//! Reads share the read lock.
//!
//! Besides the record tables the catalog keeps two kinds of indexes:
//! normalized-name and ISBN lookups for uniqueness, and reverse-reference sets
//! (author, language and genre to books, book to copies) for restrict-on-delete.

pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod languages;
pub mod snapshot;

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    hash::Hash,
    path::PathBuf,
    sync::Arc,
};

use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
    models::{name_key, Author, Book, BookCopy, Genre, Language},
};

/// Per-kind id sequences
#[derive(Debug, Clone, Default)]
pub(crate) struct Sequences {
    pub genre: i32,
    pub language: i32,
    pub author: i32,
    pub book: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Indexes {
    pub genre_names: HashMap<String, i32>,
    pub language_names: HashMap<String, i32>,
    pub isbns: HashMap<String, i32>,
    pub books_by_author: HashMap<i32, BTreeSet<i32>>,
    pub books_by_language: HashMap<i32, BTreeSet<i32>>,
    pub books_by_genre: HashMap<i32, BTreeSet<i32>>,
    pub copies_by_book: HashMap<i32, BTreeSet<Uuid>>,
}

fn link<K: Eq + Hash, V: Ord>(index: &mut HashMap<K, BTreeSet<V>>, key: K, value: V) {
    index.entry(key).or_default().insert(value);
}

fn unlink<K: Eq + Hash, V: Ord>(index: &mut HashMap<K, BTreeSet<V>>, key: &K, value: &V) {
    if let Some(set) = index.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

fn referrers<K: Eq + Hash, V>(index: &HashMap<K, BTreeSet<V>>, key: &K) -> usize {
    index.get(key).map_or(0, BTreeSet::len)
}

/// Check that `name` is free in a case-insensitive name index, ignoring the
/// record `own_id` itself. Returns the lookup key.
fn check_unique_name(
    index: &HashMap<String, i32>,
    entity: &'static str,
    name: &str,
    own_id: Option<i32>,
) -> AppResult<String> {
    let key = name_key(name);
    match index.get(&key) {
        Some(&existing) if Some(existing) != own_id => {
            Err(AppError::constraint(entity, "name", name))
        }
        _ => Ok(key),
    }
}

/// In-memory tables plus their indexes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) seq: Sequences,
    pub(crate) genres: BTreeMap<i32, Genre>,
    pub(crate) languages: BTreeMap<i32, Language>,
    pub(crate) authors: BTreeMap<i32, Author>,
    pub(crate) books: BTreeMap<i32, Book>,
    pub(crate) copies: BTreeMap<Uuid, BookCopy>,
    pub(crate) idx: Indexes,
}

/// Handle on the catalog store, cheap to clone
#[derive(Clone)]
pub struct Repository {
    catalog: Arc<RwLock<Catalog>>,
    snapshot_path: Option<Arc<PathBuf>>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Repository {
    /// Create an empty store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::default())),
            snapshot_path: None,
        }
    }

    /// Open a store persisted to a JSON snapshot, loading it when it exists
    pub async fn open(path: PathBuf) -> AppResult<Self> {
        let catalog = match snapshot::load(&path).await? {
            Some(catalog) => {
                tracing::info!(
                    "Loaded catalog snapshot {}: {} books, {} copies",
                    path.display(),
                    catalog.books.len(),
                    catalog.copies.len()
                );
                catalog
            }
            None => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                Catalog::default()
            }
        };
        Ok(Self {
            catalog: Arc::new(RwLock::new(catalog)),
            snapshot_path: Some(Arc::new(path)),
        })
    }

    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        match &config.snapshot_path {
            Some(path) => Self::open(path.clone()).await,
            None => Ok(Self::in_memory()),
        }
    }

    /// Whether writes are saved to a snapshot file
    pub fn is_persistent(&self) -> bool {
        self.snapshot_path.is_some()
    }

    async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().await
    }

    /// Run a mutation under the write lock.
    ///
    /// `op` must either fail before touching the catalog or complete. With a
    /// snapshot configured the mutation is applied to a copy, written to disk,
    /// and only then published, so a failed write changes nothing. The copy
    /// is a full clone of the catalog taken under the write lock.
    async fn commit<T>(&self, op: impl FnOnce(&mut Catalog) -> AppResult<T>) -> AppResult<T> {
        let mut catalog = self.catalog.write().await;
        match &self.snapshot_path {
            None => op(&mut *catalog),
            Some(path) => {
                let mut staged = catalog.clone();
                let out = op(&mut staged)?;
                snapshot::save(path, &staged).await?;
                *catalog = staged;
                Ok(out)
            }
        }
    }
}
