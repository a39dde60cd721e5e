//! JSON snapshot persistence for the catalog.
//!
//! The snapshot holds only records and id sequences. Indexes are rebuilt on
//! load by replaying every record through the same checks a live write goes
//! through, so a hand-edited file that breaks an invariant is refused.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{check_unique_name, Catalog};
use crate::{
    error::{AppError, AppResult},
    models::{author::check_lifespan, Author, Book, BookCopy, Genre, Language},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sequences {
    genre: i32,
    language: i32,
    author: i32,
    book: i32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    sequences: Sequences,
    genres: Vec<Genre>,
    languages: Vec<Language>,
    authors: Vec<Author>,
    books: Vec<Book>,
    copies: Vec<BookCopy>,
}

const SNAPSHOT_VERSION: u32 = 1;

impl From<&Catalog> for Snapshot {
    fn from(catalog: &Catalog) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            sequences: Sequences {
                genre: catalog.seq.genre,
                language: catalog.seq.language,
                author: catalog.seq.author,
                book: catalog.seq.book,
            },
            genres: catalog.genres.values().cloned().collect(),
            languages: catalog.languages.values().cloned().collect(),
            authors: catalog.authors.values().cloned().collect(),
            books: catalog.books.values().cloned().collect(),
            copies: catalog.copies.values().cloned().collect(),
        }
    }
}

fn last_id<V>(table: &BTreeMap<i32, V>) -> i32 {
    table.keys().next_back().copied().unwrap_or(0)
}

fn invalid(e: AppError) -> AppError {
    AppError::Storage(format!("invalid snapshot: {}", e))
}

fn duplicate_id(entity: &str, id: impl std::fmt::Display) -> AppError {
    AppError::Storage(format!("invalid snapshot: duplicate {} id {}", entity, id))
}

fn restore(snapshot: Snapshot) -> AppResult<Catalog> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(AppError::Storage(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }

    let mut catalog = Catalog::default();

    for genre in snapshot.genres {
        if catalog.genres.contains_key(&genre.id) {
            return Err(duplicate_id("genre", genre.id));
        }
        let key = check_unique_name(&catalog.idx.genre_names, "genre", &genre.name, None).map_err(invalid)?;
        catalog.idx.genre_names.insert(key, genre.id);
        catalog.genres.insert(genre.id, genre);
    }
    for language in snapshot.languages {
        if catalog.languages.contains_key(&language.id) {
            return Err(duplicate_id("language", language.id));
        }
        let key = check_unique_name(&catalog.idx.language_names, "language", &language.name, None)
            .map_err(invalid)?;
        catalog.idx.language_names.insert(key, language.id);
        catalog.languages.insert(language.id, language);
    }
    for author in snapshot.authors {
        if catalog.authors.contains_key(&author.id) {
            return Err(duplicate_id("author", author.id));
        }
        check_lifespan(author.date_of_birth, author.date_of_death).map_err(invalid)?;
        catalog.authors.insert(author.id, author);
    }
    for book in snapshot.books {
        if catalog.books.contains_key(&book.id) {
            return Err(duplicate_id("book", book.id));
        }
        catalog.book_put(book).map_err(invalid)?;
    }
    for copy in snapshot.copies {
        if catalog.copies.contains_key(&copy.id) {
            return Err(duplicate_id("book_copy", copy.id));
        }
        catalog.copy_put(copy).map_err(invalid)?;
    }

    // never hand out an id that is already taken
    catalog.seq.genre = snapshot.sequences.genre.max(last_id(&catalog.genres));
    catalog.seq.language = snapshot.sequences.language.max(last_id(&catalog.languages));
    catalog.seq.author = snapshot.sequences.author.max(last_id(&catalog.authors));
    catalog.seq.book = snapshot.sequences.book.max(last_id(&catalog.books));

    Ok(catalog)
}

/// Read a snapshot. Returns `None` when the file does not exist yet.
pub(crate) async fn load(path: &Path) -> AppResult<Option<Catalog>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
    restore(snapshot).map(Some)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a snapshot atomically: temp file first, then rename over the target
pub(crate) async fn save(path: &Path, catalog: &Catalog) -> AppResult<()> {
    let bytes = serde_json::to_vec_pretty(&Snapshot::from(catalog))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!("Wrote catalog snapshot {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            author::CreateAuthor,
            book::CreateBook,
            book_copy::{BookCopyQuery, CreateBookCopy, LoanStatus},
        },
        repository::Repository,
    };
    use uuid::Uuid;

    #[tokio::test]
    async fn test_reopen_preserves_records_and_constraints() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("catalog.json");

        let repo = Repository::open(path.clone()).await.unwrap();
        let fantasy = repo.genres_create("Fantasy").await.unwrap();
        let english = repo.languages_create("English").await.unwrap();
        let author = repo
            .authors_create(&CreateAuthor {
                first_name: "J".into(),
                last_name: "Tolkien".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let book = repo
            .books_create(&CreateBook {
                title: "The Hobbit".into(),
                author_id: Some(author.id),
                summary: "There and back again.".into(),
                isbn: "9780000000001".into(),
                genre_ids: vec![fantasy.id],
                language_id: english.id,
            })
            .await
            .unwrap();
        let copy = repo
            .copies_create(&CreateBookCopy {
                book_id: Some(book.id),
                imprint: "Allen & Unwin".into(),
                due_back: None,
                status: Some(LoanStatus::Reserved),
            })
            .await
            .unwrap();
        drop(repo);

        let reopened = Repository::open(path).await.unwrap();
        assert_eq!(reopened.books_get(book.id).await.unwrap(), book);
        let copies = reopened.copies_list(&BookCopyQuery::default()).await.unwrap();
        assert_eq!(copies[0].id, copy.id);
        assert_eq!(copies[0].status, LoanStatus::Reserved);

        // indexes were rebuilt
        assert!(reopened.genres_create("FANTASY").await.is_err());
        assert!(reopened.authors_delete(author.id).await.is_err());
        assert!(reopened.books_delete(book.id).await.is_err());
        // sequences continue after the stored ids
        let drama = reopened.genres_create("Drama").await.unwrap();
        assert_eq!(drama.id, fantasy.id + 1);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let repo = Repository::open(dir.path().join("nested/catalog.json")).await.unwrap();
        assert!(repo.genres_list().await.unwrap().is_empty());
        repo.genres_create("Poetry").await.unwrap();
        assert!(dir.path().join("nested/catalog.json").exists());
    }

    #[tokio::test]
    async fn test_rejects_snapshot_breaking_uniqueness() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("catalog.json");
        let snapshot = serde_json::json!({
            "version": 1,
            "sequences": { "genre": 2, "language": 0, "author": 0, "book": 0 },
            "genres": [ { "id": 1, "name": "Fantasy" }, { "id": 2, "name": "fantasy" } ],
            "languages": [],
            "authors": [],
            "books": [],
            "copies": []
        });
        std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

        let err = Repository::open(path).await.err().expect("snapshot should be refused");
        assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("invalid snapshot")));
    }

    async fn open_invalid(snapshot: serde_json::Value) -> String {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();
        match Repository::open(path).await {
            Err(AppError::Storage(msg)) => msg,
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("snapshot should be refused"),
        }
    }

    #[tokio::test]
    async fn test_rejects_snapshot_with_repeated_ids() {
        let msg = open_invalid(serde_json::json!({
            "version": 1,
            "sequences": { "genre": 1, "language": 0, "author": 0, "book": 0 },
            "genres": [ { "id": 1, "name": "Horror" }, { "id": 1, "name": "Drama" } ],
            "languages": [],
            "authors": [],
            "books": [],
            "copies": []
        }))
        .await;
        assert!(msg.contains("duplicate genre id 1"), "{}", msg);

        let copy_id = Uuid::new_v4();
        let copy = serde_json::json!({
            "id": copy_id, "book_id": null, "imprint": "Penguin", "due_back": null, "status": "available"
        });
        let msg = open_invalid(serde_json::json!({
            "version": 1,
            "sequences": { "genre": 0, "language": 0, "author": 0, "book": 0 },
            "genres": [],
            "languages": [],
            "authors": [],
            "books": [],
            "copies": [copy.clone(), copy]
        }))
        .await;
        assert!(msg.contains("duplicate book_copy id"), "{}", msg);
    }

    #[tokio::test]
    async fn test_rejects_snapshot_with_death_before_birth() {
        let msg = open_invalid(serde_json::json!({
            "version": 1,
            "sequences": { "genre": 0, "language": 0, "author": 1, "book": 0 },
            "genres": [],
            "languages": [],
            "authors": [ {
                "id": 1,
                "first_name": "Mary",
                "last_name": "Shelley",
                "date_of_birth": "1851-02-01",
                "date_of_death": "1797-08-30"
            } ],
            "books": [],
            "copies": []
        }))
        .await;
        assert!(msg.contains("invalid snapshot"), "{}", msg);
    }

    #[test]
    fn test_temp_path_sits_next_to_target() {
        assert_eq!(
            temp_path(Path::new("/data/catalog.json")),
            PathBuf::from("/data/catalog.json.tmp")
        );
    }
}
