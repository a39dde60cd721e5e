//! Book (bibliographic record) model and related types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, book_copy::BookCopyEntry, genre::Genre, language::Language};
use crate::error::{AppError, AppResult};

/// Number of characters in an ISBN
pub const ISBN_LEN: usize = 13;

/// Genre names shown in `genre_summary`
const GENRE_SUMMARY_LIMIT: usize = 3;

/// Book record (not a specific copy of a book)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// Brief description of the book
    pub summary: String,
    /// 13 character ISBN, unique across books
    pub isbn: String,
    /// Genres in the order they were attached
    pub genre_ids: Vec<i32>,
    pub language_id: i32,
}

impl Book {
    pub fn path(&self) -> String {
        format!("/api/v1/books/{}", self.id)
    }

    /// Listing order: title, then id
    pub fn listing_cmp(a: &Book, b: &Book) -> Ordering {
        a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// First three genre names joined with ", "
pub fn genre_summary<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .take(GENRE_SUMMARY_LIMIT)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip separators from an ISBN and check it is exactly 13 digits
pub fn normalize_isbn(raw: &str) -> AppResult<String> {
    let isbn: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if isbn.chars().count() != ISBN_LEN || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "ISBN must be {} digits, got '{}'",
            ISBN_LEN, raw
        )));
    }
    Ok(isbn)
}

/// Drop repeated genre ids, keeping the first occurrence
pub fn dedup_genres(ids: Vec<i32>) -> Vec<i32> {
    let mut out: Vec<i32> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Row of the book list view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookListEntry {
    pub id: i32,
    pub title: String,
    /// Author display name ("Last, First")
    pub author: Option<String>,
    pub isbn: String,
    pub genre_summary: String,
}

/// Book with its references resolved and its copies inlined
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<Author>,
    pub language: Language,
    pub genres: Vec<Genre>,
    pub genre_summary: String,
    pub copies: Vec<BookCopyEntry>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: i32,
}

/// Update book request. `author_id: null` detaches the author.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub author_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: Option<String>,
    pub isbn: Option<String>,
    /// Replaces the whole genre list when present
    pub genre_ids: Option<Vec<i32>>,
    pub language_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_summary_takes_first_three_in_order() {
        let names = ["Fantasy", "Adventure", "Epic", "Drama"];
        assert_eq!(genre_summary(names), "Fantasy, Adventure, Epic");
    }

    #[test]
    fn test_genre_summary_short_lists() {
        assert_eq!(genre_summary(Vec::<&str>::new()), "");
        assert_eq!(genre_summary(["Horror"]), "Horror");
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-0-00-000000-1").unwrap(), "9780000000001");
        assert_eq!(normalize_isbn("9780000000001").unwrap(), "9780000000001");
        assert!(normalize_isbn("978000000000").is_err());
        assert!(normalize_isbn("97800000000012").is_err());
        assert!(normalize_isbn("978000000000X").is_err());
    }

    #[test]
    fn test_dedup_genres_keeps_first_occurrence() {
        assert_eq!(dedup_genres(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
