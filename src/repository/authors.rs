//! Author domain methods on Repository

use super::{next_id, referrers, Catalog, Repository};
use crate::{
    error::{AppError, AppResult},
    models::author::{check_lifespan, Author, CreateAuthor, UpdateAuthor},
};

impl Catalog {
    fn author_insert(&mut self, data: &CreateAuthor) -> AppResult<Author> {
        check_lifespan(data.date_of_birth, data.date_of_death)?;
        let author = Author {
            id: next_id(&mut self.seq.author),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            date_of_birth: data.date_of_birth,
            date_of_death: data.date_of_death,
        };
        self.authors.insert(author.id, author.clone());
        Ok(author)
    }

    fn author_update(&mut self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        let mut author = self
            .authors
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("author", id))?;

        if let Some(ref first_name) = data.first_name {
            author.first_name = first_name.clone();
        }
        if let Some(ref last_name) = data.last_name {
            author.last_name = last_name.clone();
        }
        if let Some(date_of_birth) = data.date_of_birth {
            author.date_of_birth = date_of_birth;
        }
        if let Some(date_of_death) = data.date_of_death {
            author.date_of_death = date_of_death;
        }
        check_lifespan(author.date_of_birth, author.date_of_death)?;

        self.authors.insert(id, author.clone());
        Ok(author)
    }

    fn author_remove(&mut self, id: i32) -> AppResult<()> {
        if !self.authors.contains_key(&id) {
            return Err(AppError::not_found("author", id));
        }
        let books = referrers(&self.idx.books_by_author, &id);
        if books > 0 {
            return Err(AppError::still_referenced("author", id, "book", books));
        }
        self.authors.remove(&id);
        Ok(())
    }
}

impl Repository {
    /// List authors by last name, then first name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let catalog = self.read().await;
        let mut authors: Vec<Author> = catalog.authors.values().cloned().collect();
        authors.sort_by(Author::listing_cmp);
        Ok(authors)
    }

    /// Get author by ID
    pub async fn authors_get(&self, id: i32) -> AppResult<Author> {
        self.read()
            .await
            .authors
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("author", id))
    }

    /// Create author
    pub async fn authors_create(&self, data: &CreateAuthor) -> AppResult<Author> {
        self.commit(|catalog| catalog.author_insert(data)).await
    }

    /// Update author
    pub async fn authors_update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        self.commit(|catalog| catalog.author_update(id, data)).await
    }

    /// Delete author. Fails while any book credits them.
    pub async fn authors_delete(&self, id: i32) -> AppResult<()> {
        self.commit(|catalog| catalog.author_remove(id)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::book::CreateBook;

    fn new_author(first: &str, last: &str) -> CreateAuthor {
        CreateAuthor {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn test_list_sorted_for_any_insertion_order() {
        let repo = Repository::in_memory();
        for (first, last) in [
            ("Terry", "Pratchett"),
            ("Ursula", "Le Guin"),
            ("Neil", "Gaiman"),
            ("Anne", "Le Guin"),
        ] {
            repo.authors_create(&new_author(first, last)).await.unwrap();
        }
        let names: Vec<String> = repo
            .authors_list()
            .await
            .unwrap()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Gaiman, Neil", "Le Guin, Anne", "Le Guin, Ursula", "Pratchett, Terry"]
        );
    }

    #[tokio::test]
    async fn test_same_name_allowed() {
        let repo = Repository::in_memory();
        let a = repo.authors_create(&new_author("John", "Smith")).await.unwrap();
        let b = repo.authors_create(&new_author("John", "Smith")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_clears_and_checks_dates() {
        let repo = Repository::in_memory();
        let mut data = new_author("J.R.R.", "Tolkien");
        data.date_of_birth = NaiveDate::from_ymd_opt(1892, 1, 3);
        let author = repo.authors_create(&data).await.unwrap();

        let err = repo
            .authors_update(
                author.id,
                &UpdateAuthor {
                    date_of_death: Some(NaiveDate::from_ymd_opt(1800, 1, 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // rejected update left the record untouched
        assert_eq!(repo.authors_get(author.id).await.unwrap(), author);

        let updated = repo
            .authors_update(
                author.id,
                &UpdateAuthor {
                    date_of_birth: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.date_of_birth, None);
        assert_eq!(updated.last_name, "Tolkien");
    }

    #[tokio::test]
    async fn test_delete_restricted_until_books_removed() {
        let repo = Repository::in_memory();
        let english = repo.languages_create("English").await.unwrap();
        let tolkien = repo.authors_create(&new_author("J", "Tolkien")).await.unwrap();
        let mut book_ids = Vec::new();
        for (title, isbn) in [("The Hobbit", "9780000000001"), ("The Silmarillion", "9780000000002")] {
            let book = repo
                .books_create(&CreateBook {
                    title: title.into(),
                    author_id: Some(tolkien.id),
                    summary: "Middle-earth.".into(),
                    isbn: isbn.into(),
                    genre_ids: vec![],
                    language_id: english.id,
                })
                .await
                .unwrap();
            book_ids.push(book.id);
        }

        let err = repo.authors_delete(tolkien.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ReferentialIntegrity { entity: "author", count: 2, .. }
        ));

        repo.books_delete(book_ids[0]).await.unwrap();
        assert!(repo.authors_delete(tolkien.id).await.is_err());
        repo.books_delete(book_ids[1]).await.unwrap();
        repo.authors_delete(tolkien.id).await.unwrap();
        assert!(repo.authors_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detaching_author_releases_restriction() {
        let repo = Repository::in_memory();
        let english = repo.languages_create("English").await.unwrap();
        let author = repo.authors_create(&new_author("Anon", "Ymous")).await.unwrap();
        let book = repo
            .books_create(&CreateBook {
                title: "Beowulf".into(),
                author_id: Some(author.id),
                summary: "An old poem.".into(),
                isbn: "9780000000003".into(),
                genre_ids: vec![],
                language_id: english.id,
            })
            .await
            .unwrap();

        repo.books_update(
            book.id,
            &crate::models::book::UpdateBook {
                author_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        repo.authors_delete(author.id).await.unwrap();
    }
}
