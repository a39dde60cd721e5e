//! Language domain methods on Repository

use super::{check_unique_name, next_id, referrers, Catalog, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        language::{Language, UpdateLanguage},
        name_key,
    },
};

impl Catalog {
    fn language_insert(&mut self, name: &str) -> AppResult<Language> {
        let key = check_unique_name(&self.idx.language_names, "language", name, None)?;
        let language = Language {
            id: next_id(&mut self.seq.language),
            name: name.to_string(),
        };
        self.idx.language_names.insert(key, language.id);
        self.languages.insert(language.id, language.clone());
        Ok(language)
    }

    fn language_update(&mut self, id: i32, data: &UpdateLanguage) -> AppResult<Language> {
        let current = self
            .languages
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("language", id))?;
        let Some(name) = data.name.as_deref() else {
            return Ok(current);
        };
        let key = check_unique_name(&self.idx.language_names, "language", name, Some(id))?;

        self.idx.language_names.remove(&name_key(&current.name));
        self.idx.language_names.insert(key, id);
        let language = Language {
            id,
            name: name.to_string(),
        };
        self.languages.insert(id, language.clone());
        Ok(language)
    }

    fn language_remove(&mut self, id: i32) -> AppResult<()> {
        if !self.languages.contains_key(&id) {
            return Err(AppError::not_found("language", id));
        }
        let books = referrers(&self.idx.books_by_language, &id);
        if books > 0 {
            return Err(AppError::still_referenced("language", id, "book", books));
        }
        if let Some(language) = self.languages.remove(&id) {
            self.idx.language_names.remove(&name_key(&language.name));
        }
        Ok(())
    }
}

impl Repository {
    /// List all languages by name
    pub async fn languages_list(&self) -> AppResult<Vec<Language>> {
        let catalog = self.read().await;
        let mut languages: Vec<Language> = catalog.languages.values().cloned().collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(languages)
    }

    /// Get language by ID
    pub async fn languages_get(&self, id: i32) -> AppResult<Language> {
        self.read()
            .await
            .languages
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("language", id))
    }

    /// Create language, rejecting names that collide ignoring case
    pub async fn languages_create(&self, name: &str) -> AppResult<Language> {
        self.commit(|catalog| catalog.language_insert(name)).await
    }

    /// Update language
    pub async fn languages_update(&self, id: i32, data: &UpdateLanguage) -> AppResult<Language> {
        self.commit(|catalog| catalog.language_update(id, data)).await
    }

    /// Delete language. Fails while any book is written in it.
    pub async fn languages_delete(&self, id: i32) -> AppResult<()> {
        self.commit(|catalog| catalog.language_remove(id)).await
    }
}
