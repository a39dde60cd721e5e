//! Language model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Language a book is written in. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

impl Language {
    pub fn path(&self) -> String {
        format!("/api/v1/languages/{}", self.id)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Create language request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLanguage {
    #[validate(length(min = 1, max = 100, message = "Language name must be 1-100 characters"))]
    pub name: String,
}

/// Update language request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateLanguage {
    #[validate(length(min = 1, max = 100, message = "Language name must be 1-100 characters"))]
    pub name: Option<String>,
}
