//! Genre model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Book genre (e.g. Science Fiction, French Poetry). Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn path(&self) -> String {
        format!("/api/v1/genres/{}", self.id)
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Create genre request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 200, message = "Genre name must be 1-200 characters"))]
    pub name: String,
}

/// Update genre request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateGenre {
    #[validate(length(min = 1, max = 200, message = "Genre name must be 1-200 characters"))]
    pub name: Option<String>,
}
