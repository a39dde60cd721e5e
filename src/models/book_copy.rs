//! Book copy (physical, loanable instance of a book) model and related types

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Availability of a copy. Any status may be set from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// Single-letter legacy code
    pub fn code(&self) -> char {
        match self {
            LoanStatus::Maintenance => 'm',
            LoanStatus::OnLoan => 'o',
            LoanStatus::Available => 'a',
            LoanStatus::Reserved => 'r',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On Loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A specific copy of a book, identified library-wide by a random UUID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookCopy {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl BookCopy {
    pub fn path(&self) -> String {
        format!("/api/v1/copies/{}", self.id)
    }

    /// Listing order: due date ascending with undated copies last, then id
    pub fn listing_cmp(a: &BookCopy, b: &BookCopy) -> Ordering {
        let by_due = match (a.due_back, b.due_back) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_due.then_with(|| a.id.cmp(&b.id))
    }

    /// Display string: "{id} ({book title})"
    pub fn display(&self, book_title: Option<&str>) -> String {
        match book_title {
            Some(title) => format!("{} ({})", self.id, title),
            None => self.id.to_string(),
        }
    }
}

/// Row of the copy list view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookCopyEntry {
    pub id: Uuid,
    pub book_id: Option<i32>,
    /// Title of the referenced book
    pub book: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub display: String,
}

impl BookCopyEntry {
    pub fn new(copy: &BookCopy, book_title: Option<&str>) -> Self {
        Self {
            id: copy.id,
            book_id: copy.book_id,
            book: book_title.map(str::to_string),
            imprint: copy.imprint.clone(),
            due_back: copy.due_back,
            status: copy.status,
            display: copy.display(book_title),
        }
    }
}

/// Copy list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookCopyQuery {
    pub status: Option<LoanStatus>,
    /// Only copies due back on or before this date
    pub due_before: Option<NaiveDate>,
    /// Only copies due back on or after this date
    pub due_after: Option<NaiveDate>,
}

impl BookCopyQuery {
    pub fn matches(&self, copy: &BookCopy) -> bool {
        if let Some(status) = self.status {
            if copy.status != status {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            if !copy.due_back.is_some_and(|d| d <= before) {
                return false;
            }
        }
        if let Some(after) = self.due_after {
            if !copy.due_back.is_some_and(|d| d >= after) {
                return false;
            }
        }
        true
    }
}

/// Create copy request. The id is always generated by the store.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBookCopy {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    /// Defaults to maintenance
    pub status: Option<LoanStatus>,
}

/// Update copy request. `null` clears `book_id` or `due_back`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookCopy {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub book_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_back: Option<Option<NaiveDate>>,
    pub status: Option<LoanStatus>,
}
