//! Presentation-neutral descriptors for the administrative interface.
//!
//! Each descriptor tells a front end which columns to list, which filters to
//! offer, how to group fields on the detail form and which dependents to edit
//! inline. Nothing here affects how records are stored.

use serde::Serialize;
use utoipa::ToSchema;

use super::book_copy::LoanStatus;

/// Group of fields on a detail form. Each row holds fields shown side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Fieldset {
    pub title: Option<&'static str>,
    pub rows: Vec<Vec<&'static str>>,
}

/// Dependent records edited from the parent's detail form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Inline {
    pub entity: &'static str,
    /// Field of the dependent pointing back at the parent
    pub foreign_key: &'static str,
    pub layout: &'static str,
}

/// Allowed value of an enumerated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Choice {
    pub value: LoanStatus,
    pub code: char,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldChoices {
    pub field: &'static str,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EntityDescriptor {
    pub entity: &'static str,
    /// Collection path under the API root
    pub path: &'static str,
    pub list_display: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub fieldsets: Vec<Fieldset>,
    pub inlines: Vec<Inline>,
    pub choices: Vec<FieldChoices>,
}

fn single_fieldset(fields: &[&'static str]) -> Vec<Fieldset> {
    vec![Fieldset {
        title: None,
        rows: fields.iter().map(|f| vec![*f]).collect(),
    }]
}

fn status_choices() -> FieldChoices {
    FieldChoices {
        field: "status",
        choices: LoanStatus::ALL
            .into_iter()
            .map(|value| Choice {
                value,
                code: value.code(),
                label: value.label(),
            })
            .collect(),
    }
}

/// Descriptors for every catalog entity
pub fn descriptors() -> Vec<EntityDescriptor> {
    vec![
        EntityDescriptor {
            entity: "author",
            path: "/authors",
            list_display: vec!["last_name", "first_name", "date_of_birth", "date_of_death"],
            list_filter: vec![],
            fieldsets: vec![Fieldset {
                title: None,
                rows: vec![
                    vec!["first_name"],
                    vec!["last_name"],
                    vec!["date_of_birth", "date_of_death"],
                ],
            }],
            inlines: vec![],
            choices: vec![],
        },
        EntityDescriptor {
            entity: "book",
            path: "/books",
            list_display: vec!["title", "author", "isbn", "genre_summary"],
            list_filter: vec![],
            fieldsets: single_fieldset(&[
                "title",
                "author_id",
                "summary",
                "isbn",
                "genre_ids",
                "language_id",
            ]),
            inlines: vec![Inline {
                entity: "book_copy",
                foreign_key: "book_id",
                layout: "tabular",
            }],
            choices: vec![],
        },
        EntityDescriptor {
            entity: "book_copy",
            path: "/copies",
            list_display: vec!["book", "due_back", "status"],
            list_filter: vec!["status", "due_back"],
            fieldsets: vec![
                Fieldset {
                    title: None,
                    rows: vec![vec!["id"], vec!["book_id"], vec!["imprint"]],
                },
                Fieldset {
                    title: Some("Availability"),
                    rows: vec![vec!["status"], vec!["due_back"]],
                },
            ],
            inlines: vec![],
            choices: vec![status_choices()],
        },
        EntityDescriptor {
            entity: "genre",
            path: "/genres",
            list_display: vec!["name"],
            list_filter: vec![],
            fieldsets: single_fieldset(&["name"]),
            inlines: vec![],
            choices: vec![],
        },
        EntityDescriptor {
            entity: "language",
            path: "/languages",
            list_display: vec!["name"],
            list_filter: vec![],
            fieldsets: single_fieldset(&["name"]),
            inlines: vec![],
            choices: vec![],
        },
    ]
}

/// Descriptor for one entity, by its name
pub fn descriptor(entity: &str) -> Option<EntityDescriptor> {
    descriptors().into_iter().find(|d| d.entity == entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_has_a_descriptor() {
        for entity in ["author", "book", "book_copy", "genre", "language"] {
            assert!(descriptor(entity).is_some(), "missing {}", entity);
        }
        assert!(descriptor("patron").is_none());
    }

    #[test]
    fn test_book_copy_layout() {
        let copy = descriptor("book_copy").unwrap();
        assert_eq!(copy.list_filter, vec!["status", "due_back"]);
        assert_eq!(copy.fieldsets[1].title, Some("Availability"));
        assert_eq!(copy.choices[0].choices.len(), 4);
        assert_eq!(copy.choices[0].choices[1].label, "On Loan");
    }

    #[test]
    fn test_book_inlines_copies() {
        let book = descriptor("book").unwrap();
        assert_eq!(book.inlines[0].entity, "book_copy");
        assert!(book.list_display.contains(&"genre_summary"));
    }
}
