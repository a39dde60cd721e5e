//! Data models for the catalog

pub mod admin;
pub mod author;
pub mod book;
pub mod book_copy;
pub mod genre;
pub mod language;

use unicode_normalization::UnicodeNormalization;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails, BookListEntry};
pub use book_copy::{BookCopy, BookCopyEntry, LoanStatus};
pub use genre::Genre;
pub use language::Language;

/// Lookup key used for case-insensitive uniqueness of names.
///
/// Surrounding whitespace is dropped, composed and decomposed forms are
/// unified (NFC), then case is folded.
pub fn name_key(name: &str) -> String {
    name.trim().nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_folds_case_and_whitespace() {
        assert_eq!(name_key("Fantasy"), name_key("fantasy"));
        assert_eq!(name_key("  Science Fiction "), "science fiction");
        assert_ne!(name_key("Fantasy"), name_key("Fantasie"));
    }

    #[test]
    fn test_name_key_unifies_unicode_forms() {
        // precomposed "ç" vs "c" + combining cedilla
        assert_eq!(name_key("Fran\u{e7}ais"), name_key("Franc\u{327}ais"));
        assert_eq!(name_key("POÉSIE"), name_key("poésie"));
    }
}
