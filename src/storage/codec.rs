//! Export and import of the whole collection as a portable JSON document.
//!
//! The document is the bare article array, without a version wrapper.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{Article, Error};

/// Serializes `articles` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export(articles: &[Article]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(articles)
}

/// Parses an import document.
///
/// The document must be a JSON array of articles with unique ids. Nothing
/// else is validated: field contents, categories and empty strings are
/// accepted as they are.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the document is not JSON, is not an array,
/// holds an element that is not an article, or repeats an id.
pub fn import(document: &str) -> Result<Vec<Article>, Error> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| Error::Validation(format!("document is not valid JSON: {e}")))?;

    from_value(value)
}

/// Like [`import`], for a document that has already been parsed.
///
/// # Errors
///
/// See [`import`].
pub fn from_value(value: serde_json::Value) -> Result<Vec<Article>, Error> {
    if !value.is_array() {
        return Err(Error::Validation(
            "document must be a JSON array of articles".to_string(),
        ));
    }

    let articles: Vec<Article> = serde_json::from_value(value)
        .map_err(|e| Error::Validation(format!("document holds an invalid article: {e}")))?;

    let mut seen = HashSet::with_capacity(articles.len());
    if let Some(duplicate) = articles.iter().find(|a| !seen.insert(a.id)) {
        return Err(Error::Validation(format!(
            "document repeats article id {}",
            duplicate.id
        )));
    }

    Ok(articles)
}

/// The download name of an export taken on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("news-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::article::seed_collection;

    #[test]
    fn export_then_import_is_identity() {
        let articles = seed_collection();
        let document = export(&articles).unwrap();
        assert_eq!(import(&document).unwrap(), articles);
    }

    #[test]
    fn export_is_a_bare_array() {
        let document = export(&seed_collection()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn empty_array_is_accepted() {
        assert!(import("[]").unwrap().is_empty());
    }

    #[test_case(r#"{"news": []}"#; "object")]
    #[test_case("42"; "number")]
    #[test_case("\"news\""; "string")]
    #[test_case("null"; "null")]
    #[test_case("[{"; "truncated")]
    #[test_case("not json"; "garbage")]
    #[test_case(r#"[{"id": 1}]"#; "incomplete article")]
    fn malformed_documents_are_rejected(document: &str) {
        assert!(matches!(import(document), Err(Error::Validation(_))));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut articles = seed_collection();
        articles[1].id = articles[0].id;
        let document = export(&articles).unwrap();

        let Err(Error::Validation(message)) = import(&document) else {
            panic!("expected a validation error");
        };
        assert!(message.contains("repeats article id 1"));
    }

    #[test]
    fn unknown_categories_and_empty_fields_pass() {
        let mut articles = seed_collection();
        articles[0].category = "Unregistered".to_string();
        articles[0].title = String::new();
        let document = export(&articles).unwrap();

        assert_eq!(import(&document).unwrap(), articles);
    }

    #[test]
    fn file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "news-2024-03-09.json");
    }
}
