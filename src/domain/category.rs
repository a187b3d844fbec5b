//! The category vocabulary.

use crate::{Article, Error};

/// The controlled vocabulary of article categories.
///
/// Default categories are fixed at construction and can never be removed.
/// Custom categories are appended by [`add`](Self::add) and removed by
/// [`remove`](Self::remove) once no article references them. Names are
/// compared case-sensitively and are never duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    defaults: Vec<String>,
    custom: Vec<String>,
}

impl CategoryRegistry {
    /// Creates a registry holding only the given defaults.
    ///
    /// Duplicate defaults are collapsed, keeping the first occurrence.
    #[must_use]
    pub fn new(defaults: impl IntoIterator<Item = String>) -> Self {
        let mut registry = Self {
            defaults: Vec::new(),
            custom: Vec::new(),
        };
        for name in defaults {
            if !registry.contains(&name) {
                registry.defaults.push(name);
            }
        }
        registry
    }

    /// Restores previously persisted custom categories.
    ///
    /// Names that are already registered are skipped.
    #[must_use]
    pub fn with_custom(mut self, custom: impl IntoIterator<Item = String>) -> Self {
        for name in custom {
            if !self.contains(&name) {
                self.custom.push(name);
            }
        }
        self
    }

    /// All categories, defaults first, each group in registration order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.defaults
            .iter()
            .chain(&self.custom)
            .map(String::as_str)
    }

    /// The custom categories in registration order.
    #[must_use]
    pub fn custom(&self) -> &[String] {
        &self.custom
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.list().any(|c| c == name)
    }

    /// Whether `name` is one of the protected defaults.
    #[must_use]
    pub fn is_default(&self, name: &str) -> bool {
        self.defaults.iter().any(|c| c == name)
    }

    /// Adds a custom category.
    ///
    /// Returns `true` if the category was added, `false` if it was already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `name` is empty.
    pub fn add(&mut self, name: String) -> Result<bool, Error> {
        if name.trim().is_empty() {
            return Err(Error::Validation(
                "category name must not be empty".to_string(),
            ));
        }
        if self.contains(&name) {
            return Ok(false);
        }
        self.custom.push(name);
        Ok(true)
    }

    /// Removes a custom category.
    ///
    /// Returns `true` if the category was removed, `false` if it was not
    /// registered.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtectedCategory`] if `name` is a default category, whatever
    ///   its usage.
    /// - [`Error::InUse`] if any of `articles` references it.
    pub fn remove(&mut self, name: &str, articles: &[Article]) -> Result<bool, Error> {
        if self.is_default(name) {
            return Err(Error::ProtectedCategory(name.to_string()));
        }

        let count = usage_count(articles, name);
        if count > 0 {
            return Err(Error::InUse {
                name: name.to_string(),
                count,
            });
        }

        if let Some(pos) = self.custom.iter().position(|c| c == name) {
            self.custom.remove(pos);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Number of articles tagged with `name`.
#[must_use]
pub fn usage_count(articles: &[Article], name: &str) -> usize {
    articles.iter().filter(|a| a.category == name).count()
}

/// The protected categories used when the configuration names none.
#[must_use]
pub fn default_categories() -> Vec<String> {
    ["Press Release", "Notice", "Event", "Careers"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::NewArticle;

    fn tagged(id: u64, category: &str) -> Article {
        NewArticle {
            title: "t".to_string(),
            excerpt: "e".to_string(),
            content: "c".to_string(),
            category: category.to_string(),
            ..NewArticle::default()
        }
        .into_article(id, NaiveDate::default())
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(["Press".to_string(), "Notice".to_string()])
    }

    #[test]
    fn list_puts_defaults_first() {
        let mut registry = registry();
        registry.add("Event".to_string()).unwrap();
        registry.add("Careers".to_string()).unwrap();

        let listed: Vec<_> = registry.list().collect();
        assert_eq!(listed, ["Press", "Notice", "Event", "Careers"]);
    }

    #[test]
    fn add_is_a_no_op_for_existing_names() {
        let mut registry = registry();
        assert!(registry.add("Event".to_string()).unwrap());
        assert!(!registry.add("Event".to_string()).unwrap());
        assert!(!registry.add("Press".to_string()).unwrap());
        assert_eq!(registry.list().count(), 3);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = registry();
        assert!(registry.add("press".to_string()).unwrap());
        assert!(registry.contains("press"));
        assert!(!registry.is_default("press"));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut registry = registry();
        assert!(matches!(
            registry.add("  ".to_string()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn defaults_are_never_removable() {
        let mut registry = registry();
        let err = registry.remove("Notice", &[]).unwrap_err();
        assert!(matches!(err, Error::ProtectedCategory(name) if name == "Notice"));

        let err = registry
            .remove("Press", &[tagged(1, "Press")])
            .unwrap_err();
        assert!(matches!(err, Error::ProtectedCategory(_)));
        assert!(registry.contains("Press"));
    }

    #[test]
    fn custom_in_use_cannot_be_removed_until_unreferenced() {
        let mut registry = registry();
        registry.add("Event".to_string()).unwrap();
        let mut articles = vec![tagged(1, "Notice"), tagged(2, "Event")];

        let err = registry.remove("Event", &articles).unwrap_err();
        assert!(matches!(err, Error::InUse { ref name, count: 1 } if name == "Event"));
        assert!(registry.contains("Event"));

        articles.retain(|a| a.id != 2);
        assert!(registry.remove("Event", &articles).unwrap());
        assert!(!registry.contains("Event"));
    }

    #[test]
    fn removing_an_unknown_category_reports_false() {
        let mut registry = registry();
        assert!(!registry.remove("Missing", &[]).unwrap());
    }

    #[test]
    fn usage_counts_exact_matches() {
        let articles = [tagged(1, "Event"), tagged(2, "Event"), tagged(3, "event")];
        assert_eq!(usage_count(&articles, "Event"), 2);
        assert_eq!(usage_count(&articles, "Notice"), 0);
    }

    #[test]
    fn restored_customs_skip_duplicates() {
        let registry = registry().with_custom(["Event".to_string(), "Press".to_string()]);
        assert_eq!(registry.custom(), ["Event".to_string()]);
    }
}
