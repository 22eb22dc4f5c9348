//! Pre-save checks on a draft.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::note::{Field, NoteDraft};

/// Field name to human-readable messages, sorted by field name.
///
/// The same shape is used for server-side rejections, so it deserializes from
/// a `{"title": ["..."]}` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All messages for `field` joined for inline display.
    pub fn joined(&self, field: &str) -> Option<String> {
        self.0.get(field).map(|messages| messages.join(", "))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Check that title, content and category are all present.
pub fn validate(draft: &NoteDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for (field, message) in [
        (Field::Title, "Title is required"),
        (Field::Content, "Content is required"),
        (Field::Category, "Category is required"),
    ] {
        if draft.get(field).is_empty() {
            errors.push(field.as_ref(), message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::CategoryId;

    fn draft(title: &str, content: &str, category: &str) -> NoteDraft {
        NoteDraft {
            id: None,
            title: title.to_string(),
            content: content.to_string(),
            category: CategoryId::new(category),
        }
    }

    #[test]
    fn complete_draft_passes() {
        assert_eq!(validate(&draft("Groceries", "Buy eggs", "cat-1")), Ok(()));
    }

    #[test]
    fn reports_every_missing_field() {
        let test_cases = vec![
            ("missing title", draft("", "Buy eggs", "cat-1"), vec!["title"]),
            ("missing content", draft("Groceries", "", "cat-1"), vec!["content"]),
            ("missing category", draft("Groceries", "Buy eggs", ""), vec!["category"]),
            (
                "everything missing",
                draft("", "", ""),
                vec!["category", "content", "title"],
            ),
        ];

        for (description, draft, expected) in test_cases {
            let errors = validate(&draft).expect_err(description);
            assert_eq!(errors.fields().collect::<Vec<_>>(), expected, "{}", description);
        }
    }

    #[test]
    fn messages_are_human_readable() {
        let errors = validate(&draft("", "", "cat-1")).unwrap_err();
        assert_eq!(errors.get("title"), ["Title is required".to_string()]);
        assert_eq!(errors.joined("content").as_deref(), Some("Content is required"));
        assert!(errors.get("category").is_empty());
        assert_eq!(
            errors.to_string(),
            "content: Content is required; title: Title is required"
        );
    }

    #[test]
    fn deserializes_server_rejections() {
        let body = r#"{"title": ["This field may not be blank.", "Too short."]}"#;
        let errors: FieldErrors = serde_json::from_str(body).unwrap();
        assert_eq!(
            errors.joined("title").as_deref(),
            Some("This field may not be blank., Too short.")
        );
    }
}
