use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TITLE_MAX_LEN;
use crate::error::DomainError;

/// Maximum slug length.
pub const SLUG_MAX_LEN: usize = 50;

/// Category entity - a thematic section posts are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// URL identifier, unique across categories.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a published category, checking the title and slug constraints.
    pub fn new(title: String, description: String, slug: String) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::BlankTitle);
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::TitleTooLong { max: TITLE_MAX_LEN });
        }
        if !Self::is_valid_slug(&slug) {
            return Err(DomainError::InvalidSlug(slug));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            is_published: true,
            created_at: Utc::now(),
        })
    }

    /// Slugs are 1..=50 characters of `[A-Za-z0-9_-]`.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= SLUG_MAX_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_is_published() {
        let category =
            Category::new("Travel".into(), "Trips".into(), "travel_2024".into()).unwrap();
        assert!(category.is_published);
        assert_eq!(category.slug, "travel_2024");
    }

    #[test]
    fn test_slug_rules() {
        assert!(Category::is_valid_slug("rust-lang_1"));
        assert!(!Category::is_valid_slug(""));
        assert!(!Category::is_valid_slug("with space"));
        assert!(!Category::is_valid_slug("кириллица"));
        assert!(!Category::is_valid_slug(&"a".repeat(SLUG_MAX_LEN + 1)));
    }

    #[test]
    fn test_title_required() {
        let result = Category::new("  ".into(), String::new(), "empty".into());
        assert_eq!(result.unwrap_err(), DomainError::BlankTitle);

        let long = Category::new("ж".repeat(TITLE_MAX_LEN + 1), String::new(), "long".into());
        assert_eq!(
            long.unwrap_err(),
            DomainError::TitleTooLong { max: TITLE_MAX_LEN }
        );

        let bad = Category::new("Bad".into(), String::new(), "no spaces".into());
        assert_eq!(bad.unwrap_err(), DomainError::InvalidSlug("no spaces".into()));
    }
}
