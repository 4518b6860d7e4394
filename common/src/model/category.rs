use crate::error::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named grouping of applications, listed by `display_order` then `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Checks the per-record invariants. Uniqueness of `name` and `slug` is
    /// enforced by the persistence layer.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if self.slug.trim().is_empty() {
            errors.add("slug", "can't be blank");
        }
        if self.display_order < 0 {
            errors.add("display_order", "must be greater than or equal to 0");
        }
        errors.into_result()
    }

    /// Listing order: `display_order` ascending, ties broken by `name`.
    pub fn listing_order(a: &Category, b: &Category) -> Ordering {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, display_order: i64) -> Category {
        Category {
            id: 1,
            name: name.to_string(),
            slug: name.to_lowercase(),
            icon: Some("🎮".to_string()),
            description: None,
            display_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_category_passes() {
        assert!(category("Games", 1).validate().is_ok());
    }

    #[test]
    fn blank_name_slug_and_negative_order_fail() {
        let mut c = category(" ", -1);
        c.slug.clear();
        let errors = c.validate().unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("slug"));
        assert!(errors.has_field("display_order"));
    }

    #[test]
    fn listing_order_breaks_ties_by_name() {
        let mut list = vec![category("Video", 2), category("Tools", 1), category("Reading", 1)];
        list.sort_by(Category::listing_order);
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Reading", "Tools", "Video"]);
    }
}
