//! Post search predicate.

use serde::{Deserialize, Serialize};

use crate::domain::{Post, Tag};

/// Matches posts whose title, content or any tag name contains the query.
///
/// Matching is a plain substring test. Stores translate the filter into
/// their own text comparison, so case folding follows the store default
/// (case-sensitive for both bundled stores).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    query: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, post: &Post, tags: &[Tag]) -> bool {
        post.title.contains(&self.query)
            || post.content.contains(&self.query)
            || tags.iter().any(|t| t.tag_name.contains(&self.query))
    }

    /// The query as a `LIKE` pattern with `\` as the escape character.
    ///
    /// `%`, `_` and `\` in the query match themselves, so SQL stores agree
    /// with [`SearchFilter::matches`].
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.query.len() + 2);
        pattern.push('%');
        for ch in self.query.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::PostDraft;

    fn post(title: &str, content: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            &PostDraft {
                title: title.to_string(),
                content: content.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn any_field_may_match() {
        let filter = SearchFilter::new("new");

        assert!(filter.matches(&post("new post", ""), &[Tag::new("misc")]));
        assert!(filter.matches(&post("old", "something new"), &[]));
        assert!(filter.matches(&post("x", "y"), &[Tag::new("newish")]));
        assert!(!filter.matches(&post("x", "y"), &[Tag::new("misc")]));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let filter = SearchFilter::new("new");
        assert!(!filter.matches(&post("NEW", "Newer"), &[]));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(SearchFilter::new("new").like_pattern(), "%new%");
        assert_eq!(SearchFilter::new("50%_off").like_pattern(), r"%50\%\_off%");
        assert_eq!(SearchFilter::new(r"a\b").like_pattern(), r"%a\\b%");
    }

    #[test]
    fn wildcard_characters_match_literally() {
        let filter = SearchFilter::new("_");
        assert!(!filter.matches(&post("title", "body"), &[]));
        assert!(filter.matches(&post("snake_case", ""), &[]));
    }
}
