//! `Clear-Site-Data` header value.
//!
//! Only the tokens browsers understand are kept; anything else is dropped
//! without error. Tokens keep their first-seen order and appear once.

use std::fmt;

use crate::config_tree::ConfigSection;

pub const CACHE: &str = "cache";
pub const COOKIES: &str = "cookies";
pub const STORAGE: &str = "storage";
pub const EXECUTION_CONTEXTS: &str = "executionContexts";
pub const ALL: &str = "*";

const ALLOWED_VALUES: [&str; 5] = [CACHE, COOKIES, STORAGE, EXECUTION_CONTEXTS, ALL];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearSiteData {
    values: Vec<String>,
}

impl ClearSiteData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Self::new();
        data.add_values(values);
        data
    }

    /// Reads a string array from `section`. Returns `None` when it holds no
    /// values, so callers keep whatever they had before.
    pub fn from_config(section: &ConfigSection<'_>) -> Option<Self> {
        section
            .as_string_array()
            .filter(|values| !values.is_empty())
            .map(Self::from_values)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn add_values<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            let value = value.as_ref();
            if ALLOWED_VALUES.contains(&value) && !self.values.iter().any(|v| v == value) {
                self.values.push(value.to_string());
            }
        }
        self
    }

    pub fn clear_cache(mut self) -> Self {
        self.add_values([CACHE]);
        self
    }

    pub fn clear_cookies(mut self) -> Self {
        self.add_values([COOKIES]);
        self
    }

    pub fn clear_storage(mut self) -> Self {
        self.add_values([STORAGE]);
        self
    }

    pub fn clear_execution_contexts(mut self) -> Self {
        self.add_values([EXECUTION_CONTEXTS]);
        self
    }

    pub fn clear_all(mut self) -> Self {
        self.add_values([ALL]);
        self
    }
}

impl fmt::Display for ClearSiteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{value}\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_tree::ConfigTree;
    use serde_json::json;

    #[test]
    fn drops_unknown_and_duplicate_tokens() {
        let data = ClearSiteData::from_values(["cache", "invalid", "cache"]);
        assert_eq!(data.to_string(), "\"cache\"");
    }

    #[test]
    fn empty_renders_empty_string() {
        let data = ClearSiteData::from_values(Vec::<String>::new());
        assert_eq!(data.to_string(), "");
        assert!(data.is_empty());
    }

    #[test]
    fn helpers_preserve_insertion_order() {
        let data = ClearSiteData::new()
            .clear_storage()
            .clear_cache()
            .clear_cookies()
            .clear_execution_contexts()
            .clear_all()
            .clear_cache();
        assert_eq!(
            data.to_string(),
            "\"storage\",\"cache\",\"cookies\",\"executionContexts\",\"*\""
        );
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let data = ClearSiteData::from_values(["Cache", "executioncontexts"]);
        assert!(data.is_empty());
    }

    #[test]
    fn from_config_ignores_empty_lists() {
        let tree = ConfigTree::new(json!({ "A": ["*"], "B": ["bogus"] }));
        let a = ClearSiteData::from_config(&tree.section("A").unwrap()).unwrap();
        assert_eq!(a.to_string(), "\"*\"");

        // A list holding only unknown tokens still yields a (empty) value.
        let b = ClearSiteData::from_config(&tree.section("B").unwrap()).unwrap();
        assert!(b.is_empty());
    }
}
