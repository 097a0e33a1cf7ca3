//! Single-section option store
//!
//! Options are stored under their original-cased key; a derived lookup
//! table maps the normalized form (trimmed, lower-cased) back to the
//! canonical key so reads are case-insensitive while listings preserve
//! the casing used at insertion.

use std::collections::HashMap;

use crate::chainmap::Dict;
use crate::error::{Error, Result};

/// One named section's options with case-insensitive lookup.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    options: Dict,
    lookup: HashMap<String, String>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Dict::new(),
            lookup: HashMap::new(),
        }
    }

    /// The section's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `value` verbatim under `key`.
    ///
    /// The normalized form of `key` is registered in the lookup table;
    /// when two canonical keys normalize identically, the later write wins.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let lookup_key = normalize(&key);

        self.options.insert(key.clone(), value.into());
        self.lookup.insert(lookup_key, key);
    }

    /// Fetch the value for `key` (case-insensitive, whitespace-trimmed)
    pub fn get(&self, key: &str) -> Result<&str> {
        let canonical = self
            .lookup
            .get(&normalize(key))
            .ok_or_else(|| Error::no_option(&self.name, key))?;
        self.options
            .get(canonical)
            .map(String::as_str)
            .ok_or_else(|| Error::no_option(&self.name, key))
    }

    /// Whether `key` resolves to a stored option
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains_key(&normalize(key))
    }

    /// Remove an option.
    ///
    /// Requires an exact canonical-key match; a normalized variant that is
    /// not the stored spelling fails with the same "no option" error.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.options.shift_remove(key).is_none() {
            return Err(Error::no_option(&self.name, key));
        }
        self.lookup.remove(&normalize(key));
        Ok(())
    }

    /// Canonical keys in ascending lexical order
    pub fn options(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.options.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Independent copy of the canonical key→value mapping
    pub fn items(&self) -> Dict {
        self.options.clone()
    }

    /// Whether the section holds no options
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_and_get() {
        let mut s = Section::new("slave");
        s.add("max_build_time", "200");

        assert_eq!(s.get("max_build_time").unwrap(), "200");
    }

    #[test]
    fn test_get_is_case_insensitive_and_trimmed() {
        let mut s = Section::new("names");
        s.add("Value", "stored");

        assert_eq!(s.get("VALUE").unwrap(), "stored");
        assert_eq!(s.get("value").unwrap(), "stored");
        assert_eq!(s.get(" value ").unwrap(), "stored");
    }

    #[test]
    fn test_listings_preserve_original_casing() {
        let mut s = Section::new("names");
        s.add("CamelKey", "v");

        assert_eq!(s.options(), vec!["CamelKey".to_string()]);
        assert_eq!(s.items().get("CamelKey").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_value_stored_verbatim() {
        let mut s = Section::new("raw");
        s.add("cmd", "Mixed Case VALUE");

        assert_eq!(s.get("cmd").unwrap(), "Mixed Case VALUE");
    }

    #[test]
    fn test_get_missing_is_no_option() {
        let s = Section::new("slave");
        let err = s.get("missing").unwrap_err();

        assert_eq!(format!("{}", err), "No option 'missing' in section: 'slave'");
    }

    #[test]
    fn test_normalized_collision_last_write_wins() {
        let mut s = Section::new("dup");
        s.add("Key", "first");
        s.add("KEY", "second");

        // Both canonical spellings exist, but lookups route to the later one
        assert_eq!(s.get("key").unwrap(), "second");
    }

    #[test]
    fn test_remove_requires_exact_canonical_key() {
        let mut s = Section::new("slave");
        s.add("Builder", "/srv/bin/build");

        assert!(s.remove("builder").is_err());
        assert!(s.remove("Builder").is_ok());
        assert!(s.get("Builder").is_err());
        assert!(!s.contains("builder"));
    }

    #[test]
    fn test_items_is_an_independent_copy() {
        let mut s = Section::new("copy");
        s.add("a", "1");

        let mut items = s.items();
        items.insert("b".into(), "2".into());

        assert!(s.get("b").is_err());
    }

    #[test]
    fn test_options_sorted() {
        let mut s = Section::new("sorted");
        s.add("zeta", "1");
        s.add("alpha", "2");
        s.add("mid", "3");

        assert_eq!(s.options(), vec!["alpha", "mid", "zeta"]);
    }
}
