//! Ordered scope chain used during interpolation
//!
//! A [`ChainMap`] holds an ordered list of key→value snapshots. On lookup
//! every scope is consulted in order and a later scope's entry overrides an
//! earlier one for the same key. This is deliberately not first-match-wins:
//! the chain is built `[defaults, section, overrides]`, so the override
//! scope added last has the highest priority.

use indexmap::IndexMap;

/// A single key→value snapshot, insertion-ordered.
pub type Dict = IndexMap<String, String>;

/// An ordered, query-scoped list of lookup scopes.
#[derive(Debug, Clone, Default)]
pub struct ChainMap {
    scopes: Vec<Dict>,
}

impl ChainMap {
    /// Create an empty chain
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Create a chain from an ordered list of scopes
    pub fn from_scopes(scopes: Vec<Dict>) -> Self {
        Self { scopes }
    }

    /// Append a scope; later scopes override earlier ones on collision
    pub fn add(&mut self, scope: Dict) {
        self.scopes.push(scope);
    }

    /// Number of scopes in the chain
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check whether the chain has no scopes
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Look up `name`, letting the last scope holding it win.
    /// Names absent from every scope resolve to the empty string.
    pub fn get(&self, name: &str) -> String {
        let mut value = String::new();
        for scope in &self.scopes {
            if let Some(found) = scope.get(name) {
                value = found.clone();
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> Dict {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_chain_resolves_to_empty_string() {
        let chain = ChainMap::new();
        assert_eq!(chain.get("anything"), "");
        assert!(chain.is_empty());
    }

    #[test]
    fn test_single_scope() {
        let mut chain = ChainMap::new();
        chain.add(dict(&[("base_dir", "/srv")]));

        assert_eq!(chain.len(), 1);
        assert_eq!(chain.get("base_dir"), "/srv");
        assert_eq!(chain.get("missing"), "");
    }

    #[test]
    fn test_later_scope_overrides_earlier() {
        let chain = ChainMap::from_scopes(vec![
            dict(&[("dir", "/srv"), ("kept", "yes")]),
            dict(&[("dir", "/opt")]),
        ]);

        assert_eq!(chain.get("dir"), "/opt");
        assert_eq!(chain.get("kept"), "yes");
    }

    #[test]
    fn test_add_appends_highest_priority() {
        let mut chain = ChainMap::from_scopes(vec![dict(&[("dir", "/srv")])]);
        chain.add(dict(&[("dir", "/override")]));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get("dir"), "/override");
    }
}
