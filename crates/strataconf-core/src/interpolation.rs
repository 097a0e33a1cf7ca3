//! Placeholder expansion against a scope chain
//!
//! Values may embed `%(name)s` placeholders. Expansion runs repeated
//! scan/replace passes, resolving each captured name through an
//! [`Interpolator`]. The pass count is bounded by
//! [`MAX_EXPANSION_PASSES`]; chains deeper than the bound leave literal
//! `%(...)s` text in the output, which is expected behavior rather than an
//! error. Cycles are not detected, only bounded.

use crate::chainmap::{ChainMap, Dict};

/// Upper bound on scan/replace passes over a single value.
pub const MAX_EXPANSION_PASSES: usize = 10;

/// The pluggable resolution capability behind interpolated lookups.
///
/// The default implementation is [`ChainMap`]; a caller may substitute any
/// other strategy (for example one that prefixes every resolved value)
/// without touching the parsing or storage layers.
pub trait Interpolator {
    /// Append a lookup scope; later scopes take priority
    fn add_scope(&mut self, scope: Dict);

    /// Number of scopes currently held
    fn scope_count(&self) -> usize;

    /// Resolve a single name to a string; empty string when unknown
    fn resolve(&self, name: &str) -> String;
}

impl Interpolator for ChainMap {
    fn add_scope(&mut self, scope: Dict) {
        self.add(scope);
    }

    fn scope_count(&self) -> usize {
        self.len()
    }

    fn resolve(&self, name: &str) -> String {
        self.get(name)
    }
}

/// Expand every `%(name)s` placeholder in `value` through `scopes`.
pub fn expand(value: &str, scopes: &dyn Interpolator) -> String {
    let mut value = value.to_string();

    for pass in 0..MAX_EXPANSION_PASSES {
        if !value.contains("%(") {
            break;
        }
        log::trace!("expansion pass {} over {:?}", pass + 1, value);
        value = replace_all(&value, scopes);
    }

    value
}

/// One scan/replace pass: rewrite each well-formed `%(name)s` occurrence.
///
/// A name runs up to the first `)`; the placeholder only counts when that
/// `)` is immediately followed by `s`. Anything malformed is kept verbatim.
fn replace_all(value: &str, scopes: &dyn Interpolator) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("%(") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find(')') {
            Some(end) if after[end + 1..].starts_with('s') => {
                let name = &after[..end];
                out.push_str(&scopes.resolve(name));
                rest = &after[end + 2..];
            }
            _ => {
                // Not a placeholder; emit the opener and rescan from the name
                out.push_str("%(");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
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
    fn test_expand_plain_value_untouched() {
        let chain = ChainMap::new();
        assert_eq!(expand("no placeholders here", &chain), "no placeholders here");
    }

    #[test]
    fn test_expand_single_placeholder() {
        let chain = ChainMap::from_scopes(vec![dict(&[("base_dir", "/srv")])]);
        assert_eq!(expand("%(base_dir)s/bin", &chain), "/srv/bin");
    }

    #[test]
    fn test_expand_chained_placeholders() {
        let chain = ChainMap::from_scopes(vec![dict(&[
            ("base_dir", "/srv"),
            ("bin_dir", "%(base_dir)s/bin"),
            ("builder_command", "%(bin_dir)s/build"),
        ])]);

        assert_eq!(expand("%(builder_command)s", &chain), "/srv/bin/build");
    }

    #[test]
    fn test_expand_override_scope_wins() {
        let chain = ChainMap::from_scopes(vec![
            dict(&[("bin_dir", "/srv/bin")]),
            dict(&[("bin_dir", "/a/non/existent/path")]),
        ]);

        assert_eq!(
            expand("%(bin_dir)s/build", &chain),
            "/a/non/existent/path/build"
        );
    }

    #[test]
    fn test_expand_unknown_name_becomes_empty() {
        let chain = ChainMap::new();
        assert_eq!(expand("a%(missing)sb", &chain), "ab");
    }

    #[test]
    fn test_expand_malformed_placeholders_kept() {
        let chain = ChainMap::from_scopes(vec![dict(&[("x", "1")])]);

        // No closing ")s"
        assert_eq!(expand("%(x", &chain), "%(x");
        // Closing paren not followed by s
        assert_eq!(expand("%(x)y", &chain), "%(x)y");
        // Malformed prefix does not hide a later valid placeholder
        assert_eq!(expand("%(x)y %(x)s", &chain), "%(x)y 1");
    }

    #[test]
    fn test_expand_stops_at_pass_bound() {
        // An 11-link chain cannot fully resolve inside the 10-pass bound;
        // residual placeholder text is the documented outcome.
        let mut scope = Dict::new();
        for i in 0..11 {
            scope.insert(format!("k{}", i), format!("%(k{})s", i + 1));
        }
        scope.insert("k11".into(), "done".into());
        let chain = ChainMap::from_scopes(vec![scope]);

        let result = expand("%(k0)s", &chain);
        assert!(result.contains("%("), "expected residual placeholder, got {:?}", result);
    }

    #[test]
    fn test_expand_deep_chain_within_bound_resolves() {
        let mut scope = Dict::new();
        for i in 0..9 {
            scope.insert(format!("k{}", i), format!("%(k{})s", i + 1));
        }
        scope.insert("k9".into(), "done".into());
        let chain = ChainMap::from_scopes(vec![scope]);

        assert_eq!(expand("%(k0)s", &chain), "done");
    }

    #[test]
    fn test_custom_interpolator_strategy() {
        // Substituting a different resolution strategy must not require
        // touching the expansion loop.
        struct Prefixing(ChainMap);

        impl Interpolator for Prefixing {
            fn add_scope(&mut self, scope: Dict) {
                self.0.add(scope);
            }
            fn scope_count(&self) -> usize {
                self.0.len()
            }
            fn resolve(&self, name: &str) -> String {
                format!("pre-{}", self.0.get(name))
            }
        }

        let mut interp = Prefixing(ChainMap::new());
        interp.add_scope(dict(&[("dir", "bin")]));

        assert_eq!(interp.scope_count(), 1);
        assert_eq!(expand("%(dir)s", &interp), "pre-bin");
    }
}
