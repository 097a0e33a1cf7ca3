//! Main Config type for strataconf
//!
//! A [`Config`] owns a set of named sections plus one distinguished
//! default section whose options are visible, as fallbacks only, from
//! every other section. All parse behavior is carried by a
//! [`ConfigOptions`] value threaded through construction; there are no
//! process-wide mode flags.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::chainmap::{ChainMap, Dict};
use crate::error::{Error, Result};
use crate::interpolation::{self, Interpolator};
use crate::parser;
use crate::section::Section;

/// Name of the default section when none is configured.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Custom integer converter; the message becomes the conversion error cause
pub type IntConverter = Arc<dyn Fn(&str) -> std::result::Result<i64, String> + Send + Sync>;
/// Custom float converter
pub type FloatConverter = Arc<dyn Fn(&str) -> std::result::Result<f64, String> + Send + Sync>;
/// Custom boolean converter
pub type BoolConverter = Arc<dyn Fn(&str) -> std::result::Result<bool, String> + Send + Sync>;

/// Factory producing a fresh scope chain for each interpolated lookup
pub type InterpolatorFactory = Arc<dyn Fn() -> Box<dyn Interpolator> + Send + Sync>;

/// Pluggable per-type converters for the typed getters.
///
/// A configured converter replaces the default string parsing entirely;
/// being statically typed, its result is necessarily the target type.
#[derive(Clone, Default)]
pub struct Converters {
    pub int: Option<IntConverter>,
    pub float: Option<FloatConverter>,
    pub bool: Option<BoolConverter>,
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field("int", &self.int.as_ref().map(|_| "<custom>"))
            .field("float", &self.float.as_ref().map(|_| "<custom>"))
            .field("bool", &self.bool.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Configuration options for parsing and querying
#[derive(Clone)]
pub struct ConfigOptions {
    /// Name of the distinguished default section (exact, case-sensitive)
    pub default_section: String,
    /// Key/value delimiter characters
    pub delimiters: Vec<char>,
    /// Prefixes that make a whole line a comment
    pub comment_prefixes: Vec<String>,
    /// Prefixes that truncate a value mid-line
    pub inline_comment_prefixes: Vec<String>,
    /// Accept bare keys, stored with an empty value
    pub allow_no_value: bool,
    /// Preserve blank lines inside continued values
    pub allow_empty_lines: bool,
    /// Make duplicate sections and duplicate option keys fatal
    pub strict: bool,
    /// Custom typed-getter converters
    pub converters: Converters,
    /// Custom interpolation strategy; `ChainMap` when unset
    pub interpolator: Option<InterpolatorFactory>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            default_section: DEFAULT_SECTION.to_string(),
            delimiters: vec![':', '='],
            comment_prefixes: vec!["#".to_string()],
            inline_comment_prefixes: Vec::new(),
            allow_no_value: false,
            allow_empty_lines: false,
            strict: false,
            converters: Converters::default(),
            interpolator: None,
        }
    }
}

impl fmt::Debug for ConfigOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("default_section", &self.default_section)
            .field("delimiters", &self.delimiters)
            .field("comment_prefixes", &self.comment_prefixes)
            .field("inline_comment_prefixes", &self.inline_comment_prefixes)
            .field("allow_no_value", &self.allow_no_value)
            .field("allow_empty_lines", &self.allow_empty_lines)
            .field("strict", &self.strict)
            .field("converters", &self.converters)
            .field("interpolator", &self.interpolator.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ConfigOptions {
    /// Set the default-section name
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Set the key/value delimiter characters
    pub fn with_delimiters(mut self, delimiters: &[char]) -> Self {
        self.delimiters = delimiters.to_vec();
        self
    }

    /// Set the whole-line comment prefixes
    pub fn with_comment_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.comment_prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Set the inline comment prefixes
    pub fn with_inline_comment_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.inline_comment_prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Accept bare keys without a value
    pub fn with_allow_no_value(mut self, allow: bool) -> Self {
        self.allow_no_value = allow;
        self
    }

    /// Preserve blank lines inside continued values
    pub fn with_allow_empty_lines(mut self, allow: bool) -> Self {
        self.allow_empty_lines = allow;
        self
    }

    /// Make duplicate sections and option keys fatal during parsing
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set custom typed-getter converters
    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    /// Substitute the interpolation strategy
    pub fn with_interpolator(mut self, factory: InterpolatorFactory) -> Self {
        self.interpolator = Some(factory);
        self
    }

    /// A fresh, empty scope chain for one interpolated lookup
    pub(crate) fn fresh_interpolator(&self) -> Box<dyn Interpolator> {
        match &self.interpolator {
            Some(factory) => factory(),
            None => Box::new(ChainMap::new()),
        }
    }
}

/// The configuration document and its query/mutation surface.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) sections: IndexMap<String, Section>,
    pub(crate) defaults: Section,
    pub(crate) options: ConfigOptions,
}

impl Config {
    /// Create an empty document with stock options
    pub fn new() -> Self {
        Self::with_options(ConfigOptions::default())
    }

    /// Create an empty document with the given options
    pub fn with_options(options: ConfigOptions) -> Self {
        Self {
            sections: IndexMap::new(),
            defaults: Section::new(&options.default_section),
            options,
        }
    }

    /// Create a document whose default section is seeded from `defaults`.
    /// The entries are copied; later mutation of the source map has no
    /// effect on the document.
    pub fn with_defaults(defaults: Dict) -> Self {
        let mut config = Self::new();
        for (key, value) in defaults {
            config.defaults.add(key, value);
        }
        config
    }

    /// Parse a document from text with stock options
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_options(text, ConfigOptions::default())
    }

    /// Parse a document from text with the given options
    pub fn parse_with_options(text: &str, options: ConfigOptions) -> Result<Self> {
        let mut config = Self::with_options(options);
        parser::parse_into(&mut config, text)?;
        Ok(config)
    }

    /// Parse a document from a file with stock options
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_options(path, ConfigOptions::default())
    }

    /// Parse a document from a file with the given options
    pub fn from_file_with_options(path: impl AsRef<Path>, options: ConfigOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read '{}': {}", path.display(), e)))?;
        Self::parse_with_options(&text, options)
    }

    fn is_default_section(&self, section: &str) -> bool {
        section == self.options.default_section
    }

    /// Copy of the default section's options
    pub fn defaults(&self) -> Dict {
        self.defaults.items()
    }

    /// Section names in ascending lexical order, default section excluded
    pub fn sections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether the named section is present; the default section is not
    /// acknowledged here
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Create a new, empty section.
    ///
    /// The configured default-section name is reserved (exact match) and
    /// fails with an invalid-name error; an existing name fails with an
    /// already-exists error.
    pub fn add_section(&mut self, section: impl Into<String>) -> Result<()> {
        let section = section.into();
        if self.is_default_section(&section) {
            return Err(Error::invalid_section_name(section));
        }
        if self.has_section(&section) {
            return Err(Error::already_exists(section));
        }
        log::debug!("adding section {:?}", section);
        self.sections
            .insert(section.clone(), Section::new(section));
        Ok(())
    }

    /// Remove a section and all its options
    pub fn remove_section(&mut self, section: &str) -> Result<()> {
        if self.sections.shift_remove(section).is_none() {
            return Err(Error::no_section(section));
        }
        log::debug!("removed section {:?}", section);
        Ok(())
    }

    fn section(&self, section: &str) -> Result<&Section> {
        self.sections
            .get(section)
            .ok_or_else(|| Error::no_section(section))
    }

    fn section_mut(&mut self, section: &str) -> Result<&mut Section> {
        self.sections
            .get_mut(section)
            .ok_or_else(|| Error::no_section(section))
    }

    pub(crate) fn key_exists_anywhere(&self, key: &str) -> bool {
        self.defaults.contains(key) || self.sections.values().any(|s| s.contains(key))
    }

    /// Fetch an option value.
    ///
    /// The default-section name resolves only against the default section.
    /// Any other name must exist as a section; its own options are
    /// consulted first, then the defaults as a fallback.
    pub fn get(&self, section: &str, option: &str) -> Result<String> {
        if self.is_default_section(section) {
            return self
                .defaults
                .get(option)
                .map(str::to_string)
                .map_err(|_| Error::no_option(section, option));
        }

        let stored = self.section(section)?;
        if let Ok(value) = stored.get(option) {
            return Ok(value.to_string());
        }
        self.defaults
            .get(option)
            .map(str::to_string)
            .map_err(|_| Error::no_option(section, option))
    }

    /// Set an option value.
    ///
    /// The default-section name routes to the default section; any other
    /// section must already exist.
    pub fn set(
        &mut self,
        section: &str,
        option: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        if self.is_default_section(section) {
            self.defaults.add(option, value);
            return Ok(());
        }
        self.section_mut(section)?.add(option, value);
        Ok(())
    }

    /// Whether the section itself stores the option. The default-section
    /// fallback used by [`Config::get`] is not consulted.
    pub fn has_option(&self, section: &str, option: &str) -> Result<bool> {
        if self.is_default_section(section) {
            return Ok(self.defaults.contains(option));
        }
        Ok(self.section(section)?.contains(option))
    }

    /// Remove an option; exact canonical-key match required
    pub fn remove_option(&mut self, section: &str, option: &str) -> Result<()> {
        if self.is_default_section(section) {
            return self.defaults.remove(option);
        }
        self.section_mut(section)?.remove(option)
    }

    /// Option names for the section, mixed with the defaults, in
    /// ascending lexical order
    pub fn options(&self, section: &str) -> Result<Vec<String>> {
        let stored = self.section(section)?;
        let mut names = stored.options();
        for name in self.defaults.options() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Copy of the section's own options, defaults excluded
    pub fn items(&self, section: &str) -> Result<Dict> {
        Ok(self.section(section)?.items())
    }

    /// Copy of the default section merged with the section's own options;
    /// section entries win on key collision
    pub fn items_with_defaults(&self, section: &str) -> Result<Dict> {
        let stored = self.section(section)?;
        let mut merged = self.defaults.items();
        for (key, value) in stored.items() {
            merged.insert(key, value);
        }
        Ok(merged)
    }

    /// The standard scope chain for a lookup in `section`:
    /// defaults first, then the section's own items.
    fn scope_chain(&self, section: &str) -> Result<Box<dyn Interpolator>> {
        let mut chain = self.options.fresh_interpolator();
        chain.add_scope(self.defaults.items());
        if !self.is_default_section(section) {
            chain.add_scope(self.items(section)?);
        }
        Ok(chain)
    }

    /// Fetch an option with all `%(name)s` placeholders expanded against
    /// the defaults and the section's own items
    pub fn get_interpolated(&self, section: &str, option: &str) -> Result<String> {
        let chain = self.scope_chain(section)?;
        let value = self.get(section, option)?;
        Ok(interpolation::expand(&value, chain.as_ref()))
    }

    /// Like [`Config::get_interpolated`], with a caller-supplied override
    /// scope appended last (highest priority)
    pub fn get_interpolated_with_vars(
        &self,
        section: &str,
        option: &str,
        vars: Dict,
    ) -> Result<String> {
        let mut chain = self.scope_chain(section)?;
        chain.add_scope(vars);
        let value = self.get(section, option)?;
        Ok(interpolation::expand(&value, chain.as_ref()))
    }

    /// Copy of the section's own options with every value expanded. The
    /// default-section name expands the defaults against themselves.
    pub fn items_interpolated(&self, section: &str) -> Result<Dict> {
        let chain = self.scope_chain(section)?;
        let mut items = if self.is_default_section(section) {
            self.defaults.items()
        } else {
            self.items(section)?
        };
        for value in items.values_mut() {
            *value = interpolation::expand(value, chain.as_ref());
        }
        Ok(items)
    }

    /// Fetch an option converted to an integer
    pub fn get_i64(&self, section: &str, option: &str) -> Result<i64> {
        let raw = self.get(section, option)?;
        match &self.options.converters.int {
            Some(convert) => convert(&raw).map_err(|m| Error::conversion(option, m)),
            None => raw
                .parse()
                .map_err(|e: std::num::ParseIntError| Error::conversion(option, e.to_string())),
        }
    }

    /// Fetch an option converted to a float
    pub fn get_f64(&self, section: &str, option: &str) -> Result<f64> {
        let raw = self.get(section, option)?;
        match &self.options.converters.float {
            Some(convert) => convert(&raw).map_err(|m| Error::conversion(option, m)),
            None => raw
                .parse()
                .map_err(|e: std::num::ParseFloatError| Error::conversion(option, e.to_string())),
        }
    }

    /// Fetch an option converted to a boolean.
    ///
    /// Without a custom converter the stored string must match one of the
    /// literals `1`, `true`, `on`, `yes` (true) or `0`, `false`, `off`,
    /// `no` (false), exactly.
    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool> {
        let raw = self.get(section, option)?;
        match &self.options.converters.bool {
            Some(convert) => convert(&raw).map_err(|m| Error::conversion(option, m)),
            None => match raw.as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" => Ok(false),
                other => Err(Error::conversion(
                    option,
                    format!("not a boolean: '{}'", other),
                )),
            },
        }
    }

    /// Render the document as INI text.
    ///
    /// The default section comes first when non-empty, then every other
    /// section in ascending name order; options inside a block are in
    /// ascending key order, and one blank line follows every block.
    pub fn dump(&self, delimiter: char) -> String {
        let mut out = String::new();

        if !self.defaults.is_empty() {
            write_block(&mut out, &self.defaults, delimiter);
        }
        for name in self.sections() {
            if let Some(section) = self.sections.get(&name) {
                write_block(&mut out, section, delimiter);
            }
        }

        out
    }

    /// Write the document to a file as INI text
    pub fn save(&self, path: impl AsRef<Path>, delimiter: char) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.dump(delimiter))
            .map_err(|e| Error::io(format!("failed to write '{}': {}", path.display(), e)))
    }

    /// Render the document as a JSON object of `{section: {key: value}}`,
    /// with a default-section entry when it is non-empty
    pub fn to_json(&self) -> Result<String> {
        let mut root = serde_json::Map::new();

        if !self.defaults.is_empty() {
            root.insert(
                self.options.default_section.clone(),
                section_object(&self.defaults),
            );
        }
        for name in self.sections() {
            if let Some(section) = self.sections.get(&name) {
                root.insert(name, section_object(section));
            }
        }

        serde_json::to_string_pretty(&serde_json::Value::Object(root))
            .map_err(|e| Error::parse(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn write_block(out: &mut String, section: &Section, delimiter: char) {
    out.push('[');
    out.push_str(section.name());
    out.push_str("]\n");

    let items = section.items();
    for key in section.options() {
        if let Some(value) = items.get(&key) {
            out.push_str(&key);
            out.push(' ');
            out.push(delimiter);
            out.push(' ');
            out.push_str(value);
            out.push('\n');
        }
    }
    out.push('\n');
}

fn section_object(section: &Section) -> serde_json::Value {
    let items = section.items();
    let mut object = serde_json::Map::new();
    for key in section.options() {
        if let Some(value) = items.get(&key) {
            object.insert(key, serde_json::Value::String(value.clone()));
        }
    }
    serde_json::Value::Object(object)
}
