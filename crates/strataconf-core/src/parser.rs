//! Line classifier driving document construction
//!
//! The parser consumes raw text one physical line at a time, in a single
//! forward pass, and classifies each line as blank, comment, section
//! header, key/value, bare key, or continuation. Classification is
//! explicit string handling rather than regex so behavior does not depend
//! on any one engine's semantics.
//!
//! Fatal classification errors abort the whole parse; no partial document
//! is handed back.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::section::Section;

/// Which section the parser is currently filling.
enum Cursor {
    None,
    Defaults,
    Named(String),
}

fn current_section<'a>(config: &'a mut Config, cursor: &Cursor) -> Option<&'a mut Section> {
    match cursor {
        Cursor::None => None,
        Cursor::Defaults => Some(&mut config.defaults),
        Cursor::Named(name) => config.sections.get_mut(name.as_str()),
    }
}

/// Parse `text` into `config`, following `config.options`.
pub(crate) fn parse_into(config: &mut Config, text: &str) -> Result<()> {
    let opts = config.options.clone();

    let mut cursor = Cursor::None;
    // Canonical key of the last accepted option line, for continuations
    let mut current_key: Option<String> = None;
    // Blank line seen since the last accepted or continued line
    let mut blank_seen = false;
    let mut pending_blanks = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            // A blank line always ends the current continuation run
            if current_key.is_some() {
                blank_seen = true;
                pending_blanks += 1;
            }
            continue;
        }

        if opts
            .comment_prefixes
            .iter()
            .any(|p| line.starts_with(p.as_str()))
        {
            continue;
        }

        // Continuation: whitespace-led line while an option is open
        if raw.starts_with(|c: char| c.is_whitespace()) {
            if let Some(key) = current_key.clone() {
                if blank_seen && !opts.allow_empty_lines {
                    // Continuation resumed after a blank line: dropped
                    log::trace!("line {}: dropping resumed continuation", line_no);
                    continue;
                }
                let Some(section) = current_section(config, &cursor) else {
                    continue;
                };
                let mut value = section.get(&key).map(str::to_string).unwrap_or_default();
                for _ in 0..pending_blanks {
                    value.push('\n');
                }
                value.push('\n');
                value.push_str(line);
                section.add(key, value);
                blank_seen = false;
                pending_blanks = 0;
                continue;
            }
        }

        if let Some(name) = parse_section_header(line) {
            if name == opts.default_section {
                cursor = Cursor::Defaults;
            } else if config.sections.contains_key(name) {
                if opts.strict {
                    return Err(Error::already_exists(name).with_line(line_no).with_help(
                        "Strict mode rejects duplicate section headers",
                    ));
                }
                // Re-select the first-created section; later options merge in
                cursor = Cursor::Named(name.to_string());
            } else {
                log::debug!("line {}: creating section {:?}", line_no, name);
                config.sections.insert(name.to_string(), Section::new(name));
                cursor = Cursor::Named(name.to_string());
            }
            current_key = None;
            blank_seen = false;
            pending_blanks = 0;
            continue;
        }

        let delimiter_pos = line.find(|c| opts.delimiters.contains(&c));
        match delimiter_pos {
            Some(pos) if pos > 0 => {
                let key = line[..pos].trim().to_string();
                if matches!(cursor, Cursor::None) {
                    return Err(Error::missing_section_header(line_no, line));
                }
                if opts.strict && config.key_exists_anywhere(&key) {
                    return Err(Error::already_exists(&key).with_line(line_no).with_help(
                        "Strict mode rejects duplicate option keys across all sections",
                    ));
                }

                let delim_len = line[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
                let value = strip_inline_comment(&line[pos + delim_len..], &opts.inline_comment_prefixes)
                    .trim()
                    .to_string();

                let Some(section) = current_section(config, &cursor) else {
                    continue;
                };
                section.add(key.clone(), value);
                current_key = Some(key);
                blank_seen = false;
                pending_blanks = 0;
            }
            Some(_) => {
                // Delimiter in the first column leaves no key to bind
                log::trace!("line {}: no key before delimiter, skipped", line_no);
            }
            None => {
                // Bare key, only meaningful when values are optional
                if !opts.allow_no_value {
                    log::trace!("line {}: bare key without allow_no_value, skipped", line_no);
                    continue;
                }
                if matches!(cursor, Cursor::None) {
                    return Err(Error::missing_section_header(line_no, line));
                }
                if opts.strict && config.key_exists_anywhere(line) {
                    return Err(Error::already_exists(line).with_line(line_no).with_help(
                        "Strict mode rejects duplicate option keys across all sections",
                    ));
                }
                let Some(section) = current_section(config, &cursor) else {
                    continue;
                };
                section.add(line, "");
                current_key = Some(line.to_string());
                blank_seen = false;
                pending_blanks = 0;
            }
        }
    }

    Ok(())
}

/// Match `[<name>]` where the name is non-empty and contains no `]`.
fn parse_section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains(']') {
        return None;
    }
    Some(inner)
}

/// Keep only the text before the earliest inline-comment prefix.
fn strip_inline_comment<'a>(value: &'a str, prefixes: &[String]) -> &'a str {
    let cut = prefixes.iter().filter_map(|p| value.find(p.as_str())).min();
    match cut {
        Some(pos) => &value[..pos],
        None => value,
    }
}
