//! Error types for strataconf
//!
//! Structured errors with section/option context, the offending line
//! number where one exists, and actionable help messages.

use std::fmt;

/// Result type alias for strataconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for strataconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Line number in the input where the error occurred (1-based)
    pub line: Option<usize>,
    /// Actionable help message
    pub help: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Query or mutation targeted a non-default section that does not exist
    NoSection { section: String },
    /// Option absent from both the targeted section and the default section
    NoOption { section: String, option: String },
    /// Duplicate section header, duplicate option key in strict mode,
    /// or an explicit add of an existing section
    AlreadyExists { name: String },
    /// Attempt to add a section named identically to the default section
    InvalidSectionName { name: String },
    /// Key/value line encountered before any section header
    MissingSectionHeader { text: String },
    /// Typed getter or custom converter failed to interpret the stored string
    Conversion { option: String, message: String },
    /// Input could not be read or understood at all
    Parse { message: String },
    /// I/O error from the thin file wrappers
    Io { message: String },
}

impl Error {
    /// Create a "no section" error
    pub fn no_section(section: impl Into<String>) -> Self {
        let section = section.into();
        Self {
            kind: ErrorKind::NoSection {
                section: section.clone(),
            },
            line: None,
            help: Some(format!(
                "Add the section with add_section(\"{}\") or a [{}] header",
                section, section
            )),
        }
    }

    /// Create a "no option" error
    pub fn no_option(section: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NoOption {
                section: section.into(),
                option: option.into(),
            },
            line: None,
            help: None,
        }
    }

    /// Create an "already exists" error for a section or option name
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::AlreadyExists { name: name.into() },
            line: None,
            help: None,
        }
    }

    /// Create an "invalid section name" error
    pub fn invalid_section_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: ErrorKind::InvalidSectionName { name: name.clone() },
            line: None,
            help: Some(format!(
                "'{}' is the default section; set options on it directly instead",
                name
            )),
        }
    }

    /// Create a "missing section header" error
    pub fn missing_section_header(line: usize, text: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MissingSectionHeader { text: text.into() },
            line: Some(line),
            help: Some("Every option line must follow a [section] header".into()),
        }
    }

    /// Create a conversion error
    pub fn conversion(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Conversion {
                option: option.into(),
                message: message.into(),
            },
            line: None,
            help: None,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse {
                message: message.into(),
            },
            line: None,
            help: None,
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io {
                message: message.into(),
            },
            line: None,
            help: None,
        }
    }

    /// Add line context to the error
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::NoSection { section } => write!(f, "No section: '{}'", section)?,
            ErrorKind::NoOption { section, option } => {
                write!(f, "No option '{}' in section: '{}'", option, section)?
            }
            ErrorKind::AlreadyExists { name } => write!(f, "'{}' already exists", name)?,
            ErrorKind::InvalidSectionName { name } => {
                write!(f, "Invalid section name: '{}'", name)?
            }
            ErrorKind::MissingSectionHeader { text } => {
                write!(f, "Missing section header before: {}", text)?
            }
            ErrorKind::Conversion { option, message } => {
                write!(f, "Cannot convert '{}': {}", option, message)?
            }
            ErrorKind::Parse { message } => write!(f, "Parse error: {}", message)?,
            ErrorKind::Io { message } => write!(f, "I/O error: {}", message)?,
        }

        if let Some(line) = self.line {
            write!(f, "\n  Line: {}", line)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
