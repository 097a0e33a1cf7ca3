//! strataconf-core: Layered INI-style configuration library
//!
//! This crate parses INI-style documents into a queryable [`Config`]:
//! bracketed section headers, `key = value` option lines, a distinguished
//! default section whose options back every other section's lookups, and
//! `%(name)s` placeholder interpolation resolved through an ordered,
//! overriding scope chain.
//!
//! # Example
//!
//! ```rust
//! use strataconf_core::Config;
//!
//! let ini = "\
//! [DEFAULT]
//! base_dir = /srv
//!
//! [server]
//! pid_file = %(base_dir)s/server.pid
//! ";
//!
//! let config = Config::parse(ini).unwrap();
//! assert_eq!(config.get("server", "base_dir").unwrap(), "/srv");
//! assert_eq!(
//!     config.get_interpolated("server", "pid_file").unwrap(),
//!     "/srv/server.pid"
//! );
//! ```

pub mod chainmap;
pub mod error;
pub mod interpolation;
pub mod section;

mod config;
mod parser;

pub use chainmap::{ChainMap, Dict};
pub use config::{
    BoolConverter, Config, ConfigOptions, Converters, FloatConverter, IntConverter,
    InterpolatorFactory, DEFAULT_SECTION,
};
pub use error::{Error, ErrorKind, Result};
pub use interpolation::{Interpolator, MAX_EXPANSION_PASSES};
pub use section::Section;
