//! strataconf CLI library
//!
//! This module exposes the CLI main function so embedders can bundle the
//! binary behavior.

mod cli;

pub use cli::run;
