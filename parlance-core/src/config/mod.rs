//! Driver configuration
//!
//! Board-agnostic settings for timing, bus geometry and voice defaults.
//! [`parse_config`] reads them from a small TOML document.

pub mod parse;
pub mod types;

pub use parse::{parse_config, parse_into, ParseError, ParseErrorKind};
pub use types::*;
