//! # calver
//!
//! A library for compiling calendar-versioning (CalVer) formats, and for parsing, rendering, and
//! ordering versions against them.
//!
//! A project describes its version scheme with a *format* such as `YYYY.0M.MICRO`. This crate
//! compiles the format into a [`Grammar`], parses concrete version strings like `2024.01.3` into
//! immutable [`Version`] values, renders them back to canonical text, and orders them.
//!
//! ## Examples
//!
//! Parse a version in one go:
//!
//! ```
//! let version = calver::parse("YYYY.MINOR.MICRO", "2021.5.3").unwrap();
//! assert_eq!(2021, version.year_value());
//! assert_eq!(Some(5), version.minor_value());
//! assert_eq!("2021.5.3", version.to_string());
//! ```
//!
//! Or, compile the format once and reuse it:
//!
//! ```
//! use calver::prelude::*;
//!
//! let grammar = Grammar::compile("YYYY.MINOR").unwrap();
//! let a = grammar.parse_version("2021.5").unwrap();
//! let b = grammar.parse_version("2021.6").unwrap();
//! let c = grammar.parse_version("2022.0").unwrap();
//! assert!(a < b && b < c);
//! ```
//!
//! Get the smallest version of a format:
//!
//! ```
//! let default = calver::default_for("YYYY.0M.MICRO").unwrap();
//! assert_eq!("2000.01.0", default.to_string());
//! ```
//!
//! ## Format keywords
//!
//! Keywords are separated by `.`, `_`, or `-`. The same delimiters separate values in a version
//! string, and any one of them matches any other.
//!
//! | Keyword | Example | Values | Description |
//! |---|---|---|---|
//! | `YYYY` | `2021` | `2000`–`9999` | Full year. |
//! | `YY` | `21` | `0`–`999` | Short year, no zero-padding. |
//! | `0Y` | `06` | `01`–`99` | Short year, zero-padded to 2 digits. |
//! | `MM` | `9` | `1`–`12` | Month. |
//! | `0M` | `09` | `01`–`12` | Month, zero-padded to 2 digits. |
//! | `WW` | `7` | `1`–`52` | Week of the year. |
//! | `0W` | `07` | `01`–`52` | Week of the year, zero-padded to 2 digits. |
//! | `DD` | `3` | `1`–`31` | Day of the month. |
//! | `0D` | `03` | `01`–`31` | Day of the month, zero-padded to 2 digits. |
//! | `MINOR` | `5` | `0`, `1`, ... | A counter, no zero-padding. |
//! | `MICRO` | `3` | `0`, `1`, ... | A counter, no zero-padding. |
//! | *anything else* | `beta` | letters, digits, `-` | The modifier: all text after the keywords above. Its value must start with a letter or `-`. |
//!
//! Keywords must appear in this order:
//!
//! 1. exactly one year
//! 2. optionally a month, optionally followed by a day, *or* a week (months and days never mix
//!    with weeks)
//! 3. optionally `MINOR`, `MICRO`, or `MINOR` then `MICRO`
//! 4. optionally a modifier
//!
//! Calendar values are checked against their ranges but not validated as real dates: `2021.2.31`
//! is accepted for `YYYY.MM.DD`. No date is ever read from the clock; all values come from the
//! version strings given.
//!
//! ## Prelude
//!
//! calver provides a prelude module for convenience. Use it with:
//!
//! ```
//! use calver::prelude::*;
//! ```
#![warn(missing_docs)]

mod error;
mod grammar;
mod token;
mod version;

pub use crate::error::{CalVerError, GrammarError, MatchError};
pub use crate::grammar::{Grammar, Slot};
pub use crate::token::{Channel, TokenKind};
pub use crate::version::Version;

/// Compiles a format string into a [`Grammar`]. See [`Grammar::compile`].
///
/// # Errors
///
/// Returns a [`GrammarError`] if the format breaks one of the ordering rules.
pub fn compile(format: &str) -> Result<Grammar, GrammarError> {
    Grammar::compile(format)
}

/// Compiles `format` and parses `version` with it.
///
/// # Errors
///
/// - If the format does not compile, returns [`CalVerError::Grammar`].
/// - If the version does not match, returns [`CalVerError::Match`].
pub fn parse(format: &str, version: &str) -> Result<Version, CalVerError> {
    Ok(Grammar::compile(format)?.parse_version(version)?)
}

/// Returns the smallest canonical version of `format`. See [`Grammar::default_version`].
///
/// This doubles as a self-consistency check of a format: it must compile, and its own default
/// must parse back.
///
/// # Errors
///
/// Returns a [`CalVerError`] if the format does not compile or its default does not parse.
pub fn default_for(format: &str) -> Result<Version, CalVerError> {
    Ok(Grammar::compile(format)?.default_version()?)
}

/// Returns whether `version` is a valid version of `format`. An invalid format yields `false`.
pub fn is_valid(format: &str, version: &str) -> bool {
    parse(format, version).is_ok()
}

/// A convenience module appropriate for glob imports (`use calver::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::CalVerError;
    #[doc(no_inline)]
    pub use crate::Channel;
    #[doc(no_inline)]
    pub use crate::Grammar;
    #[doc(no_inline)]
    pub use crate::GrammarError;
    #[doc(no_inline)]
    pub use crate::MatchError;
    #[doc(no_inline)]
    pub use crate::Slot;
    #[doc(no_inline)]
    pub use crate::TokenKind;
    #[doc(no_inline)]
    pub use crate::Version;
}
