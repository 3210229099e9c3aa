/// Errors that occur when compiling a format string into a [`Grammar`](crate::Grammar).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum GrammarError {
    /// The format string is empty or only whitespace.
    #[error("Format should not be blank")]
    BlankFormat,

    /// The first token of the format is not one of the year keywords.
    #[error("Format `{format}` should start with one of `YYYY`, `YY`, or `0Y`")]
    InvalidYear {
        /// The offending format string
        format: String,
    },

    /// A month keyword was found, but the format also contains a week keyword.
    #[error("Format `{format}` has a month, so it cannot also have a week (`WW` or `0W`)")]
    MonthWeekConflict {
        /// The offending format string
        format: String,
    },

    /// A week keyword was found, but the format also contains a month keyword.
    #[error("Format `{format}` has a week, so it cannot also have a month (`MM` or `0M`)")]
    WeekMonthConflict {
        /// The offending format string
        format: String,
    },

    /// A week keyword was found, but the format also contains a day keyword.
    #[error("Format `{format}` has a week, so it cannot also have a day (`DD` or `0D`)")]
    WeekDayConflict {
        /// The offending format string
        format: String,
    },

    /// `MICRO` appears twice in a row.
    #[error("Format `{format}` should not repeat `MICRO`")]
    MicroDuplicate {
        /// The offending format string
        format: String,
    },

    /// `MINOR` follows `MICRO`.
    #[error("Format `{format}` should place `MINOR` before `MICRO`")]
    MicroThenMinor {
        /// The offending format string
        format: String,
    },

    /// `MINOR` appears twice in a row.
    #[error("Format `{format}` should not repeat `MINOR`")]
    MinorDuplicate {
        /// The offending format string
        format: String,
    },

    /// The synthesized matching pattern could not be compiled.
    #[error("Pattern `{pattern}` synthesized from format `{format}` is invalid: {reason}")]
    InvalidPattern {
        /// The offending format string
        format: String,
        /// The synthesized regular expression
        pattern: String,
        /// Why the regex engine rejected it
        reason: String,
    },
}

/// Errors that occur when parsing a version string against a [`Grammar`](crate::Grammar).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum MatchError {
    /// The version string is empty or only whitespace.
    #[error("Version should not be blank")]
    BlankVersion,

    /// The version string does not match the grammar.
    #[error("Version `{version}` should match format `{format}`")]
    Mismatch {
        /// The offending version string
        version: String,
        /// The format string it was matched against
        format: String,
    },

    /// A captured numeric value does not fit in a `u64`.
    #[error("Value `{value}` in version `{version}` is too large")]
    ValueOutOfRange {
        /// The captured text
        value: String,
        /// The version string it was captured from
        version: String,
    },
}

/// Union of [`GrammarError`] and [`MatchError`], returned by the one-shot helpers that both
/// compile a format and parse a version.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum CalVerError {
    /// Compiling the format failed.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// Parsing the version failed.
    #[error(transparent)]
    Match(#[from] MatchError),
}
