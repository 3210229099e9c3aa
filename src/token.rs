use core::fmt::{self, Display};

/// The calendar or numeric component a token fills in a version.
///
/// Channels are declared in comparison order: when two versions share a format, they are compared
/// channel by channel from `Year` down to `Modifier`, skipping channels the format doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// The year.
    Year,
    /// The month of the year.
    Month,
    /// The week of the year.
    Week,
    /// The day of the month.
    Day,
    /// The first counter.
    Minor,
    /// The second counter.
    Micro,
    /// Free-form trailing text.
    Modifier,
}

impl Channel {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Channel::Year => "year",
            Channel::Month => "month",
            Channel::Week => "week",
            Channel::Day => "day",
            Channel::Minor => "minor",
            Channel::Micro => "micro",
            Channel::Modifier => "modifier",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized keyword in a format string, or the trailing modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `YYYY` - 2006, 2016, 2106
    YearLong,
    /// `YY` - 6, 16, 106
    YearShort,
    /// `0Y` - 06, 16, 99
    YearZero,
    /// `MM` - 1, 2 ... 11, 12
    MonthShort,
    /// `0M` - 01, 02 ... 11, 12
    MonthZero,
    /// `WW` - 1, 2 ... 51, 52
    WeekShort,
    /// `0W` - 01, 02 ... 51, 52
    WeekZero,
    /// `DD` - 1, 2 ... 30, 31
    DayShort,
    /// `0D` - 01, 02 ... 30, 31
    DayZero,
    /// `MINOR` - 0, 1, 2 ...
    Minor,
    /// `MICRO` - 0, 1, 2 ...
    Micro,
    /// Any trailing text - `beta`, `RC1`, `-SNAPSHOT`
    Modifier,
}

/// Every kind that is spelled with a fixed keyword. [`TokenKind::Modifier`] is absent: it is
/// whatever text remains once the numeric region of a format ends.
pub(crate) static KEYWORDS: &[TokenKind] = &[
    TokenKind::YearLong,
    TokenKind::YearShort,
    TokenKind::YearZero,
    TokenKind::MonthShort,
    TokenKind::MonthZero,
    TokenKind::WeekShort,
    TokenKind::WeekZero,
    TokenKind::DayShort,
    TokenKind::DayZero,
    TokenKind::Minor,
    TokenKind::Micro,
];

impl TokenKind {
    /// Looks up the kind spelled exactly as `text`. Only whole keywords match.
    pub fn from_keyword(text: &str) -> Option<Self> {
        KEYWORDS.iter().copied().find(|kind| kind.keyword() == text)
    }

    /// The literal keyword used in format strings. For [`TokenKind::Modifier`], this is the
    /// conventional placeholder `MODIFIER`, though any trailing text acts as one.
    pub fn keyword(&self) -> &'static str {
        match self {
            TokenKind::YearLong => "YYYY",
            TokenKind::YearShort => "YY",
            TokenKind::YearZero => "0Y",
            TokenKind::MonthShort => "MM",
            TokenKind::MonthZero => "0M",
            TokenKind::WeekShort => "WW",
            TokenKind::WeekZero => "0W",
            TokenKind::DayShort => "DD",
            TokenKind::DayZero => "0D",
            TokenKind::Minor => "MINOR",
            TokenKind::Micro => "MICRO",
            TokenKind::Modifier => "MODIFIER",
        }
    }

    /// The regex fragment matching a value of this kind in a version string. Fragments contain no
    /// capture groups of their own.
    pub(crate) fn version_pattern(&self) -> &'static str {
        match self {
            TokenKind::YearLong => r"[2-9][0-9]{3}",
            TokenKind::YearShort => r"0|[1-9][0-9]{0,2}",
            TokenKind::YearZero => r"0[1-9]|[1-9][0-9]",
            TokenKind::MonthShort => r"[1-9]|1[0-2]",
            TokenKind::MonthZero => r"0[1-9]|1[0-2]",
            TokenKind::WeekShort => r"[1-9]|[1-4][0-9]|5[0-2]",
            TokenKind::WeekZero => r"0[1-9]|[1-4][0-9]|5[0-2]",
            TokenKind::DayShort => r"[1-9]|[1-2][0-9]|3[0-1]",
            TokenKind::DayZero => r"0[1-9]|[1-2][0-9]|3[0-1]",
            TokenKind::Minor | TokenKind::Micro => r"0|[1-9][0-9]*",
            TokenKind::Modifier => r"[a-zA-Z-][0-9a-zA-Z-]*",
        }
    }

    pub(crate) fn version_pattern_group(&self) -> String {
        format!("({})", self.version_pattern())
    }

    /// The smallest value this kind accepts, used to synthesize default versions.
    pub(crate) fn default_value(&self) -> &'static str {
        match self {
            TokenKind::YearLong => "2000",
            TokenKind::YearShort => "0",
            TokenKind::YearZero => "01",
            TokenKind::MonthShort | TokenKind::WeekShort | TokenKind::DayShort => "1",
            TokenKind::MonthZero | TokenKind::WeekZero | TokenKind::DayZero => "01",
            TokenKind::Minor | TokenKind::Micro => "0",
            TokenKind::Modifier => "A",
        }
    }

    /// The channel a value of this kind fills.
    pub fn channel(&self) -> Channel {
        match self {
            TokenKind::YearLong | TokenKind::YearShort | TokenKind::YearZero => Channel::Year,
            TokenKind::MonthShort | TokenKind::MonthZero => Channel::Month,
            TokenKind::WeekShort | TokenKind::WeekZero => Channel::Week,
            TokenKind::DayShort | TokenKind::DayZero => Channel::Day,
            TokenKind::Minor => Channel::Minor,
            TokenKind::Micro => Channel::Micro,
            TokenKind::Modifier => Channel::Modifier,
        }
    }

    /// Whether values of this kind carry an integer.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, TokenKind::Modifier)
    }

    pub(crate) fn is_number(&self) -> bool {
        matches!(self, TokenKind::Minor | TokenKind::Micro)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Whether `format` contains the keyword of any of `kinds` anywhere in its text.
pub(crate) fn contains_any(format: &str, kinds: &[TokenKind]) -> bool {
    kinds.iter().any(|kind| format.contains(kind.keyword()))
}
