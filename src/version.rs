use crate::{
    error::MatchError,
    grammar::Grammar,
    token::{Channel, TokenKind},
};
use core::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};
use log::{debug, trace};

/// A value captured for one slot of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Field {
    /// Exactly the text matched in the version string, zero-padding included.
    raw: String,

    /// The integer value, for numeric slots.
    value: Option<u64>,
}

impl Field {
    fn new(kind: TokenKind, raw: &str, version: &str) -> Result<Self, MatchError> {
        let value = if kind.is_numeric() {
            // zero-padded values drop their leading zero, but a lone `0` stays `0`
            let digits = raw.strip_prefix('0').filter(|s| !s.is_empty()).unwrap_or(raw);
            let value = digits
                .parse::<u64>()
                .map_err(|_| MatchError::ValueOutOfRange {
                    value: raw.to_owned(),
                    version: version.to_owned(),
                })?;
            Some(value)
        } else {
            None
        };
        Ok(Self {
            raw: raw.to_owned(),
            value,
        })
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        match (self.value, other.value) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.raw.cmp(&other.raw),
        }
    }
}

/// A version string parsed against a [`Grammar`].
///
/// A version has exactly the fields its grammar has slots for: a year, then optionally a month
/// (and day) or a week, optionally a minor and micro number, and optionally a modifier. Each field
/// keeps the text it was parsed from, and numeric fields also carry their integer value.
///
/// Versions are created with [`Grammar::parse_version`], [`crate::parse`], or
/// [`crate::default_for`], and are never modified afterwards.
///
/// # Ordering
///
/// Versions are totally ordered. Versions of different formats order by their format strings,
/// which is deterministic but not otherwise meaningful. Versions of the same format compare
/// numerically field by field from year to micro, and finally by the modifier text.
///
/// # Examples
///
/// ```
/// let version = calver::parse("0Y.0M.0D", "21.09.03").unwrap();
/// assert_eq!(Some("09"), version.month());
/// assert_eq!(Some(9), version.month_value());
/// assert_eq!("21.09.03", version.to_string());
///
/// let older = calver::parse("YYYY.MINOR", "2021.5").unwrap();
/// let newer = calver::parse("YYYY.MINOR", "2021.6").unwrap();
/// assert!(older < newer);
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    grammar: Grammar,

    /// One field per grammar slot, in slot order.
    fields: Vec<Field>,
}

impl Version {
    /// Parses a version string against a [`Grammar`]. See [`Grammar::parse_version`].
    pub(crate) fn parse(version: &str, grammar: &Grammar) -> Result<Self, MatchError> {
        let version = version.trim();
        if version.is_empty() {
            return Err(MatchError::BlankVersion);
        }
        let mismatch = || MatchError::Mismatch {
            version: version.to_owned(),
            format: grammar.format().to_owned(),
        };

        trace!("matching `{}` against `{}`", version, grammar.pattern());
        let captures = grammar.regex().captures(version).ok_or_else(|| {
            debug!(
                "version `{}` does not match format `{}`",
                version,
                grammar.format()
            );
            mismatch()
        })?;

        let fields = grammar
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let raw = captures.get(index + 1).ok_or_else(mismatch)?.as_str();
                Field::new(slot.kind(), raw, version)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            grammar: grammar.clone(),
            fields,
        })
    }

    /// The grammar this version was parsed with.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The format string this version was parsed with.
    pub fn format(&self) -> &str {
        self.grammar.format()
    }

    fn field(&self, channel: Channel) -> Option<&Field> {
        self.grammar
            .slot_index(channel)
            .and_then(|index| self.fields.get(index))
    }

    /// Whether this version has a value for `channel`.
    pub fn has(&self, channel: Channel) -> bool {
        self.field(channel).is_some()
    }

    /// The text of the value for `channel`, exactly as parsed.
    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.field(channel).map(|field| field.raw.as_str())
    }

    /// The integer value for `channel`. Always `None` for [`Channel::Modifier`].
    pub fn get_value(&self, channel: Channel) -> Option<u64> {
        self.field(channel).and_then(|field| field.value)
    }

    /// Whether this version has a year. Always true for a successfully parsed version.
    pub fn has_year(&self) -> bool {
        self.has(Channel::Year)
    }

    /// The year, exactly as parsed.
    pub fn year(&self) -> &str {
        // every grammar starts with a year slot
        self.get(Channel::Year).unwrap_or_default()
    }

    /// The year as an integer. For `YY` and `0Y` formats this is the short year, e.g. `21`.
    pub fn year_value(&self) -> u64 {
        self.get_value(Channel::Year).unwrap_or_default()
    }

    /// Whether this version has a month.
    pub fn has_month(&self) -> bool {
        self.has(Channel::Month)
    }

    /// The month, exactly as parsed (e.g. `09` for `0M`).
    pub fn month(&self) -> Option<&str> {
        self.get(Channel::Month)
    }

    /// The month as an integer.
    pub fn month_value(&self) -> Option<u64> {
        self.get_value(Channel::Month)
    }

    /// Whether this version has a week.
    pub fn has_week(&self) -> bool {
        self.has(Channel::Week)
    }

    /// The week, exactly as parsed.
    pub fn week(&self) -> Option<&str> {
        self.get(Channel::Week)
    }

    /// The week as an integer.
    pub fn week_value(&self) -> Option<u64> {
        self.get_value(Channel::Week)
    }

    /// Whether this version has a day.
    pub fn has_day(&self) -> bool {
        self.has(Channel::Day)
    }

    /// The day, exactly as parsed.
    pub fn day(&self) -> Option<&str> {
        self.get(Channel::Day)
    }

    /// The day as an integer.
    pub fn day_value(&self) -> Option<u64> {
        self.get_value(Channel::Day)
    }

    /// Whether this version has a minor number.
    pub fn has_minor(&self) -> bool {
        self.has(Channel::Minor)
    }

    /// The minor number, exactly as parsed.
    pub fn minor(&self) -> Option<&str> {
        self.get(Channel::Minor)
    }

    /// The minor number as an integer.
    pub fn minor_value(&self) -> Option<u64> {
        self.get_value(Channel::Minor)
    }

    /// Whether this version has a micro number.
    pub fn has_micro(&self) -> bool {
        self.has(Channel::Micro)
    }

    /// The micro number, exactly as parsed.
    pub fn micro(&self) -> Option<&str> {
        self.get(Channel::Micro)
    }

    /// The micro number as an integer.
    pub fn micro_value(&self) -> Option<u64> {
        self.get_value(Channel::Micro)
    }

    /// Whether this version has a modifier.
    pub fn has_modifier(&self) -> bool {
        self.has(Channel::Modifier)
    }

    /// The modifier text.
    pub fn modifier(&self) -> Option<&str> {
        self.get(Channel::Modifier)
    }

    /// Returns the canonical text of this version: the format string with each slot replaced by
    /// its value. Same as [`ToString::to_string`].
    pub fn render(&self) -> String {
        self.grammar.substitute(self.fields.iter().map(|field| field.raw.as_str()))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.grammar == other.grammar && self.fields == other.fields
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grammar.hash(state);
        self.fields.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Orders by format string first, then (for equal formats) by each field in slot order.
    /// Numeric fields compare as integers; the modifier compares as text.
    fn cmp(&self, other: &Self) -> Ordering {
        self.format().cmp(other.format()).then_with(|| {
            self.fields
                .iter()
                .zip(&other.fields)
                .map(|(a, b)| a.cmp_value(b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl Display for Version {
    /// Returns the rendered version string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
