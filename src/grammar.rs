use crate::{
    error::{GrammarError, MatchError},
    token::{contains_any, Channel, TokenKind},
    version::Version,
};
use core::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    ops::Range,
    str::FromStr,
};
use log::{debug, trace};
use regex::Regex;

/// Characters that separate tokens in a format string and values in a version string.
const DELIMITERS: &[char] = &['.', '_', '-'];

/// Regex character class matching any one of [`DELIMITERS`].
const DELIMITER_CLASS: &str = r"[\._-]";

const MONTHS: &[TokenKind] = &[TokenKind::MonthZero, TokenKind::MonthShort];
const WEEKS: &[TokenKind] = &[TokenKind::WeekZero, TokenKind::WeekShort];
const DAYS: &[TokenKind] = &[TokenKind::DayZero, TokenKind::DayShort];

/// One recognized component of a format string: what it is and where its text sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    kind: TokenKind,
    position: usize,
    end: usize,
}

impl Slot {
    /// The kind of token that fills this slot.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte offset of this slot's text in the format string.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset just past this slot's text in the format string.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The byte range of this slot's text in the format string.
    pub fn span(&self) -> Range<usize> {
        self.position..self.end
    }
}

/// Walks a format string token by token, recording slots as they're accepted.
struct Scanner<'fs> {
    format: &'fs str,
    pos: usize,
    slots: Vec<Slot>,
}

impl<'fs> Scanner<'fs> {
    fn new(format: &'fs str) -> Self {
        Self {
            format,
            pos: 0,
            slots: Vec::with_capacity(Grammar::MAX_SLOTS),
        }
    }

    /// All text from the cursor on.
    fn rest(&self) -> &'fs str {
        self.format.get(self.pos..).unwrap_or_default()
    }

    /// The text from the cursor up to the next delimiter.
    fn peek(&self) -> &'fs str {
        let rest = self.rest();
        let end = rest.find(DELIMITERS).unwrap_or(rest.len());
        &rest[..end]
    }

    /// The keyword under the cursor, if the token there is exactly one.
    fn peek_kind(&self) -> Option<TokenKind> {
        TokenKind::from_keyword(self.peek())
    }

    /// Records `kind` at the cursor and steps over it and the delimiter that follows.
    fn accept(&mut self, kind: TokenKind) {
        let len = kind.keyword().len();
        trace!("slot {} at {}", kind, self.pos);
        self.slots.push(Slot {
            kind,
            position: self.pos,
            end: self.pos + len,
        });
        self.pos += len + 1;
    }

    /// Records everything from the cursor on as a single modifier slot. Nothing is recorded if
    /// only whitespace remains.
    fn accept_modifier(&mut self) {
        let rest = self.rest();
        if rest.trim().is_empty() {
            return;
        }
        trace!("modifier slot `{}` at {}", rest, self.pos);
        self.slots.push(Slot {
            kind: TokenKind::Modifier,
            position: self.pos,
            end: self.format.len(),
        });
        self.pos = self.format.len();
    }
}

fn build_regex(format: &str, pattern: String) -> Result<Regex, GrammarError> {
    Regex::new(&pattern).map_err(|err| GrammarError::InvalidPattern {
        format: format.to_owned(),
        reason: err.to_string(),
        pattern,
    })
}

/// A compiled format: the ordered slots found in a format string together with an anchored regex
/// that matches versions of that format.
///
/// Grammars are created with [`Grammar::compile`] (or [`crate::compile`]) and used to parse
/// version strings with [`Grammar::parse_version`].
///
/// A format is a sequence of keywords separated by `.`, `_`, or `-`:
///
/// 1. a year: `YYYY`, `YY`, or `0Y`
/// 2. optionally, a month (`MM`, `0M`) with an optional day (`DD`, `0D`) right after it, *or* a
///    week (`WW`, `0W`)
/// 3. optionally, `MINOR`, `MICRO`, or `MINOR` then `MICRO`
/// 4. optionally, any trailing text, which becomes the modifier
///
/// ```
/// use calver::prelude::*;
///
/// let grammar = Grammar::compile("YYYY.0M.MICRO").unwrap();
/// let version = grammar.parse_version("2024.01.3").unwrap();
/// assert_eq!(Some(1), version.month_value());
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    format: String,
    slots: Vec<Slot>,
    regex: Regex,
}

impl Grammar {
    /// Upper bound on the number of slots in any grammar.
    pub const MAX_SLOTS: usize = 7;

    /// Compiles a format string into a grammar. Leading and trailing whitespace is ignored.
    ///
    /// Whatever follows the year, month/week/day, and number keywords is taken verbatim as the
    /// modifier, without checking it for keywords. For example, `YYYY.DD` compiles to a year
    /// followed by a modifier, since a day may only follow a month.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] naming the violated rule if the format is blank, doesn't start
    /// with a year, mixes months or days with weeks, or misorders/repeats `MINOR` and `MICRO`.
    pub fn compile(format: &str) -> Result<Self, GrammarError> {
        let format = format.trim();
        if format.is_empty() {
            return Err(GrammarError::BlankFormat);
        }
        let owned = || format.to_owned();

        let mut scanner = Scanner::new(format);

        match scanner.peek_kind() {
            Some(year) if year.channel() == Channel::Year => scanner.accept(year),
            _ => return Err(GrammarError::InvalidYear { format: owned() }),
        }

        match scanner.peek_kind() {
            Some(month) if MONTHS.contains(&month) => {
                if contains_any(format, WEEKS) {
                    return Err(GrammarError::MonthWeekConflict { format: owned() });
                }
                scanner.accept(month);
                if let Some(day) = scanner.peek_kind().filter(|kind| DAYS.contains(kind)) {
                    scanner.accept(day);
                }
            }
            Some(week) if WEEKS.contains(&week) => {
                if contains_any(format, MONTHS) {
                    return Err(GrammarError::WeekMonthConflict { format: owned() });
                }
                if contains_any(format, DAYS) {
                    return Err(GrammarError::WeekDayConflict { format: owned() });
                }
                scanner.accept(week);
            }
            _ => {}
        }

        match scanner.peek_kind().filter(TokenKind::is_number) {
            Some(first) => {
                scanner.accept(first);
                // an empty token after the number slots ends the format
                if !scanner.peek().trim().is_empty() {
                    match (first, scanner.peek_kind().filter(TokenKind::is_number)) {
                        (TokenKind::Micro, Some(TokenKind::Micro)) => {
                            return Err(GrammarError::MicroDuplicate { format: owned() })
                        }
                        (TokenKind::Micro, Some(_)) => {
                            return Err(GrammarError::MicroThenMinor { format: owned() })
                        }
                        (_, Some(TokenKind::Minor)) => {
                            return Err(GrammarError::MinorDuplicate { format: owned() })
                        }
                        (_, Some(second)) => {
                            scanner.accept(second);
                            scanner.accept_modifier();
                        }
                        (_, None) => scanner.accept_modifier(),
                    }
                }
            }
            None => scanner.accept_modifier(),
        }

        let slots = scanner.slots;
        let pattern = format!(
            "^{}$",
            slots
                .iter()
                .map(|slot| slot.kind.version_pattern_group())
                .collect::<Vec<_>>()
                .join(DELIMITER_CLASS)
        );
        let regex = build_regex(format, pattern)?;

        debug!(
            "compiled format `{}` into slots [{}]",
            format,
            slots
                .iter()
                .map(|slot| slot.kind.channel().name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            format: format.to_owned(),
            slots,
            regex,
        })
    }

    /// The (trimmed) format string this grammar was compiled from.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The recognized slots, in format order. The first is always a year.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The anchored regex that version strings must match. It has one capture group per slot.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether this grammar has a slot for `channel`.
    pub fn has(&self, channel: Channel) -> bool {
        self.slot_index(channel).is_some()
    }

    pub(crate) fn slot_index(&self, channel: Channel) -> Option<usize> {
        self.slots.iter().position(|slot| slot.kind.channel() == channel)
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Rebuilds version text by putting each of `values` in place of its slot's text in the format.
    ///
    /// Replacement goes by slot position, so a value is never mistaken for a keyword. Text between
    /// slots is kept; anything after the last slot (such as a trailing delimiter) is not part of
    /// the grammar and is dropped.
    pub(crate) fn substitute<'v>(&self, values: impl IntoIterator<Item = &'v str>) -> String {
        let mut rendered = String::with_capacity(self.format.len());
        let mut last = 0;
        for (slot, value) in self.slots.iter().zip(values) {
            rendered.push_str(&self.format[last..slot.position]);
            rendered.push_str(value);
            last = slot.end;
        }
        rendered
    }

    /// Parses a version string with this grammar. Leading and trailing whitespace is ignored.
    ///
    /// Calendar values are range-checked per field (e.g. months `1`-`12`) but not validated as
    /// real dates, so `2021.02.31` is accepted for `YYYY.0M.0D`.
    ///
    /// # Errors
    ///
    /// - If the version string is blank, returns [`MatchError::BlankVersion`].
    /// - If the version string doesn't match, returns [`MatchError::Mismatch`].
    pub fn parse_version(&self, version: &str) -> Result<Version, MatchError> {
        Version::parse(version, self)
    }

    /// Returns the smallest canonical version of this grammar: every slot filled with the least
    /// value its kind accepts (`2000` for `YYYY`, `01` for `0M`, `0` for `MINOR`, `A` for the
    /// modifier, and so on).
    ///
    /// ```
    /// use calver::prelude::*;
    ///
    /// let grammar = Grammar::compile("YYYY.0M.MICRO").unwrap();
    /// assert_eq!("2000.01.0", grammar.default_version().unwrap().to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError`] if the synthesized text does not parse back, which would mean the
    /// grammar is inconsistent with its own default values.
    pub fn default_version(&self) -> Result<Version, MatchError> {
        let text = self.substitute(self.slots.iter().map(|slot| slot.kind.default_value()));
        trace!("default for `{}` is `{}`", self.format, text);
        Version::parse(&text, self)
    }
}

/// Grammars compiled from the same format string are identical.
impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
    }
}

impl Eq for Grammar {}

impl Hash for Grammar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.format.hash(state);
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl Display for Grammar {
    /// Display a grammar as its format string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrammarError::*;
    use itertools::Itertools;
    use rstest::*;
    use std::iter;

    fn kinds(grammar: &Grammar) -> Vec<TokenKind> {
        grammar.slots().iter().map(Slot::kind).collect()
    }

    /// All calendar prefixes a format may start with:
    ///
    /// - `<year>`
    /// - `<year>`, `<month>`
    /// - `<year>`, `<month>`, `<day>`
    /// - `<year>`, `<week>`
    #[fixture]
    fn all_valid_cal_keywords_product() -> impl Iterator<Item = Vec<&'static str>> {
        let years = || iter::once(vec!["YYYY", "YY", "0Y"]);
        let months = || iter::once(vec!["MM", "0M"]);
        let weeks = || iter::once(vec!["WW", "0W"]);
        let days = || iter::once(vec!["DD", "0D"]);

        let years_product = years().multi_cartesian_product();
        let years_months_product = years().chain(months()).multi_cartesian_product();
        let years_months_days_product = years()
            .chain(months())
            .chain(days())
            .multi_cartesian_product();
        let years_weeks_product = years().chain(weeks()).multi_cartesian_product();

        years_product
            .chain(years_months_product)
            .chain(years_months_days_product)
            .chain(years_weeks_product)
    }

    /// Every calendar prefix followed by each allowed number suffix and an optional modifier.
    #[fixture]
    fn all_valid_keywords_product(
        all_valid_cal_keywords_product: impl Iterator<Item = Vec<&'static str>>,
    ) -> impl Iterator<Item = Vec<&'static str>> {
        all_valid_cal_keywords_product.flat_map(|cal| {
            let suffixes: [&[&str]; 5] = [
                &[],
                &["MINOR"],
                &["MICRO"],
                &["MINOR", "MICRO"],
                &["MINOR", "MICRO", "MODIFIER"],
            ];
            suffixes
                .into_iter()
                .map(move |suffix| [cal.clone(), suffix.to_vec()].concat())
        })
    }

    #[rstest]
    fn test_compile_ok(all_valid_keywords_product: impl Iterator<Item = Vec<&'static str>>) {
        for keywords in all_valid_keywords_product {
            for delimiter in DELIMITERS {
                let format = keywords.join(delimiter.to_string().as_str());
                let grammar = Grammar::compile(&format);
                assert!(grammar.is_ok(), "{format}: {grammar:?}");
                let grammar = grammar.unwrap();
                assert_eq!(keywords.len(), grammar.slots().len(), "{format}");
                assert_eq!(format, grammar.to_string());
            }
        }
    }

    #[rstest]
    #[case("YYYY", &[TokenKind::YearLong])]
    #[case("YYYY.0M", &[TokenKind::YearLong, TokenKind::MonthZero])]
    #[case("0Y.0M.0D", &[TokenKind::YearZero, TokenKind::MonthZero, TokenKind::DayZero])]
    #[case("YY_WW", &[TokenKind::YearShort, TokenKind::WeekShort])]
    #[case("YYYY.MINOR.MICRO", &[TokenKind::YearLong, TokenKind::Minor, TokenKind::Micro])]
    #[case("YYYY-MICRO", &[TokenKind::YearLong, TokenKind::Micro])]
    #[case("YYYY.MM.MODIFIER", &[TokenKind::YearLong, TokenKind::MonthShort, TokenKind::Modifier])]
    #[case("YYYY.MINOR-SNAPSHOT", &[TokenKind::YearLong, TokenKind::Minor, TokenKind::Modifier])]
    #[case("YYYY.DD", &[TokenKind::YearLong, TokenKind::Modifier])] // day needs a month first
    #[case("YYYY.0M.MINOR.DD", &[TokenKind::YearLong, TokenKind::MonthZero, TokenKind::Minor, TokenKind::Modifier])]
    #[case("YYYY.MINOR.MICRO.beta.1", &[TokenKind::YearLong, TokenKind::Minor, TokenKind::Micro, TokenKind::Modifier])]
    #[case("  YYYY.0M  ", &[TokenKind::YearLong, TokenKind::MonthZero])]
    #[case("YYYY.", &[TokenKind::YearLong])]
    #[case("YYYY.MINOR..x", &[TokenKind::YearLong, TokenKind::Minor])]
    #[case("YYYY.MINOR.MICRO..x", &[TokenKind::YearLong, TokenKind::Minor, TokenKind::Micro, TokenKind::Modifier])]
    fn test_compile_slots(#[case] format: &str, #[case] expected: &[TokenKind]) {
        let grammar = Grammar::compile(format).unwrap();
        assert_eq!(expected, kinds(&grammar).as_slice());
    }

    #[test]
    fn test_slot_positions() {
        let grammar = Grammar::compile("YYYY.0M.MINOR-beta").unwrap();
        let spans = grammar.slots().iter().map(Slot::span).collect_vec();
        assert_eq!(vec![0..4, 5..7, 8..13, 14..18], spans);
    }

    #[rstest]
    #[case("", BlankFormat)]
    #[case("   ", BlankFormat)]
    #[case("MM.YYYY", InvalidYear { format: "MM.YYYY".to_string() })]
    #[case("YYY.MM", InvalidYear { format: "YYY.MM".to_string() })]
    #[case("YYYYMM", InvalidYear { format: "YYYYMM".to_string() })]
    #[case("YYYY.0M.0W", MonthWeekConflict { format: "YYYY.0M.0W".to_string() })]
    #[case("YYYY.MM.MINOR.WW", MonthWeekConflict { format: "YYYY.MM.MINOR.WW".to_string() })]
    #[case("YYYY.WW.MM", WeekMonthConflict { format: "YYYY.WW.MM".to_string() })]
    #[case("YYYY.0W.DD", WeekDayConflict { format: "YYYY.0W.DD".to_string() })]
    #[case("YYYY.MICRO.MICRO", MicroDuplicate { format: "YYYY.MICRO.MICRO".to_string() })]
    #[case("YYYY.MICRO.MINOR", MicroThenMinor { format: "YYYY.MICRO.MINOR".to_string() })]
    #[case("YYYY.MINOR.MINOR", MinorDuplicate { format: "YYYY.MINOR.MINOR".to_string() })]
    #[case("YYYY.0M.MINOR.MINOR", MinorDuplicate { format: "YYYY.0M.MINOR.MINOR".to_string() })]
    fn test_compile_err(#[case] format: &str, #[case] expected: GrammarError) {
        assert_eq!(Err(expected), Grammar::compile(format));
    }

    #[test]
    fn test_empty_token_ends_format() {
        let grammar = Grammar::compile("YYYY.MINOR..x").unwrap();
        let version = grammar.parse_version("2021.3").unwrap();
        assert_eq!(Some(3), version.minor_value());
        assert_eq!("2021.3", version.render());
        assert!(grammar.parse_version("2021.3.x").is_err());
    }

    #[test]
    fn test_build_regex_err() {
        let err = build_regex("YYYY", "^([2-9]$".to_string()).unwrap_err();
        match err {
            InvalidPattern { format, pattern, .. } => {
                assert_eq!("YYYY", format);
                assert_eq!("^([2-9]$", pattern);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pattern() {
        let grammar = Grammar::compile("YYYY.MINOR").unwrap();
        assert_eq!(r"^([2-9][0-9]{3})[\._-](0|[1-9][0-9]*)$", grammar.pattern());
        assert_eq!(grammar.slots().len(), grammar.regex().captures_len() - 1);
    }

    #[test]
    fn test_has() {
        let grammar = Grammar::compile("YYYY.0W.MICRO").unwrap();
        assert!(grammar.has(Channel::Year));
        assert!(grammar.has(Channel::Week));
        assert!(grammar.has(Channel::Micro));
        assert!(!grammar.has(Channel::Month));
        assert!(!grammar.has(Channel::Minor));
        assert!(!grammar.has(Channel::Modifier));
    }

    #[test]
    fn test_substitute_by_position() {
        // a keyword-search replacement of `YY` would also hit the value substituted for `YYYY`
        let grammar = Grammar::compile("YYYY.MM.MINOR").unwrap();
        assert_eq!("YY.MM.7", grammar.substitute(["YY", "MM", "7"]));
    }

    #[test]
    fn test_substitute_drops_trailing_delimiter() {
        let grammar = Grammar::compile("YYYY.MINOR.").unwrap();
        assert_eq!("2021.3", grammar.substitute(["2021", "3"]));
    }

    #[rstest]
    #[case("YYYY.0M.MICRO", "2000.01.0")]
    #[case("YY.MM.DD", "0.1.1")]
    #[case("0Y-0W", "01-01")]
    #[case("YYYY.MINOR.MICRO-SNAPSHOT", "2000.0.0-A")]
    #[case("YYYY_MODIFIER", "2000_A")]
    fn test_default_version(#[case] format: &str, #[case] expected: &str) {
        let grammar = Grammar::compile(format).unwrap();
        assert_eq!(expected, grammar.default_version().unwrap().to_string());
    }

    #[rstest]
    fn test_default_version_ok(
        all_valid_keywords_product: impl Iterator<Item = Vec<&'static str>>,
    ) {
        for keywords in all_valid_keywords_product {
            let grammar = Grammar::compile(&keywords.join(".")).unwrap();
            assert!(grammar.default_version().is_ok(), "{grammar}");
        }
    }

    #[test]
    fn test_eq() {
        let grammar1 = Grammar::compile("YYYY.0M").unwrap();
        let grammar2: Grammar = "YYYY.0M".parse().unwrap();
        assert_eq!(grammar1, grammar2);
    }

    #[test]
    fn test_neq() {
        let grammar1 = Grammar::compile("YYYY.0M").unwrap();
        let grammar2 = Grammar::compile("YYYY.MM").unwrap();
        assert_ne!(grammar1, grammar2);
    }
}
