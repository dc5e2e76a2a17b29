//! Timestamp layouts for the built-in `DateTime` parsers.
//!
//! The `layout` tag of a timestamp field selects how its value is read:
//!
//! - absent, empty, `RFC3339` or `RFC3339Nano`: RFC 3339 (`2012-03-12T01:02:03Z`).
//! - a named alias such as `Kitchen` or `Stamp` (see [`ALIASES`]).
//! - a pattern containing `%`: a chrono strftime pattern (`%Y-%m-%d`).
//! - anything else: a reference-time layout written with the components of
//!   `Mon Jan 2 15:04:05 MST 2006` (`2006-01-02`, `15:04`, `Jan _2`).
//!
//! Components a pattern does not mention take fixed values: year 0,
//! January, day 1, midnight, UTC. The layout `2006` therefore reads `2021`
//! as `2021-01-01T00:00:00Z`.

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset};

/// Named layouts and their strftime patterns.
pub const ALIASES: &[(&str, &str)] = &[
    ("ANSIC", "%a %b %e %H:%M:%S %Y"),
    ("UnixDate", "%a %b %e %H:%M:%S %Z %Y"),
    ("RubyDate", "%a %b %d %H:%M:%S %z %Y"),
    ("RFC822", "%d %b %y %H:%M %Z"),
    ("RFC822Z", "%d %b %y %H:%M %z"),
    ("RFC850", "%A, %d-%b-%y %H:%M:%S %Z"),
    ("RFC1123", "%a, %d %b %Y %H:%M:%S %Z"),
    ("RFC1123Z", "%a, %d %b %Y %H:%M:%S %z"),
    ("Kitchen", "%I:%M%p"),
    ("Stamp", "%b %e %H:%M:%S"),
    ("StampMilli", "%b %e %H:%M:%S%.3f"),
    ("StampMicro", "%b %e %H:%M:%S%.6f"),
    ("StampNano", "%b %e %H:%M:%S%.9f"),
    ("DateTime", "%Y-%m-%d %H:%M:%S"),
    ("DateOnly", "%Y-%m-%d"),
    ("TimeOnly", "%H:%M:%S"),
];

// Longest token first wherever one token is a prefix of another.
const REFERENCE_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    ("2006", "%Y"),
    ("Z07:00", "%#z"),
    ("Z0700", "%#z"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("-07", "%#z"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
    (".999999999", "%.f"),
    (".999999", "%.f"),
    (".999", "%.f"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("002", "%j"),
    ("_2", "%e"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// How a timestamp string is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Rfc3339,
    Pattern(String),
}

impl Layout {
    /// Resolve a `layout` tag value.
    pub fn resolve(layout: Option<&str>) -> Self {
        let name = match layout {
            None | Some("" | "RFC3339" | "RFC3339Nano") => return Layout::Rfc3339,
            Some(name) => name,
        };
        if let Some((_, pattern)) = ALIASES.iter().find(|(alias, _)| *alias == name) {
            return Layout::Pattern((*pattern).to_string());
        }
        if name.contains('%') {
            return Layout::Pattern(name.to_string());
        }
        Layout::Pattern(translate_reference(name))
    }

    pub fn parse(&self, value: &str) -> ParseResult<DateTime<FixedOffset>> {
        match self {
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(value),
            Layout::Pattern(pattern) => parse_pattern(value, pattern),
        }
    }
}

/// Parse `value` with the layout named by a `layout` tag value.
pub fn parse(value: &str, layout: Option<&str>) -> ParseResult<DateTime<FixedOffset>> {
    Layout::resolve(layout).parse(value)
}

/// Translate a reference-time layout into a strftime pattern.
pub fn translate_reference(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;
    'scan: while !rest.is_empty() {
        for (token, spec) in REFERENCE_TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = after;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some('%') => out.push_str("%%"),
            Some(ch) => out.push(ch),
            None => break,
        }
        rest = chars.as_str();
    }
    out
}

/// Which date/time components a strftime pattern sets.
#[derive(Debug, Default, PartialEq)]
struct Coverage {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    minute: bool,
    second: bool,
    offset: bool,
}

impl Coverage {
    fn of(pattern: &str) -> Self {
        let mut cov = Coverage::default();
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                continue;
            }
            let mut spec = chars.next();
            while matches!(spec, Some('-' | '_' | '0' | '#' | ':' | '.' | '1'..='9')) {
                spec = chars.next();
            }
            match spec {
                Some('Y' | 'y' | 'C' | 'G' | 'g') => cov.year = true,
                Some('m' | 'b' | 'B' | 'h') => cov.month = true,
                Some('d' | 'e') => cov.day = true,
                Some('j') => cov.set_date(false),
                Some('D' | 'F' | 'x') => cov.set_date(true),
                Some('H' | 'I' | 'k' | 'l') => cov.hour = true,
                Some('M') => cov.minute = true,
                Some('S') => cov.second = true,
                Some('R') => cov.set_time(false),
                Some('T' | 'X' | 'r') => cov.set_time(true),
                Some('z') => cov.offset = true,
                Some('c') => {
                    cov.set_date(true);
                    cov.set_time(true);
                }
                Some('+' | 's') => {
                    cov.set_date(true);
                    cov.set_time(true);
                    cov.offset = true;
                }
                _ => {}
            }
        }
        cov
    }

    fn set_date(&mut self, year: bool) {
        self.year |= year;
        self.month = true;
        self.day = true;
    }

    fn set_time(&mut self, second: bool) {
        self.hour = true;
        self.minute = true;
        self.second |= second;
    }
}

fn parse_pattern(value: &str, pattern: &str) -> ParseResult<DateTime<FixedOffset>> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, value, StrftimeItems::new(pattern))?;

    let cov = Coverage::of(pattern);
    if !cov.year {
        parsed.set_year(0)?;
    }
    if !cov.month {
        parsed.set_month(1)?;
    }
    if !cov.day {
        parsed.set_day(1)?;
    }
    if !cov.hour {
        parsed.set_hour(0)?;
    }
    if !cov.minute {
        parsed.set_minute(0)?;
    }
    if !cov.second {
        parsed.set_second(0)?;
    }
    if !cov.offset {
        parsed.set_offset(0)?;
    }
    parsed.to_datetime()
}
