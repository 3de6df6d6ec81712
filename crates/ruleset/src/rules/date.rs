//! The `date` rule and its format-template compiler.
//!
//! A template such as `Y-m-d\TH:i:sP` is compiled into an anchored regular
//! expression by replacing each format letter with a fixed sub-pattern and
//! escaping everything else. A backslash makes the next character literal.
//!
//! | Letters | Meaning |
//! |---|---|
//! | `d j` | day of month, padded / unpadded |
//! | `D l` | weekday name, short / full |
//! | `N w` | weekday number, ISO (1–7) / zero-based (0–6) |
//! | `S` | English ordinal suffix |
//! | `z` | day of year (0–365) |
//! | `W` | ISO week number |
//! | `F M` | month name, full / short |
//! | `m n` | month number, padded / unpadded |
//! | `t` | days in month |
//! | `L` | leap-year flag |
//! | `Y y` | year, four / two digits |
//! | `a A` | meridiem, lower / upper |
//! | `g G h H` | hour: 12h / 24h, unpadded / padded |
//! | `i s` | minutes, seconds |
//! | `u v` | microseconds, milliseconds |
//! | `e T` | timezone identifier, abbreviation |
//! | `O P` | UTC offset without / with colon |
//! | `Z` | UTC offset in seconds |
//! | `c r U` | ISO 8601, RFC 2822, Unix timestamp |
//!
//! Day fragments only bound the day to 1–31. When a template carries both
//! a day and a month, the matched values are also checked against the
//! calendar, so `2024-02-30` is rejected while `2024-02-29` passes.

use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::args::RuleArgs;
use crate::cache::CompileCache;
use crate::outcome::RuleOutcome;

/// Template used when the rule gets no string `format` argument.
pub const DEFAULT_FORMAT: &str = r"Y-m-d\TH:i:sP";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static FORMATS: LazyLock<CompileCache<DateFormat>> = LazyLock::new(|| CompileCache::new(256));

// ============================================================================
// TOKENS
// ============================================================================

/// Calendar component a token captures for the post-match check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Day,
    Month,
    MonthName,
    Year,
    ShortYear,
}

impl Component {
    fn group(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::MonthName => "month_name",
            Self::Year => "year",
            Self::ShortYear => "short_year",
        }
    }
}

enum Token {
    Fragment(&'static str, Option<Component>),
    Composite(&'static str),
}

fn token(letter: char) -> Option<Token> {
    use Component::{Day, Month, MonthName, ShortYear, Year};
    use Token::{Composite, Fragment};

    let token = match letter {
        // day
        'd' => Fragment("0[1-9]|[12][0-9]|3[01]", Some(Day)),
        'D' => Fragment("Mon|Tue|Wed|Thu|Fri|Sat|Sun", None),
        'j' => Fragment("[1-9]|[12][0-9]|3[01]", Some(Day)),
        'l' => Fragment(
            "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday",
            None,
        ),
        'N' => Fragment("[1-7]", None),
        'w' => Fragment("[0-6]", None),
        'S' => Fragment("st|nd|rd|th", None),
        'z' => Fragment("36[0-5]|3[0-5][0-9]|[12][0-9]{2}|[1-9]?[0-9]", None),
        // week
        'W' => Fragment("0[1-9]|[1-4][0-9]|5[0-3]", None),
        // month
        'F' => Fragment(
            "January|February|March|April|May|June|July|August|September|October|November|December",
            Some(MonthName),
        ),
        'M' => Fragment(
            "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec",
            Some(MonthName),
        ),
        'm' => Fragment("0[1-9]|1[0-2]", Some(Month)),
        'n' => Fragment("[1-9]|1[0-2]", Some(Month)),
        't' => Fragment("2[89]|3[01]", None),
        // year
        'L' => Fragment("[01]", None),
        'Y' => Fragment("[0-9]{4}", Some(Year)),
        'y' => Fragment("[0-9]{2}", Some(ShortYear)),
        // time
        'a' => Fragment("am|pm", None),
        'A' => Fragment("AM|PM", None),
        'u' => Fragment("[0-9]{6}", None),
        'v' => Fragment("[0-9]{3}", None),
        'g' => Fragment("[1-9]|1[0-2]", None),
        'G' => Fragment("[0-9]|1[0-9]|2[0-3]", None),
        'h' => Fragment("0[1-9]|1[0-2]", None),
        'H' => Fragment("[01][0-9]|2[0-3]", None),
        'i' | 's' => Fragment("[0-5][0-9]", None),
        // timezone
        'e' => Fragment("UTC|[A-Za-z_]+(?:/[A-Za-z0-9_+-]+)+", None),
        'O' => Fragment("[+-](?:[01][0-9]|2[0-3])[0-5][0-9]", None),
        'P' => Fragment("[+-](?:[01][0-9]|2[0-3]):[0-5][0-9]", None),
        'T' => Fragment("[A-Z]{1,5}|[+-][0-9]{2}(?::?[0-9]{2})?", None),
        'Z' => Fragment("[+-]?[0-9]{1,5}", None),
        // full date/time
        'c' => Composite(r"Y-m-d\TH:i:sP"),
        'r' => Composite("D, d M Y H:i:s O"),
        'U' => Fragment("-?[0-9]+", None),
        _ => return None,
    };
    Some(token)
}

// ============================================================================
// COMPILER
// ============================================================================

/// A compiled date template.
#[derive(Debug, Clone)]
pub struct DateFormat {
    template: String,
    regex: Regex,
}

impl DateFormat {
    /// Compiles `template` into an anchored pattern.
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        let mut pattern = String::from(r"\A(?:");
        let mut captured = Vec::new();
        push_template(template, &mut pattern, &mut captured);
        pattern.push_str(r")\z");

        Ok(Self {
            template: template.to_owned(),
            regex: Regex::new(&pattern)?,
        })
    }

    /// Returns the source template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled pattern.
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether `input` matches the template and names a real calendar day.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex
            .captures(input)
            .is_some_and(|caps| is_calendar_date(&caps))
    }
}

fn push_template(template: &str, pattern: &mut String, captured: &mut Vec<Component>) {
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let literal = chars.next().unwrap_or('\\');
            pattern.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
            continue;
        }

        match token(c) {
            Some(Token::Composite(expansion)) => push_template(expansion, pattern, captured),
            Some(Token::Fragment(fragment, Some(component))) if !captured.contains(&component) => {
                captured.push(component);
                pattern.push_str("(?P<");
                pattern.push_str(component.group());
                pattern.push('>');
                pattern.push_str(fragment);
                pattern.push(')');
            }
            Some(Token::Fragment(fragment, _)) => {
                pattern.push_str("(?:");
                pattern.push_str(fragment);
                pattern.push(')');
            }
            None => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
}

/// Rejects impossible day/month combinations.
///
/// Without a year the check assumes a leap year; two-digit years are read
/// as 20xx.
fn is_calendar_date(caps: &Captures<'_>) -> bool {
    let number = |component: Component| {
        caps.name(component.group())
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };

    let Some(day) = number(Component::Day) else {
        return true;
    };
    let month = number(Component::Month).or_else(|| {
        let name = caps.name(Component::MonthName.group())?.as_str();
        MONTHS
            .iter()
            .position(|m| m.starts_with(name))
            .map(|i| i as u32 + 1)
    });
    let Some(month) = month else {
        return true;
    };
    let year = number(Component::Year)
        .map(|y| y as i32)
        .or_else(|| number(Component::ShortYear).map(|y| 2000 + y as i32))
        .unwrap_or(2000);

    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

// ============================================================================
// DATE RULE
// ============================================================================

/// Passes strings that fully match the `format` template.
///
/// A missing or non-string `format` falls back to [`DEFAULT_FORMAT`].
pub fn date(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(Value::String(input)) = value else {
        return RuleOutcome::Fail;
    };

    let template = match args.get_set("format") {
        Some(Value::String(template)) => template.as_str(),
        _ => DEFAULT_FORMAT,
    };

    match compiled(template) {
        Ok(format) => format.is_match(input).into(),
        Err(err) => {
            tracing::debug!(%template, error = %err, "date template failed to compile");
            RuleOutcome::Indeterminate
        }
    }
}

/// Returns the process-wide compiled form of `template`.
pub fn compiled(template: &str) -> Result<Arc<DateFormat>, regex::Error> {
    FORMATS.get_or_compile(template, DateFormat::compile)
}
