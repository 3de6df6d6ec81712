//! The `string` rule and character-aware length counting.
//!
//! Lengths are counted in characters of the requested encoding, not in
//! bytes: `"héllo"` is five characters under UTF-8 even though it takes six
//! bytes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::args::RuleArgs;
use crate::cache::CompileCache;
use crate::coerce::as_i64;
use crate::outcome::RuleOutcome;

/// Encoding assumed when the caller names none.
pub const DEFAULT_ENCODING: &str = "UTF-8";

static PATTERNS: LazyLock<CompileCache<Regex>> = LazyLock::new(|| CompileCache::new(512));

// ============================================================================
// ENCODING
// ============================================================================

/// How a string's length is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// One character per Unicode scalar value (UTF-8, UTF-32).
    #[default]
    Scalar,
    /// One character per UTF-16 code unit.
    Utf16,
    /// One character per byte (ASCII, ISO-8859-*, Windows-125x, 8bit).
    SingleByte,
}

impl Encoding {
    /// Resolves an encoding label, ignoring case and `-`/`_` separators.
    ///
    /// Returns `None` for labels this crate does not know how to count.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "utf8" | "utf32" | "utf32be" | "utf32le" | "ucs4" | "ucs4be" | "ucs4le" => {
                Some(Self::Scalar)
            }
            "utf16" | "utf16be" | "utf16le" | "ucs2" | "ucs2be" | "ucs2le" => Some(Self::Utf16),
            "ascii" | "usascii" | "8bit" | "binary" | "pass" | "latin1" => Some(Self::SingleByte),
            other
                if other.starts_with("iso8859")
                    || other.starts_with("windows125")
                    || other.starts_with("cp125") =>
            {
                Some(Self::SingleByte)
            }
            _ => None,
        }
    }

    /// Measures `input` in characters of this encoding.
    #[inline]
    pub fn measure(self, input: &str) -> usize {
        match self {
            Encoding::Scalar => input.chars().count(),
            Encoding::Utf16 => input.encode_utf16().count(),
            Encoding::SingleByte => input.len(),
        }
    }
}

// ============================================================================
// STRING RULE
// ============================================================================

/// Passes strings that satisfy every supplied constraint.
///
/// - `encoding`: label used for counting, default UTF-8
/// - `max_length` / `min_length` / `length`: bounds, ignored unless `> 0`
/// - `matches`: a regular expression the string must match
///
/// Unknown encodings, non-integer lengths, a non-string `matches` and an
/// invalid pattern are all indeterminate.
pub fn string(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(Value::String(input)) = value else {
        return RuleOutcome::Fail;
    };

    let encoding = match args.get_set("encoding") {
        None => Encoding::default(),
        Some(Value::String(label)) if label.is_empty() => Encoding::default(),
        Some(Value::String(label)) => match Encoding::from_label(label) {
            Some(encoding) => encoding,
            None => {
                tracing::debug!(encoding = %label, "unknown encoding for string rule");
                return RuleOutcome::Indeterminate;
            }
        },
        Some(_) => return RuleOutcome::Indeterminate,
    };
    let length = encoding.measure(input) as i64;

    let bound = |key: &str| -> Result<Option<i64>, ()> {
        match args.get_set(key) {
            None => Ok(None),
            Some(raw) => as_i64(raw).map(|n| (n > 0).then_some(n)).ok_or(()),
        }
    };
    let (Ok(max_length), Ok(min_length), Ok(exact)) =
        (bound("max_length"), bound("min_length"), bound("length"))
    else {
        return RuleOutcome::Indeterminate;
    };

    if max_length.is_some_and(|max| length > max) {
        return RuleOutcome::Fail;
    }
    if min_length.is_some_and(|min| length < min) {
        return RuleOutcome::Fail;
    }
    if exact.is_some_and(|exact| length != exact) {
        return RuleOutcome::Fail;
    }

    match args.get_set("matches") {
        None => RuleOutcome::Pass,
        Some(Value::String(pattern)) => match PATTERNS.get_or_compile(pattern, Regex::new) {
            Ok(re) => re.is_match(input).into(),
            Err(err) => {
                tracing::debug!(%pattern, error = %err, "invalid pattern for string rule");
                RuleOutcome::Indeterminate
            }
        },
        Some(_) => RuleOutcome::Indeterminate,
    }
}
