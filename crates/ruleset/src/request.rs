//! Request-parameter adapter.
//!
//! Binds a [`Validator`] to the parameters of one request: a query string
//! or a urlencoded form body. Bracketed keys nest, so `user[name]=Al`
//! is reachable as `user.name` and `tags[]=a&tags[]=b` becomes a list.
//!
//! The adapter registers the request's input encoding as the default
//! `encoding` argument of the `string` rule. Rule sets that name an
//! encoding explicitly still win.
//!
//! ```
//! use nebula_ruleset::request::RequestParams;
//! use nebula_ruleset::RuleSet;
//!
//! let validator = RequestParams::from_query("user[name]=Al&tags[]=a&tags[]=b")
//!     .into_validator();
//!
//! let rules = RuleSet::from_json(r#"{
//!     "user.name": {"string": {"min_length": 2}},
//!     "tags": {"array": {"count": 2}}
//! }"#).unwrap();
//!
//! assert!(validator.success(&rules));
//! ```

use std::borrow::Cow;

use serde_json::{Map, Value};
use url::{Url, form_urlencoded};

use crate::args::RuleArgs;
use crate::rules::DEFAULT_ENCODING;
use crate::validator::Validator;

/// Where request parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// The URL query string.
    Query,
    /// A submitted `application/x-www-form-urlencoded` body.
    Form,
}

/// Parameters of one request, ready to validate.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    source: ParamSource,
    params: Value,
    input_encoding: String,
}

impl RequestParams {
    /// Wraps already-decoded parameters.
    pub fn new(source: ParamSource, params: Value) -> Self {
        Self {
            source,
            params,
            input_encoding: DEFAULT_ENCODING.to_owned(),
        }
    }

    /// Parses a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::new(
            ParamSource::Query,
            parse_pairs(form_urlencoded::parse(query.as_bytes())),
        )
    }

    /// Parses the query string of `url`.
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parses a urlencoded form body.
    pub fn from_form(body: &[u8]) -> Self {
        Self::new(ParamSource::Form, parse_pairs(form_urlencoded::parse(body)))
    }

    /// Parses a urlencoded form body, taking the input encoding from the
    /// `charset` parameter of its `Content-Type` header when present.
    pub fn from_form_with_content_type(body: &[u8], content_type: &str) -> Self {
        let params = Self::from_form(body);
        match charset(content_type) {
            Some(encoding) => params.with_input_encoding(encoding),
            None => params,
        }
    }

    /// Sets the encoding the request's text was submitted in.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_input_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.input_encoding = encoding.into();
        self
    }

    /// Where the parameters came from.
    pub fn source(&self) -> ParamSource {
        self.source
    }

    /// The decoded parameters.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Encoding used as the `string` rule's default.
    pub fn input_encoding(&self) -> &str {
        &self.input_encoding
    }

    /// Builds a validator over the parameters.
    pub fn into_validator(self) -> Validator {
        tracing::debug!(
            source = ?self.source,
            encoding = %self.input_encoding,
            "binding validator to request parameters"
        );
        Validator::new(self.params).with_rule_defaults(
            "string",
            RuleArgs::new().with("encoding", self.input_encoding),
        )
    }
}

/// Extracts the `charset` parameter of a media type.
fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    })
}

// ============================================================================
// BRACKET KEYS
// ============================================================================

/// Deepest bracket nesting a key may have; deeper keys are dropped.
const MAX_NESTING: usize = 64;

/// Builds nested data from decoded `key=value` pairs.
///
/// Later pairs overwrite earlier ones at the same key, except for `[]`
/// segments, which append. Keys nested deeper than 64 brackets are
/// ignored.
pub fn parse_pairs<'a, I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
{
    let mut root = Value::Object(Map::new());
    for (key, value) in pairs {
        match key_segments(&key) {
            Some(segments) => assign(&mut root, &segments, value.into_owned()),
            None => tracing::debug!(
                max_nesting = MAX_NESTING,
                "dropping request parameter nested too deeply"
            ),
        }
    }
    root
}

/// Splits `a[b][]` into `a`, `b` and an append marker (`None`).
///
/// Returns `None` when the key nests deeper than [`MAX_NESTING`].
fn key_segments(key: &str) -> Option<Vec<Option<&str>>> {
    let Some(open) = key.find('[').filter(|&i| i > 0) else {
        return Some(vec![Some(key)]);
    };

    let mut segments = vec![Some(&key[..open])];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        if segments.len() > MAX_NESTING {
            return None;
        }
        let name = &inner[..close];
        segments.push((!name.is_empty()).then_some(name));
        rest = &inner[close + 1..];
    }

    if segments.len() == 1 {
        // No complete bracket pair: the key is literal.
        return Some(vec![Some(key)]);
    }
    Some(segments)
}

fn assign(root: &mut Value, segments: &[Option<&str>], value: String) {
    let mut node = root;
    for segment in segments {
        let next = match segment {
            None => append_slot(node),
            Some(key) => key_slot(node, key),
        };
        let Some(next) = next else {
            return;
        };
        node = next;
    }
    *node = Value::String(value);
}

/// Appends an empty slot to `node`, turning scalars into a list.
fn append_slot(node: &mut Value) -> Option<&mut Value> {
    if !matches!(node, Value::Array(_) | Value::Object(_)) {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(items) => {
            items.push(Value::Null);
            items.last_mut()
        }
        Value::Object(map) => {
            let key = next_index(map).to_string();
            Some(map.entry(key).or_insert(Value::Null))
        }
        _ => None,
    }
}

/// Slot under `key`, turning `node` into a map first if needed.
fn key_slot<'v>(node: &'v mut Value, key: &str) -> Option<&'v mut Value> {
    if !node.is_object() {
        *node = Value::Object(into_map(std::mem::take(node)));
    }
    node.as_object_mut()
        .map(|map| map.entry(key).or_insert(Value::Null))
}

/// One past the largest integer key of `map`, or 0 when it has none.
fn next_index(map: &Map<String, Value>) -> u64 {
    map.keys()
        .filter_map(|key| key.parse::<u64>().ok().filter(|n| n.to_string() == *key))
        .max()
        .map_or(0, |n| n.saturating_add(1))
}

/// Lists become maps keyed by index; scalars are dropped.
fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleOutcome, RuleSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("name", Some(vec![Some("name")]))]
    #[case("user[name]", Some(vec![Some("user"), Some("name")]))]
    #[case("tags[]", Some(vec![Some("tags"), None]))]
    #[case("a[b][][c]", Some(vec![Some("a"), Some("b"), None, Some("c")]))]
    #[case("a[b", Some(vec![Some("a[b")]))]
    #[case("[x]", Some(vec![Some("[x]")]))]
    #[case("a[b]tail", Some(vec![Some("a"), Some("b")]))]
    fn splits_bracket_keys(#[case] key: &str, #[case] expected: Option<Vec<Option<&str>>>) {
        assert_eq!(key_segments(key), expected);
    }

    #[test]
    fn deep_keys_are_capped() {
        let at_limit = format!("a{}", "[]".repeat(MAX_NESTING));
        assert_eq!(key_segments(&at_limit).map(|s| s.len()), Some(MAX_NESTING + 1));

        let too_deep = format!("a{}", "[]".repeat(MAX_NESTING + 1));
        assert_eq!(key_segments(&too_deep), None);
    }

    #[test]
    fn very_deep_key_is_dropped_without_overflow() {
        let query = format!("a{}=x&b=y", "[]".repeat(10_000));
        let params = RequestParams::from_query(&query);
        assert_eq!(params.params(), &json!({"b": "y"}));
    }

    #[test]
    fn key_at_nesting_limit_is_kept() {
        let query = format!("a{}=x", "[k]".repeat(MAX_NESTING));
        let params = RequestParams::from_query(&query);
        let path = std::iter::once("a")
            .chain(std::iter::repeat_n("k", MAX_NESTING))
            .collect::<Vec<_>>()
            .join(".");
        assert_eq!(crate::path::get(params.params(), &path), Some(&json!("x")));
    }

    #[test]
    fn append_after_explicit_index_does_not_overwrite() {
        let params = RequestParams::from_query("a[1]=x&a[]=y");
        assert_eq!(params.params(), &json!({"a": {"1": "x", "2": "y"}}));

        let params = RequestParams::from_query("a[k]=x&a[]=y&a[]=z");
        assert_eq!(params.params(), &json!({"a": {"k": "x", "0": "y", "1": "z"}}));
    }

    #[test]
    fn parses_nested_query() {
        let params = RequestParams::from_query("?user[name]=Al&user[age]=15&tags[]=a&tags[]=b&q=x%20y");
        assert_eq!(params.source(), ParamSource::Query);
        assert_eq!(
            params.params(),
            &json!({
                "user": {"name": "Al", "age": "15"},
                "tags": ["a", "b"],
                "q": "x y"
            })
        );
    }

    #[test]
    fn later_pairs_overwrite() {
        let params = RequestParams::from_query("a=1&a=2");
        assert_eq!(params.params(), &json!({"a": "2"}));
    }

    #[test]
    fn named_key_after_list_keeps_items() {
        let params = RequestParams::from_query("a[]=x&a[k]=y");
        assert_eq!(params.params(), &json!({"a": {"0": "x", "k": "y"}}));
    }

    #[test]
    fn scalar_replaced_by_nested_key() {
        let params = RequestParams::from_query("a=1&a[b]=2");
        assert_eq!(params.params(), &json!({"a": {"b": "2"}}));
    }

    #[test]
    fn reads_url_query() {
        let url = Url::parse("https://example.com/search?q=rust&page=2").unwrap();
        let params = RequestParams::from_url(&url);
        assert_eq!(params.params(), &json!({"q": "rust", "page": "2"}));
    }

    #[rstest]
    #[case("application/x-www-form-urlencoded; charset=ISO-8859-1", Some("ISO-8859-1"))]
    #[case("application/x-www-form-urlencoded;CHARSET=\"utf-8\"", Some("utf-8"))]
    #[case("application/x-www-form-urlencoded", None)]
    #[case("text/plain; charset=", None)]
    fn reads_charset(#[case] content_type: &str, #[case] expected: Option<&str>) {
        assert_eq!(charset(content_type), expected);
    }

    #[test]
    fn form_body_takes_encoding_from_content_type() {
        let params = RequestParams::from_form_with_content_type(
            b"name=abc",
            "application/x-www-form-urlencoded; charset=ISO-8859-1",
        );
        assert_eq!(params.source(), ParamSource::Form);
        assert_eq!(params.input_encoding(), "ISO-8859-1");
    }

    #[test]
    fn input_encoding_is_the_string_default() {
        // "héllo" is 5 scalar values but 6 bytes.
        let validator = RequestParams::from_query("name=h%C3%A9llo")
            .with_input_encoding("ISO-8859-1")
            .into_validator();

        let byte_count = RuleSet::from_json(r#"{"name": {"string": {"length": 6}}}"#).unwrap();
        assert!(validator.success(&byte_count));

        let explicit = RuleSet::from_json(
            r#"{"name": {"string": {"length": 5, "encoding": "UTF-8"}}}"#,
        )
        .unwrap();
        assert!(validator.success(&explicit));
    }

    #[test]
    fn default_encoding_counts_characters() {
        let validator = RequestParams::from_query("name=h%C3%A9llo").into_validator();
        assert_eq!(
            validator.check_path("name", "string", &RuleArgs::new().with("length", 5)),
            RuleOutcome::Pass
        );
        assert!(!validator.registry().is_custom("string"));
    }
}
