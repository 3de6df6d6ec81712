//! Dot-delimited access into nested data.
//!
//! `user.address.zip` resolves through successive map levels. A segment
//! that parses as a non-negative integer also indexes into a list, so
//! `items.0.name` reaches the first element of `items`.
//!
//! ```
//! use nebula_ruleset::path;
//! use serde_json::json;
//!
//! let data = json!({"user": {"tags": ["a", "b"]}});
//! assert_eq!(path::get(&data, "user.tags.1"), Some(&json!("b")));
//! assert_eq!(path::get(&data, "user.name"), None);
//! ```

use serde_json::{Map, Value};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Reads the value at `path`.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not a container. A present `null` is returned as `Some(&Value::Null)`.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(SEPARATOR)
        .try_fold(root, |node, segment| child(node, segment))
}

/// Returns `true` when `path` resolves to a value (including `null`).
pub fn has(root: &Value, path: &str) -> bool {
    get(root, path).is_some()
}

/// Writes `value` at `path`, creating intermediate maps as needed.
///
/// A missing intermediate segment, or one holding a non-container value,
/// is replaced by an empty map. Lists are descended only through an
/// in-range index; at the leaf a list also accepts its length, which
/// appends.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let mut segments = path.split(SEPARATOR).peekable();
    let mut node: &mut Value = root;

    while let Some(segment) = segments.next() {
        let is_leaf = segments.peek().is_none();
        let index = segment.parse::<usize>().ok();

        let list_slot = match (&*node, index) {
            (Value::Array(items), Some(i)) if i < items.len() => Some(i),
            (Value::Array(items), Some(i)) if is_leaf && i == items.len() => Some(i),
            _ => None,
        };

        if let Some(i) = list_slot {
            let Value::Array(items) = node else {
                return;
            };
            if is_leaf {
                if i == items.len() {
                    items.push(value);
                } else {
                    items[i] = value;
                }
                return;
            }
            node = &mut items[i];
            if !is_container(node) {
                *node = Value::Object(Map::new());
            }
            continue;
        }

        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };

        if is_leaf {
            map.insert(segment.to_owned(), value);
            return;
        }

        let next = map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !is_container(next) {
            *next = Value::Object(Map::new());
        }
        node = next;
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
