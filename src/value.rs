//! Payload model for log calls.
//!
//! Anything passed to the logger is converted into a [`Value`] first. Scalars
//! render as their plain text, lists and maps render as an indented
//! `key => value` dump that is stable for identical input.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Text written to the console or a file for this payload.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => render_float(*f),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => {
                let mut out = String::new();
                self.write_dump(&mut out, 0);
                out
            }
        }
    }

    fn write_dump(&self, out: &mut String, depth: usize) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Str(s) => write_quoted(out, s),
            Value::List(items) if items.is_empty() => out.push_str("[]"),
            Value::Map(entries) if entries.is_empty() => out.push_str("[]"),
            Value::List(items) => {
                out.push_str("[\n");
                for (index, item) in items.iter().enumerate() {
                    push_indent(out, depth + 1);
                    let _ = write!(out, "{} => ", index);
                    item.write_dump(out, depth + 1);
                    out.push_str(",\n");
                }
                push_indent(out, depth);
                out.push(']');
            }
            Value::Map(entries) => {
                out.push_str("[\n");
                for (key, item) in entries {
                    push_indent(out, depth + 1);
                    write_quoted(out, key);
                    out.push_str(" => ");
                    item.write_dump(out, depth + 1);
                    out.push_str(",\n");
                }
                push_indent(out, depth);
                out.push(']');
            }
            scalar => out.push_str(&scalar.render()),
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(value.to_string()))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(value.to_string()))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<IndexMap<K, V>> for Value {
    fn from(value: IndexMap<K, V>) -> Self {
        Value::Map(
            value
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::Map(
            value
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Hash maps have no stable order, so entries are sorted by key.
impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(value: HashMap<K, V>) -> Self {
        let mut entries: Vec<(String, Value)> = value
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_directly() {
        assert_eq!(Value::from("hello").render(), "hello");
        assert_eq!(Value::from(42).render(), "42");
        assert_eq!(Value::from(-7i64).render(), "-7");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(Value::from(2.5).render(), "2.5");
        assert_eq!(Value::from(3.0).render(), "3.0");
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::from(None::<i32>).render(), "");
    }

    #[test]
    fn nested_structures_render_as_indented_dump() {
        let mut inner = IndexMap::new();
        inner.insert("retries", Value::from(3));
        inner.insert("label", Value::from("it's"));

        let mut outer = IndexMap::new();
        outer.insert("name", Value::from("conlog"));
        outer.insert("tags", Value::from(vec!["a", "b"]));
        outer.insert("options", Value::from(inner));
        outer.insert("empty", Value::List(Vec::new()));
        outer.insert("missing", Value::Null);

        let expected = "[\n\
                        \x20 'name' => 'conlog',\n\
                        \x20 'tags' => [\n\
                        \x20   0 => 'a',\n\
                        \x20   1 => 'b',\n\
                        \x20 ],\n\
                        \x20 'options' => [\n\
                        \x20   'retries' => 3,\n\
                        \x20   'label' => 'it\\'s',\n\
                        \x20 ],\n\
                        \x20 'empty' => [],\n\
                        \x20 'missing' => null,\n\
                        ]";
        assert_eq!(Value::from(outer).render(), expected);
    }

    #[test]
    fn hash_map_dump_is_stable() {
        let build = || {
            let mut map = HashMap::new();
            for (i, key) in ["zeta", "alpha", "mid", "beta"].iter().enumerate() {
                map.insert(key.to_string(), i as i64);
            }
            Value::from(map)
        };

        let first = build().render();
        for _ in 0..5 {
            assert_eq!(build().render(), first);
        }
        assert!(first.find("'alpha'").unwrap() < first.find("'zeta'").unwrap());
    }

    #[test]
    fn empty_collection_renders_brackets() {
        let empty: Vec<Value> = Vec::new();
        assert_eq!(Value::from(empty).render(), "[]");
    }
}
