use indexmap::IndexMap;
use rhai::{Array, Dynamic, Map};

use crate::value::Value;

/// Converts a script value into a log payload. Rhai maps are ordered by key,
/// so the resulting dump is stable.
pub fn to_value(value: Dynamic) -> Value {
    if value.is_unit() {
        return Value::Null;
    }
    if let Ok(b) = value.as_bool() {
        return Value::Bool(b);
    }
    if let Ok(i) = value.as_int() {
        return Value::Int(i);
    }
    if let Ok(f) = value.as_float() {
        return Value::Float(f);
    }
    if let Ok(c) = value.as_char() {
        return Value::Str(c.to_string());
    }
    if value.is_string() {
        return match value.into_immutable_string() {
            Ok(s) => Value::Str(s.to_string()),
            Err(type_name) => Value::Str(type_name.to_string()),
        };
    }
    if value.is_array() {
        return match value.into_array() {
            Ok(items) => array_to_value(items),
            Err(type_name) => Value::Str(type_name.to_string()),
        };
    }
    if value.is_map() {
        if let Some(map) = value.clone().try_cast::<Map>() {
            return map_to_value(map);
        }
    }
    Value::Str(value.to_string())
}

fn array_to_value(items: Array) -> Value {
    Value::List(items.into_iter().map(to_value).collect())
}

fn map_to_value(map: Map) -> Value {
    let entries: IndexMap<String, Value> = map
        .into_iter()
        .map(|(key, value)| (key.to_string(), to_value(value)))
        .collect();
    Value::Map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_convert_to_matching_variants() {
        assert_eq!(to_value(Dynamic::UNIT), Value::Null);
        assert_eq!(to_value(Dynamic::from(true)), Value::Bool(true));
        assert_eq!(to_value(Dynamic::from(5_i64)), Value::Int(5));
        assert_eq!(to_value(Dynamic::from(1.5_f64)), Value::Float(1.5));
        assert_eq!(to_value(Dynamic::from('x')), Value::from("x"));
        assert_eq!(to_value(Dynamic::from("text")), Value::from("text"));
    }

    #[test]
    fn nested_collections_convert_recursively() {
        let mut map = Map::new();
        map.insert("b".into(), Dynamic::from(2_i64));
        map.insert(
            "a".into(),
            Dynamic::from_array(vec![Dynamic::from(1_i64), Dynamic::from("two")]),
        );

        let value = to_value(Dynamic::from_map(map));
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(
            entries["a"],
            Value::List(vec![Value::Int(1), Value::from("two")])
        );
    }
}
