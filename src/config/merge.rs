//! Deep merge of key-value trees
//!
//! The merge runs on each format's own table type so values only one
//! format can express (TOML datetimes, YAML non-string keys or `.nan`)
//! survive a save untouched.

use crate::error::{Result, StarterError};

/// A key-value table from one of the supported document models
pub trait MergeTable: Sized {
    /// Key type of the table
    type Key;
    /// Value type stored in the table
    type Value;

    /// Consume the table into its entries, in order
    fn into_entries(self) -> Vec<(Self::Key, Self::Value)>;

    /// Mutable slot for `key`, if present
    fn slot(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    /// Insert or replace `key`
    fn put(&mut self, key: Self::Key, value: Self::Value);

    /// Human-readable key for error messages
    fn key_label(key: &Self::Key) -> String;

    /// Whether `value` is the model's null
    fn is_null(value: &Self::Value) -> bool;

    /// Short name of the value's kind
    fn kind(value: &Self::Value) -> &'static str;

    /// The nested table held by `value`, if it holds one
    fn as_table_mut(value: &mut Self::Value) -> Option<&mut Self>;

    /// Unwrap a table value, handing anything else back
    fn from_value(value: Self::Value) -> Result<Self, Self::Value>;

    /// Wrap the table as a value
    fn into_value(self) -> Self::Value;
}

/// Merge `src` into `dst`, overlay keys winning
///
/// - null overlay values are skipped
/// - nested trees are merged recursively
/// - sequences and scalars replace the destination value wholesale
/// - keys only present in `dst` are left alone
///
/// # Errors
///
/// Returns a merge error when one side holds a tree and the other a
/// non-null non-tree value at the same key. `dst` may already contain
/// the keys merged before the conflicting one.
#[inline]
pub fn deep_merge<M: MergeTable>(dst: &mut M, src: M) -> Result<()> {
    merge_at(dst, src, "")
}

fn merge_at<M: MergeTable>(dst: &mut M, src: M, prefix: &str) -> Result<()> {
    for (key, incoming) in src.into_entries() {
        if M::is_null(&incoming) {
            continue;
        }

        let label = M::key_label(&key);
        let key_path = if prefix.is_empty() {
            label
        } else {
            format!("{prefix}.{label}")
        };

        let Some(slot) = dst.slot(&key) else {
            dst.put(key, incoming);
            continue;
        };

        match M::from_value(incoming) {
            Ok(nested) => {
                if let Some(existing) = M::as_table_mut(slot) {
                    merge_at(existing, nested, &key_path)?;
                } else if M::is_null(slot) {
                    *slot = nested.into_value();
                } else {
                    return Err(StarterError::merge(format!(
                        "cannot merge table into {} at '{key_path}'",
                        M::kind(slot)
                    )));
                }
            }
            Err(value) => {
                if M::as_table_mut(slot).is_some() {
                    return Err(StarterError::merge(format!(
                        "cannot replace table at '{key_path}' with {}",
                        M::kind(&value)
                    )));
                }
                *slot = value;
            }
        }
    }

    Ok(())
}

impl MergeTable for serde_json::Map<String, serde_json::Value> {
    type Key = String;
    type Value = serde_json::Value;

    fn into_entries(self) -> Vec<(String, serde_json::Value)> {
        self.into_iter().collect()
    }

    fn slot(&mut self, key: &String) -> Option<&mut serde_json::Value> {
        self.get_mut(key)
    }

    fn put(&mut self, key: String, value: serde_json::Value) {
        self.insert(key, value);
    }

    fn key_label(key: &String) -> String {
        key.clone()
    }

    fn is_null(value: &serde_json::Value) -> bool {
        value.is_null()
    }

    fn kind(value: &serde_json::Value) -> &'static str {
        use serde_json::Value;
        match *value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "sequence",
            Value::Object(_) => "table",
        }
    }

    fn as_table_mut(value: &mut serde_json::Value) -> Option<&mut Self> {
        value.as_object_mut()
    }

    fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(other),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self)
    }
}

impl MergeTable for toml::Table {
    type Key = String;
    type Value = toml::Value;

    fn into_entries(self) -> Vec<(String, toml::Value)> {
        self.into_iter().collect()
    }

    fn slot(&mut self, key: &String) -> Option<&mut toml::Value> {
        self.get_mut(key)
    }

    fn put(&mut self, key: String, value: toml::Value) {
        self.insert(key, value);
    }

    fn key_label(key: &String) -> String {
        key.clone()
    }

    // TOML has no null
    fn is_null(_value: &toml::Value) -> bool {
        false
    }

    fn kind(value: &toml::Value) -> &'static str {
        value.type_str()
    }

    fn as_table_mut(value: &mut toml::Value) -> Option<&mut Self> {
        value.as_table_mut()
    }

    fn from_value(value: toml::Value) -> Result<Self, toml::Value> {
        match value {
            toml::Value::Table(table) => Ok(table),
            other => Err(other),
        }
    }

    fn into_value(self) -> toml::Value {
        toml::Value::Table(self)
    }
}

impl MergeTable for serde_yaml::Mapping {
    type Key = serde_yaml::Value;
    type Value = serde_yaml::Value;

    fn into_entries(self) -> Vec<(serde_yaml::Value, serde_yaml::Value)> {
        self.into_iter().collect()
    }

    fn slot(&mut self, key: &serde_yaml::Value) -> Option<&mut serde_yaml::Value> {
        self.get_mut(key)
    }

    fn put(&mut self, key: serde_yaml::Value, value: serde_yaml::Value) {
        self.insert(key, value);
    }

    fn key_label(key: &serde_yaml::Value) -> String {
        match key.as_str() {
            Some(text) => text.to_owned(),
            None => serde_yaml::to_string(key)
                .map(|text| text.trim_end().to_owned())
                .unwrap_or_default(),
        }
    }

    fn is_null(value: &serde_yaml::Value) -> bool {
        value.is_null()
    }

    fn kind(value: &serde_yaml::Value) -> &'static str {
        use serde_yaml::Value;
        match *value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "table",
            Value::Tagged(_) => "tagged value",
        }
    }

    fn as_table_mut(value: &mut serde_yaml::Value) -> Option<&mut Self> {
        value.as_mapping_mut()
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Value> {
        match value {
            serde_yaml::Value::Mapping(mapping) => Ok(mapping),
            other => Err(other),
        }
    }

    fn into_value(self) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(self)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn toml_table(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    fn yaml_mapping(text: &str) -> serde_yaml::Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn overlay_wins_and_unmatched_keys_survive() {
        let mut dst = obj(json!({"a": 1, "b": 2, "c": 3}));
        deep_merge(&mut dst, obj(json!({"b": 20}))).unwrap();
        assert_eq!(Value::Object(dst), json!({"a": 1, "b": 20, "c": 3}));
    }

    #[test]
    fn sequences_are_replaced_not_concatenated() {
        let mut dst = obj(json!({"list": [1, 2, 3]}));
        deep_merge(&mut dst, obj(json!({"list": [9]}))).unwrap();
        assert_eq!(Value::Object(dst), json!({"list": [9]}));
    }

    #[test]
    fn nested_trees_merge_recursively() {
        let mut dst = obj(json!({"server": {"host": "localhost", "port": 80}, "debug": false}));
        deep_merge(&mut dst, obj(json!({"server": {"port": 8080, "tls": {"on": true}}}))).unwrap();
        assert_eq!(
            Value::Object(dst),
            json!({"server": {"host": "localhost", "port": 8080, "tls": {"on": true}}, "debug": false})
        );
    }

    #[test]
    fn null_overlay_values_are_ignored() {
        let mut dst = obj(json!({"token": "abc"}));
        deep_merge(&mut dst, obj(json!({"token": null, "extra": null}))).unwrap();
        assert_eq!(Value::Object(dst), json!({"token": "abc"}));
    }

    #[test]
    fn table_may_replace_null() {
        let mut dst = obj(json!({"server": null}));
        deep_merge(&mut dst, obj(json!({"server": {"port": 1}}))).unwrap();
        assert_eq!(Value::Object(dst), json!({"server": {"port": 1}}));
    }

    #[test]
    fn scalar_over_table_is_a_merge_error() {
        let mut dst = obj(json!({"server": {"port": 1}}));
        let err = deep_merge(&mut dst, obj(json!({"server": "x"}))).unwrap_err();
        assert!(err.is_merge());
        assert!(err.to_string().contains("'server'"));
    }

    #[test]
    fn table_over_scalar_reports_nested_path() {
        let mut dst = obj(json!({"a": {"b": 5}}));
        let err = deep_merge(&mut dst, obj(json!({"a": {"b": {"c": 1}}}))).unwrap_err();
        assert!(err.is_merge());
        assert!(err.to_string().contains("'a.b'"));
    }

    #[test]
    fn toml_datetime_sibling_is_kept() {
        let mut dst = toml_table("created = 1979-05-27T07:32:00Z\n[server]\nport = 80\n");
        deep_merge(&mut dst, toml_table("[server]\nport = 8080\n")).unwrap();

        assert!(dst["created"].is_datetime());
        assert_eq!(dst["server"]["port"].as_integer(), Some(8080));
    }

    #[test]
    fn toml_conflict_names_the_key() {
        let mut dst = toml_table("[server]\nport = 80\n");
        let err = deep_merge(&mut dst, toml_table("server = \"down\"\n")).unwrap_err();
        assert!(err.to_string().contains("cannot replace table at 'server' with string"));
    }

    #[test]
    fn yaml_non_string_keys_and_nan_are_kept() {
        let mut dst = yaml_mapping("ratio: .nan\nports:\n  80: http\ncount: 1\n");
        deep_merge(&mut dst, yaml_mapping("count: 2\nports:\n  443: https\n")).unwrap();

        assert!(dst["ratio"].as_f64().unwrap().is_nan());
        assert_eq!(dst["ports"][80_usize].as_str(), Some("http"));
        assert_eq!(dst["ports"][443_usize].as_str(), Some("https"));
        assert_eq!(dst["count"].as_i64(), Some(2));
    }

    #[test]
    fn yaml_null_overlay_is_ignored() {
        let mut dst = yaml_mapping("token: abc\n");
        deep_merge(&mut dst, yaml_mapping("token: ~\n")).unwrap();
        assert_eq!(dst["token"].as_str(), Some("abc"));
    }
}
