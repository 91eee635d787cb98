//! Unpacked values and the ordered result mapping

use rustc_hash::FxHashMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One decoded field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `a`, `A`, `Z`, `h`, `H`
    Bytes(Vec<u8>),
    /// Every integer directive, widened to `i64`
    Int(i64),
    /// Every float directive, widened to `f64`
    Float(f64),
}

impl Value {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

/// Ordered key → value result of an unpack call
///
/// Keys keep their first insertion position; writing an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct Unpacked {
    entries: Vec<(String, Value)>,
    index: FxHashMap<String, usize>,
}

impl Unpacked {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, returning the previous value
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[slot].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Unpacked {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl IntoIterator for Unpacked {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Unpacked {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Unpacked::new();
        for (k, v) in iter {
            out.insert(k.into(), v.into());
        }
        out
    }
}

impl Serialize for Unpacked {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut map = Unpacked::new();
        assert!(map.insert("1".into(), Value::Int(1)).is_none());
        map.insert("2".into(), Value::Int(2));
        let old = map.insert("1".into(), Value::Int(10));
        assert_eq!(old, Some(Value::Int(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(map.get("1"), Some(&Value::Int(10)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Int(3).as_float(), None);
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::from(&b"ab"[..]).as_bytes(), Some(&b"ab"[..]));
    }

    #[test]
    fn test_from_iterator_and_eq() {
        let a: Unpacked = vec![("x", 1i64), ("y", 2i64)].into_iter().collect();
        let b: Unpacked = vec![("x", 1i64), ("y", 2i64)].into_iter().collect();
        let c: Unpacked = vec![("y", 2i64), ("x", 1i64)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serialize_ordered_map() {
        let mut map = Unpacked::new();
        map.insert("z".into(), Value::Int(-1));
        map.insert("a".into(), Value::Bytes(b"hi".to_vec()));
        map.insert("f".into(), Value::Float(1.5));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":-1,"a":[104,105],"f":1.5}"#);
    }
}
