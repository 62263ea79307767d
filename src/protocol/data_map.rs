//! Replicated key-value payloads exchanged with the wearable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque binary attachment, such as an encoded image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    bytes: Vec<u8>,
}

impl Asset {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataValue {
    Int(i32),
    Long(i64),
    String(String),
    Asset(Asset),
}

/// Typed values by key. Keys iterate in sorted order, so equal maps compare equal
/// regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMap(BTreeMap<String, DataValue>);

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_int(&mut self, key: &str, value: i32) {
        self.0.insert(key.to_string(), DataValue::Int(value));
    }

    pub fn put_long(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_string(), DataValue::Long(value));
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), DataValue::String(value.into()));
    }

    pub fn put_asset(&mut self, key: &str, value: Asset) {
        self.0.insert(key.to_string(), DataValue::Asset(value));
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.0.get(key)? {
            DataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            DataValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            DataValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_asset(&self, key: &str) -> Option<&Asset> {
        match self.0.get(key)? {
            DataValue::Asset(v) => Some(v),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A payload stored under a path and replicated to every connected device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
    pub path: String,
    pub data_map: DataMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEventKind {
    Changed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEvent {
    pub kind: DataEventKind,
    pub item: DataItem,
}

/// A one-off message between devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub path: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut map = DataMap::new();
        map.put_int("version", 3);
        map.put_long("timestamp", 1_000_000_000_000);
        map.put_string("matchup", "abc");
        map.put_asset("logo", Asset::from_bytes(vec![1, 2]));

        assert_eq!(map.get_int("version"), Some(3));
        assert_eq!(map.get_long("timestamp"), Some(1_000_000_000_000));
        assert_eq!(map.get_string("matchup"), Some("abc"));
        assert_eq!(map.get_asset("logo").map(Asset::data), Some(&[1u8, 2][..]));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_wrong_type_is_none() {
        let mut map = DataMap::new();
        map.put_int("version", 3);
        assert_eq!(map.get_long("version"), None);
        assert_eq!(map.get_string("version"), None);
        assert!(map.contains_key("version"));
        assert!(!map.contains_key("missing"));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut a = DataMap::new();
        a.put_int("x", 1);
        a.put_string("y", "z");
        let mut b = DataMap::new();
        b.put_string("y", "z");
        b.put_int("x", 1);
        assert_eq!(a, b);
    }
}
