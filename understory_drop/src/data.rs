// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic data carried by drags and produced by zones.
//!
//! [`DataMap`] is a string-keyed map of [`DataValue`]s with a second, separate namespace of
//! reserved slots addressed by [`ReservedKey`]. Helper crates (for example the policy gate)
//! write their results into reserved slots so they never collide with keys chosen by the host.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A dynamically typed value stored in a [`DataMap`].
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    /// Explicit absence of a value.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<DataValue>),
    /// A nested map.
    Map(DataMap),
}

impl DataValue {
    /// Returns the string slice if this is a [`DataValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag if this is a [`DataValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`DataValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the items if this is a [`DataValue::List`].
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for [`DataValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for DataValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<DataMap> for DataValue {
    fn from(v: DataMap) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Key of a reserved slot in a [`DataMap`].
///
/// Reserved slots live apart from the string keys, so `DataMap::insert("closestEdge", ..)`
/// and a reserved key named `"closestEdge"` never overwrite each other.
/// Use a crate-qualified name to keep reserved keys from different crates apart.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ReservedKey(&'static str);

impl ReservedKey {
    /// Create a reserved key with the given name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The key's name, for diagnostics.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

/// A map of dynamic data, with a private namespace of reserved slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataMap {
    entries: BTreeMap<String, DataValue>,
    reserved: BTreeMap<ReservedKey, DataValue>,
}

impl DataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DataValue>,
    ) -> Option<DataValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DataValue::as_str)
    }

    /// Look up a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(DataValue::as_bool)
    }

    /// Look up an integer value.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(DataValue::as_int)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.entries.remove(key)
    }

    /// Returns true if `key` is present (reserved slots are not considered).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of string-keyed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no string-keyed entries and no reserved slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.reserved.is_empty()
    }

    /// Iterate string-keyed entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write a reserved slot, returning the previous value.
    pub fn insert_reserved(
        &mut self,
        key: ReservedKey,
        value: impl Into<DataValue>,
    ) -> Option<DataValue> {
        self.reserved.insert(key, value.into())
    }

    /// Read a reserved slot.
    pub fn get_reserved(&self, key: ReservedKey) -> Option<&DataValue> {
        self.reserved.get(&key)
    }

    /// Clear a reserved slot.
    pub fn remove_reserved(&mut self, key: ReservedKey) -> Option<DataValue> {
        self.reserved.remove(&key)
    }

    /// Merge `other` into `self`; entries from `other` win on conflict, in both namespaces.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
        self.reserved.extend(other.reserved);
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for DataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const EDGE: ReservedKey = ReservedKey::new("test::edge");

    #[test]
    fn reserved_slots_do_not_collide_with_string_keys() {
        let mut map = DataMap::new().with("test::edge", "caller");
        map.insert_reserved(EDGE, "top");
        assert_eq!(map.get_str("test::edge"), Some("caller"));
        assert_eq!(map.get_reserved(EDGE).and_then(DataValue::as_str), Some("top"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn merge_prefers_incoming_values() {
        let mut a = DataMap::new().with("id", "a").with("keep", true);
        let mut b = DataMap::new().with("id", "b");
        b.insert_reserved(EDGE, "left");
        a.merge(b);
        assert_eq!(a.get_str("id"), Some("b"));
        assert_eq!(a.get_bool("keep"), Some(true));
        assert!(a.get_reserved(EDGE).is_some());
    }

    #[test]
    fn empty_considers_reserved_slots() {
        let mut map = DataMap::new();
        assert!(map.is_empty());
        map.insert_reserved(EDGE, DataValue::Null);
        assert!(!map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn conversions() {
        assert_eq!(DataValue::from(Some(3_i64)), DataValue::Int(3));
        assert_eq!(DataValue::from(None::<bool>), DataValue::Null);
        assert_eq!(
            DataValue::from(vec!["a", "b"]),
            DataValue::List(vec![DataValue::from("a"), DataValue::from("b")])
        );
        let map: DataMap = [("x", 1_i64), ("y", 2_i64)].into_iter().collect();
        assert_eq!(map.get_int("y"), Some(2));
    }
}
