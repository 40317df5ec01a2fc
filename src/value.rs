//! The [JsonValue] document model.
//!
//! Every JSON document is held as a tree of [JsonValue]s. Navigation comes in two flavours:
//! - indexing (`value["key"]`, `value[3]`) never fails. Shared lookups hand back a reference to
//!   an immutable, empty sentinel when nothing is found, mutable lookups create whatever is
//!   missing (re-typing the receiver if they have to).
//! - the `at` family is checked, and returns a range [Error](crate::errors::Error) when the
//!   receiver is the wrong kind of container or the key/index isn't there.
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::errors::{Details, JsonResult};
use crate::range_error;

/// Ordered sequence of values
pub type Array = Vec<JsonValue>;

/// Key-ordered map of values
pub type Map = BTreeMap<String, JsonValue>;

/// Shared sentinel handed out by lookups that don't find anything
pub(crate) static EMPTY_VALUE: JsonValue = JsonValue::Null;
static EMPTY_STRING: String = String::new();
static EMPTY_ARRAY: Array = Vec::new();
static EMPTY_MAP: Map = BTreeMap::new();

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    /// Canonical null value
    #[default]
    Null,
    /// Canonical boolean value
    Bool(bool),
    /// Floating point numeric value
    Float(f64),
    /// Integer numeric value
    Int(i64),
    /// Canonical string value
    String(String),
    /// Array of values
    Array(Array),
    /// Map of values, always iterated in ascending key order
    Map(Map),
}

/// The variant currently held by a [JsonValue]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Float,
    Int,
    String,
    Array,
    Map,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Float => "float",
            Kind::Int => "int",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Map => "map",
        };
        write!(f, "{}", name)
    }
}

impl JsonValue {
    /// The [Kind] of the currently held variant
    pub fn kind(&self) -> Kind {
        match self {
            JsonValue::Null => Kind::Null,
            JsonValue::Bool(_) => Kind::Bool,
            JsonValue::Float(_) => Kind::Float,
            JsonValue::Int(_) => Kind::Int,
            JsonValue::String(_) => Kind::String,
            JsonValue::Array(_) => Kind::Array,
            JsonValue::Map(_) => Kind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, JsonValue::Float(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, JsonValue::Int(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, JsonValue::Map(_))
    }

    /// Drop whatever is held and go back to [JsonValue::Null]
    pub fn clear(&mut self) {
        *self = JsonValue::Null;
    }

    /// Get the underlying map, first replacing the receiver with an empty map if it currently
    /// holds anything else
    pub fn ensure_map(&mut self) -> &mut Map {
        if !self.is_map() {
            *self = JsonValue::Map(Map::new());
        }
        match self {
            JsonValue::Map(map) => map,
            _ => unreachable!("receiver was coerced to a map"),
        }
    }

    /// Get the underlying array, first replacing the receiver with an empty array if it
    /// currently holds anything else
    pub fn ensure_array(&mut self) -> &mut Array {
        if !self.is_array() {
            *self = JsonValue::Array(Array::new());
        }
        match self {
            JsonValue::Array(array) => array,
            _ => unreachable!("receiver was coerced to an array"),
        }
    }

    /// Checked lookup by key, index or [Pointer](crate::pointer::Pointer)
    pub fn at<S: Selector>(&self, selector: S) -> JsonResult<&JsonValue> {
        selector.select(self)
    }

    /// Checked mutable lookup by key, index or [Pointer](crate::pointer::Pointer). Never creates
    /// anything.
    pub fn at_mut<S: Selector>(&mut self, selector: S) -> JsonResult<&mut JsonValue> {
        selector.select_mut(self)
    }

    /// Remove a map entry or array element. Returns `false` (and leaves the value alone) when
    /// there is nothing to remove.
    pub fn erase<E: Erase>(&mut self, target: E) -> bool {
        target.erase_from(self)
    }

    /// Coerce the value into a `T`. Never fails: mismatched variants produce the zero or empty
    /// value for `T`.
    pub fn get<'v, T: Extract<'v>>(&'v self) -> T {
        T::extract(self)
    }
}

/// Something capable of locating a child within a [JsonValue], used by the `at` family
pub trait Selector {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue>;
    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue>;
}

impl Selector for str {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        match value {
            JsonValue::Map(map) => match map.get(self) {
                Some(v) => Ok(v),
                None => range_error!(Details::KeyNotFound(self.to_string())),
            },
            _ => range_error!(Details::NotAMap),
        }
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        match value {
            JsonValue::Map(map) => match map.get_mut(self) {
                Some(v) => Ok(v),
                None => range_error!(Details::KeyNotFound(self.to_string())),
            },
            _ => range_error!(Details::NotAMap),
        }
    }
}

impl Selector for String {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        self.as_str().select(value)
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        self.as_str().select_mut(value)
    }
}

impl Selector for usize {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        match value {
            JsonValue::Array(array) => match array.get(*self) {
                Some(v) => Ok(v),
                None => range_error!(Details::IndexOutOfRange(*self)),
            },
            _ => range_error!(Details::NotAnArray),
        }
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        match value {
            JsonValue::Array(array) => match array.get_mut(*self) {
                Some(v) => Ok(v),
                None => range_error!(Details::IndexOutOfRange(*self)),
            },
            _ => range_error!(Details::NotAnArray),
        }
    }
}

impl<T: Selector + ?Sized> Selector for &T {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        (**self).select(value)
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        (**self).select_mut(value)
    }
}

/// Something that can be removed from a [JsonValue] container
pub trait Erase {
    fn erase_from(&self, value: &mut JsonValue) -> bool;
}

impl Erase for str {
    fn erase_from(&self, value: &mut JsonValue) -> bool {
        match value {
            JsonValue::Map(map) => map.remove(self).is_some(),
            _ => false,
        }
    }
}

impl Erase for String {
    fn erase_from(&self, value: &mut JsonValue) -> bool {
        self.as_str().erase_from(value)
    }
}

impl Erase for usize {
    fn erase_from(&self, value: &mut JsonValue) -> bool {
        match value {
            JsonValue::Array(array) if *self < array.len() => {
                array.remove(*self);
                true
            }
            _ => false,
        }
    }
}

impl<T: Erase + ?Sized> Erase for &T {
    fn erase_from(&self, value: &mut JsonValue) -> bool {
        (**self).erase_from(value)
    }
}

/// Total conversion out of a [JsonValue]. Scalars are copied out, strings and containers are
/// borrowed (falling back to shared empty sentinels).
pub trait Extract<'v>: Sized {
    fn extract(value: &'v JsonValue) -> Self;
}

impl<'v> Extract<'v> for bool {
    fn extract(value: &'v JsonValue) -> Self {
        match value {
            JsonValue::Bool(b) => *b,
            _ => false,
        }
    }
}

macro_rules! extract_float {
    ($($t: ty),*) => {
        $(impl<'v> Extract<'v> for $t {
            fn extract(value: &'v JsonValue) -> Self {
                match value {
                    JsonValue::Float(f) => *f as $t,
                    JsonValue::Int(i) => *i as $t,
                    _ => 0.0,
                }
            }
        })*
    };
}

extract_float!(f32, f64);

/// Floats are rounded half away from zero, then saturated into the target type. Ints saturate
/// too.
macro_rules! extract_integral {
    ($($t: ty),*) => {
        $(impl<'v> Extract<'v> for $t {
            fn extract(value: &'v JsonValue) -> Self {
                match value {
                    JsonValue::Bool(b) => *b as $t,
                    JsonValue::Int(i) => <$t>::try_from(*i)
                        .unwrap_or(if *i < 0 { <$t>::MIN } else { <$t>::MAX }),
                    JsonValue::Float(f) => f.round() as $t,
                    _ => 0,
                }
            }
        })*
    };
}

extract_integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'v> Extract<'v> for &'v str {
    fn extract(value: &'v JsonValue) -> Self {
        match value {
            JsonValue::String(s) => s,
            _ => &EMPTY_STRING,
        }
    }
}

impl<'v> Extract<'v> for &'v String {
    fn extract(value: &'v JsonValue) -> Self {
        match value {
            JsonValue::String(s) => s,
            _ => &EMPTY_STRING,
        }
    }
}

impl<'v> Extract<'v> for &'v Array {
    fn extract(value: &'v JsonValue) -> Self {
        match value {
            JsonValue::Array(a) => a,
            _ => &EMPTY_ARRAY,
        }
    }
}

impl<'v> Extract<'v> for &'v Map {
    fn extract(value: &'v JsonValue) -> Self {
        match value {
            JsonValue::Map(m) => m,
            _ => &EMPTY_MAP,
        }
    }
}

impl Index<&str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &JsonValue {
        match self {
            JsonValue::Map(map) => map.get(key).unwrap_or(&EMPTY_VALUE),
            _ => &EMPTY_VALUE,
        }
    }
}

impl IndexMut<&str> for JsonValue {
    fn index_mut(&mut self, key: &str) -> &mut JsonValue {
        self.ensure_map().entry(key.to_string()).or_default()
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &JsonValue {
        match self {
            JsonValue::Array(array) => array.get(index).unwrap_or(&EMPTY_VALUE),
            _ => &EMPTY_VALUE,
        }
    }
}

impl IndexMut<usize> for JsonValue {
    /// Pads the array with nulls when `index` lies beyond its end
    fn index_mut(&mut self, index: usize) -> &mut JsonValue {
        let array = self.ensure_array();
        if index >= array.len() {
            array.resize(index + 1, JsonValue::Null);
        }
        &mut array[index]
    }
}

impl From<()> for JsonValue {
    fn from(_: ()) -> Self {
        JsonValue::Null
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Float(value)
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        JsonValue::Float(value as f64)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Int(value)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Int(value as i64)
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Int(value as i64)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Array> for JsonValue {
    fn from(value: Array) -> Self {
        JsonValue::Array(value)
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        JsonValue::Map(value)
    }
}

impl FromIterator<JsonValue> for JsonValue {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(String, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        JsonValue::Map(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Array, JsonValue, Kind, Map};
    use crate::errors::Details;
    use test_case::test_case;

    fn sample() -> JsonValue {
        let mut value = JsonValue::default();
        value["n"] = JsonValue::Float(-12345.6);
        value["list"][0] = JsonValue::Int(32);
        value["list"][1] = JsonValue::from("ABC");
        value["b"] = JsonValue::Bool(true);
        value["c"] = JsonValue::Null;
        value
    }

    #[test]
    fn default_should_be_null() {
        assert_eq!(JsonValue::default(), JsonValue::Null);
        assert_eq!(JsonValue::default().kind(), Kind::Null);
    }

    #[test_case(JsonValue::Null, JsonValue::Null, true; "nulls")]
    #[test_case(JsonValue::Int(1), JsonValue::Float(1.0), false; "int and float")]
    #[test_case(JsonValue::from("a"), JsonValue::from("a"), true; "strings")]
    #[test_case(
        JsonValue::from(vec![JsonValue::Int(1), JsonValue::Null]),
        JsonValue::from(vec![JsonValue::Int(1)]),
        false;
        "arrays of different lengths"
    )]
    fn should_compare_structurally(lhs: JsonValue, rhs: JsonValue, equal: bool) {
        assert_eq!(lhs == rhs, equal)
    }

    #[test]
    fn shared_lookups_should_fall_back_to_null() {
        let value = sample();
        assert_eq!(value["missing"], JsonValue::Null);
        assert_eq!(value["list"][9], JsonValue::Null);
        assert_eq!(value["n"]["not a map"], JsonValue::Null);
        assert_eq!(value[0], JsonValue::Null);
    }

    #[test]
    fn mutable_key_lookup_should_coerce_to_map() {
        let mut value = JsonValue::Int(3);
        value["a"] = JsonValue::Bool(true);
        assert!(value.is_map());
        assert_eq!(value.get::<&Map>().len(), 1);
        assert_eq!(value["b"], JsonValue::Null);
        assert_eq!(value.get::<&Map>().len(), 1);
    }

    #[test]
    fn mutable_index_lookup_should_pad_with_nulls() {
        let mut value = JsonValue::Array(Array::new());
        value[4] = JsonValue::Int(7);
        let array = value.get::<&Array>();
        assert_eq!(array.len(), 5);
        assert!(array[..4].iter().all(JsonValue::is_null));
        assert_eq!(array[4], JsonValue::Int(7));
    }

    #[test]
    fn copies_should_be_independent() {
        let value = sample();
        let mut list = value["list"].clone();
        list[10]["add"] = JsonValue::Int(123);
        assert_eq!(list.get::<&Array>().len(), 11);
        assert!((2..10).all(|i| list[i].is_null()));
        assert_eq!(list[10]["add"], JsonValue::Int(123));
        assert_ne!(list, value["list"]);
        assert_eq!(value["list"].get::<&Array>().len(), 2);
    }

    #[test]
    fn ensure_should_be_idempotent() {
        let mut value = sample();
        value.ensure_map();
        assert_eq!(value, sample());
        value.ensure_array().push(JsonValue::Null);
        assert_eq!(value, JsonValue::Array(vec![JsonValue::Null]));
        value.ensure_array();
        assert_eq!(value.get::<&Array>().len(), 1);
    }

    #[test]
    fn should_erase_entries() {
        let mut value = sample();
        assert!(value.erase("b"));
        assert!(!value.erase("b"));
        assert!(!value.erase(0));
        assert!(value["list"].erase(0));
        assert_eq!(value["list"][0], JsonValue::from("ABC"));
        assert!(!value["list"].erase(5));
        assert!(!value["list"].erase("ABC"));
    }

    #[test]
    fn should_clear_to_null() {
        let mut value = sample();
        value.clear();
        assert!(value.is_null());
    }

    #[test]
    fn checked_lookups_should_fail_when_absent() {
        let mut value = sample();
        assert_eq!(value.at("n").unwrap(), &JsonValue::Float(-12345.6));
        assert_eq!(value.at("list").and_then(|l| l.at(1)).unwrap(), &JsonValue::from("ABC"));
        assert_eq!(
            value.at("missing").unwrap_err().details,
            Details::KeyNotFound("missing".to_string())
        );
        assert_eq!(value.at(0).unwrap_err().details, Details::NotAnArray);
        assert_eq!(value["list"].at("x").unwrap_err().details, Details::NotAMap);
        assert_eq!(value["list"].at(2).unwrap_err().details, Details::IndexOutOfRange(2));
        *value.at_mut("c").unwrap() = JsonValue::Int(1);
        assert_eq!(value["c"], JsonValue::Int(1));
        assert!(value.at_mut("d").is_err());
        assert!(value["d"].is_null());
        assert!(value.at("d").is_err());
    }

    #[test_case(JsonValue::Float(-12345.6), -12346; "negative float rounds away from zero")]
    #[test_case(JsonValue::Float(2.5), 3; "half rounds up")]
    #[test_case(JsonValue::Float(-2.5), -3; "negative half rounds down")]
    #[test_case(JsonValue::Float(2.4), 2; "below half truncates")]
    #[test_case(JsonValue::Int(42), 42; "int")]
    #[test_case(JsonValue::Bool(true), 1; "bool")]
    #[test_case(JsonValue::from("12"), 0; "string")]
    #[test_case(JsonValue::Null, 0; "null")]
    fn should_extract_integers(value: JsonValue, expected: i64) {
        assert_eq!(value.get::<i64>(), expected)
    }

    #[test_case(JsonValue::Float(1.5), 1.5; "float")]
    #[test_case(JsonValue::Int(-3), -3.0; "int")]
    #[test_case(JsonValue::Bool(true), 0.0; "bool")]
    #[test_case(JsonValue::Map(Map::new()), 0.0; "map")]
    fn should_extract_floats(value: JsonValue, expected: f64) {
        assert_eq!(value.get::<f64>(), expected)
    }

    #[test]
    fn narrowing_ints_should_saturate() {
        assert_eq!(JsonValue::Int(-1).get::<u8>(), 0);
        assert_eq!(JsonValue::Int(300).get::<u8>(), u8::MAX);
        assert_eq!(JsonValue::Int(-200).get::<i8>(), i8::MIN);
        assert_eq!(JsonValue::Int(i64::MIN).get::<u64>(), 0);
        assert_eq!(JsonValue::Int(i64::MAX).get::<i32>(), i32::MAX);
        assert_eq!(JsonValue::Int(-5).get::<isize>(), -5);
        assert_eq!(JsonValue::Float(-1.0).get::<u8>(), 0);
    }

    #[test]
    fn should_extract_bools_only_from_bools() {
        assert!(JsonValue::Bool(true).get::<bool>());
        assert!(!JsonValue::Int(1).get::<bool>());
        assert!(!JsonValue::from("true").get::<bool>());
    }

    #[test]
    fn mismatched_containers_should_yield_empty_sentinels() {
        let value = JsonValue::Int(1);
        assert_eq!(value.get::<&str>(), "");
        assert!(value.get::<&String>().is_empty());
        assert!(value.get::<&Array>().is_empty());
        assert!(value.get::<&Map>().is_empty());
        assert_eq!(JsonValue::from("abc").get::<&str>(), "abc");
    }

    #[test]
    fn should_collect_from_iterators() {
        let array: JsonValue = (1..=3).map(JsonValue::from).collect();
        assert_eq!(array[2], JsonValue::Int(3));
        let map: JsonValue = vec![("k".to_string(), JsonValue::Null)].into_iter().collect();
        assert!(map.is_map());
    }
}
