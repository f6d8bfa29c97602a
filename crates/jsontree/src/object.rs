//! The object container and its typed accessor layer.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use num_bigint::BigInt;

use crate::array::Array;
use crate::error::Error;
use crate::number::{BigDecimal, Number};
use crate::render::quote;
use crate::value::Value;

/// A string-keyed JSON object.
///
/// Keys are unique; inserting an existing key overwrites. Iteration order
/// is the keys' sort order, not insertion order, which keeps rendering
/// deterministic for identical content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: BTreeMap<String, Value>,
}

/// Three-way result of a key lookup: the key may be absent, present with a
/// JSON `null`, or present with a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Absent,
    Null,
    Value(&'a Value),
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Insert, failing with a structural error if the key already exists.
    pub fn insert_once(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(occupied) => Err(Error::structural(format!(
                "Duplicate key {}.",
                quote(occupied.key())
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(value.into());
                Ok(())
            }
        }
    }

    /// Insert unless the value is `None` (absent stays absent).
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<Value>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn opt(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Distinguish "absent", "present with `null`" and "present with a
    /// value" for one key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        match self.entries.get(key) {
            None => Lookup::Absent,
            Some(Value::Null) => Lookup::Null,
            Some(value) => Lookup::Value(value),
        }
    }

    /// Whether the key is absent or holds a JSON `null`.
    #[must_use]
    pub fn is_null(&self, key: &str) -> bool {
        !matches!(self.lookup(key), Lookup::Value(_))
    }

    /// Accumulate values under one key: an absent key stores the value
    /// itself, a second value turns the entry into an array, further
    /// values append.
    pub fn accumulate(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.remove(&key) {
            None => {
                // An array accumulated as the first value still nests.
                if let Value::Array(array) = value {
                    let mut wrapper = Array::new();
                    wrapper.push(Value::Array(array));
                    self.entries.insert(key, Value::Array(wrapper));
                } else {
                    self.entries.insert(key, value);
                }
            }
            Some(Value::Array(mut array)) => {
                array.push(value);
                self.entries.insert(key, Value::Array(array));
            }
            Some(existing) => {
                let mut array = Array::new();
                array.push(existing);
                array.push(value);
                self.entries.insert(key, Value::Array(array));
            }
        }
        self
    }

    /// Append to the array stored under `key`, creating it when absent;
    /// a non-array entry is a type error.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), Error> {
        let key = key.into();
        match self.entries.remove(&key) {
            None => {
                let mut array = Array::new();
                array.push(value);
                self.entries.insert(key, Value::Array(array));
                Ok(())
            }
            Some(Value::Array(mut array)) => {
                array.push(value);
                self.entries.insert(key, Value::Array(array));
                Ok(())
            }
            Some(existing) => {
                let message = format!("Object[{}] is not an array.", quote(&key));
                self.entries.insert(key, existing);
                Err(Error::type_error(message))
            }
        }
    }

    /// Add one to the number under `key`, starting from 1 when absent.
    /// `Int` overflows into `Long`, `Long` into `BigInt`.
    pub fn increment(&mut self, key: impl Into<String>) -> Result<(), Error> {
        let key = key.into();
        let next = match self.entries.get(&key) {
            None => Value::from(1),
            Some(Value::Number(number)) => Value::Number(match number {
                Number::Int(value) => value
                    .checked_add(1)
                    .map_or_else(|| Number::Long(i64::from(*value) + 1), Number::Int),
                Number::Long(value) => value.checked_add(1).map_or_else(
                    || Number::BigInt(BigInt::from(*value) + 1),
                    Number::Long,
                ),
                Number::BigInt(value) => Number::BigInt(value.clone() + 1),
                Number::Double(value) => Number::Double(value + 1.0),
                Number::BigDecimal(value) => Number::BigDecimal(value.plus_one()),
            }),
            Some(_) => {
                return Err(Error::type_error(format!(
                    "Unable to increment Object[{}].",
                    quote(&key)
                )));
            }
        };
        self.entries.insert(key, next);
        Ok(())
    }

    /// The value under `key`, or a range error naming the key.
    pub fn get(&self, key: &str) -> Result<&Value, Error> {
        self.opt(key)
            .ok_or_else(|| Error::range(format!("Object[{}] not found.", quote(key))))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, Error> {
        let value = self.get(key)?;
        value
            .coerce_bool()
            .ok_or_else(|| mismatch(key, "a boolean"))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, Error> {
        let value = self.get(key)?;
        value
            .coerce_f64()
            .ok_or_else(|| mismatch(key, "a number"))
    }

    pub fn get_f32(&self, key: &str) -> Result<f32, Error> {
        let value = self.get(key)?;
        value
            .coerce_f32()
            .ok_or_else(|| mismatch(key, "a number"))
    }

    /// Strict: numbers truncate, strings must be plain integer literals.
    pub fn get_i32(&self, key: &str) -> Result<i32, Error> {
        match self.get(key)? {
            Value::Number(number) => Ok(number.to_i32()),
            Value::String(text) => text
                .parse()
                .map_err(|_| mismatch(key, "a number")),
            _ => Err(mismatch(key, "a number")),
        }
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, Error> {
        match self.get(key)? {
            Value::Number(number) => Ok(number.to_i64()),
            Value::String(text) => text
                .parse()
                .map_err(|_| mismatch(key, "a number")),
            _ => Err(mismatch(key, "a number")),
        }
    }

    pub fn get_number(&self, key: &str) -> Result<Number, Error> {
        let value = self.get(key)?;
        value
            .coerce_number()
            .ok_or_else(|| mismatch(key, "a number"))
    }

    /// Strict: the value's text form must be an integer literal, so a
    /// double or decimal with a fraction fails rather than truncates.
    pub fn get_big_int(&self, key: &str) -> Result<BigInt, Error> {
        let value = self.get(key)?;
        match value {
            Value::Number(Number::BigInt(big)) => Ok(big.clone()),
            Value::Number(Number::Int(int)) => Ok(BigInt::from(*int)),
            Value::Number(Number::Long(long)) => Ok(BigInt::from(*long)),
            _ => value
                .coerce_string()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| mismatch(key, "a big integer")),
        }
    }

    pub fn get_big_decimal(&self, key: &str) -> Result<BigDecimal, Error> {
        let value = self.get(key)?;
        match value {
            Value::Number(Number::BigDecimal(decimal)) => Ok(decimal.clone()),
            _ => value
                .coerce_string()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| mismatch(key, "a big decimal")),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<&str, Error> {
        match self.get(key)? {
            Value::String(text) => Ok(text),
            _ => Err(mismatch(key, "a string")),
        }
    }

    pub fn get_array(&self, key: &str) -> Result<&Array, Error> {
        match self.get(key)? {
            Value::Array(array) => Ok(array),
            _ => Err(mismatch(key, "an array")),
        }
    }

    pub fn get_object(&self, key: &str) -> Result<&Object, Error> {
        match self.get(key)? {
            Value::Object(object) => Ok(object),
            _ => Err(mismatch(key, "an object")),
        }
    }

    #[must_use]
    pub fn opt_bool(&self, key: &str) -> Option<bool> {
        self.opt(key)?.coerce_bool()
    }

    #[must_use]
    pub fn opt_f64(&self, key: &str) -> Option<f64> {
        self.opt(key)?.coerce_f64()
    }

    #[must_use]
    pub fn opt_f32(&self, key: &str) -> Option<f32> {
        self.opt(key)?.coerce_f32()
    }

    /// Lenient: decimal strings truncate toward zero.
    #[must_use]
    pub fn opt_i32(&self, key: &str) -> Option<i32> {
        self.opt(key)?.coerce_i32()
    }

    #[must_use]
    pub fn opt_i64(&self, key: &str) -> Option<i64> {
        self.opt(key)?.coerce_i64()
    }

    #[must_use]
    pub fn opt_number(&self, key: &str) -> Option<Number> {
        self.opt(key)?.coerce_number()
    }

    #[must_use]
    pub fn opt_big_int(&self, key: &str) -> Option<BigInt> {
        self.opt(key)?.coerce_big_int()
    }

    #[must_use]
    pub fn opt_big_decimal(&self, key: &str) -> Option<BigDecimal> {
        self.opt(key)?.coerce_big_decimal()
    }

    /// Any non-null scalar coerces to its text form.
    #[must_use]
    pub fn opt_string(&self, key: &str) -> Option<String> {
        self.opt(key)?.coerce_string()
    }

    #[must_use]
    pub fn opt_array(&self, key: &str) -> Option<&Array> {
        self.opt(key)?.as_array()
    }

    #[must_use]
    pub fn opt_object(&self, key: &str) -> Option<&Object> {
        self.opt(key)?.as_object()
    }
}

fn mismatch(key: &str, target: &str) -> Error {
    Error::type_error(format!("Object[{}] is not {target}.", quote(key)))
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, Value)> for Object {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
