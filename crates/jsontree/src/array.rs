//! The array container and its typed accessor layer.

use num_bigint::BigInt;

use crate::error::Error;
use crate::number::{BigDecimal, Number};
use crate::object::Object;
use crate::value::Value;

/// An ordered, index-addressable JSON array. Order is insertion order and
/// is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    /// Replace the value at `index`, padding any gap with `Null` so the
    /// index always ends up occupied.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) {
        if index < self.items.len() {
            self.items[index] = value.into();
        } else {
            while self.items.len() < index {
                self.items.push(Value::Null);
            }
            self.items.push(value.into());
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    #[must_use]
    pub fn opt(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// The value at `index`, or a range error naming the index.
    pub fn get(&self, index: usize) -> Result<&Value, Error> {
        self.opt(index)
            .ok_or_else(|| Error::range(format!("Array[{index}] not found.")))
    }

    pub fn get_bool(&self, index: usize) -> Result<bool, Error> {
        self.get(index)?
            .coerce_bool()
            .ok_or_else(|| mismatch(index, "a boolean"))
    }

    pub fn get_f64(&self, index: usize) -> Result<f64, Error> {
        self.get(index)?
            .coerce_f64()
            .ok_or_else(|| mismatch(index, "a number"))
    }

    pub fn get_f32(&self, index: usize) -> Result<f32, Error> {
        self.get(index)?
            .coerce_f32()
            .ok_or_else(|| mismatch(index, "a number"))
    }

    /// Strict: numbers truncate, strings must be plain integer literals.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        match self.get(index)? {
            Value::Number(number) => Ok(number.to_i32()),
            Value::String(text) => text.parse().map_err(|_| mismatch(index, "a number")),
            _ => Err(mismatch(index, "a number")),
        }
    }

    pub fn get_i64(&self, index: usize) -> Result<i64, Error> {
        match self.get(index)? {
            Value::Number(number) => Ok(number.to_i64()),
            Value::String(text) => text.parse().map_err(|_| mismatch(index, "a number")),
            _ => Err(mismatch(index, "a number")),
        }
    }

    pub fn get_number(&self, index: usize) -> Result<Number, Error> {
        self.get(index)?
            .coerce_number()
            .ok_or_else(|| mismatch(index, "a number"))
    }

    pub fn get_big_int(&self, index: usize) -> Result<BigInt, Error> {
        let value = self.get(index)?;
        match value {
            Value::Number(Number::BigInt(big)) => Ok(big.clone()),
            Value::Number(Number::Int(int)) => Ok(BigInt::from(*int)),
            Value::Number(Number::Long(long)) => Ok(BigInt::from(*long)),
            _ => value
                .coerce_string()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| mismatch(index, "a big integer")),
        }
    }

    pub fn get_big_decimal(&self, index: usize) -> Result<BigDecimal, Error> {
        let value = self.get(index)?;
        match value {
            Value::Number(Number::BigDecimal(decimal)) => Ok(decimal.clone()),
            _ => value
                .coerce_string()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| mismatch(index, "a big decimal")),
        }
    }

    pub fn get_string(&self, index: usize) -> Result<&str, Error> {
        match self.get(index)? {
            Value::String(text) => Ok(text),
            _ => Err(mismatch(index, "a string")),
        }
    }

    pub fn get_array(&self, index: usize) -> Result<&Array, Error> {
        match self.get(index)? {
            Value::Array(array) => Ok(array),
            _ => Err(mismatch(index, "an array")),
        }
    }

    pub fn get_object(&self, index: usize) -> Result<&Object, Error> {
        match self.get(index)? {
            Value::Object(object) => Ok(object),
            _ => Err(mismatch(index, "an object")),
        }
    }

    #[must_use]
    pub fn opt_bool(&self, index: usize) -> Option<bool> {
        self.opt(index)?.coerce_bool()
    }

    #[must_use]
    pub fn opt_f64(&self, index: usize) -> Option<f64> {
        self.opt(index)?.coerce_f64()
    }

    #[must_use]
    pub fn opt_f32(&self, index: usize) -> Option<f32> {
        self.opt(index)?.coerce_f32()
    }

    #[must_use]
    pub fn opt_i32(&self, index: usize) -> Option<i32> {
        self.opt(index)?.coerce_i32()
    }

    #[must_use]
    pub fn opt_i64(&self, index: usize) -> Option<i64> {
        self.opt(index)?.coerce_i64()
    }

    #[must_use]
    pub fn opt_number(&self, index: usize) -> Option<Number> {
        self.opt(index)?.coerce_number()
    }

    #[must_use]
    pub fn opt_big_int(&self, index: usize) -> Option<BigInt> {
        self.opt(index)?.coerce_big_int()
    }

    #[must_use]
    pub fn opt_big_decimal(&self, index: usize) -> Option<BigDecimal> {
        self.opt(index)?.coerce_big_decimal()
    }

    #[must_use]
    pub fn opt_string(&self, index: usize) -> Option<String> {
        self.opt(index)?.coerce_string()
    }

    #[must_use]
    pub fn opt_array(&self, index: usize) -> Option<&Array> {
        self.opt(index)?.as_array()
    }

    #[must_use]
    pub fn opt_object(&self, index: usize) -> Option<&Object> {
        self.opt(index)?.as_object()
    }
}

fn mismatch(index: usize, target: &str) -> Error {
    Error::type_error(format!("Array[{index}] is not {target}."))
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<Value> for Array {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Array {
        let mut array = Array::new();
        array.push(true).push(10).push("20").push(Value::Null);
        array
    }

    #[test]
    fn get_fails_out_of_bounds() {
        let array = sample();
        let error = array.get(9).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Range);
        assert_eq!(error.message(), "Array[9] not found.");
    }

    #[test]
    fn typed_getters_with_fallbacks() {
        let array = sample();
        assert!(array.get_bool(0).unwrap());
        assert_eq!(array.get_i32(1).unwrap(), 10);
        assert_eq!(array.get_i32(2).unwrap(), 20);
        assert_eq!(array.opt_i64(2), Some(20));
        assert!(array.get_string(1).is_err());
        assert_eq!(array.opt_string(1), Some("10".to_owned()));
    }

    #[test]
    fn mismatch_names_the_index() {
        let array = sample();
        let error = array.get_bool(1).unwrap_err();
        assert_eq!(error.message(), "Array[1] is not a boolean.");
    }

    #[test]
    fn set_pads_with_nulls() {
        let mut array = Array::new();
        array.push(1);
        array.set(3, "x");
        assert_eq!(array.len(), 4);
        assert_eq!(array.opt(1), Some(&Value::Null));
        assert_eq!(array.opt(2), Some(&Value::Null));
        assert_eq!(array.opt(3), Some(&Value::from("x")));

        array.set(0, 9);
        assert_eq!(array.opt(0), Some(&Value::from(9)));
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn remove_out_of_bounds_is_none() {
        let mut array = sample();
        assert_eq!(array.remove(9), None);
        assert_eq!(array.remove(1), Some(Value::from(10)));
        assert_eq!(array.len(), 3);
    }
}
