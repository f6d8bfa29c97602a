//! The JSON value tree.

use num_bigint::BigInt;

use crate::array::Array;
use crate::error::Error;
use crate::number::{BigDecimal, Number};
use crate::object::Object;
use crate::pointer::{Pointer, PointerError};
use crate::render::render;

/// A JSON value: a closed union of `null`, booleans, numbers, strings,
/// arrays and objects.
///
/// `Null` is a value in its own right, distinct from the *absence* of a
/// key; see [`Object::lookup`] for the three-way distinction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    /// The type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(value) => Some(value),
            _ => None,
        }
    }

    /// Resolve a JSON Pointer expression against this value.
    pub fn query(&self, pointer: &str) -> Result<&Self, PointerError> {
        Pointer::new(pointer)?.resolve(self)
    }

    /// Like [`Value::query`], swallowing resolution failures.
    #[must_use]
    pub fn query_opt(&self, pointer: &str) -> Option<&Self> {
        self.query(pointer).ok()
    }

    /// A boolean, accepting the literal strings `"true"`/`"false"` in any
    /// case.
    #[must_use]
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(text) if text.eq_ignore_ascii_case("true") => Some(true),
            Self::String(text) if text.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(number.to_f64()),
            Self::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn coerce_f32(&self) -> Option<f32> {
        match self {
            Self::Number(number) => Some(number.to_f32()),
            Self::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// An `i32`, truncating doubles and decimal strings toward zero.
    #[must_use]
    pub fn coerce_i32(&self) -> Option<i32> {
        match self {
            Self::Number(number) => Some(number.to_i32()),
            Self::String(text) => text
                .parse::<BigDecimal>()
                .ok()
                .map(|decimal| Number::BigDecimal(decimal).to_i32()),
            _ => None,
        }
    }

    /// An `i64`, truncating doubles and decimal strings toward zero.
    #[must_use]
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => Some(number.to_i64()),
            Self::String(text) => text
                .parse::<BigDecimal>()
                .ok()
                .map(|decimal| Number::BigDecimal(decimal).to_i64()),
            _ => None,
        }
    }

    /// A [`Number`], converting strings through the strict conversion path.
    #[must_use]
    pub fn coerce_number(&self) -> Option<Number> {
        match self {
            Self::Number(number) => Some(number.clone()),
            Self::String(text) => Number::from_str_strict(text).ok(),
            _ => None,
        }
    }

    /// A big integer, truncating doubles and decimals.
    #[must_use]
    pub fn coerce_big_int(&self) -> Option<BigInt> {
        match self {
            Self::Number(number) => number.to_big_int(),
            Self::String(text) => {
                if crate::number::is_decimal_notation(text) {
                    text.parse::<BigDecimal>().ok().map(|d| d.to_big_int())
                } else {
                    text.parse().ok()
                }
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn coerce_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Number(number) => number.to_big_decimal(),
            Self::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// The text form of any non-null value: strings as-is, scalars in
    /// their canonical form, containers as compact JSON.
    #[must_use]
    pub fn coerce_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::String(text) => Some(text.clone()),
            other => Some(render(other, 0)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(Array::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

/// Non-finite doubles fail validation.
impl TryFrom<f64> for Value {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Error> {
        Number::from_f64(value).map(Self::Number)
    }
}

impl TryFrom<f32> for Value {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self, Error> {
        Number::from_f32(value).map(Self::Number)
    }
}

/// Explicit opt-in conversion into a [`Value`], replacing any notion of
/// reflective object-to-tree coercion: a type describes its own tree shape.
///
/// Implementations must produce finite numbers; the provided `f64`/`f32`
/// impls degrade non-finite input to `Null`.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for u32 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::try_from(*self).unwrap_or(Value::Null)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::try_from(*self).unwrap_or(Value::Null)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_is_deep() {
        let a = crate::parse(r#"{"a": [1, {"b": 2}], "c": "x"}"#).unwrap();
        let b = crate::parse(r#"{"c": "x", "a": [1, {"b": 2}]}"#).unwrap();
        assert_eq!(a, b);

        let c = crate::parse(r#"{"a": [1, {"b": 3}], "c": "x"}"#).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn one_equal_element_does_not_make_arrays_equal() {
        // Every element is compared; a single match must not short-circuit.
        let a = crate::parse("[1, 2, 3]").unwrap();
        let b = crate::parse("[1, 2, 4]").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn coerce_bool_accepts_literal_strings() {
        assert_eq!(Value::from("TRUE").coerce_bool(), Some(true));
        assert_eq!(Value::from("false").coerce_bool(), Some(false));
        assert_eq!(Value::from("yes").coerce_bool(), None);
        assert_eq!(Value::Bool(true).coerce_bool(), Some(true));
    }

    #[test]
    fn coerce_i32_truncates_decimal_strings() {
        assert_eq!(Value::from("3.75").coerce_i32(), Some(3));
        assert_eq!(Value::from("-3.75").coerce_i32(), Some(-3));
        assert_eq!(Value::from("junk").coerce_i32(), None);
    }

    #[test]
    fn coerce_string_renders_scalars() {
        assert_eq!(Value::Bool(true).coerce_string(), Some("true".to_owned()));
        assert_eq!(Value::from(42).coerce_string(), Some("42".to_owned()));
        assert_eq!(Value::Null.coerce_string(), None);
    }

    #[test]
    fn to_value_degrades_non_finite_to_null() {
        assert_eq!(f64::INFINITY.to_value(), Value::Null);
        assert_eq!(2.5_f64.to_value(), Value::try_from(2.5).unwrap());
    }

    #[test]
    fn vec_to_value_builds_an_array() {
        let value = vec![1_i32, 2, 3].to_value();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.opt(2), Some(&Value::from(3)));
    }

    #[test]
    fn from_i64_narrows() {
        assert_eq!(Value::from(5_i64), Value::from(5_i32));
        assert!(matches!(
            Value::from(5_000_000_000_i64),
            Value::Number(Number::Long(_))
        ));
    }
}
