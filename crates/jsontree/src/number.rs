//! Numeric representations and the string-to-number classification rules.
//!
//! A JSON number is not one type here: integers narrow to the smallest of
//! `i32`/`i64` and widen into [`BigInt`], decimal-notation literals become
//! doubles, and the strict conversion path used by accessors falls back to
//! an exact [`BigDecimal`] when a double would lose digits.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::Error;

/// Upper bound on the decimal scale; literals like `1e2000000000` would
/// otherwise expand into gigabyte-sized digit strings.
const MAX_SCALE: u64 = 100_000;

fn pow10(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent as usize)
}

/// An exact decimal: `unscaled * 10^-scale`, normalized so the fraction
/// carries no trailing zero digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: u32,
}

impl BigDecimal {
    fn from_parts(mut unscaled: BigInt, mut scale: i64) -> Result<Self, Error> {
        if unscaled.is_zero() {
            return Ok(Self {
                unscaled,
                scale: 0,
            });
        }
        let ten = BigInt::from(10);
        while scale > 0 && (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        if scale < 0 {
            // `-scale` fits: callers reject scales beyond MAX_SCALE.
            unscaled *= pow10(u32::try_from(-scale).unwrap_or(u32::MAX));
            scale = 0;
        }
        Ok(Self {
            unscaled,
            scale: u32::try_from(scale).unwrap_or(u32::MAX),
        })
    }

    /// The exact decimal expansion of a finite double, `None` otherwise.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // The shortest round-trip form is plain decimal notation.
        Self::from_str(&value.to_string()).ok()
    }

    /// Truncates toward zero, discarding the fraction.
    #[must_use]
    pub fn to_big_int(&self) -> BigInt {
        if self.scale == 0 {
            self.unscaled.clone()
        } else {
            &self.unscaled / pow10(self.scale)
        }
    }

    /// Nearest double; overflows to infinity like any decimal-to-binary
    /// conversion.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    pub(crate) fn plus_one(&self) -> Self {
        Self {
            unscaled: &self.unscaled + pow10(self.scale),
            scale: self.scale,
        }
    }
}

impl From<BigInt> for BigDecimal {
    fn from(value: BigInt) -> Self {
        Self {
            unscaled: value,
            scale: 0,
        }
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::from(BigInt::from(value))
    }
}

impl FromStr for BigDecimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::type_error(format!("Value \"{s}\" is not a valid number."));
        let bytes = s.as_bytes();
        let mut i = 0;
        let negative = match bytes.first() {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let mut digits = String::new();
        let mut fraction_len: i64 = 0;
        let mut seen_point = false;
        while i < bytes.len() {
            match bytes[i] {
                digit @ b'0'..=b'9' => {
                    digits.push(char::from(digit));
                    if seen_point {
                        fraction_len += 1;
                    }
                }
                b'.' if !seen_point => seen_point = true,
                b'e' | b'E' => break,
                _ => return Err(invalid()),
            }
            i += 1;
        }
        if digits.is_empty() {
            return Err(invalid());
        }
        let mut exponent: i64 = 0;
        if i < bytes.len() {
            // Positioned at the exponent marker.
            let marker = &s[i + 1..];
            exponent = i64::from(marker.parse::<i32>().map_err(|_| invalid())?);
        }
        let scale = fraction_len - exponent;
        if scale.unsigned_abs() > MAX_SCALE {
            return Err(Error::validity(format!(
                "Decimal exponent out of range in \"{s}\"."
            )));
        }
        let mut unscaled = BigInt::from_str(&digits).map_err(|_| invalid())?;
        if negative {
            unscaled = -unscaled;
        }
        Self::from_parts(unscaled, scale)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unscaled.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            f.write_str(&digits)
        } else if digits.len() <= scale {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        } else {
            let (integral, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{integral}.{fraction}")
        }
    }
}

/// A JSON number, stored in the narrowest representation that holds it
/// exactly.
#[derive(Debug, Clone)]
pub enum Number {
    Int(i32),
    Long(i64),
    BigInt(BigInt),
    Double(f64),
    BigDecimal(BigDecimal),
}

/// Decimal notation: a fractional point, an exponent marker, or the
/// literal `-0`.
pub(crate) fn is_decimal_notation(s: &str) -> bool {
    s.contains(['.', 'e', 'E']) || s == "-0"
}

impl Number {
    /// A checked double; non-finite values fail validation, integral values
    /// in `i32` range narrow to `Int` (negative zero stays a double).
    pub fn from_f64(value: f64) -> Result<Self, Error> {
        if value.is_finite() {
            Ok(Self::narrowed_double(value))
        } else {
            Err(Error::validity("JSON does not allow non-finite numbers."))
        }
    }

    pub fn from_f32(value: f32) -> Result<Self, Error> {
        Self::from_f64(f64::from(value))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn narrowed_double(value: f64) -> Self {
        if value.fract() == 0.0
            && value >= f64::from(i32::MIN)
            && value <= f64::from(i32::MAX)
            && !(value == 0.0 && value.is_sign_negative())
        {
            Self::Int(value as i32)
        } else {
            Self::Double(value)
        }
    }

    fn narrowed_big_int(value: BigInt) -> Self {
        if let Some(int) = value.to_i32() {
            Self::Int(int)
        } else if let Some(long) = value.to_i64() {
            Self::Long(long)
        } else {
            Self::BigInt(value)
        }
    }

    /// Lenient classification of a bare token, used by the parser.
    ///
    /// Declines (`None`) when the token is not numeric after all, when its
    /// double form is non-finite, or when an integer literal is not in
    /// canonical form (redundant leading zeros, leading `+`) - the caller
    /// keeps such tokens as strings.
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        let first = *token.as_bytes().first()?;
        if !(first.is_ascii_digit() || first == b'-') {
            return None;
        }
        if is_decimal_notation(token) {
            let value: f64 = token.parse().ok()?;
            value.is_finite().then(|| Self::narrowed_double(value))
        } else {
            let value = BigInt::from_str(token).ok()?;
            if value.to_string() != token {
                return None;
            }
            Some(Self::narrowed_big_int(value))
        }
    }

    /// Strict conversion used by the numeric accessors: decimal notation
    /// longer than 14 characters, or whose double form is non-finite,
    /// becomes an exact [`BigDecimal`] instead of a lossy double.
    pub fn from_str_strict(s: &str) -> Result<Self, Error> {
        let invalid = || Error::type_error(format!("Value \"{s}\" is not a valid number."));
        let first = *s.as_bytes().first().ok_or_else(invalid)?;
        if !(first.is_ascii_digit() || first == b'-') {
            return Err(invalid());
        }
        if is_decimal_notation(s) {
            if s.len() > 14 {
                return BigDecimal::from_str(s).map(Self::BigDecimal);
            }
            let value: f64 = s.parse().map_err(|_| invalid())?;
            if value.is_finite() {
                Ok(Self::Double(value))
            } else {
                BigDecimal::from_str(s).map(Self::BigDecimal)
            }
        } else {
            BigInt::from_str(s)
                .map(Self::narrowed_big_int)
                .map_err(|_| invalid())
        }
    }

    /// Widening conversion; big integers overflow to the infinity of their
    /// sign.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Int(value) => f64::from(*value),
            Self::Long(value) => *value as f64,
            Self::BigInt(value) => value.to_f64().unwrap_or_else(|| {
                if value.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }),
            Self::Double(value) => *value,
            Self::BigDecimal(value) => value.to_f64(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Truncating conversion, saturating at the `i32` bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i32(&self) -> i32 {
        match self {
            Self::Int(value) => *value,
            Self::Long(value) => (*value).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            Self::BigInt(value) => value.to_i32().unwrap_or_else(|| saturated(value)),
            Self::Double(value) => *value as i32,
            Self::BigDecimal(value) => {
                let truncated = value.to_big_int();
                truncated.to_i32().unwrap_or_else(|| saturated(&truncated))
            }
        }
    }

    /// Truncating conversion, saturating at the `i64` bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> i64 {
        match self {
            Self::Int(value) => i64::from(*value),
            Self::Long(value) => *value,
            Self::BigInt(value) => value.to_i64().unwrap_or_else(|| saturated(value)),
            Self::Double(value) => *value as i64,
            Self::BigDecimal(value) => {
                let truncated = value.to_big_int();
                truncated.to_i64().unwrap_or_else(|| saturated(&truncated))
            }
        }
    }

    /// Truncating conversion; `None` only for a non-finite double.
    #[must_use]
    pub fn to_big_int(&self) -> Option<BigInt> {
        match self {
            Self::Int(value) => Some(BigInt::from(*value)),
            Self::Long(value) => Some(BigInt::from(*value)),
            Self::BigInt(value) => Some(value.clone()),
            Self::Double(value) => BigDecimal::from_f64(*value).map(|d| d.to_big_int()),
            Self::BigDecimal(value) => Some(value.to_big_int()),
        }
    }

    /// Exact widening; `None` only for a non-finite double.
    #[must_use]
    pub fn to_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Int(value) => Some(BigDecimal::from(i64::from(*value))),
            Self::Long(value) => Some(BigDecimal::from(*value)),
            Self::BigInt(value) => Some(BigDecimal::from(value.clone())),
            Self::Double(value) => BigDecimal::from_f64(*value),
            Self::BigDecimal(value) => Some(value.clone()),
        }
    }

    fn integer_repr(&self) -> Option<Cow<'_, BigInt>> {
        match self {
            Self::Int(value) => Some(Cow::Owned(BigInt::from(*value))),
            Self::Long(value) => Some(Cow::Owned(BigInt::from(*value))),
            Self::BigInt(value) => Some(Cow::Borrowed(value)),
            Self::Double(_) | Self::BigDecimal(_) => None,
        }
    }
}

fn saturated<T: num_traits::Bounded>(value: &BigInt) -> T {
    if value.is_negative() {
        T::min_value()
    } else {
        T::max_value()
    }
}

/// Integers compare across storage widths; doubles and decimals compare
/// within their own representation.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::BigDecimal(a), Self::BigDecimal(b)) => a == b,
            _ => match (self.integer_repr(), other.integer_repr()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::narrowed_big_int(BigInt::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::narrowed_big_int(BigInt::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::narrowed_big_int(BigInt::from(value))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self::narrowed_big_int(value)
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Self::BigDecimal(value)
    }
}

/// Canonical text form of a double: the shortest round-trip decimal,
/// switching to exponent notation when the plain digits would re-read as
/// an integer outside `i32` range; non-finite doubles render `null`.
pub(crate) fn double_to_string(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_owned();
    }
    let plain = value.to_string();
    if plain.contains(['.', 'e', 'E']) {
        return plain;
    }
    if value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        plain
    } else {
        format!("{value:e}")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => f.write_str(itoa::Buffer::new().format(*value)),
            Self::Long(value) => f.write_str(itoa::Buffer::new().format(*value)),
            Self::BigInt(value) => write!(f, "{value}"),
            Self::Double(value) => f.write_str(&double_to_string(*value)),
            Self::BigDecimal(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("0", Number::Int(0); "zero")]
    #[test_case("42", Number::Int(42); "small int")]
    #[test_case("-7", Number::Int(-7); "negative int")]
    #[test_case("2147483647", Number::Int(i32::MAX); "int max")]
    #[test_case("2147483648", Number::Long(2_147_483_648); "just past int")]
    #[test_case("9223372036854775807", Number::Long(i64::MAX); "long max")]
    #[test_case("3.5", Number::Double(3.5); "plain double")]
    #[test_case("1e3", Number::Int(1000); "exponent narrows")]
    #[test_case("3.0", Number::Int(3); "integral double narrows")]
    fn lenient_classification(token: &str, expected: Number) {
        assert_eq!(Number::from_token(token).unwrap(), expected);
    }

    #[test]
    fn lenient_classification_big_integer() {
        let number = Number::from_token("123456789012345678901234567890").unwrap();
        assert!(matches!(number, Number::BigInt(_)));
        assert_eq!(number.to_string(), "123456789012345678901234567890");
    }

    #[test_case("007"; "leading zeros")]
    #[test_case("+5"; "leading plus")]
    #[test_case("-"; "bare minus")]
    #[test_case("12abc"; "trailing junk")]
    #[test_case("1e999"; "overflowing exponent")]
    #[test_case("abc"; "not numeric")]
    fn lenient_classification_declines(token: &str) {
        assert!(Number::from_token(token).is_none());
    }

    #[test]
    fn negative_zero_stays_double() {
        let number = Number::from_token("-0").unwrap();
        match number {
            Number::Double(value) => {
                assert_eq!(value, 0.0);
                assert!(value.is_sign_negative());
            }
            other => panic!("expected a double, got {other:?}"),
        }
        assert_eq!(number.to_string(), "-0");
    }

    #[test]
    fn strict_conversion_prefers_exact_decimals() {
        let number = Number::from_str_strict("0.12345678901234567890").unwrap();
        assert!(matches!(number, Number::BigDecimal(_)));
        assert_eq!(number.to_string(), "0.1234567890123456789");
    }

    #[test]
    fn strict_conversion_short_decimal_is_double() {
        assert_eq!(
            Number::from_str_strict("2.5").unwrap(),
            Number::Double(2.5)
        );
    }

    #[test]
    fn strict_conversion_rejects_garbage() {
        assert!(Number::from_str_strict("true").is_err());
        assert!(Number::from_str_strict("").is_err());
        assert!(Number::from_str_strict("1.2.3").is_err());
    }

    #[test]
    fn from_f64_rejects_non_finite() {
        assert!(Number::from_f64(f64::INFINITY).is_err());
        assert!(Number::from_f64(f64::NAN).is_err());
        assert_eq!(Number::from_f64(3.0).unwrap(), Number::Int(3));
        assert_eq!(Number::from_f64(2.5).unwrap(), Number::Double(2.5));
    }

    #[test_case(2.5, "2.5"; "fraction kept")]
    #[test_case(3.0, "3"; "integral trimmed")]
    #[test_case(-0.0, "-0"; "negative zero")]
    #[test_case(1e30, "1e30"; "huge magnitude")]
    #[test_case(5e15, "5e15"; "integral past int range")]
    #[test_case(0.000025, "0.000025"; "small fraction")]
    fn double_rendering(value: f64, expected: &str) {
        assert_eq!(double_to_string(value), expected);
    }

    #[test]
    fn non_finite_doubles_render_null() {
        assert_eq!(double_to_string(f64::INFINITY), "null");
        assert_eq!(double_to_string(f64::NEG_INFINITY), "null");
        assert_eq!(double_to_string(f64::NAN), "null");
    }

    #[test_case("2.50", "2.5"; "trailing zero stripped")]
    #[test_case("3.0", "3"; "trailing point stripped")]
    #[test_case("0.00", "0"; "zero")]
    #[test_case("-12.3400", "-12.34"; "negative")]
    #[test_case("1.5e3", "1500"; "positive exponent")]
    #[test_case("25e-1", "2.5"; "negative exponent")]
    #[test_case("0.0000000001", "0.0000000001"; "leading fraction zeros")]
    fn big_decimal_canonical_display(input: &str, expected: &str) {
        let decimal: BigDecimal = input.parse().unwrap();
        assert_eq!(decimal.to_string(), expected);
    }

    #[test]
    fn big_decimal_truncates_toward_zero() {
        let decimal: BigDecimal = "-3.75".parse().unwrap();
        assert_eq!(decimal.to_big_int(), BigInt::from(-3));
    }

    #[test]
    fn integers_compare_across_widths() {
        assert_eq!(Number::Int(7), Number::Long(7));
        assert_eq!(Number::Long(7), Number::BigInt(BigInt::from(7)));
        assert_ne!(Number::Int(7), Number::Double(7.0));
        assert_ne!(Number::Int(7), Number::Int(8));
    }

    #[test]
    fn saturating_narrowing() {
        let huge = Number::BigInt(pow10(40));
        assert_eq!(huge.to_i32(), i32::MAX);
        assert_eq!(huge.to_i64(), i64::MAX);
        assert_eq!(Number::Double(-1e30).to_i32(), i32::MIN);
        assert_eq!(Number::Long(i64::MIN).to_i32(), i32::MIN);
    }
}
