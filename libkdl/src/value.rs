//! KDL value representation.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::borrow::Borrow;
use std::fmt;

/// A validated identifier: a node name, property key or type hint.
///
/// Quoted and raw identifiers are stored unescaped, so `"a b"` and `a b` in
/// source both end up as the text `a b`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub(crate) fn new(text: String) -> Self {
        Identifier(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Arbitrary-precision decimal, `mantissa * 10^exponent`.
///
/// Always normalized: the mantissa carries no trailing zero digits and zero
/// is `0 * 10^0`, so two decimals are equal exactly when their values are.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

impl Decimal {
    /// Build a normalized decimal. Returns `None` when stripping trailing
    /// zeros would push the exponent past `i64::MAX`.
    pub fn new(mut mantissa: BigInt, exponent: i64) -> Option<Self> {
        if mantissa.is_zero() {
            return Some(Decimal {
                mantissa,
                exponent: 0,
            });
        }
        let ten = BigInt::from(10);
        let mut zeros: i64 = 0;
        while (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            zeros += 1;
        }
        let exponent = exponent.checked_add(zeros)?;
        Some(Decimal { mantissa, exponent })
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Nearest `f64`; out-of-range values become infinities or zero.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.mantissa, self.exponent)
            .parse()
            .unwrap_or(f64::NAN)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Plain decimal notation for moderate exponents, scientific otherwise.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < BigInt::zero() { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        // Digits before the decimal point; i128 so any i64 exponent fits.
        let point = digits.len() as i128 + i128::from(self.exponent);

        if self.exponent >= 0 && point <= 21 {
            let zeros = "0".repeat(self.exponent as usize);
            write!(f, "{}{}{}.0", sign, digits, zeros)
        } else if self.exponent < 0 && point > 0 {
            let (int, frac) = digits.split_at(point as usize);
            write!(f, "{}{}.{}", sign, int, frac)
        } else if self.exponent < 0 && point > -6 {
            let zeros = "0".repeat((-point) as usize);
            write!(f, "{}0.{}{}", sign, zeros, digits)
        } else {
            let (first, rest) = digits.split_at(1);
            let rest = if rest.is_empty() { "0" } else { rest };
            write!(f, "{}{}.{}E{:+}", sign, first, rest, point - 1)
        }
    }
}

/// The scalar payload of a value.
#[derive(Clone, PartialEq)]
pub enum Scalar {
    /// UTF-8 string, from a quoted or raw string literal.
    String(String),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// Arbitrary-precision decimal (a literal with `.` or an exponent).
    Float(Decimal),
    /// Boolean value.
    Bool(bool),
    /// Null value.
    Null,
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(d) => write!(f, "{}", d),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => write!(f, "null"),
        }
    }
}

/// A KDL value: a scalar with an optional type hint.
#[derive(Clone, PartialEq)]
pub struct Value {
    pub scalar: Scalar,
    pub type_hint: Option<Identifier>,
}

impl Value {
    /// A value without a type hint.
    pub fn new(scalar: Scalar) -> Self {
        Self {
            scalar,
            type_hint: None,
        }
    }

    pub fn with_type_hint(mut self, hint: Option<Identifier>) -> Self {
        self.type_hint = hint;
        self
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    pub fn type_hint(&self) -> Option<&Identifier> {
        self.type_hint.as_ref()
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self.scalar, Scalar::Null)
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.scalar {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match &self.scalar {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the integer if this is an `Integer`.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match &self.scalar {
            Scalar::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer` that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| n.to_i64())
    }

    /// Returns a reference to the decimal if this is a `Float`.
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match &self.scalar {
            Scalar::Float(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the nearest `f64` for either kind of number.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.scalar {
            Scalar::Float(d) => Some(d.to_f64()),
            Scalar::Integer(n) => n.to_f64(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hint) = &self.type_hint {
            write!(f, "({}){:?}", hint, self.scalar)
        } else {
            write!(f, "{:?}", self.scalar)
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::new(scalar)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(Scalar::Bool(b))
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::new(Scalar::Integer(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::new(Scalar::Integer(BigInt::from(n)))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::new(Scalar::Float(d))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(Scalar::String(s))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(Scalar::String(s.to_string()))
    }
}
