//! Scalar arguments and their canonical coercions
//!
//! Pack arguments are loosely typed: any [`Scalar`] can feed any directive.
//! The coercion rules below decide what an integer, float or string directive
//! actually sees:
//!
//! | Kind | `to_integer` | `to_float` | `to_bytes` |
//! |------|--------------|------------|------------|
//! | `Null` | 0 | 0.0 | `""` |
//! | `Bool` | 1 / 0 | 1.0 / 0.0 | `"1"` / `""` |
//! | `Int`, `UInt` | wraps to `i64` | exact or nearest | decimal |
//! | `Float` | truncates toward zero | itself | `%.6f` |
//! | `Text` | base-10 parse | float parse | UTF-8 bytes |
//! | `Bytes` | non-empty → 1 | non-empty → 1.0 | itself |
//! | `Object` | unsupported | unsupported | `Display` text |
//!
//! Integer coercion never range-checks; the directive width masks the value
//! when it is written.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{PackError, Result};

/// One pack argument
#[derive(Clone, Default)]
pub enum Scalar {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    /// Any signed integer width, widened
    Int(i64),
    /// Any unsigned integer width, widened
    UInt(u64),
    /// Any float width, widened
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// A value that only exposes a textual form
    Object(Arc<dyn fmt::Display + Send + Sync>),
}

impl Scalar {
    /// Wrap a value that only exposes its `Display` text
    pub fn object(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Scalar::Object(Arc::new(value))
    }

    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::UInt(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Bytes(_) => "bytes",
            Scalar::Object(_) => "object",
        }
    }

    /// Coerce to a 64-bit signed integer
    pub fn to_integer(&self) -> Result<i64> {
        match self {
            Scalar::Null => Ok(0),
            Scalar::Bool(b) => Ok(i64::from(*b)),
            Scalar::Int(v) => Ok(*v),
            Scalar::UInt(v) => Ok(*v as i64),
            Scalar::Float(v) => Ok(float_to_integer(*v)),
            Scalar::Text(s) => s.parse::<i64>().map_err(|e| {
                PackError::parse(format!("cannot convert {:?} to integer: {}", s, e))
            }),
            Scalar::Bytes(b) => Ok(i64::from(!b.is_empty())),
            Scalar::Object(o) => Err(PackError::unsupported_type(format!(
                "cannot convert object {:?} to integer",
                o.to_string()
            ))),
        }
    }

    /// Coerce to a 64-bit float
    pub fn to_float(&self) -> Result<f64> {
        match self {
            Scalar::Null => Ok(0.0),
            Scalar::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(v) => Ok(*v as f64),
            Scalar::UInt(v) => Ok(*v as f64),
            Scalar::Float(v) => Ok(*v),
            Scalar::Text(s) => s.parse::<f64>().map_err(|e| {
                PackError::parse(format!("cannot convert {:?} to float: {}", s, e))
            }),
            Scalar::Bytes(b) => Ok(if b.is_empty() { 0.0 } else { 1.0 }),
            Scalar::Object(o) => Err(PackError::unsupported_type(format!(
                "cannot convert object {:?} to float",
                o.to_string()
            ))),
        }
    }

    /// Coerce to a byte string
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>> {
        let bytes = match self {
            Scalar::Null | Scalar::Bool(false) => Cow::Borrowed(&b""[..]),
            Scalar::Bool(true) => Cow::Borrowed(&b"1"[..]),
            Scalar::Int(v) => Cow::Owned(itoa::Buffer::new().format(*v).as_bytes().to_vec()),
            Scalar::UInt(v) => Cow::Owned(itoa::Buffer::new().format(*v).as_bytes().to_vec()),
            Scalar::Float(v) => Cow::Owned(float_to_text(*v).into_bytes()),
            Scalar::Text(s) => Cow::Borrowed(s.as_bytes()),
            Scalar::Bytes(b) => Cow::Borrowed(b.as_slice()),
            Scalar::Object(o) => Cow::Owned(o.to_string().into_bytes()),
        };
        Ok(bytes)
    }
}

/// Six fixed decimals; infinities render as `+Inf`/`-Inf`, NaN as `NaN`
fn float_to_text(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    format!("{:.6}", value)
}

/// Truncate toward zero; NaN, infinities and out-of-range values become 0
fn float_to_integer(value: f64) -> i64 {
    // 2^63 is exactly representable; anything at or above it does not fit.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value >= -LIMIT && value < LIMIT {
        value.trunc() as i64
    } else {
        0
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "Null"),
            Scalar::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Scalar::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Scalar::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Scalar::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Scalar::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Scalar::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Scalar::Object(o) => f.debug_tuple("Object").field(&o.to_string()).finish(),
        }
    }
}

// ============================================================================
// Conversions into Scalar
// ============================================================================

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(v: Vec<u8>) -> Self {
        Scalar::Bytes(v)
    }
}

impl From<&[u8]> for Scalar {
    fn from(v: &[u8]) -> Self {
        Scalar::Bytes(v.to_vec())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// Build a `Vec<Scalar>` from heterogeneous values
///
/// ```
/// use voltage_pack::{scalars, Scalar};
///
/// let args = scalars![1234, "5678", 1.5, true];
/// assert_eq!(args.len(), 4);
/// assert!(matches!(args[1], Scalar::Text(_)));
/// ```
#[macro_export]
macro_rules! scalars {
    () => { ::std::vec::Vec::<$crate::Scalar>::new() };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Scalar::from($value)),+]
    };
}
