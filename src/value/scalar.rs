use std::fmt;

use derive_more::with_trait::From;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Leaf value of a response or of an external input.
///
/// Integers outside the 32-bit signed range cannot be represented as
/// [`ScalarValue::Int`]: they are deserialized as [`ScalarValue::Float`], since
/// JSON encoders commonly print integral floats without a fractional part.
#[derive(Clone, Debug, From, PartialEq, Serialize)]
#[serde(untagged)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum ScalarValue {
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl ScalarValue {
    /// Represents this [`ScalarValue`] as an integer, if it holds one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Represents this [`ScalarValue`] as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Represents this [`ScalarValue`] as a string slice, if it holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Represents this [`ScalarValue`] as a boolean, if it holds one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = ScalarValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a valid scalar value")
            }

            fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
                Ok(ScalarValue::Boolean(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
                Ok(i32::try_from(n).map_or_else(|_| ScalarValue::Float(n as f64), ScalarValue::Int))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
                Ok(i32::try_from(n).map_or_else(|_| ScalarValue::Float(n as f64), ScalarValue::Int))
            }

            fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
                Ok(ScalarValue::Float(f))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
                Ok(ScalarValue::String(s.into()))
            }

            fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
                Ok(ScalarValue::String(s))
            }
        }

        de.deserialize_any(Visitor)
    }
}
