//! Built-in `Int`, `Float`, `String`, `Boolean` and `ID` scalars.

use crate::{
    ast::InputValue,
    executor::FieldError,
    schema::meta::ScalarMeta,
    value::{ScalarValue, Value},
};

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Whether `name` is one of the scalars every schema contains.
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Metadata of the built-in scalars.
pub(crate) fn builtin_scalars() -> [ScalarMeta; 5] {
    [int(), float(), string(), boolean(), id()]
}

fn int() -> ScalarMeta {
    ScalarMeta::new(arcstr::literal!("Int"))
        .description(
            "The `Int` scalar type represents non-fractional signed whole numeric values. \
             Int can represent values between -(2^31) and 2^31 - 1.",
        )
        .coerce_output(impl_int_scalar::to_output)
        .coerce_input(impl_int_scalar::from_input)
        .coerce_literal(impl_int_scalar::from_literal)
}

fn float() -> ScalarMeta {
    ScalarMeta::new(arcstr::literal!("Float"))
        .description(
            "The `Float` scalar type represents signed double-precision fractional values \
             as specified by [IEEE 754](https://en.wikipedia.org/wiki/IEEE_floating_point).",
        )
        .coerce_output(impl_float_scalar::to_output)
        .coerce_input(impl_float_scalar::from_input)
        .coerce_literal(impl_float_scalar::from_literal)
}

fn string() -> ScalarMeta {
    ScalarMeta::new(arcstr::literal!("String"))
        .description(
            "The `String` scalar type represents textual data, represented as UTF-8 \
             character sequences.",
        )
        .coerce_output(impl_string_scalar::to_output)
        .coerce_input(impl_string_scalar::from_input)
        .coerce_literal(impl_string_scalar::from_literal)
}

fn boolean() -> ScalarMeta {
    ScalarMeta::new(arcstr::literal!("Boolean"))
        .description("The `Boolean` scalar type represents `true` or `false`.")
        .coerce_output(impl_boolean_scalar::to_output)
        .coerce_input(impl_boolean_scalar::from_input)
        .coerce_literal(impl_boolean_scalar::from_literal)
}

fn id() -> ScalarMeta {
    ScalarMeta::new(arcstr::literal!("ID"))
        .description(
            "The `ID` scalar type represents a unique identifier. It is serialized as a \
             String; both string and integer inputs are accepted.",
        )
        .coerce_output(impl_id_scalar::to_output)
        .coerce_input(impl_id_scalar::from_input)
        .coerce_literal(impl_id_scalar::from_literal)
        .value_to_literal(impl_id_scalar::to_literal)
}

/// Converts a float holding a whole number into an [`i32`].
///
/// `None` if it isn't a whole number, `Some(Err(()))` if it is out of range.
fn whole_i32(f: f64) -> Option<Result<i32, ()>> {
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f < f64::from(i32::MIN) || f > f64::from(i32::MAX) {
        return Some(Err(()));
    }
    let i = f as i32;
    Some(Ok(i))
}

mod impl_int_scalar {
    use super::*;

    /// Checks the number `n`, reporting `v` in errors.
    fn from_number(n: f64, v: &Value) -> Result<Value, FieldError> {
        match whole_i32(n) {
            Some(Ok(i)) => Ok(Value::scalar(i)),
            Some(Err(())) => {
                Err(format!("Int cannot represent non 32-bit signed integer value: {v}").into())
            }
            None => Err(format!("Int cannot represent non-integer value: {v}").into()),
        }
    }

    pub(super) fn to_output(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::Boolean(b)) => Ok(Value::scalar(i32::from(*b))),
            Value::Scalar(ScalarValue::String(s)) if !s.trim().is_empty() => {
                match s.trim().parse::<f64>() {
                    Ok(n) => from_number(n, v),
                    Err(_) => Err(format!("Int cannot represent non-integer value: {v}").into()),
                }
            }
            v => from_input(v),
        }
    }

    pub(super) fn from_input(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::Int(_)) => Ok(v.clone()),
            Value::Scalar(ScalarValue::Float(n)) => from_number(*n, v),
            v => Err(format!("Int cannot represent non-integer value: {v}").into()),
        }
    }

    pub(super) fn from_literal(v: &InputValue) -> Result<Value, FieldError> {
        match v {
            InputValue::Int(i) => i32::try_from(*i).map(Value::scalar).map_err(|_| {
                format!("Int cannot represent non 32-bit signed integer value: {i}").into()
            }),
            v => Err(format!("Int cannot represent non-integer value: {v}").into()),
        }
    }
}

mod impl_float_scalar {
    use super::*;

    pub(super) fn to_output(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::Boolean(b)) => Ok(Value::scalar(f64::from(u8::from(*b)))),
            Value::Scalar(ScalarValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && !s.trim().is_empty())
                .map(Value::scalar)
                .ok_or_else(|| format!("Float cannot represent non numeric value: {v}").into()),
            v => from_input(v),
        }
    }

    pub(super) fn from_input(v: &Value) -> Result<Value, FieldError> {
        match v.as_float_value() {
            Some(f) if f.is_finite() => Ok(Value::scalar(f)),
            _ => Err(format!("Float cannot represent non numeric value: {v}").into()),
        }
    }

    pub(super) fn from_literal(v: &InputValue) -> Result<Value, FieldError> {
        match v {
            InputValue::Int(i) => Ok(Value::scalar(*i as f64)),
            InputValue::Float(f) => Ok(Value::scalar(*f)),
            v => Err(format!("Float cannot represent non numeric value: {v}").into()),
        }
    }
}

mod impl_string_scalar {
    use super::*;

    pub(super) fn to_output(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::String(_)) => Ok(v.clone()),
            Value::Scalar(ScalarValue::Boolean(b)) => Ok(Value::scalar(b.to_string())),
            Value::Scalar(ScalarValue::Int(i)) => Ok(Value::scalar(i.to_string())),
            Value::Scalar(ScalarValue::Float(f)) if f.is_finite() => {
                Ok(Value::scalar(f.to_string()))
            }
            v => Err(format!("String cannot represent value: {v}").into()),
        }
    }

    pub(super) fn from_input(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::String(_)) => Ok(v.clone()),
            v => Err(format!("String cannot represent a non string value: {v}").into()),
        }
    }

    pub(super) fn from_literal(v: &InputValue) -> Result<Value, FieldError> {
        match v {
            InputValue::String(s) => Ok(Value::scalar(s.as_str())),
            v => Err(format!("String cannot represent a non string value: {v}").into()),
        }
    }
}

mod impl_boolean_scalar {
    use super::*;

    pub(super) fn to_output(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::Boolean(_)) => Ok(v.clone()),
            Value::Scalar(ScalarValue::Int(i)) => Ok(Value::scalar(*i != 0)),
            Value::Scalar(ScalarValue::Float(f)) if f.is_finite() => Ok(Value::scalar(*f != 0.0)),
            v => Err(format!("Boolean cannot represent a non boolean value: {v}").into()),
        }
    }

    pub(super) fn from_input(v: &Value) -> Result<Value, FieldError> {
        match v {
            Value::Scalar(ScalarValue::Boolean(_)) => Ok(v.clone()),
            v => Err(format!("Boolean cannot represent a non boolean value: {v}").into()),
        }
    }

    pub(super) fn from_literal(v: &InputValue) -> Result<Value, FieldError> {
        match v {
            InputValue::Boolean(b) => Ok(Value::scalar(*b)),
            v => Err(format!("Boolean cannot represent a non boolean value: {v}").into()),
        }
    }
}

mod impl_id_scalar {
    use super::*;

    fn from_value(v: &Value) -> Option<Value> {
        match v {
            Value::Scalar(ScalarValue::String(_)) => Some(v.clone()),
            Value::Scalar(ScalarValue::Int(i)) => Some(Value::scalar(i.to_string())),
            Value::Scalar(ScalarValue::Float(f)) => {
                whole_i32(*f).and_then(Result::ok).map(|i| Value::scalar(i.to_string()))
            }
            _ => None,
        }
    }

    pub(super) fn to_output(v: &Value) -> Result<Value, FieldError> {
        from_value(v).ok_or_else(|| format!("ID cannot represent value: {v}").into())
    }

    pub(super) fn from_input(v: &Value) -> Result<Value, FieldError> {
        from_value(v).ok_or_else(|| format!("ID cannot represent value: {v}").into())
    }

    pub(super) fn from_literal(v: &InputValue) -> Result<Value, FieldError> {
        match v {
            InputValue::String(s) => Ok(Value::scalar(s.as_str())),
            InputValue::Int(i) => Ok(Value::scalar(i.to_string())),
            v => Err(format!(
                "ID cannot represent a non-string and non-integer value: {v}",
            )
            .into()),
        }
    }

    /// Integer-looking IDs are written back as integer literals.
    pub(super) fn to_literal(v: &Value) -> Option<InputValue> {
        let s = v.as_string_value()?;
        let digits = s.strip_prefix('-').unwrap_or(s);
        let is_integer = !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        match s.parse::<i64>() {
            Ok(i) if is_integer => Some(InputValue::Int(i)),
            _ => Some(InputValue::String(s.into())),
        }
    }
}
