//! [`serde`] support: responses serialize into the GraphQL-over-HTTP JSON
//! shape, and variables deserialize from any self-describing format.

use std::fmt;

use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer, IntoDeserializer as _},
    ser::{SerializeMap as _, SerializeSeq as _, Serializer},
};

use crate::{
    GraphQLError,
    executor::{
        ExecutionError, ExecutionResult, IncrementalResult, InitialIncrementalResult, Path,
        PathSegment, SubsequentIncrementalResult,
    },
    parser::{ParseError, SourcePosition, Spanning},
    validation::RuleError,
    value::{Object, ScalarValue, Value},
};

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(None)?;

        map.serialize_entry("data", &self.data)?;
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        if let Some(extensions) = &self.extensions {
            map.serialize_entry("extensions", extensions)?;
        }

        map.end()
    }
}

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(None)?;

        map.serialize_key("message")?;
        map.serialize_value(self.error().message())?;

        if !self.locations().is_empty() {
            map.serialize_key("locations")?;
            map.serialize_value(self.locations())?;
        }

        if !self.path().is_empty() {
            map.serialize_key("path")?;
            map.serialize_value(self.path())?;
        }

        if !self.error().extensions().is_null() {
            map.serialize_key("extensions")?;
            map.serialize_value(self.error().extensions())?;
        }

        map.end()
    }
}

impl Serialize for GraphQLError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::ParseError(e) => [e].serialize(ser),
            Self::ValidationError(es) => es.serialize(ser),
            Self::VariableCoercion(es) => es.serialize(ser),
            e => {
                #[derive(Serialize)]
                struct Helper {
                    message: String,
                }

                [Helper {
                    message: e.to_string(),
                }]
                .serialize(ser)
            }
        }
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let segments = self.segments();
        let mut seq = ser.serialize_seq(Some(segments.len()))?;
        for segment in &segments {
            seq.serialize_element(segment)?;
        }
        seq.end()
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Key(k) => ser.serialize_str(k),
            Self::Index(i) => ser.serialize_u64(*i as u64),
        }
    }
}

impl Serialize for InitialIncrementalResult {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(None)?;
        map.serialize_entry("data", &self.data)?;
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        map.serialize_entry("hasNext", &self.has_next)?;
        map.end()
    }
}

impl Serialize for SubsequentIncrementalResult {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(None)?;
        if !self.incremental.is_empty() {
            map.serialize_entry("incremental", &self.incremental)?;
        }
        map.serialize_entry("hasNext", &self.has_next)?;
        map.end()
    }
}

impl Serialize for IncrementalResult {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(None)?;
        match self {
            Self::Defer { data, .. } => map.serialize_entry("data", data)?,
            Self::Stream { items, .. } => map.serialize_entry("items", items)?,
        }
        if !self.errors().is_empty() {
            map.serialize_entry("errors", self.errors())?;
        }
        map.serialize_entry("path", self.path())?;
        let (Self::Defer { label, .. } | Self::Stream { label, .. }) = self;
        if let Some(label) = label {
            map.serialize_entry("label", label)?;
        }
        map.end()
    }
}

impl Serialize for RuleError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(2))?;

        map.serialize_key("message")?;
        map.serialize_value(self.message())?;

        map.serialize_key("locations")?;
        map.serialize_value(self.locations())?;

        map.end()
    }
}

impl Serialize for SourcePosition {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(2))?;

        let line = self.line() + 1;
        map.serialize_key("line")?;
        map.serialize_value(&line)?;

        let column = self.column() + 1;
        map.serialize_key("column")?;
        map.serialize_value(&column)?;

        map.end()
    }
}

impl Serialize for Spanning<ParseError> {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(2))?;

        let msg = self.item.to_string();
        map.serialize_key("message")?;
        map.serialize_value(&msg)?;

        map.serialize_key("locations")?;
        map.serialize_value(&[self.span.start])?;

        map.end()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(self.field_count()))?;
        for (f, v) in self.iter() {
            map.serialize_key(f)?;
            map.serialize_value(v)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => ser.serialize_unit(),
            Self::Scalar(s) => s.serialize(ser),
            Self::List(l) => l.serialize(ser),
            Self::Object(o) => o.serialize(ser),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a valid input value")
            }

            fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
                Ok(Value::scalar(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
                ScalarValue::deserialize(n.into_deserializer()).map(Value::Scalar)
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
                ScalarValue::deserialize(n.into_deserializer()).map(Value::Scalar)
            }

            fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
                Ok(Value::scalar(f))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
                Ok(Value::scalar(s))
            }

            fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
                Ok(Value::scalar(s))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, de: D) -> Result<Self::Value, D::Error> {
                Value::deserialize(de)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vals = Vec::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some(v) = visitor.next_element()? {
                    vals.push(v);
                }
                Ok(Value::list(vals))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut obj = Object::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some((key, val)) = visitor.next_entry::<String, Value>()? {
                    obj.add_field(key, val);
                }
                Ok(Value::object(obj))
            }
        }

        de.deserialize_any(Visitor)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        match Value::deserialize(de)? {
            Value::Object(o) => Ok(o),
            Value::Null => Ok(Self::default()),
            v => Err(de::Error::custom(format!("expected an object of variables, found: {v}"))),
        }
    }
}
