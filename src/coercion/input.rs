use crate::{
    ast::Type,
    coercion::{CoercionError, VariableScope, coerce_input_literal},
    executor::PathSegment,
    schema::{
        meta::{DefaultValue, EnumMeta, InputObjectMeta, MetaType},
        model::SchemaType,
    },
    value::{Object, Value},
};

/// Coerces an external input `value` (e.g. a variable value parsed from JSON)
/// into the internal value of the input type `t`.
///
/// Every problem found is reported, each with the position of the offending
/// value inside `value`.
///
/// # Errors
///
/// If `value` cannot represent a value of `t`.
pub fn coerce_input_value<C>(
    schema: &SchemaType<C>,
    value: &Value,
    t: &Type<'_>,
) -> Result<Value, Vec<CoercionError>> {
    let mut coercer = InputCoercer {
        schema,
        path: Vec::new(),
        errors: Vec::new(),
    };
    let coerced = coercer.coerce(value, t);
    if coercer.errors.is_empty() {
        Ok(coerced)
    } else {
        Err(coercer.errors)
    }
}

/// Coerces the default value of an argument or input field of type `t`.
///
/// # Errors
///
/// If the default is not a valid value of `t`.
pub fn coerce_default_value<C>(
    schema: &SchemaType<C>,
    default: &DefaultValue,
    t: &Type<'_>,
) -> Result<Value, CoercionError> {
    match default {
        DefaultValue::Value(v) => coerce_input_value(schema, v, t).map_err(|mut errs| errs.swap_remove(0)),
        DefaultValue::Literal(lit) => {
            let empty = Object::default();
            coerce_input_literal(schema, lit, t, VariableScope::new(&empty))
                .map(Option::unwrap_or_default)
        }
    }
}

struct InputCoercer<'s, C> {
    schema: &'s SchemaType<C>,
    path: Vec<PathSegment>,
    errors: Vec<CoercionError>,
}

impl<C> InputCoercer<'_, C> {
    fn report(&mut self, message: String, value: &Value) {
        self.errors
            .push(CoercionError::new(message).at(&self.path, value));
    }

    fn coerce(&mut self, value: &Value, t: &Type<'_>) -> Value {
        if t.is_non_null() {
            if value.is_null() {
                self.report(format!("Expected non-nullable type \"{t}\" not to be null."), value);
                return Value::Null;
            }
            return self.coerce(value, &t.nullable());
        }
        if value.is_null() {
            return Value::Null;
        }

        if let Some(item_type) = t.list_item() {
            return match value {
                Value::List(items) => Value::List(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            self.path.push(PathSegment::Index(i));
                            let coerced = self.coerce(item, item_type);
                            self.path.pop();
                            coerced
                        })
                        .collect(),
                ),
                single => Value::List(vec![self.coerce(single, item_type)]),
            };
        }

        let name = t.innermost_name();
        match self.schema.type_by_name(name) {
            Some(MetaType::Scalar(s)) => match (s.coerce_input)(value) {
                Ok(v) => v,
                Err(e) => {
                    self.report(e.message().into(), value);
                    Value::Null
                }
            },
            Some(MetaType::Enum(e)) => self.coerce_enum(e, value),
            Some(MetaType::InputObject(io)) => self.coerce_input_object(io, value),
            _ => {
                self.report(format!("Expected \"{name}\" to be an input type."), value);
                Value::Null
            }
        }
    }

    fn coerce_enum(&mut self, meta: &EnumMeta, value: &Value) -> Value {
        let Some(name) = value.as_string_value() else {
            self.report(
                format!("Enum \"{}\" cannot represent non-string value: {value}.", meta.name),
                value,
            );
            return Value::Null;
        };
        match meta.value_by_name(name) {
            Some(v) => v.value.clone(),
            None => {
                self.report(
                    format!("Value \"{name}\" does not exist in \"{}\" enum.", meta.name),
                    value,
                );
                Value::Null
            }
        }
    }

    fn coerce_input_object(&mut self, meta: &InputObjectMeta, value: &Value) -> Value {
        let Some(fields) = value.as_object_value() else {
            self.report(format!("Expected type \"{}\" to be an object.", meta.name), value);
            return Value::Null;
        };

        let defs = meta.input_fields.get();
        let mut coerced = Object::with_capacity(defs.len());
        for def in defs {
            match fields.get_field_value(&def.name) {
                Some(field_value) => {
                    self.path.push(PathSegment::Key(def.name.clone()));
                    let v = self.coerce(field_value, &def.arg_type);
                    self.path.pop();
                    coerced.add_field(def.name.as_str(), v);
                }
                None => match &def.default_value {
                    Some(default) => match coerce_default_value(self.schema, default, &def.arg_type) {
                        Ok(v) => {
                            coerced.add_field(def.name.as_str(), v);
                        }
                        Err(e) => self.report(e.message, value),
                    },
                    None if def.arg_type.is_non_null() => self.report(
                        format!(
                            "Field \"{}\" of required type \"{}\" was not provided.",
                            def.name, def.arg_type,
                        ),
                        value,
                    ),
                    None => {}
                },
            }
        }

        for key in fields.keys() {
            if !defs.iter().any(|d| d.name == key) {
                self.report(
                    format!("Field \"{key}\" is not defined by type \"{}\".", meta.name),
                    value,
                );
            }
        }

        if meta.is_one_of {
            if fields.field_count() != 1 {
                self.report(
                    format!("Exactly one key must be specified for OneOf type \"{}\".", meta.name),
                    value,
                );
            } else if let Some((key, v)) = fields.iter().next() {
                if v.is_null() {
                    self.report(format!("Field \"{key}\" must be non-null."), value);
                }
            }
        }

        Value::Object(coerced)
    }
}
