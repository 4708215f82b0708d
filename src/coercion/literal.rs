use crate::{
    ast::{InputValue, Type},
    coercion::{CoercionError, VariableScope, coerce_default_value},
    parser::Spanning,
    schema::{
        meta::{EnumMeta, InputObjectMeta, MetaType, ScalarMeta},
        model::SchemaType,
    },
    value::{Object, ScalarValue, Value},
};

/// Coerces a query literal into the internal value of the input type `t`,
/// substituting the variables of `scope`.
///
/// Returns [`None`] if `literal` is a variable that received no value, so
/// the caller can apply its own default.
///
/// # Errors
///
/// If `literal` cannot represent a value of `t`. The first problem found is
/// reported.
pub fn coerce_input_literal<C>(
    schema: &SchemaType<C>,
    literal: &InputValue,
    t: &Type<'_>,
    scope: VariableScope<'_>,
) -> Result<Option<Value>, CoercionError> {
    if let InputValue::Variable(name) = literal {
        return match scope.get(name) {
            None => Ok(None),
            Some(v) if v.is_null() && t.is_non_null() => Err(CoercionError::new(format!(
                "Expected non-nullable type \"{t}\" not to be null.",
            ))),
            // Variable values are already coerced to the variable's type.
            Some(v) => Ok(Some(v.clone())),
        };
    }

    if t.is_non_null() {
        if literal.is_null() {
            return Err(CoercionError::new(format!(
                "Expected non-nullable type \"{t}\" not to be null.",
            )));
        }
        return coerce_input_literal(schema, literal, &t.nullable(), scope);
    }
    if literal.is_null() {
        return Ok(Some(Value::Null));
    }

    if let Some(item_type) = t.list_item() {
        let InputValue::List(items) = literal else {
            return coerce_input_literal(schema, literal, item_type, scope)
                .map(|v| v.map(|v| Value::List(vec![v])));
        };
        let mut coerced = Vec::with_capacity(items.len());
        for item in items {
            match coerce_input_literal(schema, &item.item, item_type, scope)? {
                Some(v) => coerced.push(v),
                None if item_type.is_non_null() => {
                    return Err(CoercionError::new(format!(
                        "Expected non-nullable type \"{item_type}\" not to be null.",
                    )));
                }
                None => coerced.push(Value::Null),
            }
        }
        return Ok(Some(Value::List(coerced)));
    }

    let name = t.innermost_name();
    match schema.type_by_name(name) {
        Some(MetaType::Scalar(s)) => coerce_scalar_literal(s, literal, scope).map(Some),
        Some(MetaType::Enum(e)) => coerce_enum_literal(e, literal).map(Some),
        Some(MetaType::InputObject(io)) => coerce_input_object_literal(schema, io, literal, scope).map(Some),
        _ => Err(CoercionError::new(format!("Expected \"{name}\" to be an input type."))),
    }
}

fn coerce_scalar_literal(
    meta: &ScalarMeta,
    literal: &InputValue,
    scope: VariableScope<'_>,
) -> Result<Value, CoercionError> {
    let result = match &meta.coerce_literal {
        Some(parse) => {
            if literal.is_const() {
                parse(literal)
            } else {
                parse(&replace_variables(literal, scope))
            }
        }
        None => (meta.coerce_input)(&value_from_literal_untyped(literal, scope)),
    };
    result.map_err(|e| CoercionError::new(e.message()))
}

fn coerce_enum_literal(meta: &EnumMeta, literal: &InputValue) -> Result<Value, CoercionError> {
    let InputValue::Enum(name) = literal else {
        return Err(CoercionError::new(format!(
            "Enum \"{}\" cannot represent non-enum value: {literal}.",
            meta.name,
        )));
    };
    meta.value_by_name(name)
        .map(|v| v.value.clone())
        .ok_or_else(|| {
            CoercionError::new(format!(
                "Value \"{name}\" does not exist in \"{}\" enum.",
                meta.name,
            ))
        })
}

fn coerce_input_object_literal<C>(
    schema: &SchemaType<C>,
    meta: &InputObjectMeta,
    literal: &InputValue,
    scope: VariableScope<'_>,
) -> Result<Value, CoercionError> {
    let InputValue::Object(fields) = literal else {
        return Err(CoercionError::new(format!(
            "Expected type \"{}\" to be an object.",
            meta.name,
        )));
    };

    let defs = meta.input_fields.get();
    if let Some((key, _)) = fields.iter().find(|(k, _)| !defs.iter().any(|d| d.name == k.item)) {
        return Err(CoercionError::new(format!(
            "Field \"{}\" is not defined by type \"{}\".",
            key.item, meta.name,
        )));
    }

    if meta.is_one_of {
        let [(key, field)] = fields.as_slice() else {
            return Err(CoercionError::new(format!(
                "Exactly one key must be specified for OneOf type \"{}\".",
                meta.name,
            )));
        };
        let is_null = match &field.item {
            InputValue::Variable(v) => scope.get(v).is_none_or(Value::is_null),
            lit => lit.is_null(),
        };
        if is_null {
            return Err(CoercionError::new(format!("Field \"{}\" must be non-null.", key.item)));
        }
    }

    let mut coerced = Object::with_capacity(defs.len());
    for def in defs {
        let provided = match literal.object_field(&def.name) {
            Some(field) => coerce_input_literal(schema, &field.item, &def.arg_type, scope)?,
            None => None,
        };
        match (provided, &def.default_value) {
            (Some(v), _) => {
                coerced.add_field(def.name.as_str(), v);
            }
            (None, Some(default)) => {
                coerced.add_field(
                    def.name.as_str(),
                    coerce_default_value(schema, default, &def.arg_type)?,
                );
            }
            (None, None) if def.arg_type.is_non_null() => {
                return Err(CoercionError::new(format!(
                    "Field \"{}\" of required type \"{}\" was not provided.",
                    def.name, def.arg_type,
                )));
            }
            (None, None) => {}
        }
    }
    Ok(Value::Object(coerced))
}

/// Replaces the variables referenced in `literal` with literals of their
/// values in `scope`.
///
/// Unset variables become `null` inside lists and are dropped from objects.
pub fn replace_variables(literal: &InputValue, scope: VariableScope<'_>) -> InputValue {
    match literal {
        InputValue::Variable(name) => scope
            .get(name)
            .map_or(InputValue::Null, value_to_literal_untyped),
        InputValue::List(items) => InputValue::List(
            items
                .iter()
                .map(|item| item.as_ref().map(|v| replace_variables(v, scope)))
                .collect(),
        ),
        InputValue::Object(fields) => InputValue::Object(
            fields
                .iter()
                .filter(|(_, v)| v.item.as_variable().is_none_or(|name| scope.get(name).is_some()))
                .map(|(k, v)| (k.clone(), v.as_ref().map(|v| replace_variables(v, scope))))
                .collect(),
        ),
        lit => lit.clone(),
    }
}

/// Converts a literal into an external value without consulting any type.
///
/// Enum values become strings, integers outside the 32-bit range become
/// floats and unset variables become `null`.
pub fn value_from_literal_untyped(literal: &InputValue, scope: VariableScope<'_>) -> Value {
    match literal {
        InputValue::Null => Value::Null,
        InputValue::Int(i) => i32::try_from(*i).map_or_else(
            |_| Value::scalar(*i as f64),
            Value::scalar,
        ),
        InputValue::Float(f) => Value::scalar(*f),
        InputValue::String(s) | InputValue::Enum(s) => Value::scalar(s.as_str()),
        InputValue::Boolean(b) => Value::scalar(*b),
        InputValue::Variable(name) => scope.get(name).cloned().unwrap_or_default(),
        InputValue::List(items) => Value::List(
            items
                .iter()
                .map(|item| value_from_literal_untyped(&item.item, scope))
                .collect(),
        ),
        InputValue::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(_, v)| v.item.as_variable().is_none_or(|name| scope.get(name).is_some()))
                .map(|(k, v)| (k.item.as_str(), value_from_literal_untyped(&v.item, scope)))
                .collect(),
        ),
    }
}

/// Converts an external value into a constant literal without consulting
/// any type.
pub fn value_to_literal_untyped(value: &Value) -> InputValue {
    match value {
        Value::Null => InputValue::Null,
        Value::Scalar(ScalarValue::Int(i)) => InputValue::Int((*i).into()),
        Value::Scalar(ScalarValue::Float(f)) => InputValue::Float(*f),
        Value::Scalar(ScalarValue::String(s)) => InputValue::String(s.clone()),
        Value::Scalar(ScalarValue::Boolean(b)) => InputValue::Boolean(*b),
        Value::List(items) => InputValue::List(
            items
                .iter()
                .map(|v| Spanning::unlocated(value_to_literal_untyped(v)))
                .collect(),
        ),
        Value::Object(o) => InputValue::Object(
            o.iter()
                .map(|(k, v)| {
                    (
                        Spanning::unlocated(k.clone()),
                        Spanning::unlocated(value_to_literal_untyped(v)),
                    )
                })
                .collect(),
        ),
    }
}

/// Converts the internal `value` of the input type `t` back into a constant
/// literal, so that coercing the literal yields `value` again.
///
/// Returns [`None`] if `value` is not a valid internal value of `t`.
pub fn value_to_literal<C>(schema: &SchemaType<C>, value: &Value, t: &Type<'_>) -> Option<InputValue> {
    if t.is_non_null() {
        if value.is_null() {
            return None;
        }
        return value_to_literal(schema, value, &t.nullable());
    }
    if value.is_null() {
        return Some(InputValue::Null);
    }

    if let Some(item_type) = t.list_item() {
        return match value {
            Value::List(items) => items
                .iter()
                .map(|v| value_to_literal(schema, v, item_type).map(Spanning::unlocated))
                .collect::<Option<Vec<_>>>()
                .map(InputValue::List),
            single => value_to_literal(schema, single, item_type),
        };
    }

    match schema.type_by_name(t.innermost_name())? {
        MetaType::Scalar(s) => match &s.value_to_literal {
            Some(to_literal) => to_literal(value),
            None => Some(value_to_literal_untyped(value)),
        },
        MetaType::Enum(e) => e
            .value_by_internal(value)
            .map(|v| InputValue::Enum(v.name.to_string())),
        MetaType::InputObject(io) => {
            let fields = value.as_object_value()?;
            io.input_fields
                .get()
                .iter()
                .filter_map(|def| {
                    let v = fields.get_field_value(&def.name)?;
                    Some(value_to_literal(schema, v, &def.arg_type).map(|lit| {
                        (
                            Spanning::unlocated(def.name.to_string()),
                            Spanning::unlocated(lit),
                        )
                    }))
                })
                .collect::<Option<Vec<_>>>()
                .map(InputValue::Object)
        }
        _ => None,
    }
}
