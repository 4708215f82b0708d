use crate::{
    ast::{Arguments, Directive, InputValue, VariableDefinitions},
    coercion::{
        CoercionError, FragmentVariables, VariableScope, coerce_default_value,
        coerce_input_literal, coerce_input_value,
    },
    executor::{ExecutionError, FieldError, Path},
    parser::{SourcePosition, Span, Spanning},
    schema::{
        meta::Argument,
        model::{DirectiveType, SchemaType},
    },
    value::{Object, Value},
};

/// Coerces the raw `inputs` of a request against the variables an operation
/// declares, applying defaults.
///
/// # Errors
///
/// Every variable that cannot be coerced, each as a request error located at
/// the variable definition. Past `max_errors` errors processing stops and a
/// final error saying so is appended.
pub fn coerce_variable_values<C>(
    schema: &SchemaType<C>,
    definitions: Option<&VariableDefinitions<'_>>,
    inputs: &Object,
    max_errors: usize,
) -> Result<Object, Vec<ExecutionError>> {
    let mut coerced = Object::default();
    let mut errors = VariableErrors {
        errors: Vec::new(),
        max_errors,
    };
    let empty = Object::default();

    for (name, def) in definitions.into_iter().flat_map(VariableDefinitions::iter) {
        let t = &def.var_type.item;
        let at = name.start();

        if !schema
            .type_by_name(t.innermost_name())
            .is_some_and(|meta| meta.is_input())
        {
            errors.report(
                at,
                format!(
                    "Variable \"${}\" expected value of type \"{t}\" which cannot be used as \
                     an input type.",
                    name.item,
                ),
            )?;
            continue;
        }

        let Some(value) = inputs.get_field_value(name.item) else {
            if let Some(default) = &def.default_value {
                match coerce_input_literal(schema, &default.item, t, VariableScope::new(&empty)) {
                    Ok(Some(v)) => {
                        coerced.add_field(name.item, v);
                    }
                    Ok(None) => {}
                    Err(e) => errors.report(
                        at,
                        format!(
                            "Variable \"${}\" has invalid default value {}. {e}",
                            name.item, default.item,
                        ),
                    )?,
                }
            } else if t.is_non_null() {
                errors.report(
                    at,
                    format!(
                        "Variable \"${}\" of required type \"{t}\" was not provided.",
                        name.item,
                    ),
                )?;
            }
            continue;
        };

        if value.is_null() && t.is_non_null() {
            errors.report(
                at,
                format!(
                    "Variable \"${}\" of non-null type \"{t}\" must not be null.",
                    name.item,
                ),
            )?;
            continue;
        }

        match coerce_input_value(schema, value, t) {
            Ok(v) => {
                coerced.add_field(name.item, v);
            }
            Err(errs) => {
                for e in errs {
                    let invalid = e.value.as_ref().unwrap_or(value);
                    let path = if e.path.is_empty() {
                        String::new()
                    } else {
                        format!(" at \"{}{}\"", name.item, e.printed_path())
                    };
                    errors.report(
                        at,
                        format!(
                            "Variable \"${}\" got invalid value {invalid}{path}; {e}",
                            name.item,
                        ),
                    )?;
                }
            }
        }
    }

    if errors.errors.is_empty() {
        Ok(coerced)
    } else {
        Err(errors.errors)
    }
}

struct VariableErrors {
    errors: Vec<ExecutionError>,
    max_errors: usize,
}

impl VariableErrors {
    /// Records an error, or gives up with all the errors so far once the limit
    /// is reached.
    fn report(&mut self, at: SourcePosition, message: String) -> Result<(), Vec<ExecutionError>> {
        if self.errors.len() >= self.max_errors {
            let mut errors = std::mem::take(&mut self.errors);
            errors.push(ExecutionError::at_origin(FieldError::from(
                "Too many errors processing variables, error limit reached. Execution aborted.",
            )));
            return Err(errors);
        }
        self.errors
            .push(ExecutionError::new(vec![at], Path::root(), FieldError::from(message)));
        Ok(())
    }
}

/// Coerces the arguments given to a field or directive against their
/// `definitions`, applying defaults.
///
/// `span` locates the field or directive, for arguments that are missing.
///
/// # Errors
///
/// The first argument that cannot be coerced.
pub fn coerce_argument_values<C>(
    schema: &SchemaType<C>,
    definitions: &[Argument],
    arguments: Option<&Spanning<Arguments<'_>>>,
    span: Span,
    scope: VariableScope<'_>,
) -> Result<Object, Spanning<CoercionError>> {
    let mut coerced = Object::with_capacity(definitions.len());

    for def in definitions {
        let name = def.name.as_str();
        let t = &def.arg_type;
        let given = arguments.and_then(|args| args.item.get(name));

        let missing = match given.map(|lit| &lit.item) {
            None => Some(None),
            Some(InputValue::Variable(var)) if scope.get(var).is_none() => Some(Some(var)),
            Some(_) => None,
        };
        if let Some(variable) = missing {
            let span = given.map_or(span, |lit| lit.span);
            match &def.default_value {
                Some(default) => {
                    let v = coerce_default_value(schema, default, t)
                        .map_err(|e| Spanning::new(span, e))?;
                    coerced.add_field(name, v);
                }
                None if t.is_non_null() => {
                    let message = match variable {
                        Some(var) => format!(
                            "Argument \"{name}\" of required type \"{t}\" was provided the \
                             variable \"${var}\" which was not provided a runtime value.",
                        ),
                        None => format!("Argument \"{name}\" of required type \"{t}\" was not provided."),
                    };
                    return Err(Spanning::new(span, CoercionError::new(message)));
                }
                None => {}
            }
            continue;
        }

        let Some(literal) = given else { continue };
        let is_null = match &literal.item {
            InputValue::Variable(var) => scope.get(var).is_some_and(Value::is_null),
            lit => lit.is_null(),
        };
        if is_null && t.is_non_null() {
            return Err(Spanning::new(
                literal.span,
                CoercionError::new(format!(
                    "Argument \"{name}\" of non-null type \"{t}\" must not be null.",
                )),
            ));
        }

        match coerce_input_literal(schema, &literal.item, t, scope) {
            Ok(Some(v)) => {
                coerced.add_field(name, v);
            }
            Ok(None) => {}
            Err(e) => {
                return Err(Spanning::new(
                    literal.span,
                    CoercionError::new(format!(
                        "Argument \"{name}\" has invalid value {}. {e}",
                        literal.item,
                    )),
                ));
            }
        }
    }

    Ok(coerced)
}

/// Coerces the arguments of a directive usage.
///
/// # Errors
///
/// The first argument that cannot be coerced.
pub fn coerce_directive_values<C>(
    schema: &SchemaType<C>,
    directive: &DirectiveType,
    node: &Spanning<Directive<'_>>,
    scope: VariableScope<'_>,
) -> Result<Object, Spanning<CoercionError>> {
    coerce_argument_values(
        schema,
        &directive.arguments,
        node.item.arguments.as_ref(),
        node.span,
        scope,
    )
}

/// Binds the variables a fragment declares to the arguments of a spread.
///
/// Arguments are coerced in the `scope` of the spread. A variable whose
/// argument is missing or invalid takes its default, if any, and is
/// otherwise left without a value.
pub fn coerce_fragment_variables<C>(
    schema: &SchemaType<C>,
    definitions: &VariableDefinitions<'_>,
    arguments: Option<&Spanning<Arguments<'_>>>,
    scope: VariableScope<'_>,
) -> FragmentVariables {
    let empty = Object::default();
    let mut names = Vec::with_capacity(definitions.items.len());
    let mut values = Object::with_capacity(definitions.items.len());

    for (name, def) in definitions.iter() {
        let t = &def.var_type.item;
        names.push(name.item.to_owned());

        let given = arguments
            .and_then(|args| args.item.get(name.item))
            .and_then(|lit| coerce_input_literal(schema, &lit.item, t, scope).ok().flatten());
        let value = given.or_else(|| {
            def.default_value.as_ref().and_then(|d| {
                coerce_input_literal(schema, &d.item, t, VariableScope::new(&empty))
                    .ok()
                    .flatten()
            })
        });
        if let Some(v) = value {
            values.add_field(name.item, v);
        }
    }

    FragmentVariables::new(names, values)
}
