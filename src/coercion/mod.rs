//! Input coercion: turning variable values and query literals into the
//! internal values resolvers receive, and internal values back into literals.

mod input;
mod literal;
mod variables;

use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

use crate::{
    executor::PathSegment,
    value::{Object, Value},
};

pub use self::{
    input::{coerce_default_value, coerce_input_value},
    literal::{
        coerce_input_literal, replace_variables, value_from_literal_untyped, value_to_literal,
        value_to_literal_untyped,
    },
    variables::{
        coerce_argument_values, coerce_directive_values, coerce_fragment_variables,
        coerce_variable_values,
    },
};

/// Failure to coerce an input value to its expected type.
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("{message}")]
pub struct CoercionError {
    /// Human-readable description.
    pub message: String,
    /// Position of the offending value inside the coerced value.
    pub path: Vec<PathSegment>,
    /// Offending value, if it came from an external input.
    pub value: Option<Value>,
}

impl CoercionError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            value: None,
        }
    }

    pub(crate) fn at(mut self, path: &[PathSegment], value: &Value) -> Self {
        self.path = path.to_vec();
        self.value = Some(value.clone());
        self
    }

    /// Renders [`CoercionError::path`] the way it's reported after a variable
    /// name, e.g. `.address.lines[0]`.
    pub fn printed_path(&self) -> String {
        self.path
            .iter()
            .format_with("", |s, f| match s {
                PathSegment::Key(k) => f(&format_args!(".{k}")),
                PathSegment::Index(i) => f(&format_args!("[{i}]")),
            })
            .to_string()
    }
}

/// Values bound to the variables a fragment declares, computed from the
/// arguments of one fragment spread.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentVariables {
    names: Vec<String>,
    values: Object,
}

impl FragmentVariables {
    pub(crate) fn new(names: Vec<String>, values: Object) -> Self {
        Self { names, values }
    }

    /// Whether the fragment declares the variable `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Coerced values of the declared variables that received one.
    pub fn values(&self) -> &Object {
        &self.values
    }
}

/// Variables visible at one point of a document: the coerced operation
/// variables, shadowed by the variables of the enclosing fragment.
#[derive(Clone, Copy, Debug)]
pub struct VariableScope<'v> {
    /// Coerced operation variables.
    pub operation: &'v Object,
    /// Variables of the fragment the current selection was reached through.
    pub fragment: Option<&'v FragmentVariables>,
}

impl<'v> VariableScope<'v> {
    /// Scope of the operation variables only.
    pub fn new(operation: &'v Object) -> Self {
        Self {
            operation,
            fragment: None,
        }
    }

    /// Scope inside a fragment whose variables are `fragment`.
    #[must_use]
    pub fn with_fragment(self, fragment: Option<&'v FragmentVariables>) -> Self {
        Self { fragment, ..self }
    }

    /// Value of the variable `name`, or [`None`] if it received no value.
    ///
    /// A variable declared by the enclosing fragment never falls back to an
    /// operation variable of the same name.
    pub fn get(&self, name: &str) -> Option<&'v Value> {
        match self.fragment {
            Some(f) if f.declares(name) => f.values.get_field_value(name),
            _ => self.operation.get_field_value(name),
        }
    }
}
