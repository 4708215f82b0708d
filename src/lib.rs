#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

// Only used by benches.
#[cfg(test)]
use bencher as _;

#[doc(inline)]
pub use futures::future::BoxFuture;

pub mod ast;
pub mod coercion;
pub mod executor;
pub mod integrations;
pub mod parser;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

#[cfg(test)]
mod executor_tests;
#[cfg(test)]
mod tests;

use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

pub use crate::{
    ast::{Definition, Document, InputValue, Operation, OperationType, Selection, Type},
    executor::{
        AbortController, AbortSignal, ExecutionArgs, ExecutionError, ExecutionOptions,
        ExecutionOutput, ExecutionResult, FieldError, FieldResult, IncrementalResult,
        InitialIncrementalResult, Path, PathSegment, ResolveInfo, ResolverContext,
        SubsequentIncrementalResult, SubscriptionStream, TypeResolverContext, execute,
        execute_incrementally, execute_sync, subscribe,
    },
    parser::{ParseError, SourcePosition, Span, Spanning},
    schema::{
        Thunk,
        meta::{self, MetaType},
        model::{SchemaConfig, SchemaError, SchemaType},
    },
    types::{FieldValue, MaybeAsync},
    validation::{RuleError, validate},
    value::{Object, ScalarValue, Value},
};

/// An error that prevented an operation from being executed.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum GraphQLError {
    /// Document failed to parse.
    #[display("{_0}")]
    ParseError(Spanning<ParseError>),

    /// Document failed validation.
    #[display("{}", _0.iter().format("\n"))]
    ValidationError(#[error(not(source))] Vec<RuleError>),

    /// Document contains no operation.
    #[display("Must provide an operation.")]
    NoOperationProvided,

    /// Document contains several operations but no operation name was given.
    #[display("Must provide operation name if query contains multiple operations.")]
    MultipleOperationsProvided,

    /// No operation has the given name.
    #[display("Unknown operation named \"{_0}\".")]
    UnknownOperationName(#[error(not(source))] String),

    /// Schema has no root type for the kind of operation.
    #[display("Schema is not configured to execute {_0} operation.")]
    MissingRootType(#[error(not(source))] OperationType),

    /// Schema is inconsistent.
    #[display("{}", _0.iter().format("\n"))]
    InvalidSchema(#[error(not(source))] Vec<SchemaError>),

    /// Variable values couldn't be coerced.
    #[display("{}", _0.iter().format("\n"))]
    VariableCoercion(#[error(not(source))] Vec<ExecutionError>),

    /// Operation would produce more than one payload while a single result
    /// was asked for.
    #[display(
        "Executing this GraphQL operation would unexpectedly produce multiple payloads \
         (due to @defer or @stream directive)"
    )]
    MultiplePayloads,

    /// [`subscribe()`] was called with an operation that isn't a
    /// subscription.
    #[display("Can only subscribe to subscription operations.")]
    NotSubscription,
}

impl From<Spanning<ParseError>> for GraphQLError {
    fn from(e: Spanning<ParseError>) -> Self {
        Self::ParseError(e)
    }
}

impl From<GraphQLError> for ExecutionResult {
    fn from(e: GraphQLError) -> Self {
        let errors = match e {
            GraphQLError::ParseError(e) => vec![ExecutionError::new(
                vec![e.span.start],
                Path::root(),
                e.item.into(),
            )],
            GraphQLError::ValidationError(errs) => errs
                .into_iter()
                .map(|e| {
                    ExecutionError::new(e.locations().to_vec(), Path::root(), e.message().into())
                })
                .collect(),
            GraphQLError::InvalidSchema(errs) => errs
                .into_iter()
                .map(|e| ExecutionError::at_origin(e.into()))
                .collect(),
            GraphQLError::VariableCoercion(errs) => errs,
            e => vec![ExecutionError::at_origin(e.into())],
        };
        Self {
            data: None,
            errors,
            extensions: None,
        }
    }
}

/// Parses a GraphQL document.
///
/// # Errors
///
/// If `source` isn't a syntactically valid document.
pub fn parse(source: &str) -> Result<Document<'_>, Spanning<ParseError>> {
    parser::parse_document_source(source)
}

/// Parses, validates and executes `source` against `schema` in one go.
///
/// Parse and validation failures are reported as a result without data.
/// Operations using `@defer` or `@stream` must go through
/// [`execute_incrementally()`] instead.
pub async fn graphql<C: Sync>(
    schema: &SchemaType<C>,
    source: &str,
    operation_name: Option<&str>,
    variables: Object,
    context: &C,
) -> ExecutionResult {
    let document = match parse(source) {
        Ok(document) => document,
        Err(e) => return GraphQLError::from(e).into(),
    };
    let errors = validate(schema, &document);
    if !errors.is_empty() {
        return GraphQLError::ValidationError(errors).into();
    }

    let mut args = ExecutionArgs::new(schema, &document, context).variables(variables);
    if let Some(name) = operation_name {
        args = args.operation_name(name);
    }
    execute(args).await
}
