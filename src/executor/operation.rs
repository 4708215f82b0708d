use std::sync::Arc;

use fnv::FnvHashMap;
use tracing::debug;

use crate::{
    GraphQLError,
    ast::{Definition, OperationType},
    coercion::coerce_variable_values,
    executor::{
        ExecutionArgs, ExecutionContext, ExecutionError, ExecutionOutput, Executor,
        InitialIncrementalResult, Path, collect::collect_fields, incremental::subsequent_results,
    },
    schema::meta::ObjectMeta,
    value::Object,
};

/// Result of executing an operation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionResult {
    /// Data of the operation, or [`None`] if execution didn't start or a
    /// non-null root field failed.
    pub data: Option<Object>,
    /// Errors, in the order their paths appear in the response.
    pub errors: Vec<ExecutionError>,
    /// Reserved for implementors.
    pub extensions: Option<Object>,
}

impl ExecutionResult {
    /// Result of a request that failed with a single error.
    pub fn from_error(error: ExecutionError) -> Self {
        Self {
            data: None,
            errors: vec![error],
            extensions: None,
        }
    }

    /// Whether no error occurred.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builds the request state: selects the operation and coerces the
/// variables.
pub(super) fn prepare<'a, C>(
    args: ExecutionArgs<'a, C>,
) -> Result<(Executor<'a, C>, &'a ObjectMeta<C>), GraphQLError> {
    let schema_errors = args.schema.validate();
    if !schema_errors.is_empty() {
        return Err(GraphQLError::InvalidSchema(schema_errors.to_vec()));
    }

    let mut fragments = FnvHashMap::default();
    let mut operation = None;
    for def in args.document {
        match def {
            Definition::Operation(op) => {
                if args.operation_name.is_none() && operation.is_some() {
                    return Err(GraphQLError::MultipleOperationsProvided);
                }
                let move_op = args.operation_name.is_none()
                    || op.item.name.as_ref().map(|s| s.item) == args.operation_name;
                if move_op {
                    operation = Some(op);
                }
            }
            Definition::Fragment(f) => {
                fragments.insert(f.item.name.item, &f.item);
            }
        }
    }
    let operation = operation.ok_or_else(|| match args.operation_name {
        Some(name) => GraphQLError::UnknownOperationName(name.into()),
        None => GraphQLError::NoOperationProvided,
    })?;

    let operation_type = operation.item.operation_type;
    let root_type = args
        .schema
        .root_type(operation_type)
        .ok_or(GraphQLError::MissingRootType(operation_type))?;

    let variables = coerce_variable_values(
        args.schema,
        operation.item.variable_definitions.as_ref().map(|defs| &defs.item),
        &args.variables,
        args.options.max_coercion_errors,
    )
    .map_err(GraphQLError::VariableCoercion)?;

    let ctx = ExecutionContext {
        schema: args.schema,
        fragments,
        operation,
        variables,
        root_value: args.root_value,
        context: args.context,
        field_resolver: args.field_resolver,
        type_resolver: args.type_resolver,
        subscribe_field_resolver: args.subscribe_field_resolver,
        abort_signal: args.abort_signal,
    };
    Ok((Executor::new(ctx), root_type))
}

impl<'a, C: Sync> Executor<'a, C> {
    /// Executes the root selection set of the operation.
    ///
    /// Returns [`None`] if a non-null root field failed.
    pub(super) async fn execute_root(&self, root_type: &'a ObjectMeta<C>) -> Option<Object> {
        let ctx = &*self.ctx;
        let operation = ctx.operation;
        let collected = collect_fields(
            ctx.schema,
            &ctx.fragments,
            &ctx.variables,
            root_type,
            &operation.item.selection_set,
        );

        let source = Arc::new(ctx.root_value.clone());
        let path = Path::root();
        self.queue_deferred(root_type, &source, &path, collected.deferred);
        let fields = collected.grouped_field_set;
        let data = match operation.item.operation_type {
            OperationType::Mutation => {
                self.execute_fields_serially(root_type, source, &path, fields)
                    .await
            }
            OperationType::Query | OperationType::Subscription => {
                self.execute_fields(root_type, source, &path, fields).await
            }
        };

        match data {
            Ok(data) => Some(data),
            Err(e) => {
                self.push_error(e);
                None
            }
        }
    }

    fn operation_name(&self) -> Option<&'a str> {
        self.ctx.operation.item.name.as_ref().map(|n| n.item)
    }
}

/// Executes an operation, delivering `@defer` and `@stream` results
/// incrementally.
///
/// Request errors (no operation to execute, invalid variables, an invalid
/// schema) are reported as a single result without data.
pub async fn execute_incrementally<C: Sync>(args: ExecutionArgs<'_, C>) -> ExecutionOutput<'_> {
    let (exec, root_type) = match prepare(args) {
        Ok(prepared) => prepared,
        Err(e) => {
            debug!(error = %e, "request failed before execution");
            return ExecutionOutput::Single(e.into());
        }
    };

    debug!(operation = ?exec.operation_name(), "executing operation");
    let data = exec.execute_root(root_type).await;
    let errors = exec.take_errors();
    let pending = if data.is_some() {
        exec.take_pending()
    } else {
        Vec::new()
    };
    debug!(
        operation = ?exec.operation_name(),
        errors = errors.len(),
        pending = pending.len(),
        "operation executed",
    );

    match data {
        Some(data) if !pending.is_empty() => ExecutionOutput::Incremental {
            initial: InitialIncrementalResult {
                data,
                errors,
                has_next: true,
            },
            subsequent: subsequent_results(pending),
        },
        data => ExecutionOutput::Single(ExecutionResult {
            data,
            errors,
            extensions: None,
        }),
    }
}

/// Executes an operation, producing its whole result at once.
///
/// Operations that would deliver results incrementally fail with
/// [`GraphQLError::MultiplePayloads`].
pub async fn execute<C: Sync>(args: ExecutionArgs<'_, C>) -> ExecutionResult {
    match execute_incrementally(args).await {
        ExecutionOutput::Single(result) => result,
        ExecutionOutput::Incremental { .. } => GraphQLError::MultiplePayloads.into(),
    }
}

/// Executes an operation on the current thread, blocking until it
/// completes.
pub fn execute_sync<C: Sync>(args: ExecutionArgs<'_, C>) -> ExecutionResult {
    futures::executor::block_on(execute(args))
}
