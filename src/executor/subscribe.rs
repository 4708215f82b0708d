use std::sync::Arc;

use futures::{StreamExt as _, stream::BoxStream};
use tracing::debug;

use crate::{
    GraphQLError,
    ast::OperationType,
    executor::{
        ExecutionArgs, ExecutionContext, ExecutionError, ExecutionResult, Executor, FieldError, Path,
        ResolverContext, collect::collect_fields, complete::FieldPlan, operation::prepare,
    },
    schema::meta::{EventStream, ObjectMeta},
    types::FieldValue,
};

/// Stream of results of a subscription, one per source event.
pub type SubscriptionStream<'a> = BoxStream<'a, ExecutionResult>;

/// Creates the source event stream of a subscription operation and maps
/// each event to the result of executing the operation on it.
///
/// The stream ends once the request's abort signal is triggered.
///
/// # Errors
///
/// If the request can't be executed, or the source stream can't be created.
pub async fn subscribe<C: Sync>(args: ExecutionArgs<'_, C>) -> Result<SubscriptionStream<'_>, ExecutionResult> {
    let (exec, root_type) = prepare(args)?;
    if exec.ctx.operation.item.operation_type != OperationType::Subscription {
        return Err(GraphQLError::NotSubscription.into());
    }

    let plan = exec
        .subscription_field(root_type)
        .map_err(ExecutionResult::from_error)?;
    let path = Path::root().key(plan.node.item.response_key(), 0);
    let events = exec
        .source_stream(&plan, &path)
        .await
        .map_err(ExecutionResult::from_error)?;
    debug!(field = %plan.field.name, "subscription started");

    let ctx = exec.ctx;
    let aborted = ctx.abort_signal.aborted();
    Ok(events
        .take_until(aborted)
        .then(move |event| {
            let ctx = ctx.clone();
            let plan = plan.clone();
            let path = path.clone();
            async move {
                match event {
                    Ok(root_value) => execute_event(ctx.with_root_value(root_value), root_type).await,
                    Err(e) => ExecutionResult::from_error(plan.error(&path, e)),
                }
            }
        })
        .boxed())
}

async fn execute_event<'a, C: Sync>(ctx: ExecutionContext<'a, C>, root_type: &'a ObjectMeta<C>) -> ExecutionResult {
    let exec = Executor::new(ctx);
    let data = exec.execute_root(root_type).await;
    if data.is_some() && !exec.take_pending().is_empty() {
        return GraphQLError::MultiplePayloads.into();
    }
    ExecutionResult {
        data,
        errors: exec.take_errors(),
        extensions: None,
    }
}

impl<'a, C: Sync> Executor<'a, C> {
    /// The single root field of a subscription.
    fn subscription_field(&self, root_type: &'a ObjectMeta<C>) -> Result<Arc<FieldPlan<'a, C>>, ExecutionError> {
        let ctx = &*self.ctx;
        let operation = ctx.operation;
        let collected = collect_fields(
            ctx.schema,
            &ctx.fragments,
            &ctx.variables,
            root_type,
            &operation.item.selection_set,
        );

        let first = collected
            .grouped_field_set
            .into_iter()
            .next()
            .and_then(|(_, details)| Some((details.first()?.node, details)));
        let Some((node, details)) = first else {
            return Err(ExecutionError::new(
                vec![operation.span.start],
                Path::root(),
                FieldError::from("Subscription must select one top level field."),
            ));
        };

        let name = node.item.name.item;
        let Some(field) = root_type.field_by_name(name) else {
            return Err(ExecutionError::new(
                vec![node.span.start],
                Path::root().key(node.item.response_key(), 0),
                FieldError::from(format!("The subscription field \"{name}\" is not defined.")),
            ));
        };
        Ok(Arc::new(FieldPlan {
            parent_type: root_type,
            field,
            node,
            details,
        }))
    }

    /// Calls the subscribe resolver of the root field.
    async fn source_stream(&self, plan: &FieldPlan<'a, C>, path: &Path) -> Result<EventStream, ExecutionError> {
        let ctx = &*self.ctx;
        let args = self.field_arguments(plan, path)?;
        let info = self.resolve_info(plan, path);
        let Some(subscriber) = plan
            .field
            .subscribe
            .as_ref()
            .or(ctx.subscribe_field_resolver.as_ref())
        else {
            return Err(plan.error(
                path,
                format!(
                    "Subscription field \"{}\" has no source stream resolver.",
                    plan.field.name,
                ),
            ));
        };

        let root_value: &FieldValue = &ctx.root_value;
        let source = subscriber(ResolverContext {
            source: root_value,
            args: &args,
            context: ctx.context,
            info: &info,
            abort_signal: &ctx.abort_signal,
        });
        self.unless_aborted(source, path)
            .await
            .map_err(|e| plan.error(path, e))
    }
}
