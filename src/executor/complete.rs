//! Resolving fields and completing the resolved values against their types.

use std::sync::Arc;

use futures::{
    FutureExt as _,
    future::{self, BoxFuture, Either},
};
use tracing::{trace, warn};

use crate::{
    ast::{self, Type},
    coercion::{CoercionError, VariableScope, coerce_argument_values, coerce_directive_values},
    executor::{
        ExecutionError, Executor, FieldError, FieldResult, Path, ResolveInfo, ResolverContext, TypeResolverContext,
        collect::{FieldDetails, GroupedFieldSet, collect_subfields},
        default_field_resolver, default_type_resolver,
        incremental::{StreamSource, StreamUsage},
    },
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{EnumMeta, Field, MetaType, ObjectMeta, ScalarMeta},
        model::SchemaType,
    },
    types::{FieldValue, ListItems, MaybeAsync},
    value::{Object, Value},
};

/// A field being executed: its definition and its occurrences in the query.
pub(super) struct FieldPlan<'a, C> {
    pub(super) parent_type: &'a ObjectMeta<C>,
    pub(super) field: &'a Field<C>,
    pub(super) node: &'a Spanning<ast::Field<'a>>,
    pub(super) details: Vec<FieldDetails<'a>>,
}

impl<C> FieldPlan<'_, C> {
    fn locations(&self) -> Vec<SourcePosition> {
        self.details.iter().map(|d| d.node.span.start).collect()
    }

    /// Error located at every occurrence of the field.
    pub(super) fn error(&self, path: &Path, error: impl Into<FieldError>) -> ExecutionError {
        ExecutionError::new(self.locations(), path.clone(), error.into())
    }

    fn coordinate(&self) -> String {
        format!("{}.{}", self.parent_type.name, self.field.name)
    }
}

fn located(path: &Path, e: Spanning<CoercionError>) -> ExecutionError {
    ExecutionError::new(vec![e.span.start], path.clone(), e.item.into())
}

impl<'a, C: Sync> Executor<'a, C> {
    /// Executes `fields` on `source` concurrently.
    ///
    /// The first error escaping a non-null field, in response key order,
    /// nulls the whole object.
    pub(super) fn execute_fields(
        &self,
        parent_type: &'a ObjectMeta<C>,
        source: Arc<FieldValue>,
        path: &Path,
        fields: GroupedFieldSet<'a>,
    ) -> BoxFuture<'a, Result<Object, ExecutionError>> {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(ordinal, (key, details))| {
                self.execute_field(parent_type, source.clone(), details, path.key(key, ordinal))
                    .map(move |value| (key, value))
            })
            .collect::<Vec<_>>();

        async move {
            let mut object = Object::with_capacity(fields.len());
            for (key, value) in future::join_all(fields).await {
                if let Some(value) = value? {
                    object.add_field(key, value);
                }
            }
            Ok(object)
        }
        .boxed()
    }

    /// Executes `fields` on `source` one after the other, as required for
    /// the root fields of mutations.
    pub(super) fn execute_fields_serially(
        &self,
        parent_type: &'a ObjectMeta<C>,
        source: Arc<FieldValue>,
        path: &Path,
        fields: GroupedFieldSet<'a>,
    ) -> BoxFuture<'a, Result<Object, ExecutionError>> {
        let exec = self.clone();
        let path = path.clone();

        async move {
            let mut object = Object::with_capacity(fields.len());
            for (ordinal, (key, details)) in fields.into_iter().enumerate() {
                let field = exec.execute_field(parent_type, source.clone(), details, path.key(key, ordinal));
                if let Some(value) = field.await? {
                    object.add_field(key, value);
                }
            }
            Ok(object)
        }
        .boxed()
    }

    /// Resolves and completes one response key.
    ///
    /// Returns [`None`] for fields the parent type doesn't define. An error
    /// is returned only if the field is non-null; otherwise it is recorded
    /// and the field becomes `null`.
    fn execute_field(
        &self,
        parent_type: &'a ObjectMeta<C>,
        source: Arc<FieldValue>,
        details: Vec<FieldDetails<'a>>,
        path: Path,
    ) -> BoxFuture<'a, Result<Option<Value>, ExecutionError>> {
        let exec = self.clone();

        async move {
            let Some(node) = details.first().map(|d| d.node) else {
                return Ok(None);
            };
            let name = node.item.name.item;
            if name == "__typename" {
                return Ok(Some(Value::scalar(parent_type.name.as_str())));
            }
            let Some(field) = parent_type.field_by_name(name) else {
                return Ok(None);
            };

            let plan = Arc::new(FieldPlan {
                parent_type,
                field,
                node,
                details,
            });
            let return_type = &field.field_type;
            let completed = match exec.resolve_field(&plan, &source, &path).await {
                Ok(value) => {
                    exec.complete_value(plan.clone(), return_type, path.clone(), value, true)
                        .await
                }
                Err(e) => Err(e),
            };

            match completed {
                Ok(value) => Ok(Some(value)),
                Err(e) if return_type.is_non_null() => Err(e),
                Err(e) => {
                    exec.null_out(e, &path);
                    Ok(Some(Value::Null))
                }
            }
        }
        .boxed()
    }

    async fn resolve_field(
        &self,
        plan: &FieldPlan<'a, C>,
        source: &FieldValue,
        path: &Path,
    ) -> Result<FieldValue, ExecutionError> {
        let ctx = &*self.ctx;
        let signal = &ctx.abort_signal;
        if signal.is_aborted() {
            warn!(path = %path, "operation aborted, field not resolved");
            return Err(plan.error(path, signal.reason()));
        }

        let args = self.field_arguments(plan, path)?;
        let info = self.resolve_info(plan, path);
        let rctx = ResolverContext {
            source,
            args: &args,
            context: ctx.context,
            info: &info,
            abort_signal: signal,
        };

        trace!(path = %path, field = %plan.field.name, "resolving field");
        let resolved = match plan.field.resolve.as_ref().or(ctx.field_resolver.as_ref()) {
            None => Ok(default_field_resolver(rctx)),
            Some(resolve) => self.unless_aborted(resolve(rctx), path).await,
        };
        resolved.map_err(|e| plan.error(path, e))
    }

    /// Waits for a schema callback, failing with the abort reason if the
    /// operation is aborted first.
    pub(super) async fn unless_aborted<T: Send>(
        &self,
        pending: MaybeAsync<'_, FieldResult<T>>,
        path: &Path,
    ) -> FieldResult<T> {
        let signal = &self.ctx.abort_signal;
        match pending {
            MaybeAsync::Ready(result) => result,
            MaybeAsync::Pending(fut) => match future::select(fut, signal.aborted()).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => {
                    warn!(path = %path, "operation aborted while resolving field");
                    Err(signal.reason().into())
                }
            },
        }
    }

    /// Coerces the arguments of the first occurrence of the field.
    pub(super) fn field_arguments(&self, plan: &FieldPlan<'a, C>, path: &Path) -> Result<Object, ExecutionError> {
        coerce_argument_values(
            self.ctx.schema,
            &plan.field.arguments,
            plan.node.item.arguments.as_ref(),
            plan.node.span,
            self.scope(plan),
        )
        .map_err(|e| located(path, e))
    }

    fn scope<'s>(&'s self, plan: &'s FieldPlan<'a, C>) -> VariableScope<'s> {
        VariableScope::new(&self.ctx.variables)
            .with_fragment(plan.details.first().and_then(|d| d.fragment_variables.as_deref()))
    }

    pub(super) fn resolve_info<'r>(&'r self, plan: &'r FieldPlan<'a, C>, path: &Path) -> ResolveInfo<'r, C> {
        let ctx = &*self.ctx;
        ResolveInfo {
            field_name: plan.field.name.as_str(),
            field_nodes: plan.details.iter().map(|d| d.node).collect(),
            return_type: &plan.field.field_type,
            parent_type: plan.parent_type,
            path: path.clone(),
            schema: ctx.schema,
            fragments: &ctx.fragments,
            root_value: &ctx.root_value,
            operation: &ctx.operation.item,
            variables: &ctx.variables,
        }
    }

    /// Completes a resolved `value` of the type `t`.
    ///
    /// `streamable` is set only for the value of the field itself, so that
    /// `@stream` applies to the outermost list.
    pub(super) fn complete_value(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        t: &'a Type<'static>,
        path: Path,
        value: FieldValue,
        streamable: bool,
    ) -> BoxFuture<'a, Result<Value, ExecutionError>> {
        let exec = self.clone();

        async move {
            if value.is_null() {
                return if t.is_non_null() {
                    Err(plan.error(
                        &path,
                        format!("Cannot return null for non-nullable field {}", plan.coordinate()),
                    ))
                } else {
                    Ok(Value::Null)
                };
            }

            let schema: &'a SchemaType<C> = exec.ctx.schema;
            match t {
                Type::List(item_type) | Type::NonNullList(item_type) => {
                    exec.complete_list(plan, item_type, path, value, streamable).await
                }
                Type::Named(name) | Type::NonNullNamed(name) => match schema.type_by_name(name) {
                    Some(MetaType::Scalar(meta)) => complete_scalar(&plan, meta, &path, &value),
                    Some(MetaType::Enum(meta)) => complete_enum(&plan, meta, &path, &value),
                    Some(MetaType::Object(meta)) => exec.complete_object(plan, meta, path, value).await,
                    Some(meta @ (MetaType::Interface(_) | MetaType::Union(_))) => {
                        exec.complete_abstract(plan, meta, path, value).await
                    }
                    Some(MetaType::InputObject(_)) | None => Err(plan.error(
                        &path,
                        format!("Cannot complete value of unexpected output type \"{name}\"."),
                    )),
                },
            }
        }
        .boxed()
    }

    async fn complete_list(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        item_type: &'a Type<'static>,
        path: Path,
        value: FieldValue,
        streamable: bool,
    ) -> Result<Value, ExecutionError> {
        let items = value.into_items().map_err(|_| {
            plan.error(
                &path,
                format!(
                    "Expected Iterable, but did not find one for field \"{}\".",
                    plan.coordinate(),
                ),
            )
        })?;

        let stream = if streamable {
            self.stream_usage(&plan, &path)?
        } else {
            None
        };
        let (items, remaining) = match items {
            ListItems::Ready(mut items) => {
                let remaining = match &stream {
                    Some(usage) if usage.initial_count < items.len() => {
                        Some(StreamSource::Items(items.split_off(usage.initial_count).into()))
                    }
                    _ => None,
                };
                (items, remaining)
            }
            ListItems::Pending(None) => (Vec::new(), None),
            ListItems::Pending(Some(source)) => {
                let limit = stream.as_ref().map(|usage| usage.initial_count);
                let mut source = StreamSource::Pending(source);
                let mut items = Vec::new();
                let mut exhausted = false;
                while limit.is_none_or(|limit| items.len() < limit) {
                    match self.next_list_item(&plan, &mut source, &path).await? {
                        Some(item) => items.push(item),
                        None => {
                            exhausted = true;
                            break;
                        }
                    }
                }
                (items, (!exhausted).then_some(source))
            }
        };

        let initial_count = items.len();
        let completed = future::join_all(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| self.complete_list_item(plan.clone(), item_type, path.index(index), item)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        if let (Some(usage), Some(remaining)) = (stream, remaining) {
            let task = self.stream_task(plan, item_type, path, usage.label, initial_count, remaining);
            self.queue(task);
        }
        Ok(Value::List(completed))
    }

    /// Completes a list item, turning its error into `null` when the item
    /// type allows it.
    pub(super) async fn complete_list_item(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        item_type: &'a Type<'static>,
        path: Path,
        item: FieldValue,
    ) -> Result<Value, ExecutionError> {
        match self.complete_value(plan, item_type, path.clone(), item, false).await {
            Err(e) if !item_type.is_non_null() => {
                self.null_out(e, &path);
                Ok(Value::Null)
            }
            completed => completed,
        }
    }

    /// Reads an active `@stream` on the field.
    fn stream_usage(&self, plan: &FieldPlan<'a, C>, path: &Path) -> Result<Option<StreamUsage>, ExecutionError> {
        let Some(node) = ast::find_directive(&plan.node.item.directives, "stream") else {
            return Ok(None);
        };
        let schema = self.ctx.schema;
        let Some(directive) = schema.directive_by_name("stream") else {
            return Ok(None);
        };
        let args = coerce_directive_values(schema, directive, node, self.scope(plan))
            .map_err(|e| located(path, e))?;
        if args.get_field_value("if").and_then(Value::as_bool_value) == Some(false) {
            return Ok(None);
        }

        let initial_count = args
            .get_field_value("initialCount")
            .and_then(Value::as_int_value)
            .unwrap_or(0);
        let Ok(initial_count) = usize::try_from(initial_count) else {
            return Err(plan.error(path, "initialCount must be a positive integer"));
        };
        Ok(Some(StreamUsage {
            initial_count,
            label: args
                .get_field_value("label")
                .and_then(Value::as_string_value)
                .map(Into::into),
        }))
    }

    async fn complete_object(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        object_type: &'a ObjectMeta<C>,
        path: Path,
        value: FieldValue,
    ) -> Result<Value, ExecutionError> {
        let ctx = &*self.ctx;
        let is_type_of = object_type
            .is_type_of
            .as_ref()
            .zip(ctx.schema.type_by_name(&object_type.name));
        if let Some((is_type_of, meta)) = is_type_of {
            let info = self.resolve_info(&plan, &path);
            let check = is_type_of(TypeResolverContext {
                value: &value,
                context: ctx.context,
                info: &info,
                return_type: meta,
            });
            let matches = self
                .unless_aborted(check, &path)
                .await
                .map_err(|e| plan.error(&path, e))?;
            if !matches {
                return Err(plan.error(
                    &path,
                    format!("Expected value of type \"{}\" but got: {value}.", object_type.name),
                ));
            }
        }

        let collected = collect_subfields(
            ctx.schema,
            &ctx.fragments,
            &ctx.variables,
            object_type,
            &plan.details,
        );
        let source = Arc::new(value);
        self.queue_deferred(object_type, &source, &path, collected.deferred);
        self.execute_fields(object_type, source, &path, collected.grouped_field_set)
            .await
            .map(Value::Object)
    }

    async fn complete_abstract(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        abstract_type: &'a MetaType<C>,
        path: Path,
        value: FieldValue,
    ) -> Result<Value, ExecutionError> {
        let ctx = &*self.ctx;
        let resolver = match abstract_type {
            MetaType::Interface(i) => i.resolve_type.as_ref(),
            MetaType::Union(u) => u.resolve_type.as_ref(),
            _ => None,
        }
        .or(ctx.type_resolver.as_ref());

        let runtime_name = {
            let info = self.resolve_info(&plan, &path);
            let tctx = TypeResolverContext {
                value: &value,
                context: ctx.context,
                info: &info,
                return_type: abstract_type,
            };
            let resolved = match resolver {
                Some(resolve_type) => resolve_type(tctx),
                None => MaybeAsync::pending(default_type_resolver(tctx)),
            };
            self.unless_aborted(resolved, &path)
                .await
                .map_err(|e| plan.error(&path, e))?
        };

        let object_type = self.runtime_object_type(&plan, abstract_type, runtime_name.as_deref(), &path)?;
        self.complete_object(plan, object_type, path, value).await
    }

    fn runtime_object_type(
        &self,
        plan: &FieldPlan<'a, C>,
        abstract_type: &'a MetaType<C>,
        runtime_name: Option<&str>,
        path: &Path,
    ) -> Result<&'a ObjectMeta<C>, ExecutionError> {
        let schema: &'a SchemaType<C> = self.ctx.schema;
        let abstract_name = abstract_type.name();

        let Some(name) = runtime_name else {
            return Err(plan.error(
                path,
                format!(
                    "Abstract type \"{abstract_name}\" must resolve to an Object type at runtime \
                     for field \"{}\". Either the \"{abstract_name}\" type should provide a \
                     \"resolveType\" function or each possible type should provide an \
                     \"isTypeOf\" function.",
                    plan.coordinate(),
                ),
            ));
        };
        let Some(meta) = schema.type_by_name(name) else {
            return Err(plan.error(
                path,
                format!(
                    "Abstract type \"{abstract_name}\" was resolved to a type \"{name}\" that does \
                     not exist inside the schema.",
                ),
            ));
        };
        let MetaType::Object(object_type) = meta else {
            return Err(plan.error(
                path,
                format!("Abstract type \"{abstract_name}\" was resolved to a non-object type \"{name}\"."),
            ));
        };
        if !schema.is_possible_type(abstract_type, name) {
            return Err(plan.error(
                path,
                format!("Runtime Object type \"{name}\" is not a possible type for \"{abstract_name}\"."),
            ));
        }
        Ok(object_type)
    }
}

fn complete_scalar<C>(
    plan: &FieldPlan<'_, C>,
    meta: &ScalarMeta,
    path: &Path,
    value: &FieldValue,
) -> Result<Value, ExecutionError> {
    let Some(raw) = value.to_value() else {
        return Err(plan.error(
            path,
            format!("Scalar \"{}\" cannot represent value: {value}", meta.name),
        ));
    };
    match (meta.coerce_output)(&raw) {
        Ok(v) if v.is_null() => Err(plan.error(
            path,
            format!(
                "Expected `{}.serialize({raw})` to return non-nullable value, returned: null",
                meta.name,
            ),
        )),
        Ok(v) => Ok(v),
        Err(e) => Err(plan.error(path, e)),
    }
}

fn complete_enum<C>(
    plan: &FieldPlan<'_, C>,
    meta: &EnumMeta,
    path: &Path,
    value: &FieldValue,
) -> Result<Value, ExecutionError> {
    value
        .to_value()
        .and_then(|raw| meta.value_by_internal(&raw))
        .map(|v| Value::scalar(v.name.as_str()))
        .ok_or_else(|| {
            plan.error(
                path,
                format!("Enum \"{}\" cannot represent value: {value}", meta.name),
            )
        })
}
