//! Resolve the document to values

mod abort;
pub mod collect;
mod complete;
mod incremental;
mod operation;
mod path;
mod subscribe;

use std::{
    fmt::{self, Display},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use arcstr::ArcStr;

use crate::{
    ast::{self, Definition, Operation, Type},
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{
            EventStream, FieldResolverFn, MetaType, ObjectMeta, Resolution, SubscribeFn,
            TypeResolverFn,
        },
        model::SchemaType,
    },
    types::{FieldValue, MaybeAsync},
    value::{Object, Value},
};

pub use self::{
    abort::{ABORTED_MESSAGE, AbortController, AbortSignal},
    collect::{CollectedFields, DeferredFragment, FieldDetails, Fragments, GroupedFieldSet},
    incremental::{
        ExecutionOutput, IncrementalResult, InitialIncrementalResult, SubsequentIncrementalResult,
    },
    operation::{ExecutionResult, execute, execute_incrementally, execute_sync},
    path::{Path, PathSegment},
    subscribe::{SubscriptionStream, subscribe},
};

use self::incremental::IncrementalTask;

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional `Value` structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use sumac::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::null(),
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// The `extensions` are added to the `"extensions"` field of the error
    /// object in the JSON response:
    ///
    /// ```json
    /// {
    ///   "errors": [
    ///     "message": "Could not open connection to the database",
    ///     "locations": [{"line": 2, "column": 4}],
    ///     "extensions": {
    ///       "internal_error": "Connection refused"
    ///     }
    ///   ]
    /// }
    /// ```
    ///
    /// If the argument is [`Value::null()`], no extra data will be included.
    pub fn new<T: Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    ///
    /// If there is no `"extensions"`, then [`Value::Null`] will be returned.
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`
pub type FieldResult<T> = Result<T, FieldError>;

/// Error type for errors that occur during query execution
///
/// All execution errors contain the source positions in the query of the
/// field that failed to resolve, and the path to it in the response.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    locations: Vec<SourcePosition>,
    path: Path,
    error: FieldError,
}

impl ExecutionError {
    /// Construct a new execution error occurring at the given `locations` and
    /// response `path`.
    pub fn new(locations: Vec<SourcePosition>, path: Path, error: FieldError) -> Self {
        Self {
            locations,
            path,
            error,
        }
    }

    /// Construct a new execution error not tied to any part of the query.
    pub fn at_origin(error: FieldError) -> Self {
        Self {
            locations: Vec::new(),
            path: Path::root(),
            error,
        }
    }

    /// The error message
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// Shortcut for the message of [`ExecutionError::error()`].
    pub fn message(&self) -> &str {
        self.error.message()
    }

    /// The source locations _in the query_ of the field that failed to
    /// resolve
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }

    /// The path in the response to the value that failed to resolve
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Information about the field being resolved.
pub struct ResolveInfo<'r, C> {
    /// Name of the field in the schema.
    pub field_name: &'r str,
    /// Every occurrence of the field in the query, merged under one response
    /// key.
    pub field_nodes: Vec<&'r Spanning<ast::Field<'r>>>,
    /// Declared type of the field.
    pub return_type: &'r Type<'static>,
    /// Object type the field belongs to.
    pub parent_type: &'r ObjectMeta<C>,
    /// Path to the field in the response.
    pub path: Path,
    /// Schema being executed.
    pub schema: &'r SchemaType<C>,
    /// Fragment definitions of the document.
    pub fragments: &'r Fragments<'r>,
    /// Root value of the operation.
    pub root_value: &'r FieldValue,
    /// Executed operation.
    pub operation: &'r Operation<'r>,
    /// Coerced variables of the operation.
    pub variables: &'r Object,
}

/// Arguments handed to a field resolver.
pub struct ResolverContext<'r, C> {
    /// Value of the parent object.
    pub source: &'r FieldValue,
    /// Coerced arguments of the field.
    pub args: &'r Object,
    /// Request context.
    pub context: &'r C,
    /// Information about the field.
    pub info: &'r ResolveInfo<'r, C>,
    /// Signal of the request being aborted.
    pub abort_signal: &'r AbortSignal,
}

impl<'r, C> ResolverContext<'r, C> {
    /// Coerced value of the argument `name`, if given or defaulted.
    pub fn arg(&self, name: &str) -> Option<&'r Value> {
        self.args.get_field_value(name)
    }
}

impl<C> Clone for ResolverContext<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ResolverContext<'_, C> {}

/// Arguments handed to an abstract type resolver or to an object type's
/// membership check.
pub struct TypeResolverContext<'r, C> {
    /// Value whose type is being determined.
    pub value: &'r FieldValue,
    /// Request context.
    pub context: &'r C,
    /// Information about the field that returned the value.
    pub info: &'r ResolveInfo<'r, C>,
    /// Type the value was returned as.
    pub return_type: &'r MetaType<C>,
}

impl<C> Clone for TypeResolverContext<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for TypeResolverContext<'_, C> {}

/// Looks the field up by name on object-shaped source data.
///
/// This is what fields without their own resolver use, unless
/// [`ExecutionArgs::field_resolver()`] overrides it.
pub fn default_field_resolver<C>(ctx: ResolverContext<'_, C>) -> FieldValue {
    ctx.source
        .as_value()
        .and_then(Value::as_object_value)
        .and_then(|o| o.get_field_value(ctx.info.field_name))
        .cloned()
        .map_or(FieldValue::Null, FieldValue::Value)
}

/// Determines the concrete object type of `ctx.value` without a type
/// resolver: from a type tag, from a `__typename` key of object data, or as
/// the first possible type whose membership check accepts it.
///
/// # Errors
///
/// If a membership check fails.
pub async fn default_type_resolver<C>(ctx: TypeResolverContext<'_, C>) -> FieldResult<Option<ArcStr>> {
    if let Some(name) = ctx.value.type_name() {
        return Ok(Some(name.into()));
    }
    let typename = ctx
        .value
        .as_value()
        .and_then(Value::as_object_value)
        .and_then(|o| o.get_field_value("__typename"))
        .and_then(Value::as_string_value);
    if let Some(name) = typename {
        return Ok(Some(name.into()));
    }
    let schema = ctx.info.schema;
    for possible in schema.possible_types(ctx.return_type) {
        let (Some(is_type_of), Some(meta)) = (&possible.is_type_of, schema.type_by_name(&possible.name))
        else {
            continue;
        };
        let check = TypeResolverContext {
            return_type: meta,
            ..ctx
        };
        if is_type_of(check).resolve().await? {
            return Ok(Some(possible.name.clone()));
        }
    }
    Ok(None)
}

/// Options tuning execution.
#[derive(Clone, Copy, Debug)]
pub struct ExecutionOptions {
    max_coercion_errors: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_coercion_errors: 50,
        }
    }
}

impl ExecutionOptions {
    /// Sets the number of variable coercion errors after which coercion
    /// stops.
    #[must_use]
    pub fn max_coercion_errors(mut self, max: usize) -> Self {
        self.max_coercion_errors = max;
        self
    }
}

/// Everything a request is executed from.
pub struct ExecutionArgs<'a, C> {
    schema: &'a SchemaType<C>,
    document: &'a [Definition<'a>],
    context: &'a C,
    root_value: FieldValue,
    variables: Object,
    operation_name: Option<&'a str>,
    field_resolver: Option<FieldResolverFn<C>>,
    type_resolver: Option<TypeResolverFn<C>>,
    subscribe_field_resolver: Option<SubscribeFn<C>>,
    abort_signal: AbortSignal,
    options: ExecutionOptions,
}

impl<'a, C> ExecutionArgs<'a, C> {
    /// Executes `document` against `schema`, handing `context` to every
    /// resolver.
    pub fn new(schema: &'a SchemaType<C>, document: &'a [Definition<'a>], context: &'a C) -> Self {
        Self {
            schema,
            document,
            context,
            root_value: FieldValue::Null,
            variables: Object::default(),
            operation_name: None,
            field_resolver: None,
            type_resolver: None,
            subscribe_field_resolver: None,
            abort_signal: AbortSignal::never(),
            options: ExecutionOptions::default(),
        }
    }

    /// Sets the source value of the root fields.
    #[must_use]
    pub fn root_value(mut self, root_value: impl Into<FieldValue>) -> Self {
        self.root_value = root_value.into();
        self
    }

    /// Sets the raw variable values, as received with the request.
    #[must_use]
    pub fn variables(mut self, variables: Object) -> Self {
        self.variables = variables;
        self
    }

    /// Selects the operation to execute by name.
    #[must_use]
    pub fn operation_name(mut self, name: &'a str) -> Self {
        self.operation_name = Some(name);
        self
    }

    /// Sets the resolver of fields that don't have their own.
    #[must_use]
    pub fn field_resolver<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> Resolution<'r> + Send + Sync + 'static,
    {
        self.field_resolver = Some(Arc::new(f));
        self
    }

    /// Sets the type resolver of abstract types that don't have their own.
    #[must_use]
    pub fn type_resolver<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<Option<ArcStr>>>
            + Send
            + Sync
            + 'static,
    {
        self.type_resolver = Some(Arc::new(f));
        self
    }

    /// Sets the source stream factory of subscription fields that don't have
    /// their own.
    #[must_use]
    pub fn subscribe_field_resolver<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<EventStream>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe_field_resolver = Some(Arc::new(f));
        self
    }

    /// Sets the signal aborting the request.
    #[must_use]
    pub fn abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort_signal = signal;
        self
    }

    /// Sets the [`ExecutionOptions`].
    #[must_use]
    pub fn options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }
}

/// State of one request, shared by every field being executed.
pub(crate) struct ExecutionContext<'a, C> {
    schema: &'a SchemaType<C>,
    fragments: Fragments<'a>,
    operation: &'a Spanning<Operation<'a>>,
    variables: Object,
    root_value: FieldValue,
    context: &'a C,
    field_resolver: Option<FieldResolverFn<C>>,
    type_resolver: Option<TypeResolverFn<C>>,
    subscribe_field_resolver: Option<SubscribeFn<C>>,
    abort_signal: AbortSignal,
}

impl<C> ExecutionContext<'_, C> {
    /// Same request, executed from another root value.
    fn with_root_value(&self, root_value: FieldValue) -> Self {
        Self {
            schema: self.schema,
            fragments: self.fragments.clone(),
            operation: self.operation,
            variables: self.variables.clone(),
            root_value,
            context: self.context,
            field_resolver: self.field_resolver.clone(),
            type_resolver: self.type_resolver.clone(),
            subscribe_field_resolver: self.subscribe_field_resolver.clone(),
            abort_signal: self.abort_signal.clone(),
        }
    }
}

/// Errors and incremental work produced for one payload.
#[derive(Default)]
struct DeliveryGroup<'a> {
    errors: RwLock<Vec<ExecutionError>>,
    pending: Mutex<Vec<IncrementalTask<'a>>>,
}

/// Query execution engine
///
/// The executor drives the execution of an operation. It is cheap to clone:
/// clones share the request state and the payload being built.
pub(crate) struct Executor<'a, C> {
    ctx: Arc<ExecutionContext<'a, C>>,
    group: Arc<DeliveryGroup<'a>>,
}

impl<C> Clone for Executor<'_, C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            group: self.group.clone(),
        }
    }
}

impl<'a, C> Executor<'a, C> {
    fn new(ctx: ExecutionContext<'a, C>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            group: Arc::default(),
        }
    }

    /// Executor of the same request building a separate payload.
    fn in_new_group(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            group: Arc::default(),
        }
    }

    fn push_error(&self, error: ExecutionError) {
        self.group
            .errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Takes the errors recorded so far, in the order their paths appear in
    /// the response.
    fn take_errors(&self) -> Vec<ExecutionError> {
        let mut errors = std::mem::take(
            &mut *self
                .group
                .errors
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        );
        errors.sort_by_cached_key(|e| e.path.ordinals());
        errors
    }

    fn queue(&self, task: IncrementalTask<'a>) {
        self.group
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
    }

    fn take_pending(&self) -> Vec<IncrementalTask<'a>> {
        std::mem::take(
            &mut *self
                .group
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Records the error that made the value at `path` null, and drops the
    /// incremental work queued below it.
    fn null_out(&self, error: ExecutionError, path: &Path) {
        self.push_error(error);
        self.group
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|task| !task.path.starts_with(path));
    }
}
