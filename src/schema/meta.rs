//! Types used to describe a GraphQL schema

use std::{fmt, sync::Arc};

use arcstr::ArcStr;
use futures::{future::BoxFuture, stream::BoxStream};

use crate::{
    ast::{InputValue, Type},
    executor::{FieldError, FieldResult, ResolverContext, TypeResolverContext},
    schema::{model::TypeKind, thunk::Thunk},
    types::{FieldValue, MaybeAsync, scalars},
    value::Value,
};

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    #[default]
    Current,
    /// The field/variant is deprecated, with an optional reason
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        match self {
            Self::Current => false,
            Self::Deprecated(_) => true,
        }
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Current => None,
            Self::Deprecated(rsn) => rsn.as_deref(),
        }
    }
}

/// Outcome of a field resolver.
pub type Resolution<'r> = MaybeAsync<'r, FieldResult<FieldValue>>;

/// Shortcut for a field resolver.
pub type FieldResolverFn<C> =
    Arc<dyn for<'r> Fn(ResolverContext<'r, C>) -> Resolution<'r> + Send + Sync>;

/// Source event stream of a subscription field.
pub type EventStream = BoxStream<'static, FieldResult<FieldValue>>;

/// Shortcut for a subscription source stream factory.
pub type SubscribeFn<C> = Arc<
    dyn for<'r> Fn(ResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<EventStream>>
        + Send
        + Sync,
>;

/// Shortcut for an abstract type resolver, returning the name of the
/// concrete object type of a value.
pub type TypeResolverFn<C> = Arc<
    dyn for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<Option<ArcStr>>>
        + Send
        + Sync,
>;

/// Shortcut for an object type membership check.
pub type IsTypeOfFn<C> =
    Arc<dyn for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<bool>> + Send + Sync>;

/// Shortcut for a scalar output serializer.
pub type CoerceOutputFn = Arc<dyn Fn(&Value) -> Result<Value, FieldError> + Send + Sync>;

/// Shortcut for a scalar parser of external (variable) values.
pub type CoerceInputFn = Arc<dyn Fn(&Value) -> Result<Value, FieldError> + Send + Sync>;

/// Shortcut for a scalar parser of query literals.
///
/// Variables are already substituted when this runs.
pub type CoerceLiteralFn = Arc<dyn Fn(&InputValue) -> Result<Value, FieldError> + Send + Sync>;

/// Shortcut for converting internal scalar values back into literals.
pub type ValueToLiteralFn = Arc<dyn Fn(&Value) -> Option<InputValue> + Send + Sync>;

/// Scalar type metadata
#[derive(Clone)]
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub specified_by_url: Option<ArcStr>,
    pub(crate) coerce_output: CoerceOutputFn,
    pub(crate) coerce_input: CoerceInputFn,
    pub(crate) coerce_literal: Option<CoerceLiteralFn>,
    pub(crate) value_to_literal: Option<ValueToLiteralFn>,
}

/// Object type metadata
pub struct ObjectMeta<C> {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Thunk<Vec<Field<C>>>,
    #[doc(hidden)]
    pub interface_names: Thunk<Vec<ArcStr>>,
    pub(crate) is_type_of: Option<IsTypeOfFn<C>>,
}

/// Interface type metadata
pub struct InterfaceMeta<C> {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Thunk<Vec<Field<C>>>,
    #[doc(hidden)]
    pub interface_names: Thunk<Vec<ArcStr>>,
    pub(crate) resolve_type: Option<TypeResolverFn<C>>,
}

/// Union type metadata
pub struct UnionMeta<C> {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub of_type_names: Thunk<Vec<ArcStr>>,
    pub(crate) resolve_type: Option<TypeResolverFn<C>>,
}

/// Enum type metadata
#[derive(Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub values: Thunk<Vec<EnumValue>>,
}

/// Input object metadata
#[derive(Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub input_fields: Thunk<Vec<Argument>>,
    /// Whether exactly one field must be given (`@oneOf`).
    pub is_one_of: bool,
}

/// Generic type metadata
#[expect(missing_docs, reason = "self-explanatory")]
pub enum MetaType<C> {
    Scalar(ScalarMeta),
    Object(ObjectMeta<C>),
    Interface(InterfaceMeta<C>),
    Union(UnionMeta<C>),
    Enum(EnumMeta),
    InputObject(InputObjectMeta),
}

/// Metadata for a field
pub struct Field<C> {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: Type<'static>,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
    pub(crate) resolve: Option<FieldResolverFn<C>>,
    pub(crate) subscribe: Option<SubscribeFn<C>>,
}

/// Default of an argument or input field.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    /// External value, coerced like a variable value.
    Value(Value),
    /// Constant literal, coerced like an argument literal.
    Literal(InputValue),
}

/// Metadata for an argument to a field, or for a field of an input object
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: Type<'static>,
    #[doc(hidden)]
    pub default_value: Option<DefaultValue>,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
}

/// Metadata for a single value in an enum
#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    ///
    /// Note: this is not the description of the enum itself; it's the
    /// description of this enum _value_.
    pub description: Option<ArcStr>,
    /// Internal value handed to resolvers. Defaults to the name.
    pub value: Value,
    /// Whether the field is deprecated or not, with an optional reason.
    pub deprecation_status: DeprecationStatus,
}

impl<C> MetaType<C> {
    /// Access the name of the type
    pub fn name(&self) -> &ArcStr {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// Access the description of the type, if applicable
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta { description, .. })
            | Self::Object(ObjectMeta { description, .. })
            | Self::Interface(InterfaceMeta { description, .. })
            | Self::Union(UnionMeta { description, .. })
            | Self::Enum(EnumMeta { description, .. })
            | Self::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
        }
    }

    /// Construct a `TypeKind` for a given type
    pub fn type_kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Access a field's meta data given its name
    ///
    /// Only objects and interfaces have fields. This method always returns `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field<C>> {
        match self {
            Self::Object(ObjectMeta { fields, .. })
            | Self::Interface(InterfaceMeta { fields, .. }) => {
                fields.get().iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Access an input field's meta data given its name
    ///
    /// Only input objects have input fields. This method always returns `None` for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            Self::InputObject(InputObjectMeta { input_fields, .. }) => {
                input_fields.get().iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Enum(_) | Self::Scalar(_))
    }

    /// Returns true if the type is abstract
    ///
    /// Only interfaces and unions are abstract types.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can be used in input positions, e.g. arguments or variables
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Returns true if the type can be the type of a field.
    pub fn is_output(&self) -> bool {
        !matches!(self, Self::InputObject(_))
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Scalar(_)) && scalars::is_builtin_scalar(self.name())
    }

    /// Object metadata, if this is an object type.
    pub fn as_object(&self) -> Option<&ObjectMeta<C>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] type with the specified `name`.
    ///
    /// Without further configuration, values pass through unchanged in both
    /// directions and literals are converted structurally.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            specified_by_url: None,
            coerce_output: Arc::new(|v| Ok(v.clone())),
            coerce_input: Arc::new(|v| Ok(v.clone())),
            coerce_literal: None,
            value_to_literal: None,
        }
    }

    /// Sets the `description` of this [`ScalarMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the [specification URL][0] for this [`ScalarMeta`] type.
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<ArcStr>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    /// Sets the serializer producing response values.
    #[must_use]
    pub fn coerce_output(
        mut self,
        f: impl Fn(&Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.coerce_output = Arc::new(f);
        self
    }

    /// Sets the parser of external input values.
    #[must_use]
    pub fn coerce_input(
        mut self,
        f: impl Fn(&Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.coerce_input = Arc::new(f);
        self
    }

    /// Sets the parser of query literals.
    ///
    /// If absent, literals are converted into external values and handed to
    /// the input parser.
    #[must_use]
    pub fn coerce_literal(
        mut self,
        f: impl Fn(&InputValue) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.coerce_literal = Some(Arc::new(f));
        self
    }

    /// Sets the conversion of internal values back into literals.
    #[must_use]
    pub fn value_to_literal(
        mut self,
        f: impl Fn(&Value) -> Option<InputValue> + Send + Sync + 'static,
    ) -> Self {
        self.value_to_literal = Some(Arc::new(f));
        self
    }

    /// Wraps this [`ScalarMeta`] type into a generic [`MetaType`].
    pub fn into_meta<C>(self) -> MetaType<C> {
        MetaType::Scalar(self)
    }
}

impl<C> ObjectMeta<C> {
    /// Build a new [`ObjectMeta`] type with the specified `name` and `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: impl Into<Thunk<Vec<Field<C>>>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into(),
            interface_names: Thunk::default(),
            is_type_of: None,
        }
    }

    /// Sets the `description` of this [`ObjectMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the `interfaces` this [`ObjectMeta`] type implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: impl Into<Thunk<Vec<ArcStr>>>) -> Self {
        self.interface_names = interfaces.into();
        self
    }

    /// Sets the check deciding whether a value belongs to this type when it
    /// is returned for an interface or union.
    #[must_use]
    pub fn is_type_of<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<bool>>
            + Send
            + Sync
            + 'static,
    {
        self.is_type_of = Some(Arc::new(f));
        self
    }

    /// Access a field's meta data given its name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field<C>> {
        self.fields.get().iter().find(|f| f.name == name)
    }

    /// Whether this type declares that it implements `interface`.
    pub fn implements(&self, interface: &str) -> bool {
        self.interface_names.get().iter().any(|i| i == interface)
    }

    /// Wraps this [`ObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType<C> {
        MetaType::Object(self)
    }
}

impl<C> InterfaceMeta<C> {
    /// Builds a new [`InterfaceMeta`] type with the specified `name` and
    /// `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: impl Into<Thunk<Vec<Field<C>>>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into(),
            interface_names: Thunk::default(),
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`InterfaceMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `interfaces` this [`InterfaceMeta`] interface implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: impl Into<Thunk<Vec<ArcStr>>>) -> Self {
        self.interface_names = interfaces.into();
        self
    }

    /// Sets the resolver of the concrete object type of values of this
    /// interface.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<Option<ArcStr>>>
            + Send
            + Sync
            + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Wraps this [`InterfaceMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType<C> {
        MetaType::Interface(self)
    }
}

impl<C> UnionMeta<C> {
    /// Build a new [`UnionMeta`] type with the specified `name` and possible
    /// object types.
    pub fn new(name: impl Into<ArcStr>, of_types: impl Into<Thunk<Vec<ArcStr>>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names: of_types.into(),
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`UnionMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the resolver of the concrete object type of values of this union.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(TypeResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<Option<ArcStr>>>
            + Send
            + Sync
            + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Wraps this [`UnionMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType<C> {
        MetaType::Union(self)
    }
}

impl EnumMeta {
    /// Build a new [`EnumMeta`] type with the specified `name` and possible
    /// `values`.
    pub fn new(name: impl Into<ArcStr>, values: impl Into<Thunk<Vec<EnumValue>>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: values.into(),
        }
    }

    /// Sets the `description` of this [`EnumMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enum value with the given `name`.
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.get().iter().find(|v| v.name == name)
    }

    /// Enum value whose internal value equals `value`.
    pub fn value_by_internal(&self, value: &Value) -> Option<&EnumValue> {
        self.values.get().iter().find(|v| &v.value == value)
    }

    /// Wraps this [`EnumMeta`] type into a generic [`MetaType`].
    pub fn into_meta<C>(self) -> MetaType<C> {
        MetaType::Enum(self)
    }
}

impl InputObjectMeta {
    /// Builds a new [`InputObjectMeta`] type with the specified `name` and
    /// `input_fields`.
    pub fn new(name: impl Into<ArcStr>, input_fields: impl Into<Thunk<Vec<Argument>>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_fields: input_fields.into(),
            is_one_of: false,
        }
    }

    /// Set the `description` of this [`InputObjectMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Requires exactly one non-null field to be provided.
    #[must_use]
    pub fn one_of(mut self) -> Self {
        self.is_one_of = true;
        self
    }

    /// Wraps this [`InputObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta<C>(self) -> MetaType<C> {
        MetaType::InputObject(self)
    }
}

impl<C> Field<C> {
    /// Builds a new [`Field`] of the given output [`Type`] with the given
    /// `name`.
    ///
    /// Without a resolver, the value is looked up by name on the parent
    /// value.
    pub fn new(name: impl Into<ArcStr>, field_type: Type<'static>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            field_type,
            deprecation_status: DeprecationStatus::Current,
            resolve: None,
            subscribe: None,
        }
    }

    /// Set the `description` of this [`Field`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets this [`Field`] as deprecated with an optional `reason`.
    ///
    /// Overwrites any previously set deprecation reason.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }

    /// Sets the resolver of this [`Field`].
    #[must_use]
    pub fn resolve<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> Resolution<'r> + Send + Sync + 'static,
    {
        self.resolve = Some(Arc::new(f));
        self
    }

    /// Sets a resolver that always completes immediately.
    #[must_use]
    pub fn resolve_value<F>(self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> FieldResult<FieldValue> + Send + Sync + 'static,
    {
        self.resolve(move |ctx| MaybeAsync::Ready(f(ctx)))
    }

    /// Sets a resolver returning a future.
    #[must_use]
    pub fn resolve_async<F>(self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> BoxFuture<'r, FieldResult<FieldValue>>
            + Send
            + Sync
            + 'static,
    {
        self.resolve(move |ctx| MaybeAsync::Pending(f(ctx)))
    }

    /// Sets the source stream factory of this subscription root [`Field`].
    #[must_use]
    pub fn subscribe<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(ResolverContext<'r, C>) -> MaybeAsync<'r, FieldResult<EventStream>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe = Some(Arc::new(f));
        self
    }

    /// Whether a resolver was set for this [`Field`].
    pub fn has_resolver(&self) -> bool {
        self.resolve.is_some()
    }
}

impl Argument {
    /// Builds a new [`Argument`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type<'static>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the `description` of this [`Argument`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default of this [`Argument`] to an external value.
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_value(mut self, val: impl Into<Value>) -> Self {
        self.default_value = Some(DefaultValue::Value(val.into()));
        self
    }

    /// Set the default of this [`Argument`] to a constant literal.
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_literal(mut self, literal: InputValue) -> Self {
        self.default_value = Some(DefaultValue::Literal(literal));
        self
    }

    /// Sets this [`Argument`] as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }

    /// Returns true if the argument must be provided: non-null and without
    /// default.
    pub fn is_required(&self) -> bool {
        self.arg_type.is_non_null() && self.default_value.is_none()
    }
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let name = name.into();
        Self {
            value: Value::scalar(name.as_str()),
            name,
            description: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the internal value resolvers receive and return for this
    /// [`EnumValue`].
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the `description` of this [`EnumValue`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets this [`EnumValue`] as deprecated with an optional `reason`.
    ///
    /// Overwrites any previously set deprecation reason.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }
}

impl fmt::Debug for ScalarMeta {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("ScalarMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for ObjectMeta<C> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("ObjectMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fields", &self.fields)
            .field("interface_names", &self.interface_names)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for InterfaceMeta<C> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("InterfaceMeta")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for UnionMeta<C> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UnionMeta")
            .field("name", &self.name)
            .field("of_type_names", &self.of_type_names)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for Field<C> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Field")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for MetaType<C> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(m) => m.fmt(fmt),
            Self::Object(m) => m.fmt(fmt),
            Self::Interface(m) => m.fmt(fmt),
            Self::Union(m) => m.fmt(fmt),
            Self::Enum(m) => m.fmt(fmt),
            Self::InputObject(m) => m.fmt(fmt),
        }
    }
}
