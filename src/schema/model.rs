use std::{fmt, sync::OnceLock};

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::{FnvBuildHasher, FnvHashMap};
use indexmap::IndexMap;

use crate::{
    ast::{InputValue, OperationType, Type},
    schema::meta::{
        Argument, EnumMeta, Field, InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta,
        UnionMeta,
    },
    types::scalars,
};

/// Metadata for a schema
///
/// Immutable once built: every request reads it concurrently. The only
/// interior mutability is the memoized evaluation of lazy type components.
pub struct SchemaType<C> {
    pub(crate) description: Option<ArcStr>,
    pub(crate) types: IndexMap<ArcStr, MetaType<C>, FnvBuildHasher>,
    pub(crate) query_type_name: ArcStr,
    pub(crate) mutation_type_name: Option<ArcStr>,
    pub(crate) subscription_type_name: Option<ArcStr>,
    directives: FnvHashMap<ArcStr, DirectiveType>,
    implementations: OnceLock<FnvHashMap<ArcStr, Vec<ArcStr>>>,
    validation: OnceLock<Vec<SchemaError>>,
}

/// Configuration a [`SchemaType`] is built from.
pub struct SchemaConfig<C> {
    description: Option<ArcStr>,
    query: ArcStr,
    mutation: Option<ArcStr>,
    subscription: Option<ArcStr>,
    types: Vec<MetaType<C>>,
    directives: Vec<DirectiveType>,
}

/// Named type, or list or non-null wrapper around it, resolved against a
/// schema.
pub enum TypeType<'a, C> {
    /// Named type.
    Concrete(&'a MetaType<C>),
    /// Non-null wrapper.
    NonNull(Box<TypeType<'a, C>>),
    /// List wrapper.
    List(Box<TypeType<'a, C>>),
}

/// Kind of a named type.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum TypeKind {
    #[display("SCALAR")]
    Scalar,
    #[display("OBJECT")]
    Object,
    #[display("INTERFACE")]
    Interface,
    #[display("UNION")]
    Union,
    #[display("ENUM")]
    Enum,
    #[display("INPUT_OBJECT")]
    InputObject,
}

/// Directive definition.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub is_repeatable: bool,
}

/// Location a directive may appear at.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum DirectiveLocation {
    #[display("QUERY")]
    Query,
    #[display("MUTATION")]
    Mutation,
    #[display("SUBSCRIPTION")]
    Subscription,
    #[display("FIELD")]
    Field,
    #[display("FRAGMENT_DEFINITION")]
    FragmentDefinition,
    #[display("FRAGMENT_SPREAD")]
    FragmentSpread,
    #[display("INLINE_FRAGMENT")]
    InlineFragment,
    #[display("VARIABLE_DEFINITION")]
    VariableDefinition,
    #[display("SCALAR")]
    Scalar,
    #[display("FIELD_DEFINITION")]
    FieldDefinition,
    #[display("ARGUMENT_DEFINITION")]
    ArgumentDefinition,
    #[display("ENUM_VALUE")]
    EnumValue,
    #[display("INPUT_OBJECT")]
    InputObject,
    #[display("INPUT_FIELD_DEFINITION")]
    InputFieldDefinition,
}

/// Error building or validating a schema.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// Two named types share a name.
    #[display(
        "Schema must contain uniquely named types but contains multiple types named \"{_0}\"."
    )]
    DuplicateType(#[error(not(source))] ArcStr),

    /// Two directives share a name.
    #[display("Schema must contain uniquely named directives but contains multiple directives named \"@{_0}\".")]
    DuplicateDirective(#[error(not(source))] ArcStr),

    /// Type graph is inconsistent.
    #[display("{_0}")]
    Invalid(#[error(not(source))] String),
}

impl<C> SchemaConfig<C> {
    /// Configuration of a schema whose query root is the object type named
    /// `query`.
    pub fn new(query: impl Into<ArcStr>) -> Self {
        Self {
            description: None,
            query: query.into(),
            mutation: None,
            subscription: None,
            types: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Sets the `description` of the schema.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the mutation root type name.
    #[must_use]
    pub fn mutation(mut self, name: impl Into<ArcStr>) -> Self {
        self.mutation = Some(name.into());
        self
    }

    /// Sets the subscription root type name.
    #[must_use]
    pub fn subscription(mut self, name: impl Into<ArcStr>) -> Self {
        self.subscription = Some(name.into());
        self
    }

    /// Registers a named type.
    #[must_use]
    pub fn add_type(mut self, meta: MetaType<C>) -> Self {
        self.types.push(meta);
        self
    }

    /// Registers several named types.
    #[must_use]
    pub fn types(mut self, metas: impl IntoIterator<Item = MetaType<C>>) -> Self {
        self.types.extend(metas);
        self
    }

    /// Registers a custom directive.
    #[must_use]
    pub fn directive(mut self, directive: DirectiveType) -> Self {
        self.directives.push(directive);
        self
    }
}

impl<C> SchemaType<C> {
    /// Builds a schema from `config`.
    ///
    /// The built-in scalars are added unless `config` defines types with the
    /// same names, and the `@skip`, `@include`, `@defer`, `@stream`,
    /// `@deprecated`, `@specifiedBy` and `@oneOf` directives are always
    /// present.
    ///
    /// # Errors
    ///
    /// If two types or two directives share a name. Other inconsistencies of
    /// the type graph are reported by [`SchemaType::validate()`].
    pub fn new(config: SchemaConfig<C>) -> Result<Self, SchemaError> {
        let mut types = IndexMap::with_capacity_and_hasher(config.types.len() + 5, FnvBuildHasher::default());
        for meta in config.types {
            let name = meta.name().clone();
            if types.insert(name.clone(), meta).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }
        for scalar in scalars::builtin_scalars() {
            if !types.contains_key(&scalar.name) {
                types.insert(scalar.name.clone(), scalar.into_meta());
            }
        }

        let mut directives = FnvHashMap::default();
        for directive in DirectiveType::builtins().into_iter().chain(config.directives) {
            let name = directive.name.clone();
            if directives.insert(name.clone(), directive).is_some() {
                return Err(SchemaError::DuplicateDirective(name));
            }
        }

        Ok(Self {
            description: config.description,
            types,
            query_type_name: config.query,
            mutation_type_name: config.mutation,
            subscription_type_name: config.subscription,
            directives,
            implementations: OnceLock::new(),
            validation: OnceLock::new(),
        })
    }

    /// Description of the schema.
    pub fn description(&self) -> Option<&ArcStr> {
        self.description.as_ref()
    }

    /// Looks up a named type.
    pub fn type_by_name(&self, name: &str) -> Option<&MetaType<C>> {
        self.types.get(name)
    }

    /// Looks up a named object type.
    pub fn object_type_by_name(&self, name: &str) -> Option<&ObjectMeta<C>> {
        self.type_by_name(name).and_then(MetaType::as_object)
    }

    /// All named types, in registration order (built-in scalars last).
    pub fn type_list(&self) -> impl Iterator<Item = &MetaType<C>> {
        self.types.values()
    }

    /// Resolves a type reference against this schema.
    ///
    /// Returns `None` if the innermost named type is unknown.
    pub fn make_type(&self, t: &Type<'_>) -> Option<TypeType<'_, C>> {
        Some(match t {
            Type::NonNullNamed(n) => TypeType::NonNull(Box::new(TypeType::Concrete(self.type_by_name(n)?))),
            Type::NonNullList(inner) => TypeType::NonNull(Box::new(TypeType::List(Box::new(self.make_type(inner)?)))),
            Type::Named(n) => TypeType::Concrete(self.type_by_name(n)?),
            Type::List(inner) => TypeType::List(Box::new(self.make_type(inner)?)),
        })
    }

    /// Root object type of the query operations.
    pub fn query_type(&self) -> Option<&ObjectMeta<C>> {
        self.object_type_by_name(&self.query_type_name)
    }

    /// Root object type of the mutation operations, if any.
    pub fn mutation_type(&self) -> Option<&ObjectMeta<C>> {
        self.mutation_type_name.as_deref().and_then(|n| self.object_type_by_name(n))
    }

    /// Root object type of the subscription operations, if any.
    pub fn subscription_type(&self) -> Option<&ObjectMeta<C>> {
        self.subscription_type_name.as_deref().and_then(|n| self.object_type_by_name(n))
    }

    /// Root object type of operations of the given type.
    pub fn root_type(&self, operation_type: OperationType) -> Option<&ObjectMeta<C>> {
        match operation_type {
            OperationType::Query => self.query_type(),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    /// Looks up a directive.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// All directives.
    pub fn directive_list(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }

    /// Object types that can satisfy the abstract type `t`: union members or
    /// the implementations of an interface, in registration order.
    pub fn possible_types<'s>(&'s self, t: &'s MetaType<C>) -> Vec<&'s ObjectMeta<C>> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .get()
                .iter()
                .filter_map(|n| self.object_type_by_name(n))
                .collect(),
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .implementations()
                .get(name)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| self.object_type_by_name(n))
                        .collect()
                })
                .unwrap_or_default(),
            MetaType::Object(o) => vec![o],
            _ => Vec::new(),
        }
    }

    /// Whether the object type `possible_type` satisfies the abstract type
    /// `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &MetaType<C>, possible_type: &str) -> bool {
        match abstract_type {
            MetaType::Union(UnionMeta { of_type_names, .. }) => {
                of_type_names.get().iter().any(|n| n == possible_type)
            }
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .implementations()
                .get(name)
                .is_some_and(|names| names.iter().any(|n| n == possible_type)),
            MetaType::Object(o) => o.name == possible_type,
            _ => false,
        }
    }

    /// Whether a fragment with the type condition `condition` applies to
    /// values of the object type `object_type`.
    pub fn type_condition_applies(&self, condition: &str, object_type: &ObjectMeta<C>) -> bool {
        if condition == object_type.name {
            return true;
        }
        self.type_by_name(condition)
            .is_some_and(|t| t.is_abstract() && self.is_possible_type(t, &object_type.name))
    }

    fn implementations(&self) -> &FnvHashMap<ArcStr, Vec<ArcStr>> {
        self.implementations.get_or_init(|| {
            let mut map = FnvHashMap::<ArcStr, Vec<ArcStr>>::default();
            for meta in self.types.values() {
                if let MetaType::Object(o) = meta {
                    for i in o.interface_names.get() {
                        map.entry(i.clone()).or_default().push(o.name.clone());
                    }
                }
            }
            map
        })
    }

    /// Checks the consistency of the type graph, evaluating every lazy
    /// component. The result is computed once.
    pub fn validate(&self) -> &[SchemaError] {
        self.validation.get_or_init(|| SchemaValidator::new(self).run())
    }
}

impl<C> fmt::Debug for SchemaType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaType")
            .field("query_type_name", &self.query_type_name)
            .field("mutation_type_name", &self.mutation_type_name)
            .field("subscription_type_name", &self.subscription_type_name)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<C> TypeType<'_, C> {
    /// Innermost named type.
    pub fn innermost_concrete(&self) -> &MetaType<C> {
        match self {
            Self::Concrete(t) => t,
            Self::NonNull(n) | Self::List(n) => n.innermost_concrete(),
        }
    }
}

impl<C> fmt::Display for TypeType<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(t) => f.write_str(t.name()),
            Self::List(i) => write!(f, "[{i}]"),
            Self::NonNull(i) => write!(f, "{i}!"),
        }
    }
}

impl DirectiveType {
    /// Builds a new [`DirectiveType`] allowed at `locations`.
    pub fn new(
        name: impl Into<ArcStr>,
        locations: &[DirectiveLocation],
        arguments: &[Argument],
        is_repeatable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments: arguments.to_vec(),
            is_repeatable,
        }
    }

    /// Sets the `description` of this [`DirectiveType`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn new_skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::named("Boolean").non_null())
                .description("Skipped when true.")],
            false,
        )
        .description("Directs the executor to skip this field or fragment when the `if` argument is true.")
    }

    fn new_include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::named("Boolean").non_null())
                .description("Included when true.")],
            false,
        )
        .description("Directs the executor to include this field or fragment only when the `if` argument is true.")
    }

    fn new_defer() -> Self {
        Self::new(
            "defer",
            &[
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[
                Argument::new("if", Type::named("Boolean").non_null())
                    .default_literal(InputValue::Boolean(true))
                    .description("Deferred when true or undefined."),
                Argument::new("label", Type::named("String"))
                    .description("Unique name"),
            ],
            false,
        )
        .description("Directs the executor to defer this fragment when the `if` argument is true or undefined.")
    }

    fn new_stream() -> Self {
        Self::new(
            "stream",
            &[DirectiveLocation::Field],
            &[
                Argument::new("if", Type::named("Boolean").non_null())
                    .default_literal(InputValue::Boolean(true))
                    .description("Stream when true or undefined."),
                Argument::new("label", Type::named("String"))
                    .description("Unique name"),
                Argument::new("initialCount", Type::named("Int").non_null())
                    .default_literal(InputValue::Int(0))
                    .description("Number of items to return immediately"),
            ],
            false,
        )
        .description("Directs the executor to stream plural fields when the `if` argument is true or undefined.")
    }

    fn new_deprecated() -> Self {
        Self::new(
            "deprecated",
            &[
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
                DirectiveLocation::EnumValue,
            ],
            &[Argument::new("reason", Type::named("String"))
                .default_literal(InputValue::String("No longer supported".into()))],
            false,
        )
        .description("Marks an element of a GraphQL schema as no longer supported.")
    }

    fn new_specified_by() -> Self {
        Self::new(
            "specifiedBy",
            &[DirectiveLocation::Scalar],
            &[Argument::new("url", Type::named("String").non_null())],
            false,
        )
        .description("Exposes a URL that specifies the behavior of this scalar.")
    }

    fn new_one_of() -> Self {
        Self::new("oneOf", &[DirectiveLocation::InputObject], &[], false)
            .description("Indicates exactly one field must be supplied and this field must not be `null`.")
    }

    fn builtins() -> [Self; 7] {
        [
            Self::new_skip(),
            Self::new_include(),
            Self::new_defer(),
            Self::new_stream(),
            Self::new_deprecated(),
            Self::new_specified_by(),
            Self::new_one_of(),
        ]
    }
}

struct SchemaValidator<'a, C> {
    schema: &'a SchemaType<C>,
    errors: Vec<SchemaError>,
}

impl<'a, C> SchemaValidator<'a, C> {
    fn new(schema: &'a SchemaType<C>) -> Self {
        Self {
            schema,
            errors: Vec::new(),
        }
    }

    fn report(&mut self, message: String) {
        self.errors.push(SchemaError::Invalid(message));
    }

    fn run(mut self) -> Vec<SchemaError> {
        self.validate_root("Query", Some(&self.schema.query_type_name));
        self.validate_root("Mutation", self.schema.mutation_type_name.as_ref());
        self.validate_root("Subscription", self.schema.subscription_type_name.as_ref());

        for meta in self.schema.types.values() {
            match meta {
                MetaType::Scalar(_) => {}
                MetaType::Object(o) => {
                    self.validate_fields(&o.name, o.fields.get());
                    self.validate_interfaces(&o.name, o.interface_names.get(), o.fields.get());
                }
                MetaType::Interface(i) => {
                    self.validate_fields(&i.name, i.fields.get());
                    self.validate_interfaces(&i.name, i.interface_names.get(), i.fields.get());
                }
                MetaType::Union(u) => self.validate_union(u),
                MetaType::Enum(e) => self.validate_enum(e),
                MetaType::InputObject(io) => self.validate_input_object(io),
            }
        }
        for directive in self.schema.directives.values() {
            for arg in &directive.arguments {
                let coordinate = format!("@{}({}:)", directive.name, arg.name);
                self.validate_input_type(&coordinate, &arg.arg_type);
            }
        }
        self.errors
    }

    fn validate_root(&mut self, kind: &str, name: Option<&ArcStr>) {
        let Some(name) = name else {
            return;
        };
        match self.schema.type_by_name(name) {
            Some(MetaType::Object(_)) => {}
            Some(_) => self.report(format!(
                "{kind} root type must be Object type, it cannot be {name}.",
            )),
            None if kind == "Query" => self.report("Query root type must be provided.".into()),
            None => self.report(format!("Unknown type \"{name}\" referenced as {kind} root type.")),
        }
    }

    fn validate_fields(&mut self, type_name: &str, fields: &[Field<C>]) {
        if fields.is_empty() {
            self.report(format!("Type {type_name} must define one or more fields."));
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                self.report(format!("Type {type_name} defines field \"{}\" more than once.", field.name));
            }
            let coordinate = format!("{type_name}.{}", field.name);
            match self.schema.type_by_name(field.field_type.innermost_name()) {
                None => self.report(format!(
                    "Unknown type \"{}\" referenced by {coordinate}.",
                    field.field_type.innermost_name(),
                )),
                Some(t) if !t.is_output() => self.report(format!(
                    "The type of {coordinate} must be Output Type but got: {}.",
                    field.field_type,
                )),
                Some(_) => {}
            }
            for arg in &field.arguments {
                self.validate_input_type(&format!("{coordinate}({}:)", arg.name), &arg.arg_type);
            }
        }
    }

    fn validate_input_type(&mut self, coordinate: &str, t: &Type<'static>) {
        match self.schema.type_by_name(t.innermost_name()) {
            None => self.report(format!(
                "Unknown type \"{}\" referenced by {coordinate}.",
                t.innermost_name(),
            )),
            Some(meta) if !meta.is_input() => self.report(format!(
                "The type of {coordinate} must be Input Type but got: {t}.",
            )),
            Some(_) => {}
        }
    }

    fn validate_interfaces(&mut self, type_name: &str, interfaces: &[ArcStr], fields: &[Field<C>]) {
        for iface_name in interfaces {
            match self.schema.type_by_name(iface_name) {
                Some(MetaType::Interface(iface)) => {
                    for iface_field in iface.fields.get() {
                        if !fields.iter().any(|f| f.name == iface_field.name) {
                            self.report(format!(
                                "Interface field {iface_name}.{} expected but {type_name} does not provide it.",
                                iface_field.name,
                            ));
                        }
                    }
                }
                _ => self.report(format!(
                    "Type {type_name} must only implement Interface types, it cannot implement {iface_name}.",
                )),
            }
        }
    }

    fn validate_union(&mut self, union: &UnionMeta<C>) {
        let members = union.of_type_names.get();
        if members.is_empty() {
            self.report(format!("Union type {} must define one or more member types.", union.name));
        }
        for member in members {
            if !matches!(self.schema.type_by_name(member), Some(MetaType::Object(_))) {
                self.report(format!(
                    "Union type {} can only include Object types, it cannot include {member}.",
                    union.name,
                ));
            }
        }
    }

    fn validate_enum(&mut self, meta: &EnumMeta) {
        let values = meta.values.get();
        if values.is_empty() {
            self.report(format!("Enum type {} must define one or more values.", meta.name));
        }
        for v in values {
            if matches!(v.name.as_str(), "true" | "false" | "null") {
                self.report(format!("Enum type {} cannot include value: {}.", meta.name, v.name));
            }
        }
    }

    fn validate_input_object(&mut self, meta: &InputObjectMeta) {
        let fields = meta.input_fields.get();
        if fields.is_empty() {
            self.report(format!("Input Object type {} must define one or more fields.", meta.name));
        }
        for field in fields {
            let coordinate = format!("{}.{}", meta.name, field.name);
            self.validate_input_type(&coordinate, &field.arg_type);
            if meta.is_one_of {
                if field.arg_type.is_non_null() {
                    self.report(format!("OneOf input field {coordinate} must be nullable."));
                }
                if field.default_value.is_some() {
                    self.report(format!("OneOf input field {coordinate} cannot have a default value."));
                }
            }
        }
    }
}
