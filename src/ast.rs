//! Syntax tree produced by the [`parser`](crate::parser).

use std::{borrow::Cow, fmt};

use itertools::Itertools as _;

use crate::parser::Spanning;

/// A type literal in the syntax tree
///
/// This enum carries no semantic information and might refer to types that do
/// not exist. Schemas use `Type<'static>` for the types of their fields,
/// arguments and input fields.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Type<'a> {
    /// A nullable named type, e.g. `String`
    Named(Cow<'a, str>),
    /// A nullable list type, e.g. `[String]`
    ///
    /// The list itself is what's nullable, the containing type might be non-null.
    List(Box<Type<'a>>),
    /// A non-null named type, e.g. `String!`
    NonNullNamed(Cow<'a, str>),
    /// A non-null list type, e.g. `[String]!`.
    ///
    /// The list itself is what's non-null, the containing type might be null.
    NonNullList(Box<Type<'a>>),
}

impl<'a> Type<'a> {
    /// Nullable reference to the named type `name`.
    pub fn named(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Named(name.into())
    }

    /// Nullable list of `inner`.
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wraps this type into a non-null one. A type that is already non-null
    /// is returned unchanged, so non-null never wraps non-null.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::Named(n) => Self::NonNullNamed(n),
            Self::List(l) => Self::NonNullList(l),
            t @ (Self::NonNullNamed(_) | Self::NonNullList(_)) => t,
        }
    }

    /// Strips the outermost non-null wrapper, if any.
    #[must_use]
    pub fn nullable(&self) -> Self {
        match self {
            Self::NonNullNamed(n) => Self::Named(n.clone()),
            Self::NonNullList(l) => Self::List(l.clone()),
            t => t.clone(),
        }
    }

    /// Get the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => Some(n),
            Self::List(_) | Self::NonNullList(_) => None,
        }
    }

    /// Get the innermost name by unpacking lists
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Item type of a list type.
    pub fn list_item(&self) -> Option<&Self> {
        match self {
            Self::List(l) | Self::NonNullList(l) => Some(l),
            Self::Named(_) | Self::NonNullNamed(_) => None,
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }

    /// Detaches this type from the source it was parsed from.
    pub fn into_static(self) -> Type<'static> {
        match self {
            Self::Named(n) => Type::Named(Cow::Owned(n.into_owned())),
            Self::NonNullNamed(n) => Type::NonNullNamed(Cow::Owned(n.into_owned())),
            Self::List(l) => Type::List(Box::new(l.into_static())),
            Self::NonNullList(l) => Type::NonNullList(Box::new(l.into_static())),
        }
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

/// A literal value in the query source.
///
/// Values may contain variable references unless they appear in a constant
/// position, such as a variable default. Lists and objects keep the spans of
/// their items for error reporting.
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum InputValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<InputValue>>),
    Object(Vec<(Spanning<String>, Spanning<InputValue>)>),
}

impl InputValue {
    /// Construct a [`Spanning::unlocated`] list.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().map(Spanning::unlocated).collect())
    }

    /// Construct a [`Spanning::unlocated`] object.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(k, v)| (Spanning::unlocated(k.into()), Spanning::unlocated(v)))
                .collect(),
        )
    }

    /// Does the value represent a `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does the value represent a variable?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Name of the referenced variable, if this is one.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a field of an object literal.
    pub fn object_field(&self, name: &str) -> Option<&Spanning<Self>> {
        match self {
            Self::Object(fields) => fields
                .iter()
                .find(|(k, _)| k.item == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns `true` if the value contains no variable references at any
    /// depth.
    pub fn is_const(&self) -> bool {
        match self {
            Self::Variable(_) => false,
            Self::List(l) => l.iter().all(|v| v.item.is_const()),
            Self::Object(o) => o.iter().all(|(_, v)| v.item.is_const()),
            _ => true,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(l) => write!(f, "[{}]", l.iter().map(|v| &v.item).format(", ")),
            Self::Object(o) if o.is_empty() => write!(f, "{{}}"),
            Self::Object(o) => write!(
                f,
                "{{ {} }}",
                o.iter()
                    .format_with(", ", |(k, v), f| f(&format_args!("{}: {}", k.item, v.item))),
            ),
        }
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition<'a> {
    pub var_type: Spanning<Type<'a>>,
    pub default_value: Option<Spanning<InputValue>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableDefinitions<'a> {
    pub items: Vec<(Spanning<&'a str>, VariableDefinition<'a>)>,
}

impl<'a> VariableDefinitions<'a> {
    /// Iterates over the `(name, definition)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = &(Spanning<&'a str>, VariableDefinition<'a>)> {
        self.items.iter()
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments<'a> {
    pub items: Vec<(Spanning<&'a str>, Spanning<InputValue>)>,
}

impl<'a> Arguments<'a> {
    /// Looks up the literal passed for the argument `key`.
    pub fn get(&self, key: &str) -> Option<&Spanning<InputValue>> {
        self.items
            .iter()
            .find(|(k, _)| k.item == key)
            .map(|(_, v)| v)
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct Directive<'a> {
    pub name: Spanning<&'a str>,
    pub arguments: Option<Spanning<Arguments<'a>>>,
}

/// Field selection, `alias: name(arguments) @directives { selection_set }`.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct Field<'a> {
    pub alias: Option<Spanning<&'a str>>,
    pub name: Spanning<&'a str>,
    pub arguments: Option<Spanning<Arguments<'a>>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Option<Vec<Selection<'a>>>,
}

impl<'a> Field<'a> {
    /// Key of this field in the response: the alias if given, else the name.
    pub fn response_key(&self) -> &'a str {
        self.alias.as_ref().unwrap_or(&self.name).item
    }
}

/// `...Name(arguments) @directives`
///
/// Arguments bind the variables declared by the fragment definition.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread<'a> {
    pub name: Spanning<&'a str>,
    pub arguments: Option<Spanning<Arguments<'a>>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment<'a> {
    pub type_condition: Option<Spanning<&'a str>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

/// Entry in a GraphQL selection set
///
/// This enum represents one of the three variants of a selection that exists
/// in GraphQL: a field, a fragment spread, or an inline fragment. Each of the
/// variants references their location in the query source.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...fragmentSpread
///   ...on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum Selection<'a> {
    Field(Spanning<Field<'a>>),
    FragmentSpread(Spanning<FragmentSpread<'a>>),
    InlineFragment(Spanning<InlineFragment<'a>>),
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct Operation<'a> {
    pub operation_type: OperationType,
    pub name: Option<Spanning<&'a str>>,
    pub variable_definitions: Option<Spanning<VariableDefinitions<'a>>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

/// `fragment Name($var: Type = default) on TypeCondition { ... }`
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment<'a> {
    pub name: Spanning<&'a str>,
    pub variable_definitions: Option<Spanning<VariableDefinitions<'a>>>,
    pub type_condition: Spanning<&'a str>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub enum Definition<'a> {
    Operation(Spanning<Operation<'a>>),
    Fragment(Spanning<Fragment<'a>>),
}

/// Parsed executable document.
pub type Document<'a> = Vec<Definition<'a>>;

/// Finds the directive named `name` in an optional directive list.
pub fn find_directive<'d, 'a>(
    directives: &'d Option<Vec<Spanning<Directive<'a>>>>,
    name: &str,
) -> Option<&'d Spanning<Directive<'a>>> {
    directives
        .as_ref()
        .and_then(|ds| ds.iter().find(|d| d.item.name.item == name))
}
