use std::{
    any::Any,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use arcstr::ArcStr;
use futures::{Stream, StreamExt as _, future::BoxFuture};
use itertools::Itertools as _;

use crate::{
    executor::FieldResult,
    schema::meta::EventStream,
    value::{Object, Value},
};

/// Result of a resolver, or of any other schema callback that may complete
/// either immediately or at some later point.
///
/// Returning [`MaybeAsync::Ready`] lets the executor continue without
/// allocating a future; [`MaybeAsync::Pending`] is polled together with the
/// sibling fields.
pub enum MaybeAsync<'a, T> {
    /// Value is available right away.
    Ready(T),
    /// Value is produced by a future.
    Pending(BoxFuture<'a, T>),
}

impl<'a, T: Send + 'a> MaybeAsync<'a, T> {
    /// Wraps an immediately available value.
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    /// Wraps a future.
    pub fn pending(fut: impl Future<Output = T> + Send + 'a) -> Self {
        Self::Pending(Box::pin(fut))
    }

    /// Waits for the value.
    pub async fn resolve(self) -> T {
        match self {
            Self::Ready(v) => v,
            Self::Pending(fut) => fut.await,
        }
    }

    /// Whether the value is already available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeAsync<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => f.debug_tuple("Ready").field(v).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Value produced by a field resolver.
///
/// Resolvers hand the executor either plain data, which is coerced and
/// traversed directly, or opaque host objects which are only ever passed
/// back to the resolvers of the selected sub-fields.
#[derive(Clone, Default)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    /// Plain data. Objects are read by the default field resolver.
    Value(Value),
    /// List of values, each completed at its own index.
    List(Vec<FieldValue>),
    /// List whose items are produced over time.
    ///
    /// Without `@stream` the executor waits for the whole stream. With it,
    /// items past `initialCount` are delivered one payload each, as they
    /// arrive. An error ends the list.
    Stream(ItemStream),
    /// Opaque host object, handed to the resolvers of sub-fields.
    Owned(Arc<dyn Any + Send + Sync>),
    /// Value tagged with the name of its concrete object type, used to
    /// resolve interfaces and unions.
    WithType {
        /// Tagged value.
        value: Box<FieldValue>,
        /// Name of the concrete object type.
        type_name: ArcStr,
    },
}

impl FieldValue {
    /// Plain data value.
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// Opaque host object.
    pub fn owned<T: Any + Send + Sync>(v: T) -> Self {
        Self::Owned(Arc::new(v))
    }

    /// List of field values.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// List whose items are pulled from `items` while completing it.
    pub fn stream(items: impl Stream<Item = FieldResult<FieldValue>> + Send + 'static) -> Self {
        Self::Stream(ItemStream::new(items.boxed()))
    }

    /// Tags this value with the concrete object type it belongs to.
    #[must_use]
    pub fn with_type(self, type_name: impl Into<ArcStr>) -> Self {
        Self::WithType {
            value: Box::new(self),
            type_name: type_name.into(),
        }
    }

    /// Whether this value is null, looking through type tags.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null | Self::Value(Value::Null) => true,
            Self::WithType { value, .. } => value.is_null(),
            Self::Value(_) | Self::List(_) | Self::Stream(_) | Self::Owned(_) => false,
        }
    }

    /// The untagged value.
    pub fn inner(&self) -> &Self {
        match self {
            Self::WithType { value, .. } => value.inner(),
            v => v,
        }
    }

    /// Name of the concrete object type this value was tagged with.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::WithType { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    /// Plain data, if this is a data value.
    pub fn as_value(&self) -> Option<&Value> {
        match self.inner() {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Downcasts an opaque host object.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self.inner() {
            Self::Owned(v) => v.downcast_ref(),
            _ => None,
        }
    }

    /// Plain data this value is made of, if it contains no host objects.
    pub(crate) fn to_value(&self) -> Option<Value> {
        match self.inner() {
            Self::Null => Some(Value::Null),
            Self::Value(v) => Some(v.clone()),
            Self::List(items) => items.iter().map(Self::to_value).collect::<Option<_>>().map(Value::List),
            Self::Stream(_) | Self::Owned(_) | Self::WithType { .. } => None,
        }
    }

    /// Items of this value when it is list-shaped.
    ///
    /// Plain list data is split into one field value per item.
    pub(crate) fn into_items(self) -> Result<ListItems, Self> {
        match self {
            Self::List(items) => Ok(ListItems::Ready(items)),
            Self::Value(Value::List(items)) => {
                Ok(ListItems::Ready(items.into_iter().map(Self::Value).collect()))
            }
            Self::Stream(items) => Ok(ListItems::Pending(items.take())),
            Self::WithType { value, type_name } => {
                value.into_items().map_err(|value| Self::WithType {
                    value: Box::new(value),
                    type_name,
                })
            }
            v => Err(v),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Owned(_) => f.write_str("Owned(..)"),
            Self::WithType { value, type_name } => f
                .debug_struct("WithType")
                .field("value", value)
                .field("type_name", type_name)
                .finish(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Value(v) => write!(f, "{v}"),
            Self::List(l) => write!(f, "[{}]", l.iter().format(", ")),
            Self::Stream(_) => f.write_str("<stream>"),
            Self::Owned(_) => f.write_str("<object>"),
            Self::WithType { value, .. } => write!(f, "{value}"),
        }
    }
}

/// Source of the items of a [`FieldValue::Stream`].
///
/// Clones share the source: it is consumed by the first completion of the
/// value, and later ones see an empty list.
#[derive(Clone)]
pub struct ItemStream(Arc<Mutex<Option<EventStream>>>);

impl ItemStream {
    fn new(items: EventStream) -> Self {
        Self(Arc::new(Mutex::new(Some(items))))
    }

    fn take(&self) -> Option<EventStream> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Items of a list-shaped [`FieldValue`].
pub(crate) enum ListItems {
    /// Every item is at hand.
    Ready(Vec<FieldValue>),
    /// Items are pulled from a stream, [`None`] if it was already consumed.
    Pending(Option<EventStream>),
}

macro_rules! impl_from_data {
    ($($t:ty),+ $(,)?) => {$(
        impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                Self::Value(v.into())
            }
        }
    )+};
}

impl_from_data!(Value, Object, i32, f64, bool, String, &str);
