//! Values flowing between resolvers and the executor, and the built-in
//! scalars.

mod field_value;
pub mod scalars;

pub use self::field_value::{FieldValue, ItemStream, MaybeAsync};

pub(crate) use self::field_value::ListItems;
