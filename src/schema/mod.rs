//! Schema type system: named type metadata, the schema index over it, and
//! the lazy cells used for type components.

pub mod meta;
pub mod model;
mod thunk;

pub use self::thunk::Thunk;
