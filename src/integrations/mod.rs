//! Wire formats of values, results and errors.

pub mod serde;
