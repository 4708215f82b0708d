//! Fixtures shared by the tests of the crate.

pub mod starwars;
