//! Library tests and fixtures

pub mod fixtures;
