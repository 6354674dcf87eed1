//! Internal code generation used by the library crate itself.

pub mod std_types;
