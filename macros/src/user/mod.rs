//! User-facing macro implementations

mod derive_value;

pub use derive_value::expand_derive_default_value;
