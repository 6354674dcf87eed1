//! Procedural macros for the default-value crate
//!
//! | Macro | Kind | Purpose |
//! |-------|------|---------|
//! | `#[derive(DefaultValue)]` | derive | Register a user type |
//! | `impl_std_types!(Category)` | function | Built-in std rules (internal) |
//!
//! ## Example
//!
//! ```ignore
//! #[derive(DefaultValue)]
//! struct Config {
//!     name: String,
//!     retries: u32,
//!     #[default_value(with = 30)]
//!     timeout_secs: u64,
//! }
//!
//! let config = default_value::value::<Config>();
//! assert!(config.name.is_empty());
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

// =============================================================================
// Module Declarations (inner / user)
// =============================================================================

mod inner;
mod user;

// =============================================================================
// Internal Macros (inner/)
// =============================================================================

/// Expand the std type table of one category into `impl_default_value!`
/// calls, each gated on the `alloc` / `std` feature of its tier.
///
/// # Usage
/// ```ignore
/// macros::impl_std_types!(Sequence);
/// ```
#[doc(hidden)]
#[proc_macro]
pub fn impl_std_types(input: TokenStream) -> TokenStream {
    let category = parse_macro_input!(input as syn::Ident);
    inner::std_types::expand_impl_std_types(&category)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// =============================================================================
// User-facing Macros (user/)
// =============================================================================

/// Derive `DefaultValue` by defaulting every field.
///
/// # Usage
/// ```ignore
/// #[derive(DefaultValue)]
/// #[default_value(const)]          // also implement ConstDefaultValue
/// struct Limits {
///     max: u32,                    // 0
///     #[default_value(with = 16)]  // explicit value
///     burst: u32,
/// }
///
/// #[derive(DefaultValue)]
/// enum State {
///     #[default_value]
///     Idle,
///     Running { pid: u32 },
/// }
/// ```
#[proc_macro_derive(DefaultValue, attributes(default_value))]
pub fn derive_default_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    user::expand_derive_default_value(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
