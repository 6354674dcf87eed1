//! Standard library type table for the built-in text, sequence and
//! associative rules.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Concrete,
    Generic(&'static str),
}

/// Whether the empty value can be built in a `const` context.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Eval {
    Const,
    Runtime,
}

/// Library tier a type lives in, mapped to a crate feature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Core,
    Alloc,
    Std,
}

#[derive(Clone, Copy)]
pub struct StdType {
    pub path: &'static str,
    pub kind: TypeKind,
    pub value: &'static str,
    pub eval: Eval,
    pub tier: Tier,
}

use Eval::*;
use Tier::*;
use TypeKind::*;

const fn ty(
    path: &'static str,
    kind: TypeKind,
    value: &'static str,
    eval: Eval,
    tier: Tier,
) -> StdType {
    StdType { path, kind, value, eval, tier }
}

const DEFAULT: &str = "::core::default::Default::default()";

/// Strings and string views, every character width the platform offers.
pub const TEXT_TYPES: &[StdType] = &[
    ty("&'a str", Generic("'a"), "\"\"", Const, Core),
    ty("&'a ::core::ffi::CStr", Generic("'a"), "c\"\"", Const, Core),

    ty("::alloc::string::String", Concrete, "::alloc::string::String::new()", Const, Alloc),
    ty("::alloc::borrow::Cow<'a, str>", Generic("'a"), "::alloc::borrow::Cow::Borrowed(\"\")", Const, Alloc),
    ty("::alloc::boxed::Box<str>", Concrete, DEFAULT, Runtime, Alloc),
    ty("::alloc::ffi::CString", Concrete, DEFAULT, Runtime, Alloc),

    ty("::std::ffi::OsString", Concrete, "::std::ffi::OsString::new()", Runtime, Std),
    ty("&'a ::std::ffi::OsStr", Generic("'a"), "::std::ffi::OsStr::new(\"\")", Runtime, Std),
];

/// Sequence containers. `[T; N]` is hand-written since its elements recurse.
pub const SEQUENCE_TYPES: &[StdType] = &[
    ty("&'a [T]", Generic("'a, T"), "&[]", Const, Core),

    // Growable array and stack
    ty("::alloc::vec::Vec<T>", Generic("T"), "::alloc::vec::Vec::new()", Const, Alloc),
    // Queue and double-ended queue
    ty("::alloc::collections::VecDeque<T>", Generic("T"), "::alloc::collections::VecDeque::new()", Const, Alloc),
    // List and singly-linked list
    ty("::alloc::collections::LinkedList<T>", Generic("T"), "::alloc::collections::LinkedList::new()", Const, Alloc),
    // Priority queue
    ty("::alloc::collections::BinaryHeap<T>", Generic("T: ::core::cmp::Ord"), "::alloc::collections::BinaryHeap::new()", Const, Alloc),
    ty("::alloc::boxed::Box<[T]>", Generic("T"), DEFAULT, Runtime, Alloc),
    ty("::alloc::borrow::Cow<'a, [T]>", Generic("'a, T: ::core::clone::Clone"), "::alloc::borrow::Cow::Borrowed(&[])", Const, Alloc),
];

/// Maps and sets. Multimaps and multisets are maps of `Vec`s or counts and
/// resolve through these same rules.
pub const ASSOCIATIVE_TYPES: &[StdType] = &[
    ty("::alloc::collections::BTreeMap<K, V>", Generic("K, V"), "::alloc::collections::BTreeMap::new()", Const, Alloc),
    ty("::alloc::collections::BTreeSet<T>", Generic("T"), "::alloc::collections::BTreeSet::new()", Const, Alloc),

    ty(
        "::std::collections::HashMap<K, V, S>",
        Generic("K, V, S: ::core::default::Default"),
        "::std::collections::HashMap::with_hasher(::core::default::Default::default())",
        Runtime,
        Std,
    ),
    ty(
        "::std::collections::HashSet<T, S>",
        Generic("T, S: ::core::default::Default"),
        "::std::collections::HashSet::with_hasher(::core::default::Default::default())",
        Runtime,
        Std,
    ),
];

fn table_for(category: &Ident) -> syn::Result<&'static [StdType]> {
    match category.to_string().as_str() {
        "Text" => Ok(TEXT_TYPES),
        "Sequence" => Ok(SEQUENCE_TYPES),
        "Associative" => Ok(ASSOCIATIVE_TYPES),
        other => Err(syn::Error::new_spanned(
            category,
            format!("no std type table for category `{}`", other),
        )),
    }
}

fn parse_tokens(src: &str) -> syn::Result<TokenStream> {
    src.parse::<TokenStream>()
        .map_err(|e| syn::Error::new(proc_macro2::Span::call_site(), format!("bad table entry `{}`: {}", src, e)))
}

/// Expand one `impl_default_value!` call per table entry of `category`.
pub fn expand_impl_std_types(category: &Ident) -> syn::Result<TokenStream> {
    let mut impls = Vec::new();

    for entry in table_for(category)? {
        let ty = parse_tokens(entry.path)?;
        let value = parse_tokens(entry.value)?;
        let generics = match entry.kind {
            Concrete => TokenStream::new(),
            Generic(g) => parse_tokens(g)?,
        };
        let cfg = match entry.tier {
            Core => quote! {},
            Alloc => quote! { #[cfg(feature = "alloc")] },
            Std => quote! { #[cfg(feature = "std")] },
        };
        let constness = match entry.eval {
            Const => quote! { const },
            Runtime => quote! {},
        };

        impls.push(quote! {
            #cfg
            ::default_value::impl_default_value!(@#category #constness [#generics] #ty => #value);
        });
    }

    Ok(quote! { #(#impls)* })
}
