//! `#[derive(DefaultValue)]`
//!
//! Builds every field from its own default, recursively. Attributes:
//!
//! | Attribute | On | Effect |
//! |-----------|----|--------|
//! | `#[default_value(const)]` | struct/enum | also implement `ConstDefaultValue` |
//! | `#[default_value]` | enum variant | the variant to build (exactly one) |
//! | `#[default_value(with = expr)]` | field | use `expr` instead of the field's default |

use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::{
    parse_quote, spanned::Spanned, Attribute, Data, DataEnum, DeriveInput, Expr, Field, Fields,
    Generics, Variant,
};

const ATTR: &str = "default_value";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Runtime,
    Const,
}

#[derive(Default)]
struct ContainerArgs {
    is_const: bool,
}

fn parse_container_args(attrs: &[Attribute]) -> syn::Result<ContainerArgs> {
    let mut args = ContainerArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("const") {
                args.is_const = true;
                Ok(())
            } else {
                Err(meta.error("expected `const`"))
            }
        })?;
    }
    Ok(args)
}

/// `#[default_value(with = expr)]` on a field.
fn field_override(field: &Field) -> syn::Result<Option<Expr>> {
    let mut with = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("with") {
                if with.is_some() {
                    return Err(meta.error("duplicate `with`"));
                }
                with = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `with = <expr>`"))
            }
        })?;
    }
    Ok(with)
}

fn field_init(field: &Field, mode: Mode) -> syn::Result<TokenStream2> {
    if let Some(expr) = field_override(field)? {
        return Ok(quote! { #expr });
    }
    let ty = &field.ty;
    Ok(match mode {
        Mode::Runtime => quote_spanned! {ty.span()=>
            <#ty as ::default_value::DefaultValue>::value()
        },
        Mode::Const => quote_spanned! {ty.span()=>
            <#ty as ::default_value::ConstDefaultValue>::VALUE
        },
    })
}

/// Constructor tail for `fields`: `{ a: .., b: .. }`, `( .., .. )` or nothing.
fn build_fields(fields: &Fields, mode: Mode) -> syn::Result<TokenStream2> {
    match fields {
        Fields::Named(named) => {
            let inits = named
                .named
                .iter()
                .map(|f| {
                    let name = &f.ident;
                    let init = field_init(f, mode)?;
                    Ok(quote! { #name: #init })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(quote! { { #(#inits),* } })
        }
        Fields::Unnamed(unnamed) => {
            let inits = unnamed
                .unnamed
                .iter()
                .map(|f| field_init(f, mode))
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(quote! { ( #(#inits),* ) })
        }
        Fields::Unit => Ok(quote! {}),
    }
}

fn is_marked(variant: &Variant) -> syn::Result<bool> {
    let mut marked = false;
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.meta.require_path_only()?;
        if marked {
            return Err(syn::Error::new_spanned(attr, "duplicate `#[default_value]`"));
        }
        marked = true;
    }
    Ok(marked)
}

/// The single variant marked `#[default_value]`.
fn default_variant<'a>(input: &DeriveInput, data: &'a DataEnum) -> syn::Result<&'a Variant> {
    let mut found: Option<&Variant> = None;
    for variant in &data.variants {
        if !is_marked(variant)? {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only one variant may be marked `#[default_value]`",
            ));
        }
        found = Some(variant);
    }
    found.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "enum needs exactly one variant marked `#[default_value]`",
        )
    })
}

/// Fields that are built and the variant path that builds them.
fn chosen_fields<'a>(input: &'a DeriveInput) -> syn::Result<(TokenStream2, &'a Fields)> {
    match &input.data {
        Data::Struct(data) => Ok((quote! { Self }, &data.fields)),
        Data::Enum(data) => {
            let variant = default_variant(input, data)?;
            for other in data.variants.iter().filter(|v| v.ident != variant.ident) {
                for field in &other.fields {
                    if field_override(field)?.is_some() {
                        return Err(syn::Error::new_spanned(
                            field,
                            "`with` only applies to fields of the `#[default_value]` variant",
                        ));
                    }
                }
            }
            let name = &variant.ident;
            Ok((quote! { Self::#name }, &variant.fields))
        }
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "DefaultValue cannot be derived for unions",
        )),
    }
}

fn build_body(input: &DeriveInput, mode: Mode) -> syn::Result<TokenStream2> {
    let (path, fields) = chosen_fields(input)?;
    let fields = build_fields(fields, mode)?;
    Ok(quote! { #path #fields })
}

/// Require `bound` on every defaulted field type of a generic item.
fn bounded(input: &DeriveInput, bound: syn::TypeParamBound) -> syn::Result<Generics> {
    let mut generics = input.generics.clone();
    if generics.type_params().next().is_none() {
        return Ok(generics);
    }
    let (_, fields) = chosen_fields(input)?;
    let mut predicates: Vec<syn::WherePredicate> = Vec::new();
    for field in fields {
        if field_override(field)?.is_none() {
            let ty = &field.ty;
            predicates.push(parse_quote!(#ty: #bound));
        }
    }
    generics.make_where_clause().predicates.extend(predicates);
    Ok(generics)
}

pub fn expand_derive_default_value(input: DeriveInput) -> syn::Result<TokenStream2> {
    let args = parse_container_args(&input.attrs)?;
    let name = &input.ident;

    let runtime_body = build_body(&input, Mode::Runtime)?;
    let generics = bounded(&input, parse_quote!(::default_value::DefaultValue))?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut out = quote! {
        impl #impl_generics ::default_value::DefaultValue for #name #ty_generics #where_clause {
            type Category = ::default_value::category::Composite;

            #[inline]
            fn value() -> Self {
                #runtime_body
            }
        }
    };

    if args.is_const {
        let const_body = build_body(&input, Mode::Const)?;
        let generics = bounded(&input, parse_quote!(::default_value::ConstDefaultValue))?;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        out.extend(quote! {
            impl #impl_generics ::default_value::ConstDefaultValue for #name #ty_generics #where_clause {
                const VALUE: Self = #const_body;
            }
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(src: TokenStream2) -> syn::Result<String> {
        let input: DeriveInput = syn::parse2(src)?;
        expand_derive_default_value(input).map(|ts| ts.to_string())
    }

    fn expand_err(src: TokenStream2) -> String {
        match expand(src) {
            Ok(out) => panic!("expected an error, got `{}`", out),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn named_struct_defaults_every_field() {
        let out = expand(quote! { struct Point { x: i32, y: i32 } }).unwrap();
        assert!(out.contains("Composite"));
        assert_eq!(out.matches("DefaultValue > :: value ()").count(), 2);
        assert!(!out.contains("ConstDefaultValue"));
    }

    #[test]
    fn const_attr_adds_const_impl() {
        let out = expand(quote! {
            #[default_value(const)]
            struct Pair(u8, u8);
        })
        .unwrap();
        assert!(out.contains("impl :: default_value :: ConstDefaultValue for Pair"));
        assert!(out.contains("const VALUE : Self"));
    }

    #[test]
    fn with_overrides_field() {
        let out = expand(quote! {
            struct Port {
                #[default_value(with = 8080)]
                number: u16,
            }
        })
        .unwrap();
        assert!(out.contains("number : 8080"));
    }

    #[test]
    fn field_types_get_bounds() {
        let out = expand(quote! { struct Wrap<T> { inner: T } }).unwrap();
        assert!(out.contains("impl < T >"));
        assert!(out.contains("where T : :: default_value :: DefaultValue"));
    }

    #[test]
    fn container_field_does_not_bound_its_element() {
        let out = expand(quote! { struct Bag<T> { items: Vec<T> } }).unwrap();
        assert!(out.contains("where Vec < T > : :: default_value :: DefaultValue"));
        assert!(!out.contains("where T :"));
    }

    #[test]
    fn overridden_field_is_not_bounded() {
        let out = expand(quote! {
            struct Slot<T> {
                #[default_value(with = None)]
                item: Option<T>,
            }
        })
        .unwrap();
        assert!(!out.contains("where"));
    }

    #[test]
    fn enum_uses_marked_variant() {
        let out = expand(quote! {
            enum Shape {
                Circle(f64),
                #[default_value]
                Square { side: f64 },
            }
        })
        .unwrap();
        assert!(out.contains("Self :: Square"));
        assert!(!out.contains("Circle"));
    }

    #[test]
    fn enum_without_marked_variant_is_rejected() {
        let err = expand_err(quote! { enum Empty { A, B } });
        assert!(err.contains("exactly one variant"));
    }

    #[test]
    fn enum_with_two_marked_variants_is_rejected() {
        let err = expand_err(quote! {
            enum Twice {
                #[default_value]
                A,
                #[default_value]
                B,
            }
        });
        assert!(err.contains("only one variant"));
    }

    #[test]
    fn with_on_unbuilt_variant_is_rejected() {
        let err = expand_err(quote! {
            enum Job {
                #[default_value]
                Queued,
                Running {
                    #[default_value(with = 1)]
                    pid: u32,
                },
            }
        });
        assert!(err.contains("only applies to fields"));
    }

    #[test]
    fn malformed_attr_on_unbuilt_variant_is_rejected() {
        let err = expand_err(quote! {
            enum Job {
                #[default_value]
                Queued,
                Running(#[default_value(pid)] u32),
            }
        });
        assert!(err.contains("expected `with = <expr>`"));
    }

    #[test]
    fn union_is_rejected() {
        let err = expand_err(quote! { union Bits { a: u32, b: f32 } });
        assert!(err.contains("unions"));
    }

    #[test]
    fn unknown_container_option_is_rejected() {
        let err = expand_err(quote! {
            #[default_value(mutable)]
            struct S;
        });
        assert!(err.contains("expected `const`"));
    }
}
