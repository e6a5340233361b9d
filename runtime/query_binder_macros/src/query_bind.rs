use darling::{FromDeriveInput, FromField, util::Flag, util::Ignored};
use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{DeriveInput, Ident, LitStr, Type, parse_macro_input, spanned::Spanned};

use crate::field_type::{FieldType, Value, Wrapper};

#[derive(FromDeriveInput)]
#[darling(attributes(query), supports(struct_named))]
struct QueryBindInput {
    ident: Ident,
    generics: syn::Generics,
    // Pull out all named fields and let darling map each one via `ParsedField`.
    data: darling::ast::Data<Ignored, ParsedField>,
    /// Invoke `SanitizeQuery::sanitize_query` after binding.
    #[darling(default)]
    sanitize: Flag,
}

#[derive(Debug)]
struct ParsedField {
    ident: Ident,
    ty: Type,
    annotation: Annotation,
}

// What the `#[query(..)]` attribute says about a field.
#[derive(Debug)]
enum Annotation {
    /// No attribute.
    Missing,
    /// `#[query("name,default")]`
    Tag(LitStr),
    /// `#[query(skip)]`
    Skip,
    /// `#[query(flatten)]`
    Flatten,
}

impl FromField for ParsedField {
    fn from_field(field: &syn::Field) -> darling::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(darling::Error::unsupported_shape("tuple struct"));
        };

        let mut annotations = Vec::new();
        for attr in &field.attrs {
            if !attr.path().is_ident("query") {
                continue;
            }
            let annotation = attr
                .parse_args_with(|input: ParseStream| {
                    if input.peek(LitStr) {
                        return Ok(Annotation::Tag(input.parse()?));
                    }
                    let word: Ident = input.parse()?;
                    match word.to_string().as_str() {
                        "skip" => Ok(Annotation::Skip),
                        "flatten" => Ok(Annotation::Flatten),
                        _ => Err(syn::Error::new_spanned(
                            &word,
                            "Unknown `query` option. Expected a `\"name,default\"` string literal, \
                            `skip` or `flatten`.",
                        )),
                    }
                })
                .map_err(|e| darling::Error::from(e).with_span(&attr.meta))?;
            annotations.push((annotation, attr));
        }

        let annotation = match annotations.len() {
            0 => Annotation::Missing,
            1 => annotations.remove(0).0,
            _ => {
                let (_, attr) = &annotations[1];
                return Err(darling::Error::custom(format!(
                    "There are multiple `#[query(..)]` attributes on field `{ident}`.\n\
                    help: Keep only one of them.",
                ))
                .with_span(attr));
            }
        };

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            annotation,
        })
    }
}

pub(super) fn derive_query_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match _derive_query_bind(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn _derive_query_bind(input: DeriveInput) -> Result<proc_macro2::TokenStream, darling::Error> {
    let input = QueryBindInput::from_derive_input(&input)?;
    reject_invalid_inputs(&input)?;

    let struct_ident = &input.ident;
    let fields = input
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?;

    let registrations = fields.iter().map(register_field);

    let post_bind = input.sanitize.is_present().then(|| {
        quote! {
            fn post_bind(&mut self, errors: &mut ::query_binder::FieldErrors) {
                <Self as ::query_binder::SanitizeQuery>::sanitize_query(self, errors)
            }
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl ::query_binder::QueryBind for #struct_ident {
            fn fields() -> &'static ::query_binder::FieldTable<Self> {
                static FIELDS: ::query_binder::__private::Lazy<
                    ::query_binder::FieldTable<#struct_ident>,
                > = ::query_binder::__private::Lazy::new(|| {
                    ::query_binder::FieldTable::<#struct_ident>::builder()
                        #(#registrations)*
                        .build()
                });
                &FIELDS
            }

            #post_bind
        }
    })
}

/// The builder call that registers `field` in the descriptor table.
fn register_field(field: &ParsedField) -> proc_macro2::TokenStream {
    let field_ident = &field.ident;
    let name = field_ident.unraw().to_string();
    let ty_span = field.ty.span();
    let get = quote! { |__target| &__target.#field_ident };
    let get_mut = quote! { |__target| &mut __target.#field_ident };

    let annotation = match &field.annotation {
        Annotation::Flatten => {
            return quote_spanned! { ty_span => .flatten(#get, #get_mut) };
        }
        // Skipped fields don't need to be decodable.
        Annotation::Skip => return quote! { .ignored(#name) },
        Annotation::Tag(tag) if tag.value() == "-" => return quote! { .ignored(#name) },
        Annotation::Tag(tag) => quote! { ::core::option::Option::Some(#tag) },
        Annotation::Missing => quote! { ::core::option::Option::None },
    };

    match FieldType::classify(&field.ty) {
        FieldType::Ignored => quote! { .ignored(#name) },
        FieldType::Scalar(value) => {
            let decoder = decoder(&value);
            quote_spanned! { ty_span => .scalar(#name, #annotation, #get, #get_mut, #decoder) }
        }
        FieldType::Sequence(element) => {
            let decoder = decoder(&element);
            quote_spanned! { ty_span => .sequence(#name, #annotation, #get, #get_mut, #decoder) }
        }
    }
}

fn decoder(value: &Value<'_>) -> proc_macro2::TokenStream {
    let ty = value.ty;
    let decoder = quote_spanned! { ty.span() => ::query_binder::decoder!(#ty) };
    match value.wrapper {
        Wrapper::None => decoder,
        Wrapper::Option => quote! {
            |__raw: &str| (#decoder)(__raw).map(::core::option::Option::Some)
        },
        Wrapper::Box => quote! {
            |__raw: &str| (#decoder)(__raw).map(::std::boxed::Box::new)
        },
    }
}

fn reject_invalid_inputs(input: &QueryBindInput) -> Result<(), darling::Error> {
    let struct_ident = &input.ident;
    // The descriptor table is cached in a `static`, which can't be generic.
    if let Some(generic) = input.generics.type_params().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(QueryBind)]` can't be applied to structs with generic type parameters, such as `{struct_ident}`.\n\n\
            help: Consider using concrete types instead. Alternatively, implement `QueryBind` for `{struct_ident}` manually.",
        ))
        .with_span(generic));
    }
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(QueryBind)]` can't be applied to structs with generic lifetimes, such as `{struct_ident}`.\n\n\
            help: Use owned types (e.g. `String` instead of `&str`) for the fields of `{struct_ident}`.",
        ))
        .with_span(lifetime));
    }
    if let Some(param) = input.generics.const_params().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(QueryBind)]` can't be applied to structs with const generic parameters, such as `{struct_ident}`.",
        ))
        .with_span(param));
    }
    Ok(())
}
