use proc_macro::TokenStream;

mod field_type;
mod query_bind;

/// Derive an implementation of `query_binder::QueryBind` for a struct with named fields.
///
/// Field attributes:
///
/// - `#[query("name,default")]`, `#[query("name")]`, `#[query(",default")]`;
/// - `#[query("-")]` or `#[query(skip)]` to exclude the field;
/// - `#[query(flatten)]` to inline the fields of another `QueryBind` type.
///
/// Struct attributes:
///
/// - `#[query(sanitize)]` to invoke `query_binder::SanitizeQuery` after binding.
///
/// # Unsupported inputs
///
/// Only structs with named fields are supported:
///
/// ```rust,compile_fail
/// #[derive(query_binder::QueryBind)]
/// pub enum Order {
///     Asc,
///     Desc,
/// }
/// ```
///
/// ```rust,compile_fail
/// #[derive(query_binder::QueryBind)]
/// pub struct Page(u32);
/// ```
///
/// The field table is cached in a `static`, therefore the struct can't be generic
/// over types, lifetimes or constants:
///
/// ```rust,compile_fail
/// #[derive(query_binder::QueryBind)]
/// pub struct Search<'a> {
///     text: std::borrow::Cow<'a, str>,
/// }
/// ```
///
/// ```rust,compile_fail
/// #[derive(query_binder::QueryBind)]
/// pub struct Ids<const N: usize> {
///     ids: Vec<u64>,
/// }
/// ```
#[proc_macro_derive(QueryBind, attributes(query))]
pub fn derive_query_bind(input: TokenStream) -> TokenStream {
    query_bind::derive_query_bind(input)
}
