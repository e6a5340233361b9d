//! # query_binder
//!
//! Bind the parameters of a query string onto the fields of a typed record.
//!
//! ```rust
//! use query_binder::{QueryBind, RawQueryParams};
//!
//! #[derive(QueryBind, Default, Debug)]
//! pub struct ListUsers {
//!     // Bound to `?page=..`, defaulting to `1` when missing.
//!     #[query("page,1")]
//!     pub page: u32,
//!     // Bound to `?id=1,2` or `?id=1&id=2`.
//!     #[query("id")]
//!     pub ids: Vec<u64>,
//!     // Never bound.
//!     #[query("-")]
//!     pub internal: bool,
//! }
//!
//! let params = RawQueryParams::parse("id=1,2&internal=true");
//! let mut users = ListUsers::default();
//! let errors = query_binder::bind(&params, &mut users);
//! assert!(errors.is_empty());
//! assert_eq!(users.page, 1);
//! assert_eq!(users.ids, vec![1, 2]);
//! assert!(!users.internal);
//! ```
//!
//! # Annotations
//!
//! Each field can be annotated with `#[query("name,default")]`:
//!
//! - `name` is the name of the query parameter; it defaults to the name of the field;
//! - `default` is the value decoded when the parameter is missing (or empty) **and** the
//!   field still holds the zero value of its type; it may contain commas.
//!
//! `#[query("-")]` (or `#[query(skip)]`) excludes a field from binding, while
//! `#[query(flatten)]` inlines the fields of another [`QueryBind`] record.
//! Fields whose type can't be represented as a query parameter (function pointers,
//! references, fixed-size arrays, smart pointers, channels, ...) are ignored.
//!
//! # Sequences
//!
//! `Vec<T>` and `VecDeque<T>` fields accept both `?k=v1,v2` and `?k=v1&k=v2`.
//! When the parameter is repeated, values are **not** split on commas:
//! `?k=v1&k=v2,v3` becomes `["v1", "v2,v3"]`.
//!
//! # Decoding
//!
//! Check out the [`decode`] module for the available decoding strategies and how to
//! plug in your own via [`UnmarshalQuery`].
//!
//! # Errors
//!
//! Binding never stops at the first failure: errors are collected, per parameter name,
//! into [`FieldErrors`].
pub use bind::Binder;
pub use config::BinderConfig;
pub use decode::{DecodeError, UnmarshalQuery};
pub use errors::{FieldErrors, MissingMessagesError};
pub use extract::{ExtractQueryParamsError, QueryParams};
pub use field::{FieldDescriptor, FieldKind, FieldTable, FieldTableBuilder, Sequence};
pub use params::RawQueryParams;
pub use query_binder_macros::QueryBind;

mod bind;
mod config;
pub mod decode;
pub mod errors;
mod extract;
pub mod field;
mod params;
pub mod tag;

/// A record whose fields can be bound from query parameters.
///
/// You'll usually derive it via `#[derive(QueryBind)]`.
/// Implementing it by hand requires assembling a [`FieldTable`]: check out
/// [`FieldTable::builder`] for an example.
pub trait QueryBind: Sized + 'static {
    /// The descriptors of the fields of this record, in declaration order.
    ///
    /// The table should be built once and cached.
    fn fields() -> &'static FieldTable<Self>;

    /// A hook invoked by [`parse`] (and [`QueryParams`]) once every field has been bound.
    ///
    /// It can inspect the bound record and add (or remove) errors.
    /// It does nothing by default.
    fn post_bind(&mut self, errors: &mut FieldErrors) {
        let _ = errors;
    }
}

/// Validate or normalize a record after its fields have been bound.
///
/// Derived [`QueryBind`] implementations invoke it as their
/// [post-binding hook](QueryBind::post_bind) when the struct is annotated
/// with `#[query(sanitize)]`.
///
/// ```rust
/// use query_binder::{FieldErrors, QueryBind, RawQueryParams, SanitizeQuery};
///
/// #[derive(QueryBind, Default)]
/// #[query(sanitize)]
/// pub struct Page {
///     pub size: u32,
/// }
///
/// impl SanitizeQuery for Page {
///     fn sanitize_query(&mut self, errors: &mut FieldErrors) {
///         if self.size > 100 {
///             errors.push("size", "must be at most 100");
///         }
///     }
/// }
///
/// let mut page = Page::default();
/// let errors = query_binder::parse(&RawQueryParams::parse("size=500"), &mut page);
/// assert_eq!(errors.get("size"), ["must be at most 100"]);
/// ```
pub trait SanitizeQuery {
    /// Inspect the bound record, recording any error in `errors`.
    fn sanitize_query(&mut self, errors: &mut FieldErrors);
}

/// Bind `params` onto `target` using the default [`BinderConfig`].
///
/// See [`Binder::bind`].
pub fn bind<T: QueryBind>(params: &RawQueryParams, target: &mut T) -> FieldErrors {
    Binder::default().bind(params, target)
}

/// Bind `params` onto `target` using the default [`BinderConfig`], then invoke
/// the [post-binding hook](QueryBind::post_bind).
///
/// See [`Binder::parse`].
pub fn parse<T: QueryBind>(params: &RawQueryParams, target: &mut T) -> FieldErrors {
    Binder::default().parse(params, target)
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
