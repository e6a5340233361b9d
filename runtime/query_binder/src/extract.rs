use crate::errors::FieldErrors;
use crate::params::RawQueryParams;
use crate::{Binder, QueryBind};

/// Extract a typed record from the query parameters of a request URI.
///
/// The record starts from its [`Default`] value: pre-populated fields act as defaults
/// for missing parameters. After binding, the record's
/// [post-binding hook](QueryBind::post_bind) is invoked.
///
/// # Example
///
/// ```rust
/// use query_binder::{QueryBind, QueryParams};
///
/// #[derive(QueryBind, Default)]
/// pub struct Search {
///     #[query("q")]
///     pub text: String,
///     #[query("page,1")]
///     pub page: u32,
///     #[query("tag")]
///     pub tags: Vec<String>,
/// }
///
/// let uri: http::Uri = "/search?q=rust&tag=web,cli".parse().unwrap();
/// let QueryParams(search) = QueryParams::<Search>::extract(&uri).unwrap();
/// assert_eq!(search.text, "rust");
/// assert_eq!(search.page, 1);
/// assert_eq!(search.tags, vec!["web", "cli"]);
/// ```
#[doc(alias = "Query")]
#[derive(Debug)]
pub struct QueryParams<T>(
    /// The extracted record.
    pub T,
);

impl<T> QueryParams<T>
where
    T: QueryBind + Default,
{
    /// Extract `T` from the query component of `uri`.
    ///
    /// If any parameter fails to decode (or the post-binding hook reports an error),
    /// an [`ExtractQueryParamsError`] is returned with **all** the collected errors.
    pub fn extract(uri: &http::Uri) -> Result<Self, ExtractQueryParamsError> {
        Self::extract_with(&Binder::default(), uri)
    }

    /// Same as [`QueryParams::extract`], using a custom [`Binder`].
    pub fn extract_with(binder: &Binder, uri: &http::Uri) -> Result<Self, ExtractQueryParamsError> {
        let params = RawQueryParams::from_uri(uri);
        let mut target = T::default();
        let errors = binder.parse(&params, &mut target);
        if !errors.is_empty() {
            return Err(ExtractQueryParamsError::InvalidQueryParams(errors));
        }
        Ok(QueryParams(target))
    }
}

/// The error returned by [`QueryParams::extract`] when the extraction fails.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractQueryParamsError {
    #[error("{0}")]
    /// One or more query parameters couldn't be bound to the target record.
    InvalidQueryParams(FieldErrors),
}

impl ExtractQueryParamsError {
    /// The errors collected for each invalid query parameter.
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            Self::InvalidQueryParams(errors) => errors,
        }
    }

    /// Convert an [`ExtractQueryParamsError`] into an HTTP response.
    ///
    /// It returns a `400 Bad Request` to the caller, listing every invalid parameter.
    pub fn into_response(&self) -> http::Response<String> {
        let mut body = String::new();
        // Writing into a `String` can't fail.
        let _ = self.response_body(&mut body);
        let mut response = http::Response::new(body);
        *response.status_mut() = http::StatusCode::BAD_REQUEST;
        response
    }

    pub(crate) fn response_body<W: std::fmt::Write>(&self, writer: &mut W) -> std::fmt::Result {
        match self {
            Self::InvalidQueryParams(errors) => {
                writeln!(writer, "Invalid query parameters.")?;
                for (name, messages) in errors.iter() {
                    for message in messages {
                        writeln!(writer, "- {name}: {message}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
