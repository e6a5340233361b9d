use smallvec::SmallVec;
use tracing_log_error::log_error;

use crate::config::BinderConfig;
use crate::errors::FieldErrors;
use crate::field::{Binding, ScalarAccess, SequenceAccess};
use crate::params::RawQueryParams;
use crate::tag::FieldTag;
use crate::QueryBind;

/// Binds raw query parameters onto the fields of a [`QueryBind`] record.
///
/// Use [`bind`](crate::bind) or [`parse`](crate::parse) if the default [`BinderConfig`]
/// works for you.
///
/// # Precedence rules
///
/// For every field, in declaration order:
///
/// - if the query string holds a non-empty value for the field's parameter, it's decoded
///   and assigned to the field;
/// - otherwise, if the field doesn't hold the zero value of its type (i.e. its
///   [`Default`]), the field is left untouched: pre-populated values act as defaults;
/// - otherwise, if the field's annotation specifies a default, the default is decoded
///   and assigned to the field;
/// - otherwise, the field is left untouched.
///
/// A decoding failure is recorded in the returned [`FieldErrors`], under the field's
/// parameter name, and binding moves on to the next field.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    config: BinderConfig,
}

impl Binder {
    /// Create a new [`Binder`] with the given settings.
    pub fn new(config: BinderConfig) -> Self {
        Self { config }
    }

    /// The settings used by this binder.
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind `params` onto `target`, returning the errors collected along the way.
    pub fn bind<T: QueryBind>(&self, params: &RawQueryParams, target: &mut T) -> FieldErrors {
        let mut errors = FieldErrors::new();
        self.bind_into(params, target, &mut errors);
        errors
    }

    /// Bind `params` onto `target` and then invoke its [post-binding hook](QueryBind::post_bind).
    pub fn parse<T: QueryBind>(&self, params: &RawQueryParams, target: &mut T) -> FieldErrors {
        let mut errors = self.bind(params, target);
        target.post_bind(&mut errors);
        errors
    }

    /// Bind `params` onto `target`, appending errors to an existing collection.
    pub fn bind_into<T: QueryBind>(
        &self,
        params: &RawQueryParams,
        target: &mut T,
        errors: &mut FieldErrors,
    ) {
        for field in T::fields().iter() {
            let Some(tag) = field.tag() else {
                tracing::trace!(field = field.ident(), "Field is not bound to a query parameter");
                continue;
            };
            match &field.binding {
                Binding::Scalar(access) => self.bind_scalar(tag, &**access, target, params, errors),
                Binding::Sequence(access) => {
                    self.bind_sequence(tag, &**access, target, params, errors)
                }
                Binding::Ignored => {}
            }
        }
    }

    fn bind_scalar<P>(
        &self,
        tag: &FieldTag,
        access: &dyn ScalarAccess<P>,
        target: &mut P,
        params: &RawQueryParams,
        errors: &mut FieldErrors,
    ) {
        let name = tag.name();
        let mut raw = params.get(name).unwrap_or_default();
        if raw.is_empty() {
            if !access.is_zero(target) {
                tracing::trace!(query.param = name, "No value, keeping the pre-populated one");
                return;
            }
            raw = tag.default();
        }
        if raw.is_empty() {
            return;
        }

        if let Err(e) = access.decode_into(target, raw) {
            log_error!(
                e,
                level: tracing::Level::DEBUG,
                query.param = name,
                "Failed to decode a query parameter"
            );
            errors.push(name, e.to_string());
        }
    }

    fn bind_sequence<P>(
        &self,
        tag: &FieldTag,
        access: &dyn SequenceAccess<P>,
        target: &mut P,
        params: &RawQueryParams,
        errors: &mut FieldErrors,
    ) {
        let name = tag.name();
        let values: SmallVec<[&str; 4]> = params.get_all(name).filter(|v| !v.is_empty()).collect();
        let elements: SmallVec<[&str; 4]> = match values.len() {
            0 => {
                if access.len(target) > 0 {
                    tracing::trace!(query.param = name, "No value, keeping the pre-populated one");
                    return;
                }
                if tag.default().is_empty() {
                    return;
                }
                tag.default().split(self.config.separator).collect()
            }
            1 if self.config.split_single_value => {
                values[0].split(self.config.separator).collect()
            }
            // Repeated parameters are never split: each occurrence is one element.
            _ => values,
        };

        access.clear(target);
        for element in elements {
            if let Err(e) = access.push_decoded(target, element) {
                log_error!(
                    e,
                    level: tracing::Level::DEBUG,
                    query.param = name,
                    "Failed to decode an element of a query parameter sequence"
                );
                errors.push(name, e.to_string());
                access.clear(target);
                return;
            }
        }
    }
}
