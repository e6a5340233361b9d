//! Classify the type of a field, syntactically.
use syn::{GenericArgument, PathArguments, Type};

/// Smart pointers, interior mutability wrappers, channel endpoints and other types
/// that can't be represented by a query parameter.
const IGNORED_TYPES: &[&str] = &[
    "Box",
    "Rc",
    "Arc",
    "Weak",
    "NonNull",
    "Cell",
    "RefCell",
    "Mutex",
    "RwLock",
    "Sender",
    "SyncSender",
    "Receiver",
    "PhantomData",
    "Complex",
];

const SEQUENCE_TYPES: &[&str] = &["Vec", "VecDeque"];

/// A single value, possibly wrapped.
#[derive(Debug, PartialEq)]
pub(crate) struct Value<'a> {
    /// The type that is actually decoded.
    pub(crate) ty: &'a Type,
    pub(crate) wrapper: Wrapper,
}

/// How the decoded value is wrapped before being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wrapper {
    None,
    Option,
    Box,
}

#[derive(Debug, PartialEq)]
pub(crate) enum FieldType<'a> {
    Scalar(Value<'a>),
    Sequence(Value<'a>),
    Ignored,
}

impl<'a> FieldType<'a> {
    pub(crate) fn classify(ty: &'a Type) -> Self {
        match ty {
            Type::Paren(p) => Self::classify(&p.elem),
            Type::Group(g) => Self::classify(&g.elem),
            Type::Path(_) => {
                let Some((ident, arg)) = last_segment(ty) else {
                    return Self::Scalar(Value::plain(ty));
                };
                if IGNORED_TYPES.contains(&ident.as_str()) {
                    return Self::Ignored;
                }
                match arg {
                    Some(elem) if SEQUENCE_TYPES.contains(&ident.as_str()) => {
                        Self::Sequence(Value::unwrap(elem, &["Option", "Box"]))
                    }
                    Some(inner) if ident == "Option" => match Self::classify(inner) {
                        Self::Scalar(Value {
                            wrapper: Wrapper::None,
                            ..
                        }) => Self::Scalar(Value {
                            ty: inner,
                            wrapper: Wrapper::Option,
                        }),
                        _ => Self::Ignored,
                    },
                    _ => Self::Scalar(Value::plain(ty)),
                }
            }
            Type::Array(_)
            | Type::BareFn(_)
            | Type::Ptr(_)
            | Type::Reference(_)
            | Type::Slice(_)
            | Type::TraitObject(_)
            | Type::ImplTrait(_)
            | Type::Never(_)
            | Type::Tuple(_) => Self::Ignored,
            _ => Self::Scalar(Value::plain(ty)),
        }
    }
}

impl<'a> Value<'a> {
    fn plain(ty: &'a Type) -> Self {
        Self {
            ty,
            wrapper: Wrapper::None,
        }
    }

    /// Strip one level of `Option<_>` or `Box<_>`, if present.
    fn unwrap(ty: &'a Type, wrappers: &[&str]) -> Self {
        match last_segment(ty) {
            Some((ident, Some(inner))) if wrappers.contains(&ident.as_str()) => Self {
                ty: inner,
                wrapper: if ident == "Option" {
                    Wrapper::Option
                } else {
                    Wrapper::Box
                },
            },
            _ => Self::plain(ty),
        }
    }
}

/// The identifier of the last path segment and its first generic type argument, if any.
fn last_segment(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let arg = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    };
    Some((segment.ident.to_string(), arg))
}
