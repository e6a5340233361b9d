//! The field descriptor table of a bindable record.
//!
//! A [`FieldTable`] lists, in declaration order, every field of a record together with
//! its resolved [`FieldTag`] and the accessors used to read and write it.
//! Tables are usually generated by `#[derive(QueryBind)]`, but they can be assembled by
//! hand via [`FieldTable::builder`].
use std::collections::VecDeque;
use std::fmt;

use crate::QueryBind;
use crate::decode::{DecodeError, Decoder};
use crate::tag::FieldTag;

/// How a field participates in binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single value, decoded from the first value of its parameter.
    Scalar,
    /// A sequence of values, decoded from repeated or comma-separated parameter values.
    Sequence,
    /// A field that is never bound: it was explicitly skipped, or its type can't be
    /// represented as a query parameter (e.g. a function pointer or a fixed-size array).
    Ignored,
}

/// Read and write access to a scalar field of `P`, erased over the field type.
pub trait ScalarAccess<P>: Send + Sync {
    /// Returns `true` if the field holds the zero value of its type.
    fn is_zero(&self, target: &P) -> bool;
    /// Decode `raw` and assign it to the field.
    ///
    /// The field is left untouched if decoding fails.
    fn decode_into(&self, target: &mut P, raw: &str) -> Result<(), DecodeError>;
}

/// Read and write access to a sequence field of `P`, erased over the field type.
pub trait SequenceAccess<P>: Send + Sync {
    /// The number of elements currently held by the field.
    fn len(&self, target: &P) -> usize;
    /// Remove all elements from the field.
    fn clear(&self, target: &mut P);
    /// Decode `raw` into a new element and append it to the field.
    ///
    /// The field is left untouched if decoding fails.
    fn push_decoded(&self, target: &mut P, raw: &str) -> Result<(), DecodeError>;
}

/// A growable collection that can back a sequence field.
pub trait Sequence {
    /// The type of the elements.
    type Item;

    /// The number of elements.
    fn len(&self) -> usize;
    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Remove all elements.
    fn clear(&mut self);
    /// Append an element at the end.
    fn push(&mut self, item: Self::Item);
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push(&mut self, item: T) {
        Vec::push(self, item)
    }
}

impl<T> Sequence for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }

    fn push(&mut self, item: T) {
        self.push_back(item)
    }
}

/// A scalar field of type `V` in a record of type `P`.
pub struct ScalarField<P, V> {
    get: fn(&P) -> &V,
    get_mut: fn(&mut P) -> &mut V,
    decode: Decoder<V>,
}

impl<P, V> ScalarField<P, V> {
    pub fn new(get: fn(&P) -> &V, get_mut: fn(&mut P) -> &mut V, decode: Decoder<V>) -> Self {
        Self {
            get,
            get_mut,
            decode,
        }
    }
}

impl<P, V> ScalarAccess<P> for ScalarField<P, V>
where
    V: Default + PartialEq,
{
    fn is_zero(&self, target: &P) -> bool {
        *(self.get)(target) == V::default()
    }

    fn decode_into(&self, target: &mut P, raw: &str) -> Result<(), DecodeError> {
        let value = (self.decode)(raw)?;
        *(self.get_mut)(target) = value;
        Ok(())
    }
}

/// A sequence field of type `S` in a record of type `P`.
pub struct SequenceField<P, S: Sequence> {
    get: fn(&P) -> &S,
    get_mut: fn(&mut P) -> &mut S,
    decode: Decoder<S::Item>,
}

impl<P, S: Sequence> SequenceField<P, S> {
    pub fn new(
        get: fn(&P) -> &S,
        get_mut: fn(&mut P) -> &mut S,
        decode: Decoder<S::Item>,
    ) -> Self {
        Self {
            get,
            get_mut,
            decode,
        }
    }
}

impl<P, S: Sequence> SequenceAccess<P> for SequenceField<P, S> {
    fn len(&self, target: &P) -> usize {
        (self.get)(target).len()
    }

    fn clear(&self, target: &mut P) {
        (self.get_mut)(target).clear()
    }

    fn push_decoded(&self, target: &mut P, raw: &str) -> Result<(), DecodeError> {
        let item = (self.decode)(raw)?;
        (self.get_mut)(target).push(item);
        Ok(())
    }
}

/// Access to a field of a flattened sub-record `C`, re-targeted at the parent record `P`.
struct Projected<P, C: 'static, A: ?Sized + 'static> {
    get: fn(&P) -> &C,
    get_mut: fn(&mut P) -> &mut C,
    inner: &'static A,
}

impl<P, C> ScalarAccess<P> for Projected<P, C, dyn ScalarAccess<C>> {
    fn is_zero(&self, target: &P) -> bool {
        self.inner.is_zero((self.get)(target))
    }

    fn decode_into(&self, target: &mut P, raw: &str) -> Result<(), DecodeError> {
        self.inner.decode_into((self.get_mut)(target), raw)
    }
}

impl<P, C> SequenceAccess<P> for Projected<P, C, dyn SequenceAccess<C>> {
    fn len(&self, target: &P) -> usize {
        self.inner.len((self.get)(target))
    }

    fn clear(&self, target: &mut P) {
        self.inner.clear((self.get_mut)(target))
    }

    fn push_decoded(&self, target: &mut P, raw: &str) -> Result<(), DecodeError> {
        self.inner.push_decoded((self.get_mut)(target), raw)
    }
}

pub(crate) enum Binding<P: 'static> {
    Scalar(Box<dyn ScalarAccess<P>>),
    Sequence(Box<dyn SequenceAccess<P>>),
    Ignored,
}

/// A single entry of a [`FieldTable`].
pub struct FieldDescriptor<P: 'static> {
    ident: &'static str,
    tag: Option<FieldTag>,
    pub(crate) binding: Binding<P>,
}

impl<P: 'static> FieldDescriptor<P> {
    /// The declared name of the field.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The resolved parameter name and default of the field.
    ///
    /// It's `None` for fields excluded via the skip annotation and for
    /// [ignored](FieldKind::Ignored) fields.
    pub fn tag(&self) -> Option<&FieldTag> {
        match self.binding {
            Binding::Ignored => None,
            _ => self.tag.as_ref(),
        }
    }

    /// How the field participates in binding.
    pub fn kind(&self) -> FieldKind {
        match self.binding {
            Binding::Scalar(_) => FieldKind::Scalar,
            Binding::Sequence(_) => FieldKind::Sequence,
            Binding::Ignored => FieldKind::Ignored,
        }
    }
}

impl<P: 'static> fmt::Debug for FieldDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("ident", &self.ident)
            .field("tag", &self.tag)
            .field("kind", &self.kind())
            .finish()
    }
}

/// The ordered list of the fields of a bindable record `P`.
///
/// Fields of flattened sub-records are inlined where the sub-record is declared.
#[derive(Debug)]
pub struct FieldTable<P: 'static> {
    fields: Vec<FieldDescriptor<P>>,
}

impl<P: 'static> FieldTable<P> {
    /// Start assembling a new [`FieldTable`].
    pub fn builder() -> FieldTableBuilder<P> {
        FieldTableBuilder { fields: Vec::new() }
    }

    /// Iterate over the fields, in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<P>> {
        self.fields.iter()
    }

    /// The number of fields, including ignored ones.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for [`FieldTable`]. See [`FieldTable::builder`].
///
/// `annotation` is the raw `name[,default]` annotation of the field, if any.
/// It's resolved via [`FieldTag::resolve`] when the field is registered.
///
/// # Example
///
/// ```rust
/// use query_binder::{FieldTable, FieldKind};
///
/// #[derive(Default)]
/// pub struct Search {
///     page: u32,
///     tags: Vec<String>,
///     cache: [u8; 4],
/// }
///
/// let table = FieldTable::<Search>::builder()
///     .scalar("page", Some("page,1"), |s| &s.page, |s| &mut s.page, query_binder::decoder!(u32))
///     .sequence("tags", Some("tag"), |s| &s.tags, |s| &mut s.tags, query_binder::decoder!(String))
///     .ignored("cache")
///     .build();
///
/// let kinds: Vec<_> = table.iter().map(|f| f.kind()).collect();
/// assert_eq!(kinds, vec![FieldKind::Scalar, FieldKind::Sequence, FieldKind::Ignored]);
/// ```
pub struct FieldTableBuilder<P: 'static> {
    fields: Vec<FieldDescriptor<P>>,
}

impl<P: 'static> FieldTableBuilder<P> {
    /// Register a scalar field.
    pub fn scalar<V>(
        mut self,
        ident: &'static str,
        annotation: Option<&str>,
        get: fn(&P) -> &V,
        get_mut: fn(&mut P) -> &mut V,
        decode: Decoder<V>,
    ) -> Self
    where
        V: Default + PartialEq + 'static,
    {
        self.fields.push(FieldDescriptor {
            ident,
            tag: FieldTag::resolve(annotation, ident),
            binding: Binding::Scalar(Box::new(ScalarField::new(get, get_mut, decode))),
        });
        self
    }

    /// Register a sequence field.
    pub fn sequence<S>(
        mut self,
        ident: &'static str,
        annotation: Option<&str>,
        get: fn(&P) -> &S,
        get_mut: fn(&mut P) -> &mut S,
        decode: Decoder<S::Item>,
    ) -> Self
    where
        S: Sequence + 'static,
        S::Item: 'static,
    {
        self.fields.push(FieldDescriptor {
            ident,
            tag: FieldTag::resolve(annotation, ident),
            binding: Binding::Sequence(Box::new(SequenceField::new(get, get_mut, decode))),
        });
        self
    }

    /// Register a field that is never bound.
    pub fn ignored(mut self, ident: &'static str) -> Self {
        self.fields.push(FieldDescriptor {
            ident,
            tag: None,
            binding: Binding::Ignored,
        });
        self
    }

    /// Inline the fields of a sub-record.
    ///
    /// Parameter names are not prefixed: the fields of `C` are bound as if they were
    /// declared directly on `P`.
    pub fn flatten<C: QueryBind>(
        mut self,
        get: fn(&P) -> &C,
        get_mut: fn(&mut P) -> &mut C,
    ) -> Self {
        for field in C::fields().iter() {
            let binding = match &field.binding {
                Binding::Scalar(inner) => {
                    let inner: &'static dyn ScalarAccess<C> = &**inner;
                    Binding::Scalar(Box::new(Projected { get, get_mut, inner }))
                }
                Binding::Sequence(inner) => {
                    let inner: &'static dyn SequenceAccess<C> = &**inner;
                    Binding::Sequence(Box::new(Projected { get, get_mut, inner }))
                }
                Binding::Ignored => Binding::Ignored,
            };
            self.fields.push(FieldDescriptor {
                ident: field.ident,
                tag: field.tag.clone(),
                binding,
            });
        }
        self
    }

    /// Finish assembling the table.
    pub fn build(self) -> FieldTable<P> {
        FieldTable {
            fields: self.fields,
        }
    }
}
