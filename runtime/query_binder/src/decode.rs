//! Convert raw query values into typed field values.
//!
//! There are three decoding strategies, tried in order of precedence:
//!
//! 1. [`UnmarshalQuery`], a query-specific decoder that a type can opt into;
//! 2. [`FromStr`], the text decoder of the standard library (it covers all primitive types);
//! 3. [`serde::Deserialize`], driven by a string deserializer (e.g. unit enum variants).
//!
//! The strategy is selected at compile time, for a concrete type, via [`decoder!`](crate::decoder).
use std::error::Error as StdError;
use std::str::FromStr;

use serde::de::{DeserializeOwned, IntoDeserializer};

/// A function that decodes a single raw query value into a `T`.
pub type Decoder<T> = fn(&str) -> Result<T, DecodeError>;

/// A custom decoder for query parameter values.
///
/// It takes precedence over [`FromStr`] and [`serde::Deserialize`] when the type implements
/// more than one of them. Implement it when the query representation of a type
/// differs from its textual one.
///
/// # Example
///
/// ```rust
/// use query_binder::UnmarshalQuery;
///
/// #[derive(Debug, Default, PartialEq)]
/// pub struct State(i8);
///
/// impl State {
///     pub const LOCKED: State = State(2);
/// }
///
/// impl UnmarshalQuery for State {
///     type Error = String;
///
///     fn unmarshal_query(raw: &str) -> Result<Self, Self::Error> {
///         match raw {
///             "locked" => Ok(State::LOCKED),
///             _ => Err(format!("unknown state `{raw}`")),
///         }
///     }
/// }
///
/// let decode = query_binder::decoder!(State);
/// assert_eq!(decode("locked").unwrap(), State::LOCKED);
/// assert!(decode("open").is_err());
/// ```
///
/// Scalar fields never pass an empty value to the decoder: a missing or empty parameter
/// falls back to the field's default instead. Sequence elements can be empty, though:
/// splitting `?ids=1,,2` on the separator yields `""` as its second element, and every
/// element is handed to the decoder as is.
pub trait UnmarshalQuery: Sized {
    /// The error returned when the raw value can't be decoded.
    type Error: Into<Box<dyn StdError + Send + Sync>>;

    /// Decode a raw (percent-decoded) query value.
    fn unmarshal_query(raw: &str) -> Result<Self, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
#[error("`{raw}` is not a valid `{type_name}`: {source}")]
/// A raw query value couldn't be decoded into the type of the target field.
pub struct DecodeError {
    raw: String,
    type_name: &'static str,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl DecodeError {
    /// Create a new [`DecodeError`] for a failed attempt at decoding `raw` into a `T`.
    pub fn new<T>(raw: &str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            raw: raw.to_owned(),
            type_name: std::any::type_name::<T>(),
            source: source.into(),
        }
    }

    /// The raw value that couldn't be decoded.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The name of the type we tried to decode the raw value into.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Decode via [`UnmarshalQuery`].
pub fn unmarshal<T: UnmarshalQuery>(raw: &str) -> Result<T, DecodeError> {
    T::unmarshal_query(raw).map_err(|e| DecodeError::new::<T>(raw, e))
}

/// Decode via [`FromStr`].
pub fn from_str<T>(raw: &str) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: Into<Box<dyn StdError + Send + Sync>>,
{
    raw.parse().map_err(|e| DecodeError::new::<T>(raw, e))
}

/// Decode via [`serde::Deserialize`], feeding the raw value as a string.
pub fn deserialize<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        raw.into_deserializer();
    T::deserialize(deserializer).map_err(|e| DecodeError::new::<T>(raw, e))
}

/// Select the [`Decoder`] for a concrete type.
///
/// The first capability implemented by the type wins, following the order documented
/// in [the module docs](crate::decode). A type implementing none of them is
/// rejected at compile time.
///
/// ```rust
/// let decode = query_binder::decoder!(u32);
/// assert_eq!(decode("42").unwrap(), 42);
///
/// #[derive(serde::Deserialize, Debug, PartialEq)]
/// #[serde(rename_all = "lowercase")]
/// enum Order {
///     Asc,
///     Desc,
/// }
///
/// let decode = query_binder::decoder!(Order);
/// assert_eq!(decode("desc").unwrap(), Order::Desc);
/// ```
#[macro_export]
macro_rules! decoder {
    ($ty:ty) => {{
        #[allow(unused_imports)]
        use $crate::decode::probe::{ViaDeserialize as _, ViaFromStr as _, ViaUnmarshal as _};
        (&&&$crate::decode::probe::Probe::<$ty>::new()).decoder()
    }};
}

#[doc(hidden)]
/// Capability detection for [`decoder!`](crate::decoder), via auto-ref method resolution.
///
/// Each strategy is implemented for a different number of references on top of [`Probe`]:
/// method resolution tries the most-referenced receiver first, therefore the
/// highest-precedence strategy that the type supports is picked.
pub mod probe {
    use std::error::Error as StdError;
    use std::marker::PhantomData;
    use std::str::FromStr;

    use serde::de::DeserializeOwned;

    use super::{Decoder, UnmarshalQuery};

    pub struct Probe<T>(PhantomData<T>);

    impl<T> Probe<T> {
        pub const fn new() -> Self {
            Self(PhantomData)
        }
    }

    impl<T> Default for Probe<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    pub trait ViaUnmarshal<T> {
        fn decoder(&self) -> Decoder<T>;
    }

    impl<T: UnmarshalQuery> ViaUnmarshal<T> for &&Probe<T> {
        fn decoder(&self) -> Decoder<T> {
            super::unmarshal::<T>
        }
    }

    pub trait ViaFromStr<T> {
        fn decoder(&self) -> Decoder<T>;
    }

    impl<T> ViaFromStr<T> for &Probe<T>
    where
        T: FromStr,
        T::Err: Into<Box<dyn StdError + Send + Sync>>,
    {
        fn decoder(&self) -> Decoder<T> {
            super::from_str::<T>
        }
    }

    pub trait ViaDeserialize<T> {
        fn decoder(&self) -> Decoder<T>;
    }

    impl<T: DeserializeOwned> ViaDeserialize<T> for Probe<T> {
        fn decoder(&self) -> Decoder<T> {
            super::deserialize::<T>
        }
    }
}
