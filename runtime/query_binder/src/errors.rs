//! The errors collected while binding query parameters.
use std::fmt::{self, Display};

use indexmap::IndexMap;
use smallvec::SmallVec;

/// The error messages collected while binding query parameters, grouped by parameter name.
///
/// [`FieldErrors`] is designed to improve the debugging experience of API users:
/// binding doesn't stop at the first failure, so the caller can be informed about
/// every invalid parameter **at once**.
///
/// Parameter names are kept in the order they were first reported.
/// Messages are kept, for each name, in the order they were added.
///
/// # Example
///
/// ```rust
/// use query_binder::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.push("page", "must be a positive integer");
/// errors.add("page", ["must be lower than 100"]).unwrap();
/// assert_eq!(errors.get("page"), ["must be a positive integer", "must be lower than 100"]);
///
/// errors.set("page", ["out of range"]).unwrap();
/// assert_eq!(errors.get("page"), ["out of range"]);
///
/// // Adding "nothing" is a programming error.
/// assert!(errors.add("page", Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    items: IndexMap<String, SmallVec<[String; 1]>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No error messages were provided for the `{name}` query parameter")]
/// [`FieldErrors::add`] or [`FieldErrors::set`] was invoked with an empty list of messages.
///
/// It signals a bug in the calling code rather than an invalid query parameter.
pub struct MissingMessagesError {
    name: String,
}

impl MissingMessagesError {
    /// The parameter name the messages were meant for.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FieldErrors {
    /// Create a new, empty [`FieldErrors`] collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single message to the ones recorded for `name`.
    pub fn push(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.items
            .entry(name.into())
            .or_default()
            .push(message.into());
    }

    /// Append one or more messages to the ones recorded for `name`.
    ///
    /// Previously recorded messages are never overwritten.
    /// If `messages` is empty, a [`MissingMessagesError`] is returned and the collection
    /// is left untouched.
    pub fn add<I>(
        &mut self,
        name: impl Into<String>,
        messages: I,
    ) -> Result<(), MissingMessagesError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = name.into();
        let messages = collect_messages(&name, messages)?;
        self.items.entry(name).or_default().extend(messages);
        Ok(())
    }

    /// Replace all the messages recorded for `name`.
    ///
    /// If `messages` is empty, a [`MissingMessagesError`] is returned and the collection
    /// is left untouched.
    /// The position of `name` in the iteration order doesn't change if it had already
    /// been reported.
    pub fn set<I>(
        &mut self,
        name: impl Into<String>,
        messages: I,
    ) -> Result<(), MissingMessagesError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = name.into();
        let messages = collect_messages(&name, messages)?;
        self.items.insert(name, messages);
        Ok(())
    }

    /// The messages recorded for `name`.
    ///
    /// The slice is empty if no error was recorded for `name`.
    pub fn get(&self, name: &str) -> &[String] {
        self.items
            .get(name)
            .map(|messages| messages.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if at least one message was recorded for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Remove all the messages recorded for `name`, returning them.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.items
            .shift_remove(name)
            .map(|messages| messages.into_vec())
    }

    /// Remove all recorded messages.
    pub fn clear(&mut self) {
        self.items.clear()
    }

    /// Returns `true` if no error has been recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of parameters with at least one recorded error.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over `(name, messages)` pairs, in the order the names were first reported.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &[String])> {
        self.items
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }
}

fn collect_messages<I>(
    name: &str,
    messages: I,
) -> Result<SmallVec<[String; 1]>, MissingMessagesError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let messages: SmallVec<[String; 1]> = messages.into_iter().map(Into::into).collect();
    if messages.is_empty() {
        return Err(MissingMessagesError {
            name: name.to_owned(),
        });
    }
    Ok(messages)
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return write!(f, "No query parameter errors");
        }
        writeln!(f, "Some query parameters don't match the expected format:")?;
        for (name, messages) in self.items.iter() {
            for message in messages {
                writeln!(f, "- {name}: {message}")?;
            }
        }
        Ok(())
    }
}
