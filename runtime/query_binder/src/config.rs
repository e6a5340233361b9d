use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Settings that control how a [`Binder`](crate::Binder) decodes sequence fields.
///
/// It can be embedded in the configuration of your application:
///
/// ```rust
/// use query_binder::BinderConfig;
///
/// #[derive(serde::Deserialize)]
/// pub struct AppConfig {
///     #[serde(default)]
///     pub query: BinderConfig,
/// }
/// ```
///
/// Every setting is optional: missing ones take their default value.
pub struct BinderConfig {
    /// The delimiter used to split a single sequence value (or a tag default) into
    /// multiple elements.
    ///
    /// # Default
    ///
    /// `,`, i.e. `?ids=1,2,3` is equivalent to `?ids=1&ids=2&ids=3`.
    pub separator: char,
    /// Whether a sequence parameter that appears only once should be split on
    /// [`separator`](Self::separator).
    ///
    /// When `false`, a single value is decoded as a one-element sequence.
    /// Tag defaults are always split.
    ///
    /// # Default
    ///
    /// `true`.
    pub split_single_value: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            separator: ',',
            split_single_value: true,
        }
    }
}
