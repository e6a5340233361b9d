//! Resolve the `name[,default]` annotation attached to a record field.

/// The annotation value that excludes a field from binding.
pub const SKIP: &str = "-";

/// The parameter name and default value of a bindable field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldTag {
    name: String,
    default: String,
}

impl FieldTag {
    /// Resolve the annotation of a field into a [`FieldTag`].
    ///
    /// The annotation syntax is `name[,default]`:
    ///
    /// - the annotation is split on its **first** comma, therefore the default value may
    ///   itself contain commas (e.g. `floats,1.1,2.2`);
    /// - surrounding whitespace is trimmed from both the name and the default;
    /// - an empty (or missing) name falls back to `ident`, the declared name of the field;
    /// - the annotation `-` excludes the field: `None` is returned.
    ///
    /// Resolution never fails: malformed annotations degrade to best-effort values.
    ///
    /// ```rust
    /// use query_binder::tag::FieldTag;
    ///
    /// let tag = FieldTag::resolve(Some("floats, 1.1,2.2"), "floats").unwrap();
    /// assert_eq!(tag.name(), "floats");
    /// assert_eq!(tag.default(), "1.1,2.2");
    ///
    /// let tag = FieldTag::resolve(None, "page").unwrap();
    /// assert_eq!(tag.name(), "page");
    /// assert_eq!(tag.default(), "");
    ///
    /// assert!(FieldTag::resolve(Some("-"), "internal").is_none());
    /// ```
    pub fn resolve(annotation: Option<&str>, ident: &str) -> Option<Self> {
        let annotation = annotation.unwrap_or_default();
        if annotation == SKIP {
            return None;
        }

        let (name, default) = match annotation.split_once(',') {
            Some((name, default)) => (name.trim(), default.trim()),
            None => (annotation.trim(), ""),
        };
        let name = if name.is_empty() {
            ident.strip_prefix("r#").unwrap_or(ident)
        } else {
            name
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_owned(),
            default: default.to_owned(),
        })
    }

    /// The name of the query parameter bound to the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value used when the parameter is missing and the field holds its zero value.
    ///
    /// It is empty if the annotation doesn't specify a default.
    pub fn default(&self) -> &str {
        &self.default
    }
}
