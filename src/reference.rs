/// A logical identity for a resource, independent of its backing store
///
/// A reference is derived from an entry's internal name by default, but a
/// caller may supply any name it likes -- the rendered location of a resource
/// need not match where its bytes live. The full name is stored verbatim so
/// an explicit reference always renders back exactly as given.
///
/// ```
/// use quarry::ResourceReference;
///
/// let reference = ResourceReference::new("docs/guides/index.md");
/// assert_eq!(reference.path(), "docs/guides");
/// assert_eq!(reference.file_name(), "index");
/// assert_eq!(reference.extension(), Some("md"));
/// assert_eq!(reference.to_string(), "docs/guides/index.md");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceReference {
    full: String,
}

impl ResourceReference {
    /// Creates a reference from a full internal name
    pub fn new<S: Into<String>>(full: S) -> Self {
        ResourceReference { full: full.into() }
    }

    /// The full internal name, exactly as constructed
    pub fn full_name(&self) -> &str {
        &self.full
    }

    /// The directory portion of the name, empty when the name has no
    /// separator
    pub fn path(&self) -> &str {
        match self.full.rfind('/') {
            Some(idx) => &self.full[..idx],
            None => "",
        }
    }

    /// The file name without its directory portion or extension
    pub fn file_name(&self) -> &str {
        let base = match self.full.rfind('/') {
            Some(idx) => &self.full[idx + 1..],
            None => self.full.as_str(),
        };

        match base.rfind('.') {
            Some(0) | None => base,
            Some(idx) => &base[..idx],
        }
    }

    /// The extension after the final dot, if any
    pub fn extension(&self) -> Option<&str> {
        let base = match self.full.rfind('/') {
            Some(idx) => &self.full[idx + 1..],
            None => self.full.as_str(),
        };

        match base.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&base[idx + 1..]),
        }
    }
}

impl std::fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

impl From<&str> for ResourceReference {
    fn from(full: &str) -> Self {
        ResourceReference::new(full)
    }
}

impl From<String> for ResourceReference {
    fn from(full: String) -> Self {
        ResourceReference::new(full)
    }
}
