use crate::{
    archive::{EntryDescriptor, ZipContainer},
    encoding::{Encoding, Utf8Encoding},
    errors::LoadError,
    reference::ResourceReference,
};
use rawzip::ReaderAt;
use std::{io::Read, path::PathBuf};

/// A capability that loads textual content from some backing store
///
/// Implemented by archive, filesystem, and in-memory sources so a resource
/// need not know where its bytes live. Any store that can produce a string
/// can back a resource by implementing this one method.
pub trait ContentSource {
    /// Performs one load attempt, returning the fully decoded content
    fn load(&self) -> Result<String, LoadError>;
}

impl<T: ContentSource + ?Sized> ContentSource for &'_ T {
    fn load(&self) -> Result<String, LoadError> {
        (**self).load()
    }
}

impl<T: ContentSource + ?Sized> ContentSource for Box<T> {
    fn load(&self) -> Result<String, LoadError> {
        (**self).load()
    }
}

/// A lazily loaded unit of site content with a stable identity
///
/// A resource binds a [`ResourceReference`] to a [`ContentSource`]. No I/O
/// happens at construction; the first call to [`Resource::content`] performs
/// exactly one load attempt and caches the result for the lifetime of the
/// resource. A failed load leaves the cache absent, so the next access
/// retries rather than serving a poisoned value -- transient faults heal on
/// their own, and callers that want fail-fast behavior inspect the returned
/// error instead.
///
/// ```
/// use quarry::{Resource, ResourceReference, StringSource};
///
/// let mut resource = Resource::new(
///     ResourceReference::new("docs/index.md"),
///     StringSource::new("# Hello"),
/// );
/// assert_eq!(resource.reference().to_string(), "docs/index.md");
/// assert!(!resource.is_loaded());
/// assert_eq!(resource.content().unwrap(), Some("# Hello"));
/// assert!(resource.is_loaded());
/// ```
pub struct Resource<'a> {
    reference: ResourceReference,
    source: Option<Box<dyn ContentSource + 'a>>,
    content: Option<String>,
}

impl<'a> Resource<'a> {
    /// Binds a reference to a content source. Performs no I/O.
    pub fn new<S>(reference: ResourceReference, source: S) -> Self
    where
        S: ContentSource + 'a,
    {
        Resource {
            reference,
            source: Some(Box::new(source)),
            content: None,
        }
    }

    /// Creates a resource with no backing source
    ///
    /// Such a resource never loads: its content stays absent and requesting
    /// it is a no-op rather than an error.
    pub fn detached(reference: ResourceReference) -> Self {
        Resource {
            reference,
            source: None,
            content: None,
        }
    }

    /// The resource's identity, independent of load state
    pub fn reference(&self) -> &ResourceReference {
        &self.reference
    }

    /// Returns the textual content, loading it on first access
    ///
    /// - `Ok(Some(_))` -- content was already cached or has just been loaded
    /// - `Ok(None)` -- the resource has no source; nothing to load
    /// - `Err(_)` -- the load attempt failed and the cache remains absent,
    ///   so a subsequent call will retry
    ///
    /// At most one load reaches the source per successful lifetime: once
    /// content is cached, further calls return it without touching the
    /// backing store.
    pub fn content(&mut self) -> Result<Option<&str>, LoadError> {
        if self.content.is_none() {
            let source = match &self.source {
                Some(source) => source,
                None => return Ok(None),
            };

            let text = source.load()?;
            self.content = Some(text);
        }

        Ok(self.content.as_deref())
    }

    /// Returns the cached content without attempting a load
    pub fn cached(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// True once a load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }
}

impl std::fmt::Debug for Resource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("reference", &self.reference)
            .field("loaded", &self.content.is_some())
            .finish()
    }
}

/// Loads one entry of a [`ZipContainer`] as text
///
/// Holds a non-owning borrow of the container: the enumeration process that
/// opened the container keeps ownership, and many sources may share it.
/// Each load opens a scoped entry reader, drains it, decodes the bytes with
/// the configured encoding, and drops the reader before returning.
#[derive(Debug)]
pub struct ArchiveSource<'a, R, E = Utf8Encoding> {
    container: &'a ZipContainer<R>,
    entry: EntryDescriptor,
    encoding: E,
}

impl<'a, R> ArchiveSource<'a, R> {
    /// Creates a source over the given entry, decoding as UTF-8
    pub fn new(container: &'a ZipContainer<R>, entry: EntryDescriptor) -> Self {
        ArchiveSource {
            container,
            entry,
            encoding: Utf8Encoding::new(),
        }
    }
}

impl<'a, R, E> ArchiveSource<'a, R, E> {
    /// Replaces the encoding used to decode entry bytes
    pub fn with_encoding<E2: Encoding>(self, encoding: E2) -> ArchiveSource<'a, R, E2> {
        ArchiveSource {
            container: self.container,
            entry: self.entry,
            encoding,
        }
    }

    /// The descriptor of the entry this source reads
    pub fn entry(&self) -> &EntryDescriptor {
        &self.entry
    }
}

impl<'a, R, E> ContentSource for ArchiveSource<'a, R, E>
where
    R: ReaderAt,
    E: Encoding,
{
    fn load(&self) -> Result<String, LoadError> {
        let mut reader = self.container.open(&self.entry)?;
        let mut data = Vec::with_capacity(self.entry.uncompressed_size_hint() as usize);
        reader.read_to_end(&mut data)?;
        drop(reader);

        Ok(self.encoding.decode(&data)?)
    }
}

/// Loads content from a filesystem path
#[derive(Debug)]
pub struct FileSource<E = Utf8Encoding> {
    path: PathBuf,
    encoding: E,
}

impl FileSource {
    /// Creates a source over the given path, decoding as UTF-8
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSource {
            path: path.into(),
            encoding: Utf8Encoding::new(),
        }
    }
}

impl<E> FileSource<E> {
    /// Replaces the encoding used to decode file bytes
    pub fn with_encoding<E2: Encoding>(self, encoding: E2) -> FileSource<E2> {
        FileSource {
            path: self.path,
            encoding,
        }
    }
}

impl<E: Encoding> ContentSource for FileSource<E> {
    fn load(&self) -> Result<String, LoadError> {
        let data = std::fs::read(&self.path)?;
        Ok(self.encoding.decode(&data)?)
    }
}

/// In-memory content that loads infallibly
#[derive(Debug, Clone)]
pub struct StringSource {
    content: String,
}

impl StringSource {
    /// Creates a source over already-decoded content
    pub fn new<S: Into<String>>(content: S) -> Self {
        StringSource {
            content: content.into(),
        }
    }
}

impl ContentSource for StringSource {
    fn load(&self) -> Result<String, LoadError> {
        Ok(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoadErrorKind;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSource {
        loads: Rc<Cell<usize>>,
        fail_first: Cell<usize>,
        content: &'static str,
    }

    impl CountingSource {
        fn new(content: &'static str) -> (Self, Rc<Cell<usize>>) {
            let loads = Rc::new(Cell::new(0));
            let source = CountingSource {
                loads: Rc::clone(&loads),
                fail_first: Cell::new(0),
                content,
            };
            (source, loads)
        }

        fn failing_first(mut self, failures: usize) -> Self {
            self.fail_first = Cell::new(failures);
            self
        }
    }

    impl ContentSource for CountingSource {
        fn load(&self) -> Result<String, LoadError> {
            self.loads.set(self.loads.get() + 1);
            let remaining = self.fail_first.get();
            if remaining > 0 {
                self.fail_first.set(remaining - 1);
                let err = std::io::Error::new(std::io::ErrorKind::Other, "stream open failed");
                return Err(err.into());
            }

            Ok(self.content.to_string())
        }
    }

    #[test]
    fn construction_performs_no_io() {
        let (source, loads) = CountingSource::new("body");
        let resource = Resource::new(ResourceReference::new("a/b.md"), source);
        assert_eq!(loads.get(), 0);
        assert!(!resource.is_loaded());
        assert_eq!(resource.cached(), None);
    }

    #[test]
    fn loads_at_most_once() {
        let (source, loads) = CountingSource::new("body");
        let mut resource = Resource::new(ResourceReference::new("a/b.md"), source);

        assert_eq!(resource.content().unwrap(), Some("body"));
        assert_eq!(resource.content().unwrap(), Some("body"));
        assert_eq!(resource.content().unwrap(), Some("body"));
        assert_eq!(loads.get(), 1);
        assert_eq!(resource.cached(), Some("body"));
    }

    #[test]
    fn detached_resource_never_loads() {
        let mut resource = Resource::detached(ResourceReference::new("a/b.md"));
        assert_eq!(resource.content().unwrap(), None);
        assert_eq!(resource.content().unwrap(), None);
        assert!(!resource.is_loaded());
    }

    #[test]
    fn failed_load_retries_on_next_access() {
        let (source, loads) = CountingSource::new("body");
        let source = source.failing_first(1);
        let mut resource = Resource::new(ResourceReference::new("a/b.md"), source);

        let err = resource.content().unwrap_err();
        assert!(matches!(err.kind(), LoadErrorKind::Io(_)));
        assert_eq!(loads.get(), 1);
        assert!(!resource.is_loaded());
        assert_eq!(resource.cached(), None);

        // retry succeeds and caches
        assert_eq!(resource.content().unwrap(), Some("body"));
        assert_eq!(loads.get(), 2);

        // cached value served without another load
        assert_eq!(resource.content().unwrap(), Some("body"));
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn reference_is_stable_across_load_states() {
        let (source, _loads) = CountingSource::new("body");
        let mut resource = Resource::new(ResourceReference::new("docs/index.md"), source);
        assert_eq!(resource.reference().to_string(), "docs/index.md");
        resource.content().unwrap();
        assert_eq!(resource.reference().to_string(), "docs/index.md");
    }

    #[test]
    fn explicit_reference_overrides_entry_name() {
        let (source, _loads) = CountingSource::new("body");
        let resource = Resource::new(ResourceReference::new("custom/path"), source);
        assert_eq!(resource.reference().full_name(), "custom/path");
    }

    #[test]
    fn string_source_round_trips() {
        let mut resource = Resource::new(
            ResourceReference::new("inline.md"),
            StringSource::new("# Hello"),
        );
        assert_eq!(resource.content().unwrap(), Some("# Hello"));
    }

    #[test]
    fn file_source_missing_file_is_io_error() {
        let source = FileSource::new("definitely/not/a/real/path.md");
        let mut resource = Resource::new(ResourceReference::new("path.md"), source);
        let err = resource.content().unwrap_err();
        assert!(matches!(err.kind(), LoadErrorKind::Io(_)));
        assert!(!resource.is_loaded());
    }
}
