/*!

Lazy, archive-backed resource loading for static site content pipelines.

A site build discovers far more content than it renders: themes and plugins
ship whole archives of templates, partials, and assets, of which a given
build touches a handful. Quarry models each discovered unit as a
[`Resource`] -- a stable identity plus content that is loaded at most once,
on first access, from wherever its bytes happen to live.

## Quick Start

```rust
use quarry::{Resource, ResourceReference, StringSource};

let mut resource = Resource::new(
    ResourceReference::new("docs/index.md"),
    StringSource::new("# Hello"),
);

// Identity is available before any content is loaded
assert_eq!(resource.reference().to_string(), "docs/index.md");
assert_eq!(resource.reference().extension(), Some("md"));

// First access loads and caches; later accesses are free
assert_eq!(resource.content().unwrap(), Some("# Hello"));
assert!(resource.is_loaded());
```

## Archive-backed resources

Theme and plugin content usually arrives inside a ZIP archive. A
[`ZipContainer`] scans the archive's directory once and hands out lazy
resources that borrow it:

```rust,no_run
use quarry::ZipContainer;

let file = std::fs::File::open("theme.zip")?;
let container = ZipContainer::from_file(file)?;

for mut resource in container.resources() {
    // No entry has been decompressed yet; each load happens on demand
    // and failures leave the resource retryable rather than poisoned.
    let reference = resource.reference().clone();
    match resource.content() {
        Ok(Some(text)) => println!("{}: {} bytes", reference, text.len()),
        Ok(None) => {}
        Err(e) => eprintln!("skipping {}: {}", reference, e),
    }
}
# Ok::<(), Box<dyn std::error::Error>>(())
```

## Design notes

- **Composition over hierarchy**: anything implementing [`ContentSource`]
  can back a resource -- archives ([`ArchiveSource`]), the filesystem
  ([`FileSource`]), or memory ([`StringSource`]).
- **Explicit encodings**: bytes become text only through a configured
  [`Encoding`] ([`Utf8Encoding`] by default, [`Windows1252Encoding`] for
  legacy content); there is no platform-dependent default.
- **Structured failures**: loads return a [`LoadError`] instead of logging
  and swallowing. A failed load leaves the cache absent, so the next access
  retries -- callers decide whether to log, retry, or abort the build.

*/

mod archive;
mod encoding;
mod errors;
mod reference;
mod resource;

pub use self::archive::{EntryDescriptor, EntryReader, ZipContainer};
pub use self::encoding::{DecodeError, Encoding, Utf8Encoding, Windows1252Encoding};
pub use self::errors::{LoadError, LoadErrorKind};
pub use self::reference::ResourceReference;
pub use self::resource::{ArchiveSource, ContentSource, FileSource, Resource, StringSource};
