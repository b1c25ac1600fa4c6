use crate::{
    errors::{LoadError, LoadErrorKind},
    reference::ResourceReference,
    resource::{ArchiveSource, Resource},
};
use rawzip::{CompressionMethod, FileReader, ReaderAt, ZipArchiveEntryWayfinder, ZipReader};
use std::{
    fs::File,
    io::{Cursor, Read},
};

/// An open container of named entries backed by a ZIP archive
///
/// The central directory is scanned once when the container is opened and
/// the results kept as immutable [`EntryDescriptor`]s, so lookups and
/// discovery never touch the file again. Reading an entry opens a scoped
/// stream that lives only for the duration of the read.
///
/// A container is shared read-only between any number of resources and is
/// never mutated by them. It is not synchronized internally: callers that
/// read entries from multiple threads through one container must serialize
/// those reads themselves or open a container per thread.
#[derive(Debug)]
pub struct ZipContainer<R> {
    archive: rawzip::ZipArchive<R>,
    entries: Vec<EntryDescriptor>,
}

impl ZipContainer<()> {
    /// Opens a container over a slice of data
    pub fn from_slice<R>(data: R) -> Result<ZipContainer<Cursor<R>>, LoadError>
    where
        R: AsRef<[u8]>,
    {
        let archive = match rawzip::ZipArchive::with_max_search_space(64 * 1024)
            .locate_in_slice(data)
        {
            Ok(archive) => archive.into_zip_archive(),
            Err((_, e)) => return Err(LoadErrorKind::Zip(e).into()),
        };

        let mut buf = vec![0u8; rawzip::RECOMMENDED_BUFFER_SIZE];
        ZipContainer::from_archive(archive, &mut buf)
    }

    /// Opens a container over a file handle
    pub fn from_file(file: File) -> Result<ZipContainer<FileReader>, LoadError> {
        let mut buf = vec![0u8; rawzip::RECOMMENDED_BUFFER_SIZE];
        let archive = match rawzip::ZipArchive::with_max_search_space(64 * 1024)
            .locate_in_file(file, &mut buf)
        {
            Ok(archive) => archive,
            Err((_, e)) => return Err(LoadErrorKind::Zip(e).into()),
        };

        ZipContainer::from_archive(archive, &mut buf)
    }
}

impl<R: ReaderAt> ZipContainer<R> {
    /// Creates a container from an already-located ZIP archive, scanning the
    /// central directory for entry descriptors
    pub fn from_archive(
        archive: rawzip::ZipArchive<R>,
        buf: &mut [u8],
    ) -> Result<Self, LoadError> {
        let mut entries = Vec::new();
        let mut iter = archive.entries(buf);
        while let Some(entry) = iter.next_entry().map_err(LoadErrorKind::Zip)? {
            entries.push(EntryDescriptor {
                name: String::from_utf8_lossy(entry.file_path().as_ref()).into_owned(),
                compression: entry.compression_method(),
                wayfinder: entry.wayfinder(),
            });
        }

        Ok(ZipContainer { archive, entries })
    }

    /// Iterates over the descriptors of every entry in the container
    pub fn entries(&self) -> impl Iterator<Item = &EntryDescriptor> {
        self.entries.iter()
    }

    /// Returns the descriptor for the named entry, if present
    pub fn entry(&self, name: &str) -> Option<&EntryDescriptor> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns true when the container holds an entry with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Opens a scoped read stream over an entry, decompressing if necessary
    ///
    /// The returned reader borrows the container and should be dropped as
    /// soon as the read completes. The container itself is unaffected.
    pub fn open(&self, entry: &EntryDescriptor) -> Result<EntryReader<&R>, LoadError> {
        let zip_entry = self
            .archive
            .get_entry(entry.wayfinder)
            .map_err(LoadErrorKind::Zip)?;

        if entry.compression == CompressionMethod::Store {
            Ok(EntryReader::Stored(zip_entry.reader()))
        } else if entry.compression == CompressionMethod::Deflate {
            Ok(EntryReader::Deflated(flate2::read::DeflateDecoder::new(
                zip_entry.reader(),
            )))
        } else {
            Err(LoadErrorKind::UnsupportedCompression.into())
        }
    }

    /// Looks up an entry by name and opens it
    ///
    /// Will return a `LoadErrorKind::MissingEntry` if the requested name is
    /// not found.
    pub fn open_named(&self, name: &str) -> Result<EntryReader<&R>, LoadError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| LoadErrorKind::MissingEntry(name.to_string()))?;

        self.open(entry)
    }

    /// Discovers one lazy [`Resource`] per non-directory entry
    ///
    /// Each resource derives its reference from the entry's internal name
    /// and borrows this container; no entry content is read until a
    /// resource's content is first requested.
    pub fn resources(&self) -> Vec<Resource<'_>> {
        self.entries
            .iter()
            .filter(|e| !e.is_dir())
            .map(|e| {
                Resource::new(
                    ResourceReference::new(e.name()),
                    ArchiveSource::new(self, e.clone()),
                )
            })
            .collect()
    }
}

/// Identifies one entry within a [`ZipContainer`]
///
/// Immutable once obtained from a central directory scan.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    name: String,
    compression: CompressionMethod,
    wayfinder: ZipArchiveEntryWayfinder,
}

impl EntryDescriptor {
    /// The entry's fully-qualified internal name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compression method the entry is stored with
    pub fn compression_method(&self) -> CompressionMethod {
        self.compression
    }

    /// The uncompressed size of the entry as a hint
    pub fn uncompressed_size_hint(&self) -> u64 {
        self.wayfinder.uncompressed_size_hint()
    }

    /// True for directory placeholder entries
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// A scoped read stream over one entry's bytes
///
/// Decompresses deflate entries transparently; stored entries pass through.
#[derive(Debug)]
pub enum EntryReader<R> {
    /// Entry stored without compression
    Stored(ZipReader<R>),
    /// Deflate-compressed entry
    Deflated(flate2::read::DeflateDecoder<ZipReader<R>>),
}

impl<R: ReaderAt> Read for EntryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            EntryReader::Stored(reader) => reader.read(buf),
            EntryReader::Deflated(reader) => reader.read(buf),
        }
    }
}
