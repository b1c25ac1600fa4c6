use crate::encoding::DecodeError;

/// An error that can occur while loading resource content
#[derive(Debug)]
pub struct LoadError {
    kind: LoadErrorKind,
}

impl LoadError {
    /// Return the specific kind of load failure
    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }
}

impl From<LoadErrorKind> for LoadError {
    fn from(kind: LoadErrorKind) -> Self {
        LoadError { kind }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError {
            kind: LoadErrorKind::Io(error),
        }
    }
}

impl From<DecodeError> for LoadError {
    fn from(error: DecodeError) -> Self {
        LoadError {
            kind: LoadErrorKind::Decode(error),
        }
    }
}

/// Specific kind of load failure
#[derive(Debug)]
pub enum LoadErrorKind {
    /// IO error while reading from the backing store
    Io(std::io::Error),

    /// Error from ZIP archive processing
    Zip(rawzip::Error),

    /// The named entry does not exist in the container
    MissingEntry(String),

    /// Entry uses a compression method other than store or deflate
    UnsupportedCompression,

    /// Entry bytes could not be decoded with the configured encoding
    Decode(DecodeError),
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            LoadErrorKind::Io(err) => Some(err),
            LoadErrorKind::Zip(err) => Some(err),
            LoadErrorKind::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LoadErrorKind::Io(err) => write!(f, "IO error: {}", err),
            LoadErrorKind::Zip(err) => write!(f, "Zip error: {}", err),
            LoadErrorKind::MissingEntry(name) => write!(f, "missing entry: {}", name),
            LoadErrorKind::UnsupportedCompression => {
                write!(f, "unsupported compression method")
            }
            LoadErrorKind::Decode(err) => write!(f, "{}", err),
        }
    }
}
