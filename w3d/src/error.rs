use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected EOF at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("size mismatch in chunk {tag:#06x}: declared {declared} bytes, wrote {written}")]
    SizeMismatch {
        tag: u32,
        declared: u32,
        written: usize,
    },

    #[error("invalid {field} {value} at offset {offset}")]
    InvalidDiscriminant {
        field: &'static str,
        value: u32,
        offset: usize,
    },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    #[error("chunk {container:#06x} is missing required child {tag:#06x}")]
    MissingChunk { container: u32, tag: u32 },

    #[error("in chunk {tag:#06x} at offset {offset}: {source}")]
    Chunk {
        tag: u32,
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a file-level reader may skip past the chunk that produced this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidDiscriminant { .. } => true,
            Self::Chunk { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Strips `Chunk` context wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Chunk { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_chunk(self, tag: u32, offset: usize) -> Self {
        match self {
            already @ Self::Chunk { .. } => already,
            source => Self::Chunk {
                tag,
                offset,
                source: Box::new(source),
            },
        }
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }
}
