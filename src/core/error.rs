use std::fmt;

/// Classification of every failure this crate can surface.
///
/// `BatchPartial` carries the sorted indices of the batch items that failed, so
/// callers can recover them without downcasting the surrounding [`Error`].
#[derive(Debug)]
pub enum ErrorKind {
    Validation,
    DuplicateId,
    BatchPartial(Vec<usize>),
    ClosedSegment,
    NotFound,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }

    pub fn validation(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Validation, context)
    }

    pub fn duplicate_id(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::DuplicateId, context)
    }

    pub fn closed_segment() -> Self {
        Error::new(ErrorKind::ClosedSegment, "operation attempted on a closed segment or reader")
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::NotFound, context)
    }

    pub fn internal(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Internal, context)
    }

    pub fn batch_partial(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        let context = format!("{} of the batch's items failed", indices.len());
        Error::new(ErrorKind::BatchPartial(indices), context)
    }

    /// True if this error is a [`ErrorKind::BatchPartial`].
    pub fn is_batch_partial(&self) -> bool {
        matches!(self.kind, ErrorKind::BatchPartial(_))
    }

    /// The sorted, deduplicated indices of the failed batch items, if this is a
    /// batch-partial error.
    pub fn batch_partial_indices(&self) -> Option<&[usize]> {
        match &self.kind {
            ErrorKind::BatchPartial(indices) => Some(indices),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    pub fn is_closed_segment(&self) -> bool {
        matches!(self.kind, ErrorKind::ClosedSegment)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
