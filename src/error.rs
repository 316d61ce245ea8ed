//! Library error types.
//!
//! The error taxonomy here mirrors the original `crous` source, which is a C
//! library and therefore carries a status-code enum with an explicit `Ok`
//! member. We keep that member for surface parity even though this crate's
//! Rust code never constructs it: every fallible operation returns
//! `Result<T, Error>` rather than threading an always-present status value.

use std::fmt;

use serde::{de, ser};

/// A crous Result, normally returning a crous [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The full set of ways an encode or decode can fail, plus the reserved
/// `Ok`/`SyntaxError` members carried over from the source's status enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No error. Never constructed by this crate; kept for taxonomy parity.
    Ok,
    /// A host value's kind has no representation in the value model, or a
    /// decoded value's kind isn't the one the caller asked for.
    InvalidKind,
    /// A mapping key did not serialize to UTF-8 text.
    InvalidKey,
    /// A `Str` payload's bytes were not valid UTF-8.
    InvalidUtf8,
    /// The frame's magic bytes or version byte did not match.
    InvalidHeader,
    /// A decoded type tag byte was not one of the eleven assigned tags.
    TagUnknown,
    /// The input ended before a declared length could be satisfied.
    Truncated,
    /// Bytes remained after the single top-level value was parsed.
    TrailingBytes,
    /// A numeric value did not fit in its target representation.
    Overflow,
    /// A container nested past the configured depth bound.
    DepthExceeded,
    /// A buffer allocation failed.
    OutOfMemory,
    /// Reserved for a future text-form parser; never produced today.
    SyntaxError,
    /// A `Sink`/`Source` I/O operation failed.
    StreamError,
    /// An invariant internal to the codec was violated.
    Internal,
}

impl ErrorKind {
    fn message(&self) -> &'static str {
        match self {
            ErrorKind::Ok => "no error",
            ErrorKind::InvalidKind => "value kind has no representation",
            ErrorKind::InvalidKey => "mapping key was not text",
            ErrorKind::InvalidUtf8 => "string payload was not valid UTF-8",
            ErrorKind::InvalidHeader => "frame header (magic or version) did not match",
            ErrorKind::TagUnknown => "type tag byte was not recognized",
            ErrorKind::Truncated => "input ended before a declared length was satisfied",
            ErrorKind::TrailingBytes => "trailing bytes after the top-level value",
            ErrorKind::Overflow => "numeric value out of range",
            ErrorKind::DepthExceeded => "container nesting exceeded the depth bound",
            ErrorKind::OutOfMemory => "buffer allocation failed",
            ErrorKind::SyntaxError => "syntax error (reserved, unused)",
            ErrorKind::StreamError => "sink or source I/O failed",
            ErrorKind::Internal => "internal codec invariant violated",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A crous error: a [`ErrorKind`] plus whatever positional context was
/// available when it was raised (a byte offset on decode, a dotted key path
/// on encode) and, for bridge failures, a custom message from serde.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    detail: Option<String>,
    offset: Option<usize>,
    path: Option<String>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            detail: None,
            offset: None,
            path: None,
        }
    }

    pub(crate) fn with_detail(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Error {
            kind,
            detail: Some(detail.into()),
            offset: None,
            path: None,
        }
    }

    pub(crate) fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind.clone()
    }

    /// Byte offset into the input at which a decode failure was detected, if
    /// known.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Dotted key path to the offending value, for encode failures raised by
    /// the host-object bridge.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.kind, detail)?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(offset) = self.offset {
            write!(f, " (at byte {})", offset)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::with_detail(ErrorKind::InvalidKind, msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::with_detail(ErrorKind::Internal, msg.to_string())
    }
}

/// Caller-visible wrapper raised by [`crate::encode`] and friends. Derefs to
/// the common [`Error`] so callers can match on `kind()` without caring
/// whether a failure came from encoding or decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeError(pub(crate) Error);

impl std::ops::Deref for EncodeError {
    type Target = Error;
    fn deref(&self) -> &Error {
        &self.0
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "encode failed: {}", self.0)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<Error> for EncodeError {
    fn from(e: Error) -> Self {
        EncodeError(e)
    }
}

/// Caller-visible wrapper raised by [`crate::decode`] and friends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError(pub(crate) Error);

impl std::ops::Deref for DecodeError {
    type Target = Error;
    fn deref(&self) -> &Error {
        &self.0
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "decode failed: {}", self.0)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<Error> for DecodeError {
    fn from(e: Error) -> Self {
        DecodeError(e)
    }
}
