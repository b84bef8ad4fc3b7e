//! Error types for bit reading, frame decoding and frame validation.

use thiserror::Error;

/// Errors produced when reading a bit range from a byte slice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The range starts after it ends.
    #[error("invalid bit range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },
    /// A zero-width range at bit 0, which has no last bit.
    #[error("empty bit range at bit {start}")]
    EmptyRange { start: usize },
    /// The last bit of the range lies beyond the end of the data.
    #[error("bit {end} is out of range for {available_bits} available bits")]
    OutOfRange { end: usize, available_bits: usize },
    /// More than 64 bits were requested as a single integer.
    #[error("cannot read {0} bits into a 64-bit integer")]
    TooManyBitsRead(usize),
}

/// Errors produced while decoding a [crate::field::Field] or a [crate::frame::Frame].
///
/// Errors are raised where they are detected and pass through enclosing
/// combine, repeat and frame decodes unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Read(#[from] ReadError),
    /// A variable field was decoded without a length resolver.
    #[error("variable field `{tag}` has no length resolver")]
    MissingLengthResolver { tag: String },
    /// A length resolver refers to a field that has not been decoded as a scalar yet.
    #[error("variable field `{tag}` depends on `{dependency}`, which has not been decoded")]
    MissingDependency { tag: String, dependency: String },
    /// A length resolver could not produce a bit length (e.g. on overflow).
    #[error("variable field `{tag}` resolved to an invalid length")]
    InvalidLength { tag: String },
}

/// Errors reported by [crate::frame::Frame::validate].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A variable field has no length resolver.
    #[error("variable field `{tag}` has no length resolver")]
    MissingLengthResolver { tag: String },
    /// A length dependency does not name a scalar field declared before it.
    #[error("variable field `{tag}` depends on `{dependency}`, which is not declared before it")]
    UnresolvedDependency { tag: String, dependency: String },
    /// A length dependency names a field too wide to decode as a scalar.
    #[error("variable field `{tag}` depends on `{dependency}`, which is wider than 64 bits")]
    NonScalarDependency { tag: String, dependency: String },
}
