//! Values produced by decoding fields.

use std::collections::BTreeMap;

/// How a scalar value is meant to be read downstream. Decoding ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Unsigned integer.
    #[default]
    Int,
    /// Byte string, most significant byte first.
    Str,
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldTypeDef> for FieldType {
    fn from(value: crate::serde::FieldTypeDef) -> Self {
        match value {
            crate::serde::FieldTypeDef::Int => FieldType::Int,
            crate::serde::FieldTypeDef::Str => FieldType::Str,
        }
    }
}

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Bit range of at most 64 bits.
    Scalar(u64),
    /// Bit range wider than 64 bits, right-aligned into big-endian bytes.
    Bytes(Vec<u8>),
    /// Children of a combine field, keyed by tag.
    Composite(BTreeMap<String, Decoded>),
    /// One entry per repetition of a repeat field, in order.
    Repeated(Vec<Decoded>),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Child of a composite value.
    pub fn get(&self, tag: &str) -> Option<&Decoded> {
        match self {
            Value::Composite(children) => children.get(tag),
            _ => None,
        }
    }

    /// Entries of a repeated value.
    pub fn entries(&self) -> Option<&[Decoded]> {
        match self {
            Value::Repeated(entries) => Some(entries),
            _ => None,
        }
    }
}

/// A decoded value together with the number of bits it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub value: Value,
    pub len_bits: usize,
}

impl Decoded {
    pub fn new(value: Value, len_bits: usize) -> Self {
        Self { value, len_bits }
    }

    /// Renders a scalar or byte string as `ceil(len_bits / 8)` big-endian bytes.
    ///
    /// Returns `None` for composite and repeated values, and for a scalar whose
    /// `len_bits` exceeds 64.
    pub fn to_be_bytes(&self) -> Option<Vec<u8>> {
        let n_bytes = (self.len_bits + 7) / 8;

        match &self.value {
            Value::Scalar(v) => {
                let all = v.to_be_bytes();
                let skip = all.len().checked_sub(n_bytes)?;
                Some(all[skip..].to_vec())
            }
            Value::Bytes(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}
