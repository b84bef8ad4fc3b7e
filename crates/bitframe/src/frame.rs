//! Frame: ordered top-level fields decoded back to back from the start of a buffer.

use std::collections::{BTreeMap, HashMap};

use crate::{
    errors::{CompileError, DecodeError},
    field::{Field, Scope},
    value::Decoded,
};

/// An ordered list of top-level [Field]s. Build once with [Frame::new], then
/// [Frame::decode] any number of buffers.
///
/// Decoding does not modify the frame, so one frame can be shared between threads.
#[derive(Debug, Clone)]
pub struct Frame {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Frame {
    /// Creates a frame from fields in declaration order. If two fields share a
    /// tag, [Frame::get] returns the last one.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        let fields: Vec<Field> = fields.into_iter().collect();
        let index = index_by_tag(fields.iter().map(Field::tag));

        Self { fields, index }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, tag: &str) -> Option<&Field> {
        self.index.get(tag).map(|&i| &self.fields[i])
    }

    /// Checks that every variable field has a length resolver and that each of
    /// its dependencies is a fixed field of at most 64 bits, or a variable
    /// field, declared before it.
    pub fn validate(&self) -> Result<(), CompileError> {
        let mut declared = Vec::new();

        for field in &self.fields {
            field.check(&mut declared)?;
        }

        Ok(())
    }

    /// Decodes `data` from bit 0, one top-level field after the other.
    ///
    /// Bits left over after the last field are ignored. On error nothing is
    /// returned for the fields that did decode.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedFrame, DecodeError> {
        let mut scope = Scope::new();
        let mut decoded = Vec::with_capacity(self.fields.len());
        let mut offset_bits = 0;

        for field in &self.fields {
            let value = match field.decode_in(data, offset_bits, &mut scope) {
                Ok(value) => value,
                Err(err) => {
                    tracing::debug!(tag = field.tag(), offset_bits, %err, "frame decode failed");
                    return Err(err);
                }
            };

            tracing::trace!(
                tag = field.tag(),
                offset_bits,
                len_bits = value.len_bits,
                "decoded field"
            );

            offset_bits += value.len_bits;
            decoded.push((field.tag().to_string(), value));
        }

        Ok(DecodedFrame::new(decoded, offset_bits))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FrameDef> for Frame {
    type Error = CompileError;

    fn try_from(value: crate::serde::FrameDef) -> Result<Self, Self::Error> {
        let frame = Frame::new(value.fields.into_iter().map(Field::from));
        frame.validate()?;
        Ok(frame)
    }
}

fn index_by_tag<'a>(tags: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, tag) in tags.enumerate() {
        index.insert(tag.to_string(), i);
    }

    index
}

/// Result of one [Frame::decode] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    fields: Vec<(String, Decoded)>,
    index: HashMap<String, usize>,
    total_bits: usize,
}

impl DecodedFrame {
    fn new(fields: Vec<(String, Decoded)>, total_bits: usize) -> Self {
        let index = index_by_tag(fields.iter().map(|(tag, _)| tag.as_str()));

        Self {
            fields,
            index,
            total_bits,
        }
    }

    /// Decoded value of a top-level field. The last field wins on duplicate tags.
    pub fn get(&self, tag: &str) -> Option<&Decoded> {
        self.index.get(tag).map(|&i| &self.fields[i].1)
    }

    /// Top-level results in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decoded)> {
        self.fields.iter().map(|(tag, decoded)| (tag.as_str(), decoded))
    }

    /// Number of bits consumed by all top-level fields.
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Every top-level result keyed by tag.
    pub fn snapshot(&self) -> BTreeMap<String, Decoded> {
        self.fields.iter().cloned().collect()
    }
}
