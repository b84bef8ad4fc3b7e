//! JSON‑deserializable frame description.
//!
//! These types describe the *shape* of a frame. They are intended to be
//! constructed from JSON (for example a frame layout shipped with your
//! application) and then turned into a validated [`crate::frame::Frame`]
//! with `Frame::try_from`.
//!
//! Variable lengths are declarative here: a [`LengthDef`] names the field
//! holding the length and the number of bits per unit of that value.

use serde::{Deserialize, Serialize};

/// Top‑level frame definition consisting of a list of fields.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrameDef {
    /// Top‑level fields in the order they appear on the wire.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field, tagged by its `kind`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind")]
pub enum FieldDef {
    /// Field with a fixed bit length.
    Fixed {
        tag: String,
        len_bits: usize,
        #[serde(default)]
        field_type: FieldTypeDef,
    },
    /// Field whose bit length is read from an earlier field.
    Variable {
        tag: String,
        #[serde(default)]
        field_type: FieldTypeDef,
        /// Where the length comes from; a missing length fails validation.
        #[serde(default)]
        length: Option<LengthDef>,
    },
    /// Sub‑fields decoded one after the other.
    Combine { tag: String, fields: Vec<FieldDef> },
    /// One field decoded `count` times.
    Repeat {
        tag: String,
        count: usize,
        field: Box<FieldDef>,
    },
}

/// Downstream interpretation of a scalar value.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy)]
pub enum FieldTypeDef {
    #[default]
    /// Unsigned integer.
    Int,
    /// Byte string.
    Str,
}

/// Length of a variable field: the value of field `from` times `unit_bits`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LengthDef {
    /// Tag of a field decoded earlier in scope.
    pub from: String,
    /// Bits per unit of the referenced value. Defaults to 1, so a length
    /// counted in bytes must set it to 8.
    #[serde(default = "default_unit_bits")]
    pub unit_bits: usize,
}

fn default_unit_bits() -> usize {
    1
}
