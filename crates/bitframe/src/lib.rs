//! # bitframe
//!
//! A library for decoding fixed-format binary protocol frames at the bit level.
//!
//! A frame is an ordered list of fields laid out back to back, MSB-first. A
//! field either has a fixed bit length, a length computed from a field decoded
//! before it, a list of named sub-fields, or a single field repeated a fixed
//! number of times. Decoding threads one bit cursor through all of them and
//! returns a tree of values with the number of bits each one consumed.
//!
//! ## Example
//!
//! ```
//! use bitframe::field::{Field, LengthResolver};
//! use bitframe::frame::Frame;
//! use bitframe::value::Value;
//!
//! let frame = Frame::new([
//!     Field::fixed("flag", 1),
//!     Field::fixed("code", 7),
//!     Field::fixed("len", 8),
//!     Field::variable("data", LengthResolver::bytes_of("len")),
//! ]);
//!
//! let decoded = frame.decode(&[0x85, 0x02, 0xBE, 0xEF]).unwrap();
//! assert_eq!(decoded.get("flag").unwrap().value, Value::Scalar(1));
//! assert_eq!(decoded.get("code").unwrap().value, Value::Scalar(5));
//! assert_eq!(decoded.get("data").unwrap().value, Value::Scalar(0xBEEF));
//! assert_eq!(decoded.total_bits(), 32);
//! ```

pub mod bits;
pub mod errors;
pub mod field;
pub mod frame;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{CompileError, DecodeError, ReadError};
pub use field::{Field, LengthResolver};
pub use frame::{DecodedFrame, Frame};
pub use value::{Decoded, FieldType, Value};
