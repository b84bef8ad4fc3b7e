//! Field definitions and their decoding.
//!
//! A [Field] is one of four shapes sharing a single decode contract: given a
//! byte slice and a starting bit offset, produce a [Decoded] value and the
//! number of bits consumed. Definitions are immutable; every decode returns a
//! fresh result, so one definition can be decoded any number of times.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    bits,
    errors::{CompileError, DecodeError, ReadError},
    value::{Decoded, FieldType, Value},
};

/// Scalars decoded so far in the current container and its parents.
///
/// Combine fields and repetitions open a nested scope that is dropped when they finish.
pub(crate) struct Scope<'s> {
    values: Vec<(&'s str, u64)>,
}

impl<'s> Scope<'s> {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }

    fn lookup(&self, tag: &str) -> Option<u64> {
        self.values
            .iter()
            .rev()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| *v)
    }

    fn push(&mut self, tag: &'s str, value: u64) {
        self.values.push((tag, value));
    }

    fn mark(&self) -> usize {
        self.values.len()
    }

    fn restore(&mut self, mark: usize) {
        self.values.truncate(mark);
    }
}

type LengthFn = dyn Fn(&[u64]) -> Option<usize> + Send + Sync;

/// Computes the bit length of a [VariableField] from fields decoded before it.
///
/// The resolver names its dependencies by tag. At decode time their scalar
/// values are passed to `compute` in the order they were named. A dependency
/// is visible if it was decoded earlier in the same combine field, or earlier
/// in any enclosing container.
#[derive(Clone)]
pub struct LengthResolver {
    depends_on: Vec<String>,
    compute: Arc<LengthFn>,
}

impl LengthResolver {
    /// Creates a resolver from dependency tags and a function of their values.
    /// Returning `None` fails the decode with [DecodeError::InvalidLength].
    pub fn new<I, S, F>(depends_on: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[u64]) -> Option<usize> + Send + Sync + 'static,
    {
        Self {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            compute: Arc::new(compute),
        }
    }

    /// Length is the value of `tag` multiplied by `unit_bits`.
    pub fn scaled(tag: impl Into<String>, unit_bits: usize) -> Self {
        Self::new([tag.into()], move |values| {
            usize::try_from(values[0]).ok()?.checked_mul(unit_bits)
        })
    }

    /// Length is the value of `tag` counted in bytes.
    pub fn bytes_of(tag: impl Into<String>) -> Self {
        Self::scaled(tag, 8)
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn resolve(&self, tag: &str, scope: &Scope<'_>) -> Result<usize, DecodeError> {
        let mut values = Vec::with_capacity(self.depends_on.len());

        for dependency in &self.depends_on {
            let value = scope
                .lookup(dependency)
                .ok_or_else(|| DecodeError::MissingDependency {
                    tag: tag.to_string(),
                    dependency: dependency.clone(),
                })?;
            values.push(value);
        }

        (self.compute)(&values).ok_or_else(|| DecodeError::InvalidLength {
            tag: tag.to_string(),
        })
    }
}

impl fmt::Debug for LengthResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LengthResolver")
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Field with a statically known bit length.
#[derive(Debug, Clone)]
pub struct FixedField {
    pub tag: String,
    pub len_bits: usize,
    pub field_type: FieldType,
}

/// Field whose bit length is resolved at decode time.
#[derive(Debug, Clone)]
pub struct VariableField {
    pub tag: String,
    pub field_type: FieldType,
    /// Decoding fails with [DecodeError::MissingLengthResolver] when unset.
    pub length: Option<LengthResolver>,
}

/// Ordered sub-fields decoded back to back.
#[derive(Debug, Clone)]
pub struct CombineField {
    pub tag: String,
    pub fields: Vec<Field>,
}

/// A single field definition decoded `count` times back to back.
#[derive(Debug, Clone)]
pub struct RepeatField {
    pub tag: String,
    pub field: Box<Field>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub enum Field {
    Fixed(FixedField),
    Variable(VariableField),
    Combine(CombineField),
    Repeat(RepeatField),
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for Field {
    fn from(value: crate::serde::FieldDef) -> Self {
        match value {
            crate::serde::FieldDef::Fixed {
                tag,
                len_bits,
                field_type,
            } => Field::Fixed(FixedField {
                tag,
                len_bits,
                field_type: field_type.into(),
            }),
            crate::serde::FieldDef::Variable {
                tag,
                field_type,
                length,
            } => Field::Variable(VariableField {
                tag,
                field_type: field_type.into(),
                length: length.map(|def| LengthResolver::scaled(def.from, def.unit_bits)),
            }),
            crate::serde::FieldDef::Combine { tag, fields } => {
                Field::combine(tag, fields.into_iter().map(Field::from))
            }
            crate::serde::FieldDef::Repeat { tag, count, field } => {
                Field::repeat(tag, (*field).into(), count)
            }
        }
    }
}

impl Field {
    pub fn fixed(tag: impl Into<String>, len_bits: usize) -> Self {
        Field::Fixed(FixedField {
            tag: tag.into(),
            len_bits,
            field_type: FieldType::default(),
        })
    }

    pub fn variable(tag: impl Into<String>, length: LengthResolver) -> Self {
        Field::Variable(VariableField {
            tag: tag.into(),
            field_type: FieldType::default(),
            length: Some(length),
        })
    }

    pub fn combine(tag: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Field::Combine(CombineField {
            tag: tag.into(),
            fields: fields.into_iter().collect(),
        })
    }

    pub fn repeat(tag: impl Into<String>, field: Field, count: usize) -> Self {
        Field::Repeat(RepeatField {
            tag: tag.into(),
            field: Box::new(field),
            count,
        })
    }

    /// Sets the type hint of a fixed or variable field. Other shapes are returned unchanged.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        match &mut self {
            Field::Fixed(f) => f.field_type = field_type,
            Field::Variable(f) => f.field_type = field_type,
            Field::Combine(_) | Field::Repeat(_) => {}
        }
        self
    }

    pub fn tag(&self) -> &str {
        match self {
            Field::Fixed(f) => &f.tag,
            Field::Variable(f) => &f.tag,
            Field::Combine(f) => &f.tag,
            Field::Repeat(f) => &f.tag,
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Field::Fixed(f) => Some(f.field_type),
            Field::Variable(f) => Some(f.field_type),
            Field::Combine(_) | Field::Repeat(_) => None,
        }
    }

    /// Decodes this field starting at `offset_bits`.
    ///
    /// Variable fields only see dependencies decoded inside this call, so a
    /// standalone variable field fails with [DecodeError::MissingDependency].
    pub fn decode(&self, data: &[u8], offset_bits: usize) -> Result<Decoded, DecodeError> {
        let mut scope = Scope::new();
        self.decode_in(data, offset_bits, &mut scope)
    }

    pub(crate) fn decode_in<'s>(
        &'s self,
        data: &[u8],
        offset_bits: usize,
        scope: &mut Scope<'s>,
    ) -> Result<Decoded, DecodeError> {
        match self {
            Field::Fixed(f) => read_scalar(&f.tag, data, offset_bits, f.len_bits, scope),
            Field::Variable(f) => {
                let resolver = f
                    .length
                    .as_ref()
                    .ok_or_else(|| DecodeError::MissingLengthResolver { tag: f.tag.clone() })?;
                let len_bits = resolver.resolve(&f.tag, scope)?;
                tracing::debug!(tag = %f.tag, len_bits, "resolved variable field length");

                read_scalar(&f.tag, data, offset_bits, len_bits, scope)
            }
            Field::Combine(f) => {
                let mark = scope.mark();
                let mut children = BTreeMap::new();
                let mut len_bits = 0;

                for field in &f.fields {
                    let decoded = field.decode_in(data, offset_bits + len_bits, scope)?;
                    len_bits += decoded.len_bits;
                    children.insert(field.tag().to_string(), decoded);
                }

                scope.restore(mark);
                Ok(Decoded::new(Value::Composite(children), len_bits))
            }
            Field::Repeat(f) => {
                let mut entries = Vec::with_capacity(f.count);
                let mut len_bits = 0;

                for _ in 0..f.count {
                    let mark = scope.mark();
                    let decoded = f.field.decode_in(data, offset_bits + len_bits, scope)?;
                    scope.restore(mark);

                    len_bits += decoded.len_bits;
                    entries.push(decoded);
                }

                Ok(Decoded::new(Value::Repeated(entries), len_bits))
            }
        }
    }

    /// Checks that every variable field has a resolver whose dependencies are
    /// declared before it. `declared` holds the tags visible at this point and
    /// whether each one decodes to a scalar.
    pub(crate) fn check<'s>(
        &'s self,
        declared: &mut Vec<(&'s str, bool)>,
    ) -> Result<(), CompileError> {
        match self {
            Field::Fixed(f) => declared.push((f.tag.as_str(), f.len_bits <= 64)),
            Field::Variable(f) => {
                let Some(length) = &f.length else {
                    return Err(CompileError::MissingLengthResolver { tag: f.tag.clone() });
                };

                for dependency in length.depends_on() {
                    let scalar = declared
                        .iter()
                        .rev()
                        .find(|(t, _)| *t == dependency)
                        .map(|(_, scalar)| *scalar);

                    match scalar {
                        Some(true) => {}
                        Some(false) => {
                            return Err(CompileError::NonScalarDependency {
                                tag: f.tag.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                        None => {
                            return Err(CompileError::UnresolvedDependency {
                                tag: f.tag.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                    }
                }

                // the width is only known at decode time
                declared.push((f.tag.as_str(), true));
            }
            Field::Combine(f) => {
                let mark = declared.len();
                for field in &f.fields {
                    field.check(declared)?;
                }
                declared.truncate(mark);
            }
            Field::Repeat(f) => {
                let mark = declared.len();
                f.field.check(declared)?;
                declared.truncate(mark);
            }
        }

        Ok(())
    }
}

fn read_scalar<'s>(
    tag: &'s str,
    data: &[u8],
    offset_bits: usize,
    len_bits: usize,
    scope: &mut Scope<'s>,
) -> Result<Decoded, DecodeError> {
    let Some(last) = len_bits.checked_sub(1) else {
        let err = match offset_bits.checked_sub(1) {
            Some(end) => ReadError::InvalidRange {
                start: offset_bits,
                end,
            },
            None => ReadError::EmptyRange { start: offset_bits },
        };
        return Err(err.into());
    };

    let end = offset_bits.saturating_add(last);

    let value = if len_bits <= 64 {
        let v = bits::read_bits(data, offset_bits, end)?;
        scope.push(tag, v);
        Value::Scalar(v)
    } else {
        Value::Bytes(bits::read_bits_bytes(data, offset_bits, end)?)
    };

    Ok(Decoded::new(value, len_bits))
}
