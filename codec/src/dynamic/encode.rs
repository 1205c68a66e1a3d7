//! Encoding of [Value]s against [Shape]s.

use super::{Field, Shape, Value};
use crate::{Encode, Encoder, Error, FieldPolicy};
use std::{fmt, io};

impl Shape {
    /// Writes `value` into the encoder, laid out as described by this shape.
    pub fn write<W: io::Write>(
        &self,
        value: &Value,
        encoder: &mut Encoder<W>,
    ) -> Result<(), Error> {
        // Hooks take precedence over every other shape.
        if let Self::Custom(hook) = self {
            let bytes = hook.marshal_bcs(value)?;
            return encoder.write_all(&bytes);
        }

        match (self, value) {
            (Self::Bool, Value::Bool(v)) => v.write(encoder),
            (Self::U8, Value::U8(v)) => v.write(encoder),
            (Self::U16, Value::U16(v)) => v.write(encoder),
            (Self::U32, Value::U32(v)) => v.write(encoder),
            (Self::U64, Value::U64(v)) => v.write(encoder),
            (Self::U128, Value::U128(v)) => v.write(encoder),
            (Self::I8, Value::I8(v)) => v.write(encoder),
            (Self::I16, Value::I16(v)) => v.write(encoder),
            (Self::I32, Value::I32(v)) => v.write(encoder),
            (Self::I64, Value::I64(v)) => v.write(encoder),
            (Self::I128, Value::I128(v)) => v.write(encoder),
            (Self::String, Value::String(v)) => v.write(encoder),
            (Self::Bytes, Value::Bytes(v)) => encoder.write_bytes(v),
            (Self::Seq(element), Value::Seq(items)) => {
                encoder.write_length(items.len())?;
                items.iter().try_for_each(|item| element.write(item, encoder))
            }
            (Self::Array(element, len), Value::Array(items)) => {
                if items.len() != *len {
                    return Err(mismatch(
                        format_args!("array of {len}"),
                        format_args!("array of {}", items.len()),
                    ));
                }
                items.iter().try_for_each(|item| element.write(item, encoder))
            }
            (Self::Struct(fields), Value::Struct(values)) => write_struct(fields, values, encoder),
            (Self::Union(fields), Value::Union(slots)) => write_union(fields, slots, encoder),
            (Self::Option(inner), Value::Option(v)) => {
                encoder.write_presence(v.is_some())?;
                match v {
                    Some(v) => inner.write(v, encoder),
                    None => Ok(()),
                }
            }
            (Self::Pointer(pointee), Value::Pointer(Some(v))) => pointee.write(v, encoder),
            (Self::Pointer(pointee), Value::Pointer(None)) => pointee.write_zero(encoder),
            (Self::Opaque(name), _) => Err(Error::UnsupportedShape(name.clone())),
            (shape, value) => Err(mismatch(shape.kind(), describe(value))),
        }
    }

    /// Writes the encoding of this shape's zero value without materializing it.
    fn write_zero<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => encoder.write_u8(0),
            Self::U16 | Self::I16 => encoder.write_all(&[0; 2]),
            Self::U32 | Self::I32 => encoder.write_all(&[0; 4]),
            Self::U64 | Self::I64 => encoder.write_all(&[0; 8]),
            Self::U128 | Self::I128 => encoder.write_all(&[0; 16]),
            Self::String | Self::Bytes | Self::Seq(_) => encoder.write_length(0),
            Self::Array(element, len) => (0..*len).try_for_each(|_| element.write_zero(encoder)),
            Self::Struct(fields) => {
                for field in fields {
                    match field.policy()? {
                        FieldPolicy::Ignore => {}
                        FieldPolicy::Include => field.shape.write_zero(encoder)?,
                        FieldPolicy::Optional => {
                            optional_pointee(field)?;
                            encoder.write_presence(false)?;
                        }
                    }
                }
                Ok(())
            }
            Self::Union(fields) => write_union(fields, &vec![None; fields.len()], encoder),
            Self::Option(_) => encoder.write_presence(false),
            Self::Pointer(pointee) => pointee.write_zero(encoder),
            Self::Custom(_) => self.write(&Value::Null, encoder),
            Self::Opaque(name) => Err(Error::UnsupportedShape(name.clone())),
        }
    }
}

fn write_struct<W: io::Write>(
    fields: &[Field],
    values: &[Value],
    encoder: &mut Encoder<W>,
) -> Result<(), Error> {
    if values.len() != fields.len() {
        return Err(mismatch(
            format_args!("struct of {} fields", fields.len()),
            format_args!("struct of {} fields", values.len()),
        ));
    }

    for (field, value) in fields.iter().zip(values) {
        match field.policy()? {
            FieldPolicy::Ignore => continue,
            FieldPolicy::Include => field.shape.write(value, encoder)?,
            FieldPolicy::Optional => {
                let pointee = optional_pointee(field)?;
                match value {
                    Value::Pointer(None) => encoder.write_presence(false)?,
                    Value::Pointer(Some(v)) => {
                        encoder.write_presence(true)?;
                        pointee.write(v, encoder)?;
                    }
                    other => return Err(mismatch(field.shape.kind(), describe(other))),
                }
            }
        }
    }
    Ok(())
}

fn write_union<W: io::Write>(
    fields: &[Field],
    slots: &[Option<Value>],
    encoder: &mut Encoder<W>,
) -> Result<(), Error> {
    if slots.len() != fields.len() {
        return Err(mismatch(
            format_args!("union of {} variants", fields.len()),
            format_args!("union of {} variants", slots.len()),
        ));
    }

    for (index, (field, slot)) in fields.iter().zip(slots).enumerate() {
        if field.policy()? == FieldPolicy::Ignore {
            continue;
        }
        let pointee = variant_pointee(field)?;
        if let Some(value) = slot {
            let index = u32::try_from(index).map_err(|_| Error::OutOfRange(index as u64))?;
            encoder.write_variant(index)?;
            return pointee.write(value, encoder);
        }
    }
    Err(Error::EmptyUnion(variant_names(fields)))
}

/// Returns the pointee of an `optional` field, which must be a pointer.
pub(super) fn optional_pointee(field: &Field) -> Result<&Shape, Error> {
    match &field.shape {
        Shape::Pointer(pointee) => Ok(pointee),
        other => Err(Error::InvalidFieldPolicy(format!(
            "optional field `{}` must be a pointer, found {}",
            field.name,
            other.kind()
        ))),
    }
}

/// Returns the pointee of a union variant, which must be a pointer.
pub(super) fn variant_pointee(field: &Field) -> Result<&Shape, Error> {
    match &field.shape {
        Shape::Pointer(pointee) => Ok(pointee),
        other => Err(Error::InvalidFieldPolicy(format!(
            "union variant `{}` must be a pointer, found {}",
            field.name,
            other.kind()
        ))),
    }
}

pub(super) fn variant_names(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    format!("union {{{}}}", names.join(", "))
}

fn describe(value: &Value) -> String {
    value
        .kind()
        .map_or_else(|| "null".to_string(), |kind| kind.to_string())
}

fn mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Error {
    Error::ShapeMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
