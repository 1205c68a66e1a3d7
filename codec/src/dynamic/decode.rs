//! Decoding of [Value]s described by [Shape]s.

use super::{
    encode::{optional_pointee, variant_names, variant_pointee},
    Field, Shape, Value,
};
use crate::{hook::eof_as_truncated, Decode, Decoder, Error, FieldPolicy};
use std::io;
use tracing::trace;

impl Shape {
    /// Reads a value laid out as described by this shape.
    pub fn read<R: io::Read>(&self, decoder: &mut Decoder<R>) -> Result<Value, Error> {
        let value = match self {
            Self::Custom(hook) => hook.unmarshal_bcs(decoder).map_err(eof_as_truncated)?,
            Self::Bool => Value::Bool(bool::read(decoder)?),
            Self::U8 => Value::U8(u8::read(decoder)?),
            Self::U16 => Value::U16(u16::read(decoder)?),
            Self::U32 => Value::U32(u32::read(decoder)?),
            Self::U64 => Value::U64(u64::read(decoder)?),
            Self::U128 => Value::U128(u128::read(decoder)?),
            Self::I8 => Value::I8(i8::read(decoder)?),
            Self::I16 => Value::I16(i16::read(decoder)?),
            Self::I32 => Value::I32(i32::read(decoder)?),
            Self::I64 => Value::I64(i64::read(decoder)?),
            Self::I128 => Value::I128(i128::read(decoder)?),
            Self::String => Value::String(String::read(decoder)?),
            Self::Bytes => Value::Bytes(decoder.read_bytes()?),
            Self::Seq(element) => decoder.nested(|decoder| {
                let len = decoder.read_length()?;
                let items = decoder.read_elements(len, |decoder| element.read(decoder))?;
                Ok(Value::Seq(items))
            })?,
            Self::Array(element, len) => decoder.nested(|decoder| {
                let items = decoder.read_elements(*len, |decoder| element.read(decoder))?;
                Ok(Value::Array(items))
            })?,
            Self::Struct(fields) => decoder.nested(|decoder| read_struct(fields, decoder))?,
            Self::Union(fields) => decoder.nested(|decoder| read_union(fields, decoder))?,
            Self::Option(inner) => Value::Option(match decoder.read_presence()? {
                true => Some(Box::new(inner.read(decoder)?)),
                false => None,
            }),
            Self::Pointer(pointee) => Value::pointer(pointee.read(decoder)?),
            Self::Opaque(name) => return Err(Error::UnsupportedShape(name.clone())),
        };
        Ok(value)
    }
}

fn read_struct<R: io::Read>(fields: &[Field], decoder: &mut Decoder<R>) -> Result<Value, Error> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match field.policy()? {
            FieldPolicy::Ignore => field.shape.zero(decoder.config())?,
            FieldPolicy::Include => field.shape.read(decoder)?,
            FieldPolicy::Optional => {
                let pointee = optional_pointee(field)?;
                match decoder.read_presence()? {
                    true => Value::pointer(pointee.read(decoder)?),
                    false => Value::Pointer(None),
                }
            }
        };
        values.push(value);
    }
    Ok(Value::Struct(values))
}

fn read_union<R: io::Read>(fields: &[Field], decoder: &mut Decoder<R>) -> Result<Value, Error> {
    let count = u32::try_from(fields.len()).map_err(|_| Error::OutOfRange(fields.len() as u64))?;
    let index = decoder.read_variant(count)?;
    let position = index as usize;
    let field = &fields[position];
    if field.policy()? == FieldPolicy::Ignore {
        trace!(index, union = %variant_names(fields), "ignored variant selected");
        return Err(Error::VariantOutOfRange(index, count));
    }
    let pointee = variant_pointee(field)?;
    let mut slots = vec![None; fields.len()];
    slots[position] = Some(pointee.read(decoder)?);
    Ok(Value::Union(slots))
}
