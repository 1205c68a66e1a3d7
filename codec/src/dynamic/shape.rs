//! Runtime descriptions of encodable data.

use super::Value;
use crate::{Config, Error, FieldPolicy};
use std::{fmt, io, sync::Arc};

/// Self-encoding behavior attached to a [Shape::Custom].
///
/// The dynamic counterpart of [crate::Marshaler] and [crate::Unmarshaler].
pub trait Hook: fmt::Debug + Send + Sync {
    /// Returns the complete encoding of `value`, written with no added framing.
    fn marshal_bcs(&self, value: &Value) -> Result<Vec<u8>, Error>;

    /// Reads a value from `reader`. Every byte pulled from `reader` is counted as consumed.
    fn unmarshal_bcs(&self, reader: &mut dyn io::Read) -> Result<Value, Error>;
}

/// The category of a [Shape] (or [Value]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    String,
    Bytes,
    Seq,
    Array,
    Struct,
    Union,
    Option,
    Pointer,
    Custom,
    Opaque,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.pad("bool"),
            Self::U8 => f.pad("u8"),
            Self::U16 => f.pad("u16"),
            Self::U32 => f.pad("u32"),
            Self::U64 => f.pad("u64"),
            Self::U128 => f.pad("u128"),
            Self::I8 => f.pad("i8"),
            Self::I16 => f.pad("i16"),
            Self::I32 => f.pad("i32"),
            Self::I64 => f.pad("i64"),
            Self::I128 => f.pad("i128"),
            Self::String => f.pad("string"),
            Self::Bytes => f.pad("bytes"),
            Self::Seq => f.pad("seq"),
            Self::Array => f.pad("array"),
            Self::Struct => f.pad("struct"),
            Self::Union => f.pad("union"),
            Self::Option => f.pad("option"),
            Self::Pointer => f.pad("pointer"),
            Self::Custom => f.pad("custom"),
            Self::Opaque => f.pad("opaque"),
        }
    }
}

/// Describes the layout of a [Value] on the wire.
///
/// A shape is to the dynamic layer what a Rust type is to [crate::Encode] and [crate::Decode]:
/// the bytes never say what they contain, so decoding always needs the shape.
#[derive(Clone, Debug)]
pub enum Shape {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    /// UTF-8 text with a varint byte length.
    String,
    /// Raw bytes with a varint byte length.
    Bytes,
    /// A varint element count followed by the elements.
    Seq(Box<Shape>),
    /// Exactly `N` elements with no prefix.
    Array(Box<Shape>, usize),
    /// Fields in declaration order.
    Struct(Vec<Field>),
    /// A varint variant index followed by the selected variant's payload. Every variant that
    /// is not ignored must be a [Shape::Pointer].
    Union(Vec<Field>),
    /// A presence byte followed by the value, if present.
    Option(Box<Shape>),
    /// A nullable indirection. Encodes as its pointee, or as the pointee's zero value when
    /// null, unless the containing field is `optional`.
    Pointer(Box<Shape>),
    /// Encoded and decoded by a [Hook].
    Custom(Arc<dyn Hook>),
    /// A shape with no encoding. Fails with [Error::UnsupportedShape] unless ignored.
    Opaque(String),
}

impl Shape {
    pub fn seq(element: Shape) -> Self {
        Self::Seq(Box::new(element))
    }

    pub fn array(element: Shape, len: usize) -> Self {
        Self::Array(Box::new(element), len)
    }

    pub fn option(inner: Shape) -> Self {
        Self::Option(Box::new(inner))
    }

    pub fn pointer(pointee: Shape) -> Self {
        Self::Pointer(Box::new(pointee))
    }

    pub fn custom(hook: impl Hook + 'static) -> Self {
        Self::Custom(Arc::new(hook))
    }

    /// Returns the category of this shape.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool => Kind::Bool,
            Self::U8 => Kind::U8,
            Self::U16 => Kind::U16,
            Self::U32 => Kind::U32,
            Self::U64 => Kind::U64,
            Self::U128 => Kind::U128,
            Self::I8 => Kind::I8,
            Self::I16 => Kind::I16,
            Self::I32 => Kind::I32,
            Self::I64 => Kind::I64,
            Self::I128 => Kind::I128,
            Self::String => Kind::String,
            Self::Bytes => Kind::Bytes,
            Self::Seq(_) => Kind::Seq,
            Self::Array(..) => Kind::Array,
            Self::Struct(_) => Kind::Struct,
            Self::Union(_) => Kind::Union,
            Self::Option(_) => Kind::Option,
            Self::Pointer(_) => Kind::Pointer,
            Self::Custom(_) => Kind::Custom,
            Self::Opaque(_) => Kind::Opaque,
        }
    }

    /// Returns the zero value of this shape.
    ///
    /// Ignored fields decode to their zero value. Custom and opaque shapes have no zero value of
    /// their own and yield [Value::Null].
    ///
    /// Arrays are built eagerly, so the product of nested array lengths is capped at
    /// [Config::max_length] and an allocation the system refuses is reported instead of
    /// aborting. Both fail with [Error::LengthExceeded].
    pub fn zero(&self, config: &Config) -> Result<Value, Error> {
        self.zero_within(config.max_length)
    }

    fn zero_within(&self, budget: usize) -> Result<Value, Error> {
        let value = match self {
            Self::Bool => Value::Bool(false),
            Self::U8 => Value::U8(0),
            Self::U16 => Value::U16(0),
            Self::U32 => Value::U32(0),
            Self::U64 => Value::U64(0),
            Self::U128 => Value::U128(0),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::I128 => Value::I128(0),
            Self::String => Value::String(String::new()),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Seq(_) => Value::Seq(Vec::new()),
            Self::Array(element, len) => {
                let len = *len;
                if len > budget {
                    return Err(Error::LengthExceeded(len, budget));
                }
                let zero = element.zero_within(budget / len.max(1))?;
                let mut items = Vec::new();
                items
                    .try_reserve_exact(len)
                    .map_err(|_| Error::LengthExceeded(len, budget))?;
                items.resize(len, zero);
                Value::Array(items)
            }
            Self::Struct(fields) => Value::Struct(
                fields
                    .iter()
                    .map(|f| f.shape.zero_within(budget))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Union(fields) => Value::Union(vec![None; fields.len()]),
            Self::Option(_) => Value::Option(None),
            Self::Pointer(_) => Value::Pointer(None),
            Self::Custom(_) | Self::Opaque(_) => Value::Null,
        };
        Ok(value)
    }
}

/// A named member of a [Shape::Struct] or [Shape::Union].
///
/// The name is only used in error messages. The tag holds the field's policy annotation
/// (see [crate::tag]) and is parsed each time the field is walked, so a malformed tag fails
/// the first encode or decode that reaches it.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    pub tag: String,
}

impl Field {
    /// Creates a field with no annotation.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self::tagged(name, shape, "")
    }

    /// Creates a field with a policy annotation (e.g. `"-"` or `"optional"`).
    pub fn tagged(name: impl Into<String>, shape: Shape, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            tag: tag.into(),
        }
    }

    /// Parses the field's policy annotation.
    pub fn policy(&self) -> Result<FieldPolicy, Error> {
        self.tag.parse().map_err(|err| match err {
            Error::InvalidFieldPolicy(msg) => {
                Error::InvalidFieldPolicy(format!("field `{}`: {msg}", self.name))
            }
            err => err,
        })
    }
}
