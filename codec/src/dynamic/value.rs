//! Dynamically typed values.

use super::Kind;

/// A value encoded against (or decoded from) a [super::Shape].
///
/// Each variant corresponds to the [super::Shape] of the same name. Composite values carry one
/// entry per field or variant of their shape, including ignored ones.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    String(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Array(Vec<Value>),
    /// One value per field.
    Struct(Vec<Value>),
    /// One slot per variant. A populated slot holds the pointee of that variant.
    Union(Vec<Option<Value>>),
    Option(Option<Box<Value>>),
    /// `None` is a null pointer.
    Pointer(Option<Box<Value>>),
    /// No value, produced as the zero value of custom and opaque shapes.
    Null,
}

impl Value {
    /// Creates a populated pointer.
    pub fn pointer(pointee: Value) -> Self {
        Self::Pointer(Some(Box::new(pointee)))
    }

    /// Creates a present option.
    pub fn some(inner: Value) -> Self {
        Self::Option(Some(Box::new(inner)))
    }

    /// Creates a union value with only the slot at `index` populated.
    pub fn variant(count: usize, index: usize, pointee: Value) -> Self {
        let mut slots = vec![None; count];
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(pointee);
        }
        Self::Union(slots)
    }

    /// Returns the category of this value, or `None` for [Value::Null].
    pub fn kind(&self) -> Option<Kind> {
        Some(match self {
            Self::Bool(_) => Kind::Bool,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::U128(_) => Kind::U128,
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::I128(_) => Kind::I128,
            Self::String(_) => Kind::String,
            Self::Bytes(_) => Kind::Bytes,
            Self::Seq(_) => Kind::Seq,
            Self::Array(_) => Kind::Array,
            Self::Struct(_) => Kind::Struct,
            Self::Union(_) => Kind::Union,
            Self::Option(_) => Kind::Option,
            Self::Pointer(_) => Kind::Pointer,
            Self::Null => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant() {
        assert_eq!(
            Value::variant(3, 1, Value::U8(7)),
            Value::Union(vec![None, Some(Value::U8(7)), None])
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Bytes(vec![]).kind(), Some(Kind::Bytes));
        assert_eq!(Value::pointer(Value::Null).kind(), Some(Kind::Pointer));
        assert_eq!(Value::Null.kind(), None);
    }
}
