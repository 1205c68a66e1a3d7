//! Integration tests for derive macros.

use bcs_codec::{
    decode, impl_hooks, marshal, unmarshal, unmarshal_exact, unmarshal_exact_with, Config, Decode,
    DecodeExt, Encode, EncodeExt, Error, Marshaler, Uleb128, Unmarshaler,
};
use bcs_macros::test_traced;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Default, Encode, Decode)]
struct MyStruct {
    boolean: bool,
    bytes: Vec<u8>,
    label: String,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct Wrapper {
    inner: MyStruct,
    string: String,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct WrapperWithOptional {
    inner: MyStruct,
    #[bcs("optional")]
    outer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct UnmarshalStruct {
    wrapper: WrapperWithOptional,
    struct_array: [Box<MyStruct>; 2],
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct AnotherStruct {
    s: String,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
enum EnumExample {
    V0(u8),
    #[bcs("-")]
    V1(u16),
    V2(u32),
    #[bcs("-")]
    V3(u8),
    V4(AnotherStruct),
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
enum NestedEnum {
    V0(EnumExample),
    V1(u8),
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct WithIgnored {
    id: Uleb128,
    #[bcs("-")]
    scratch: Vec<u64>,
    #[bcs(" optional , ")]
    note: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
enum List {
    Nil,
    Cons(u8, Box<List>),
}

fn my_struct() -> MyStruct {
    MyStruct {
        boolean: true,
        bytes: vec![0xC0, 0xDE],
        label: "a".into(),
    }
}

fn list(len: usize) -> List {
    (0..len).fold(List::Nil, |tail, i| List::Cons(i as u8, Box::new(tail)))
}

#[test]
fn test_struct() {
    let encoded = my_struct().marshal().unwrap();
    assert_eq!(&encoded[..], &[1, 2, 0xC0, 0xDE, 1, 97]);
    assert_eq!(MyStruct::unmarshal_exact(encoded).unwrap(), my_struct());
}

#[test]
fn test_nested_struct() {
    let value = Wrapper {
        inner: my_struct(),
        string: "b".into(),
    };
    let encoded = value.marshal().unwrap();
    assert_eq!(&encoded[..], &[1, 2, 0xC0, 0xDE, 1, 97, 1, 98]);
    let (decoded, consumed) = Wrapper::unmarshal(encoded).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(consumed, 8);
}

#[test]
fn test_optional_field() {
    let unset = WrapperWithOptional {
        inner: my_struct(),
        outer: None,
    };
    let encoded = unset.marshal().unwrap();
    assert_eq!(&encoded[..], &[1, 2, 0xC0, 0xDE, 1, 97, 0]);
    assert_eq!(WrapperWithOptional::unmarshal_exact(encoded).unwrap(), unset);

    let set = WrapperWithOptional {
        inner: my_struct(),
        outer: Some("123".into()),
    };
    let encoded = set.marshal().unwrap();
    assert_eq!(&encoded[..], &[1, 2, 0xC0, 0xDE, 1, 97, 1, 3, 49, 50, 51]);
    assert_eq!(WrapperWithOptional::unmarshal_exact(encoded).unwrap(), set);
}

#[test]
fn test_optional_field_invalid_presence() {
    let err = WrapperWithOptional::unmarshal(&[0u8, 0, 0, 7][..]).unwrap_err();
    assert!(matches!(err.error, Error::InvalidPresence(7)));
    assert_eq!(err.position, 4);
}

#[test]
fn test_unmarshal_struct() {
    let expected = [
        0u8, 2, 9, 2, 0, 1, 0, 1, 3, 1, 2, 3, 4, 119, 104, 97, 116, 0, 0, 0,
    ];
    let value = UnmarshalStruct {
        wrapper: WrapperWithOptional {
            inner: MyStruct {
                bytes: vec![9, 2],
                ..Default::default()
            },
            outer: Some(String::new()),
        },
        struct_array: [
            Box::new(MyStruct {
                boolean: true,
                bytes: vec![1, 2, 3],
                label: "what".into(),
            }),
            Box::default(),
        ],
    };
    assert_eq!(&value.marshal().unwrap()[..], &expected);

    let (decoded, consumed) = UnmarshalStruct::unmarshal(&expected[..]).unwrap();
    assert_eq!(consumed, expected.len());
    assert_eq!(decoded, value);
    assert_eq!(&decoded.marshal().unwrap()[..], &expected);
}

#[test]
fn test_enum() {
    assert_eq!(&EnumExample::V0(42).marshal().unwrap()[..], &[0, 42]);
    assert_eq!(&EnumExample::V0(0).marshal().unwrap()[..], &[0, 0]);
    assert_eq!(
        &EnumExample::V4(AnotherStruct { s: "abc".into() })
            .marshal()
            .unwrap()[..],
        &[4, 3, 97, 98, 99]
    );
    assert_eq!(&EnumExample::V2(10).marshal().unwrap()[..], &[2, 10, 0, 0, 0]);
}

#[test]
fn test_enum_roundtrip() {
    for bytes in [&[0u8, 42][..], &[0, 0], &[4, 3, 97, 98, 99]] {
        let (value, consumed) = EnumExample::unmarshal(bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(&value.marshal().unwrap()[..], bytes);
    }
}

#[test]
fn test_enum_ignored_variant() {
    let err = EnumExample::V1(3).marshal().unwrap_err();
    assert!(matches!(err.error, Error::EmptyUnion(name) if name == "EnumExample"));
    assert_eq!(err.position, 0);

    let err = EnumExample::unmarshal(&[1u8, 3, 0][..]).unwrap_err();
    assert!(matches!(err.error, Error::VariantOutOfRange(1, 5)));
    assert_eq!(err.position, 1);
}

#[test_traced]
fn test_enum_index_out_of_range() {
    let err = EnumExample::unmarshal(&[5u8, 42][..]).unwrap_err();
    assert!(matches!(err.error, Error::VariantOutOfRange(5, 5)));
    assert_eq!(err.position, 1);
}

#[test]
fn test_enum_non_canonical_index() {
    let err = EnumExample::unmarshal(&[0x80u8, 0x00, 42][..]).unwrap_err();
    assert!(matches!(err.error, Error::NonCanonical));
    assert_eq!(err.position, 2);
}

#[test]
fn test_nested_enum() {
    let cases: [(&[u8], NestedEnum); 4] = [
        (&[0, 0, 42], NestedEnum::V0(EnumExample::V0(42))),
        (&[1, 0], NestedEnum::V1(0)),
        (&[1, 42], NestedEnum::V1(42)),
        (
            &[0, 4, 3, 97, 98, 99],
            NestedEnum::V0(EnumExample::V4(AnotherStruct { s: "abc".into() })),
        ),
    ];
    for (bytes, expected) in cases {
        let (value, consumed) = NestedEnum::unmarshal(bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(value, expected);
        assert_eq!(&value.marshal().unwrap()[..], bytes);
    }
}

#[test]
fn test_ignored_fields() {
    let value = WithIgnored {
        id: Uleb128(300),
        scratch: vec![1, 2, 3],
        note: Some(1),
    };
    let encoded = value.marshal().unwrap();
    assert_eq!(&encoded[..], &[0xac, 0x02, 1, 1, 0]);
    assert_eq!(
        WithIgnored::unmarshal_exact(encoded).unwrap(),
        WithIgnored {
            scratch: vec![],
            ..value
        }
    );
}

#[test]
fn test_recursive_enum() {
    let value = list(3);
    let encoded = value.marshal().unwrap();
    assert_eq!(&encoded[..], &[1, 2, 1, 1, 1, 0, 0]);
    assert_eq!(List::unmarshal_exact(encoded).unwrap(), value);
}

#[test_traced]
fn test_depth_limit() {
    let encoded = list(20).marshal().unwrap();

    let cfg = Config::default().with_max_depth(21);
    assert_eq!(unmarshal_exact_with::<List>(encoded.clone(), &cfg).unwrap(), list(20));

    // Each `Cons` is two bytes, and the limit is hit when entering the 21st `List`.
    let cfg = Config::default().with_max_depth(20);
    let err = unmarshal_exact_with::<List>(encoded, &cfg).unwrap_err();
    assert!(matches!(err.error, Error::DepthExceeded(20)));
    assert_eq!(err.position, 40);
}

#[test]
fn test_empty_byte_sequence() {
    let encoded = marshal(&Vec::<u8>::new()).unwrap();
    assert_eq!(&encoded[..], &[0]);
    let (decoded, consumed) = unmarshal::<Vec<u8>>(encoded).unwrap();
    assert!(decoded.is_empty());
    assert_eq!(consumed, 1);
}

#[test]
fn test_trailing_bytes() {
    let mut encoded = my_struct().marshal().unwrap().to_vec();
    encoded.push(0);
    let err = unmarshal_exact::<MyStruct>(&encoded[..]).unwrap_err();
    assert!(matches!(err.error, Error::TrailingBytes(1)));
    assert_eq!(err.position, 6);
}

#[test]
fn test_decode_from_stream() {
    let mut bytes = my_struct().marshal().unwrap().to_vec();
    bytes.extend_from_slice(&[0xff; 4]);
    let (value, consumed) = decode::<MyStruct, _>(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(value, my_struct());
    assert_eq!(consumed, 6);
}

/// Accepts only `0` or `1`.
#[derive(Debug, Clone, PartialEq)]
struct CustomUnmarshal {
    is_int: u8,
}

impl Marshaler for CustomUnmarshal {
    fn marshal_bcs(&self) -> Result<Vec<u8>, Error> {
        Ok(vec![self.is_int])
    }
}

impl Unmarshaler for CustomUnmarshal {
    fn unmarshal_bcs<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        match byte[0] {
            0 | 1 => Ok(Self { is_int: byte[0] }),
            _ => Err(Error::Custom("invalid".into())),
        }
    }
}

impl_hooks!(CustomUnmarshal);

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct Foo {
    a: CustomUnmarshal,
}

#[test]
fn test_custom_hook_in_struct() {
    for byte in [0u8, 1] {
        let (value, consumed) = Foo::unmarshal(&[byte][..]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(value.a.is_int, byte);
        assert_eq!(&value.marshal().unwrap()[..], &[byte]);
    }

    let err = Foo::unmarshal(&[2u8][..]).unwrap_err();
    assert!(matches!(err.error, Error::Custom(_)));
    assert_eq!(err.position, 1);
}
