#![no_main]

use arbitrary::Arbitrary;
use bcs_codec::{
    marshal, unmarshal, unmarshal_with, varint, Config, Decode, DecodeExt, Encode, EncodeExt,
    Field, Shape, Uleb128,
};
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use std::fmt::Debug;

#[derive(Arbitrary, Debug, PartialEq, Encode, Decode)]
struct Inner {
    flag: bool,
    data: Vec<u8>,
    label: String,
}

#[derive(Arbitrary, Debug, PartialEq, Encode, Decode)]
enum Message {
    Empty,
    Single(u64),
    Pair(i16, Inner),
    Nested(Vec<Inner>, Option<Box<Message>>),
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Envelope {
    id: Uleb128,
    #[bcs("optional")]
    body: Option<Message>,
    #[bcs("-")]
    hint: u32,
    trailer: [u16; 3],
}

fn roundtrip<T: Encode + Decode + PartialEq + Debug>(value: T) {
    let encoded = marshal(&value).expect("failed to encode value");
    let (decoded, consumed) = unmarshal::<T>(encoded.clone()).expect("failed to decode value");
    assert_eq!(consumed, encoded.len());
    assert_eq!(decoded, value);

    // Canonical: re-encoding gives the same bytes.
    assert_eq!(decoded.marshal().unwrap(), encoded);
}

/// Decoding arbitrary bytes must never panic, and whatever decodes must survive a round trip.
///
/// The re-encoding may differ from the input only where decoding is lenient (a `bool` byte
/// other than `0`/`1`), so the values are compared instead of the bytes.
fn decode_bytes<T: Encode + Decode + PartialEq + Debug>(buf: &[u8]) {
    let cfg = Config::default().with_max_depth(32).with_chunk_size(64);
    match unmarshal_with::<T>(buf, &cfg) {
        Ok((value, consumed)) => {
            assert!(consumed <= buf.len());
            let encoded = value.marshal().unwrap();
            assert_eq!(encoded.len(), consumed);
            assert_eq!(T::unmarshal_exact(encoded).unwrap(), value);
        }
        Err(failure) => assert!(failure.position <= buf.len()),
    }
}

fn decode_dynamic(buf: &[u8]) {
    let shape = Shape::Struct(vec![
        Field::new("flag", Shape::Bool),
        Field::new("items", Shape::seq(Shape::String)),
        Field::tagged("extra", Shape::pointer(Shape::U32), "optional"),
        Field::new(
            "choice",
            Shape::Union(vec![
                Field::new("a", Shape::pointer(Shape::U8)),
                Field::new("b", Shape::pointer(Shape::Bytes)),
            ]),
        ),
    ]);
    match shape.unmarshal(buf) {
        Ok((value, consumed)) => {
            assert!(consumed <= buf.len());
            let encoded = shape.marshal(&value).unwrap();
            assert_eq!(encoded.len(), consumed);
            assert_eq!(shape.unmarshal_exact(encoded).unwrap(), value);
        }
        Err(failure) => assert!(failure.position <= buf.len()),
    }
}

fn roundtrip_varint(value: u64) {
    match varint::encode(value) {
        Ok(encoded) => {
            assert!(value <= varint::MAX_VALUE);
            assert_eq!(encoded.len(), varint::size(value as u32));
            assert_eq!(varint::decode(&encoded).unwrap(), (value as u32, encoded.len()));
        }
        Err(_) => assert!(value > varint::MAX_VALUE),
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Untrusted input
    DecodeMessage(&'a [u8]),
    DecodeEnvelope(&'a [u8]),
    DecodeString(&'a [u8]),
    DecodeDynamic(&'a [u8]),
    DecodeVarint(&'a [u8]),

    // Round trips
    Message(Message),
    Envelope(u32, Option<Message>, [u16; 3]),
    Bytes(Vec<u8>),
    String(String),
    Array([u8; 16]),
    Tuple(u8, i64, bool, Option<u128>),
    Varint(u64),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::DecodeMessage(buf) => decode_bytes::<Message>(buf),
        FuzzInput::DecodeEnvelope(buf) => decode_bytes::<Envelope>(buf),
        FuzzInput::DecodeString(buf) => decode_bytes::<String>(buf),
        FuzzInput::DecodeDynamic(buf) => decode_dynamic(buf),
        FuzzInput::DecodeVarint(buf) => {
            if let Ok((value, consumed)) = varint::decode(buf) {
                assert_eq!(varint::encode(u64::from(value)).unwrap(), &buf[..consumed]);
            }
        }
        FuzzInput::Message(it) => roundtrip(it),
        FuzzInput::Envelope(id, body, trailer) => roundtrip(Envelope {
            id: Uleb128(id),
            body,
            // Skipped fields decode to their default.
            hint: 0,
            trailer,
        }),
        FuzzInput::Bytes(it) => {
            let encoded = Bytes::from(it).marshal().unwrap();
            assert!(Bytes::unmarshal_exact(encoded).is_ok());
        }
        FuzzInput::String(it) => roundtrip(it),
        FuzzInput::Array(it) => roundtrip(it),
        FuzzInput::Tuple(a, b, c, d) => roundtrip((a, b, c, d)),
        FuzzInput::Varint(v) => roundtrip_varint(v),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
