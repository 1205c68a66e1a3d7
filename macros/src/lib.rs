//! Procedural macros for [`bcs_codec`](https://docs.rs/bcs-codec).
//!
//! - `#[derive(Encode)]` and `#[derive(Decode)]` generate implementations of the codec traits
//!   for structs and enums.
//! - `#[test_traced]` runs a test with a `tracing` subscriber installed.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attr;
mod derive;
mod traced;

/// Derives `bcs_codec::Encode`.
///
/// Structs encode their fields in declaration order, with no names or framing. Enums encode
/// the variant's position (as a varint) followed by the variant's fields.
///
/// # Attributes
///
/// Fields and variants accept `#[bcs("...")]`, a comma-separated list of tokens:
/// - `-`: the field is skipped (and decodes to `Default::default()`). An ignored variant cannot
///   be encoded and its index is rejected when decoding.
/// - `optional`: the field is prefixed by a presence byte. Only valid on `Option<...>` fields,
///   which are always encoded that way.
///
/// ```ignore
/// #[derive(Encode, Decode)]
/// struct Entry {
///     key: Vec<u8>,
///     #[bcs("optional")]
///     value: Option<Vec<u8>>,
///     #[bcs("-")]
///     hits: u64,
/// }
/// ```
///
/// Every type parameter is required to implement `Encode`.
#[proc_macro_derive(Encode, attributes(bcs))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand_encode(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `bcs_codec::Decode`.
///
/// See [derive@Encode] for the layout and attributes. Decoding a struct or enum counts as one
/// level of nesting against the decoder's depth limit.
#[proc_macro_derive(Decode, attributes(bcs))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand_decode(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Run a test with a `tracing` subscriber that writes to the test's captured output.
///
/// The maximum level defaults to `DEBUG` and can be set with `level`:
///
/// ```ignore
/// #[test_traced(level = "TRACE")]
/// fn test_something() {
///     tracing::trace!("visible");
/// }
/// ```
///
/// The crate using this attribute must depend on `tracing-subscriber`.
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = traced::Args::default();
    let parser = syn::meta::parser(|meta| args.parse(meta));
    parse_macro_input!(attr with parser);
    let input = parse_macro_input!(item as syn::ItemFn);
    traced::expand(args, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
