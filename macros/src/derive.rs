//! Code generation for `#[derive(Encode)]` and `#[derive(Decode)]`.

use crate::attr::Policy;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    parse_quote, Data, DataEnum, DeriveInput, Fields, GenericParam, Generics, Ident, Index,
    Result,
};

/// A field that takes part in the encoding, with how to reach it.
struct Member {
    /// `self.<access>` for structs.
    access: TokenStream,
    /// Local binding when destructuring an enum variant.
    binding: Ident,
    policy: Policy,
}

/// Collects the fields of a struct or variant along with their policies.
fn members(fields: &Fields) -> Result<Vec<Member>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let policy = Policy::for_field(&field.attrs, &field.ty)?;
            let (access, binding) = match &field.ident {
                Some(ident) => (quote!(#ident), ident.clone()),
                None => {
                    let index = Index::from(i);
                    (quote!(#index), format_ident!("__field{}", i))
                }
            };
            Ok(Member {
                access,
                binding,
                policy,
            })
        })
        .collect()
}

/// Adds `Trait` bounds to every type parameter.
fn add_bounds(mut generics: Generics, bound: TokenStream) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#bound));
        }
    }
    generics
}

/// Builds the initializer for a struct or variant named by `path`, reading each included
/// field and defaulting each ignored one.
fn construct(path: TokenStream, fields: &Fields, members: &[Member]) -> TokenStream {
    let values = members.iter().map(|member| match member.policy {
        Policy::Ignore => quote!(::core::default::Default::default()),
        Policy::Include | Policy::Optional => quote!(::bcs_codec::Decode::read(decoder)?),
    });
    match fields {
        Fields::Named(_) => {
            let names = members.iter().map(|m| &m.access);
            quote!(#path { #( #names: #values, )* })
        }
        Fields::Unnamed(_) => quote!(#path( #( #values, )* )),
        Fields::Unit => path,
    }
}

/// Builds the pattern destructuring an enum variant, binding only the encoded fields.
fn destructure(path: TokenStream, fields: &Fields, members: &[Member]) -> TokenStream {
    match fields {
        Fields::Named(_) => {
            let bound = members
                .iter()
                .filter(|m| m.policy != Policy::Ignore)
                .map(|m| {
                    let (access, binding) = (&m.access, &m.binding);
                    quote!(#access: #binding)
                });
            quote!(#path { #( #bound, )* .. })
        }
        Fields::Unnamed(_) => {
            let bound = members.iter().map(|m| match m.policy {
                Policy::Ignore => quote!(_),
                Policy::Include | Policy::Optional => {
                    let binding = &m.binding;
                    quote!(#binding)
                }
            });
            quote!(#path( #( #bound, )* ))
        }
        Fields::Unit => path,
    }
}

/// Number of variants as a `u32` literal.
fn variant_count(data: &DataEnum) -> Result<u32> {
    u32::try_from(data.variants.len())
        .map_err(|_| syn::Error::new(Span::call_site(), "too many variants"))
}

pub(crate) fn expand_encode(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = add_bounds(input.generics.clone(), quote!(::bcs_codec::Encode));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Types with nothing to write leave the encoder untouched.
    let (body, writes_any) = match &input.data {
        Data::Struct(data) => {
            let members = members(&data.fields)?;
            let writes_any = members.iter().any(|m| m.policy != Policy::Ignore);
            let writes = members
                .iter()
                .filter(|m| m.policy != Policy::Ignore)
                .map(|m| {
                    let access = &m.access;
                    quote!(::bcs_codec::Encode::write(&self.#access, encoder)?;)
                });
            let body = quote! {
                #( #writes )*
                ::core::result::Result::Ok(())
            };
            (body, writes_any)
        }
        Data::Enum(data) => {
            variant_count(data)?;
            let writes_any = data
                .variants
                .iter()
                .any(|v| Policy::for_variant(&v.attrs).is_ok_and(|p| p != Policy::Ignore));
            let type_name = name.to_string();
            let arms = data
                .variants
                .iter()
                .enumerate()
                .map(|(index, variant)| {
                    let ident = &variant.ident;
                    let members = members(&variant.fields)?;
                    if Policy::for_variant(&variant.attrs)? == Policy::Ignore {
                        return Ok(quote! {
                            Self::#ident { .. } => ::core::result::Result::Err(
                                ::bcs_codec::Error::EmptyUnion(
                                    ::std::string::String::from(#type_name),
                                ),
                            ),
                        });
                    }
                    let index = index as u32;
                    let pattern = destructure(quote!(Self::#ident), &variant.fields, &members);
                    let writes = members
                        .iter()
                        .filter(|m| m.policy != Policy::Ignore)
                        .map(|m| {
                            let binding = &m.binding;
                            quote!(::bcs_codec::Encode::write(#binding, encoder)?;)
                        });
                    Ok(quote! {
                        #pattern => {
                            encoder.write_variant(#index)?;
                            #( #writes )*
                            ::core::result::Result::Ok(())
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let body = if arms.is_empty() {
                quote!(match *self {})
            } else {
                quote! {
                    match self {
                        #( #arms )*
                    }
                }
            };
            (body, writes_any)
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "unions cannot derive Encode",
            ))
        }
    };

    let param = if writes_any {
        quote!(encoder)
    } else {
        quote!(_)
    };

    Ok(quote! {
        impl #impl_generics ::bcs_codec::Encode for #name #ty_generics #where_clause {
            fn write<__W: ::std::io::Write>(
                &self,
                #param: &mut ::bcs_codec::Encoder<__W>,
            ) -> ::core::result::Result<(), ::bcs_codec::Error> {
                #body
            }
        }
    })
}

pub(crate) fn expand_decode(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = add_bounds(input.generics.clone(), quote!(::bcs_codec::Decode));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Structs with nothing to read leave the decoder untouched.
    let mut reads = true;
    let body = match &input.data {
        Data::Struct(data) => {
            let members = members(&data.fields)?;
            reads = members.iter().any(|m| m.policy != Policy::Ignore);
            let value = construct(quote!(Self), &data.fields, &members);
            quote!(::core::result::Result::Ok(#value))
        }
        Data::Enum(data) => {
            let count = variant_count(data)?;
            let arms = data
                .variants
                .iter()
                .enumerate()
                .filter_map(|(index, variant)| {
                    match Policy::for_variant(&variant.attrs) {
                        Ok(Policy::Ignore) => return None,
                        Ok(_) => {}
                        Err(err) => return Some(Err(err)),
                    }
                    let ident = &variant.ident;
                    let index = index as u32;
                    Some(members(&variant.fields).map(|members| {
                        let value = construct(quote!(Self::#ident), &variant.fields, &members);
                        quote!(#index => ::core::result::Result::Ok(#value),)
                    }))
                })
                .collect::<Result<Vec<_>>>()?;
            quote! {
                match decoder.read_variant(#count)? {
                    #( #arms )*
                    index => ::core::result::Result::Err(
                        ::bcs_codec::Error::VariantOutOfRange(index, #count),
                    ),
                }
            }
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "unions cannot derive Decode",
            ))
        }
    };

    let param = if reads {
        quote!(decoder)
    } else {
        quote!(_)
    };

    Ok(quote! {
        impl #impl_generics ::bcs_codec::Decode for #name #ty_generics #where_clause {
            fn read<__R: ::std::io::Read>(
                decoder: &mut ::bcs_codec::Decoder<__R>,
            ) -> ::core::result::Result<Self, ::bcs_codec::Error> {
                decoder.nested(|#param| #body)
            }
        }
    })
}
