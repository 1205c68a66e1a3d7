//! Parsing of `#[bcs("...")]` annotations.

use syn::{Attribute, GenericArgument, LitStr, PathArguments, Result, Type};

const ATTRIBUTE: &str = "bcs";

/// How a field or variant takes part in encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Policy {
    Include,
    Ignore,
    Optional,
}

impl Policy {
    /// Reads a struct field's policy, checking that `optional` is only used on `Option<...>`.
    pub(crate) fn for_field(attrs: &[Attribute], ty: &Type) -> Result<Self> {
        match find(attrs)? {
            Some((Self::Optional, _)) if !is_option(ty) => Err(syn::Error::new_spanned(
                ty,
                "`optional` is only valid on `Option<...>` fields",
            )),
            found => Ok(found.map_or(Self::Include, |(policy, _)| policy)),
        }
    }

    /// Reads a variant's policy. Only `-` is meaningful on a variant.
    pub(crate) fn for_variant(attrs: &[Attribute]) -> Result<Self> {
        match find(attrs)? {
            Some((Self::Optional, attr)) => Err(syn::Error::new_spanned(
                attr,
                "`optional` is not valid on a variant",
            )),
            found => Ok(found.map_or(Self::Include, |(policy, _)| policy)),
        }
    }
}

/// Finds the `bcs` attribute among `attrs`, rejecting duplicates.
fn find(attrs: &[Attribute]) -> Result<Option<(Policy, &Attribute)>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate `bcs` attribute"));
        }
        let tag: LitStr = attr.parse_args()?;
        found = Some((parse(&tag)?, attr));
    }
    Ok(found)
}

/// Parses a comma-separated tag: `-` (alone) or `optional`. Empty tokens are skipped.
fn parse(tag: &LitStr) -> Result<Policy> {
    let value = tag.value();
    let mut policy = Policy::Include;
    let mut tokens = 0;
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        tokens += 1;
        policy = match token {
            "-" => Policy::Ignore,
            "optional" => Policy::Optional,
            other => {
                return Err(syn::Error::new(
                    tag.span(),
                    format!("unknown token `{other}` (expected `-` or `optional`)"),
                ))
            }
        };
    }
    if policy == Policy::Ignore && tokens > 1 {
        return Err(syn::Error::new(tag.span(), "`-` must appear alone"));
    }
    Ok(policy)
}

/// Returns whether `ty` names `Option<T>` (possibly by path, e.g. `std::option::Option<T>`).
fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    if last.ident != "Option" {
        return false;
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) => {
            args.args.len() == 1 && matches!(args.args.first(), Some(GenericArgument::Type(_)))
        }
        _ => false,
    }
}
