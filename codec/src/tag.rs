//! Per-field policy annotations.
//!
//! An annotation is a comma-separated list of tokens:
//! - `-`: the field is ignored (no bytes are produced or consumed). Must appear alone.
//! - `optional`: the field is prefixed by a presence byte. Only legal on indirections.
//!
//! Empty tokens are skipped, so `""` and `" , "` both mean "include".

use crate::Error;
use std::{fmt, str::FromStr};

/// How a struct field (or union variant) takes part in encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldPolicy {
    /// Encoded in place.
    #[default]
    Include,

    /// Skipped entirely.
    Ignore,

    /// Encoded as a presence byte followed by the value, if present.
    Optional,
}

impl FromStr for FieldPolicy {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let mut policy = Self::Include;
        let mut tokens = 0;
        for token in tag.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            tokens += 1;
            match token {
                "-" => policy = Self::Ignore,
                "optional" => policy = Self::Optional,
                other => {
                    return Err(Error::InvalidFieldPolicy(format!(
                        "unknown token `{other}` in `{tag}`"
                    )))
                }
            }
        }
        if policy == Self::Ignore && tokens > 1 {
            return Err(Error::InvalidFieldPolicy(format!(
                "`-` must appear alone in `{tag}`"
            )));
        }
        Ok(policy)
    }
}

impl fmt::Display for FieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.pad(""),
            Self::Ignore => f.pad("-"),
            Self::Optional => f.pad("optional"),
        }
    }
}
