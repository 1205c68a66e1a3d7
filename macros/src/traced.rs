use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{meta::ParseNestedMeta, ItemFn, LitStr, Result};

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

#[derive(Default)]
pub(crate) struct Args {
    level: Option<LitStr>,
}

impl Args {
    pub(crate) fn parse(&mut self, meta: ParseNestedMeta<'_>) -> Result<()> {
        if meta.path.is_ident("level") {
            self.level = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported test_traced property (expected `level`)"))
        }
    }
}

pub(crate) fn expand(args: Args, input: ItemFn) -> Result<TokenStream> {
    let level = match &args.level {
        Some(lit) => {
            let level = lit.value().to_uppercase();
            if !LEVELS.contains(&level.as_str()) {
                return Err(syn::Error::new(
                    lit.span(),
                    format!(
                        "invalid level `{}` (expected one of {})",
                        lit.value(),
                        LEVELS.join(", ")
                    ),
                ));
            }
            format_ident!("{}", level)
        }
        None => format_ident!("DEBUG"),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    Ok(quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let _ = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::tracing_subscriber::filter::LevelFilter::#level)
                .try_init();
            #block
        }
    })
}
