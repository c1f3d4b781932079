use proc_macro2::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Result as SynResult, Token, Type};

/// Arguments of `#[component]` itself.
#[derive(Debug)]
pub enum ComponentArgs {
    /// `#[component]`: the component is handed out as is.
    Plain,
    /// `#[component(Arc<dyn Trait>, Arc::new)]`: the constructed value is
    /// passed to the post-processor whose result is handed out.
    PostProcessed { output: Type, post_processor: Expr },
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> SynResult<Self> {
        if input.is_empty() {
            return Ok(Self::Plain);
        }

        let output = input.parse::<Type>()?;
        input.parse::<Token![,]>().map_err(|err| {
            syn::Error::new(
                err.span(),
                "expects an output type and a post-processor, separated by a comma",
            )
        })?;
        let post_processor = input.parse::<Expr>()?;
        let _ = input.parse::<Option<Token![,]>>()?;

        Ok(Self::PostProcessed {
            output,
            post_processor,
        })
    }
}

pub fn parse_component_args(attr: TokenStream) -> SynResult<ComponentArgs> {
    syn::parse2(attr)
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn parse_component_args_succeeds_when_empty() {
        let args = parse_component_args(TokenStream::new()).unwrap();
        assert!(matches!(args, ComponentArgs::Plain));
    }

    #[test]
    fn parse_component_args_succeeds_when_output_has_generics() {
        let args = parse_component_args(quote! { Box<HashMap<String, u32>>, Box::new }).unwrap();
        let ComponentArgs::PostProcessed { output, .. } = args else {
            panic!("arguments should be parsed as post-processed");
        };
        let expected: Type = syn::parse_quote! { Box<HashMap<String, u32>> };
        assert_eq!(output, expected);
    }

    #[test]
    fn parse_component_args_fails_when_post_processor_is_missing() {
        assert!(parse_component_args(quote! { Arc<dyn Cache> }).is_err());
    }
}
