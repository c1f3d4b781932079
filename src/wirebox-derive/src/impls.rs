use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    Attribute, Error as SynError, Expr, FnArg, GenericArgument, Ident, ImplItem, ImplItemFn,
    ItemImpl, LitStr, Meta, Pat, PathArguments, Result as SynResult, ReturnType, Signature, Type,
    TypePath,
};

use crate::attrs::ComponentArgs;

const PARAMETER_ATTRIBUTES: [&str; 3] = ["named", "qualified", "default"];

#[derive(Debug)]
struct ConstructorData {
    identifier: Ident,
    parameters: Vec<ParameterData>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
struct ParameterData {
    name: String,
    ty: Type,
    qualifier: QualifierData,
    fallback: Option<FallbackData>,
}

#[derive(Debug)]
enum QualifierData {
    None,
    Named(Expr),
    Qualified(Expr),
}

#[derive(Debug)]
enum FallbackData {
    Default,
    Expr(Expr),
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct AttributeRemovalVisitor;

impl AttributeRemovalVisitor {
    fn is_custom_attribute(attr: &Attribute) -> bool {
        let path = attr.path();
        path.is_ident("inject")
            || PARAMETER_ATTRIBUTES
                .iter()
                .any(|name| path.is_ident(name))
    }
}

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !Self::is_custom_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(item: TokenStream, args: ComponentArgs) -> SynResult<TokenStream> {
    let mut impls = match syn::parse2::<ItemImpl>(item) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };

    let self_type = get_self_type(&impls)?;
    let constructor = match find_constructor_signature(&impls)? {
        Some(signature) => Some(parse_constructor(signature, &self_type)?),
        None => None,
    };
    let expanded = expand_component_implementation(&impls, constructor, args);

    AttributeRemovalVisitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if impls.trait_.is_some() {
        return Err(SynError::new(
            impls.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn find_constructor_signature(impls: &ItemImpl) -> SynResult<Option<Signature>> {
    let ctors: Vec<_> = impls
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(item_fn) => Some(item_fn),
            _ => None,
        })
        .filter(|item_fn| is_annotated_with_inject(item_fn))
        .collect();

    let signature = match ctors.as_slice() {
        [] => return Ok(None),
        [ctor] => ctor.sig.clone(),
        [_, second, ..] => {
            return Err(SynError::new(
                second.sig.span(),
                "only one associated function can be annotated with `#[inject]`",
            ))
        }
    };

    if let Some(FnArg::Receiver(receiver)) = signature.inputs.first() {
        return Err(SynError::new(
            receiver.span(),
            "method is not allowed to be annotated with `#[inject]`",
        ));
    }

    Ok(Some(signature))
}

fn is_annotated_with_inject(item_fn: &ImplItemFn) -> bool {
    item_fn
        .attrs
        .iter()
        .any(|attr| matches!(&attr.meta, Meta::Path(path) if path.is_ident("inject")))
}

fn parse_constructor(signature: Signature, self_type: &TypePath) -> SynResult<ConstructorData> {
    let return_type = parse_constructor_return_type(&signature.output, self_type)?;
    let parameters = signature
        .inputs
        .into_iter()
        .enumerate()
        .map(|(index, arg)| match arg {
            FnArg::Typed(arg) => parse_parameter(index, *arg.pat, *arg.ty, arg.attrs),
            FnArg::Receiver(receiver) => Err(SynError::new(
                receiver.span(),
                "method is not allowed to be annotated with `#[inject]`",
            )),
        })
        .collect::<SynResult<_>>()?;

    Ok(ConstructorData {
        identifier: signature.ident,
        parameters,
        return_type,
    })
}

fn parse_parameter(
    index: usize,
    pat: Pat,
    ty: Type,
    attrs: Vec<Attribute>,
) -> SynResult<ParameterData> {
    let name = match &pat {
        Pat::Ident(ident) => ident.ident.to_string(),
        _ => format!("#{index}"),
    };

    let mut qualifier = QualifierData::None;
    let mut fallback = None;

    for attr in attrs {
        let path = attr.path();
        if path.is_ident("named") || path.is_ident("qualified") {
            if !matches!(qualifier, QualifierData::None) {
                return Err(SynError::new(
                    attr.span(),
                    "only one attribute of `#[named(...)]` or `#[qualified(...)]` is allowed",
                ));
            }
            let Meta::List(list) = &attr.meta else {
                return Err(SynError::new(
                    attr.span(),
                    "expects `#[named(...)]` or `#[qualified(...)]` to receive a value",
                ));
            };
            qualifier = if path.is_ident("named") {
                let name = syn::parse2::<LitStr>(list.tokens.clone()).map_err(|err| {
                    SynError::new(err.span(), "expects `#[named(...)]` to receive a string literal")
                })?;
                QualifierData::Named(Expr::Lit(syn::ExprLit {
                    attrs: Vec::new(),
                    lit: syn::Lit::Str(name),
                }))
            } else {
                QualifierData::Qualified(syn::parse2::<Expr>(list.tokens.clone())?)
            };
        } else if path.is_ident("default") {
            if fallback.is_some() {
                return Err(SynError::new(
                    attr.span(),
                    "only one `#[default]` attribute is allowed",
                ));
            }
            fallback = Some(match &attr.meta {
                Meta::Path(_) => FallbackData::Default,
                Meta::List(list) => FallbackData::Expr(syn::parse2::<Expr>(list.tokens.clone())?),
                Meta::NameValue(nv) => FallbackData::Expr(nv.value.clone()),
            });
        }
    }

    Ok(ParameterData {
        name,
        ty,
        qualifier,
        fallback,
    })
}

fn parse_constructor_return_type(
    output: &ReturnType,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let error = || {
        SynError::new(
            output.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        )
    };

    let ReturnType::Type(_, return_type) = output else {
        return Err(error());
    };
    let Type::Path(return_type) = return_type.as_ref() else {
        return Err(error());
    };

    if is_self_type(return_type, self_type) {
        return Ok(ReturnTypeData::Infallible);
    }

    let segments = &return_type.path.segments;
    let is_result = match segments.len() {
        1 => true,
        3 => {
            (segments[0].ident == "std" || segments[0].ident == "core")
                && segments[1].ident == "result"
        }
        _ => false,
    };
    let Some(last) = segments.last().filter(|s| is_result && s.ident == "Result") else {
        return Err(error());
    };
    let PathArguments::AngleBracketed(arguments) = &last.arguments else {
        return Err(error());
    };

    let mut types = arguments.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next(), types.next()) {
        (Some(Type::Path(ok_type)), Some(error_type), None) if is_self_type(ok_type, self_type) => {
            Ok(ReturnTypeData::Result {
                error_type: error_type.clone(),
            })
        }
        _ => Err(error()),
    }
}

fn is_self_type(ty: &TypePath, self_type: &TypePath) -> bool {
    ty == self_type || ty.path.is_ident("Self")
}

fn expand_component_implementation(
    impls: &ItemImpl,
    constructor: Option<ConstructorData>,
    args: ComponentArgs,
) -> TokenStream {
    let self_type = &impls.self_ty;
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();

    let (associated_type_constructed, post_process_body) = match &args {
        ComponentArgs::Plain => (quote! { Self }, quote! { self }),
        ComponentArgs::PostProcessed {
            output,
            post_processor,
        } => (quote! { #output }, quote! { (#post_processor)(self) }),
    };

    let (associated_type_error, construct_body) = match constructor {
        Some(constructor) => {
            let resolve_statements = constructor
                .parameters
                .iter()
                .enumerate()
                .map(|(index, parameter)| expand_parameter(index, parameter))
                .collect::<TokenStream>();
            let identifier = &constructor.identifier;
            let arguments = (0..constructor.parameters.len()).map(|index| format_ident!("dep{index}"));
            let call = quote! { Self::#identifier(#(#arguments),*) };

            match constructor.return_type {
                ReturnTypeData::Infallible => (
                    quote! { ::std::convert::Infallible },
                    quote! { #resolve_statements ::std::result::Result::Ok(::std::result::Result::Ok(#call)) },
                ),
                ReturnTypeData::Result { error_type } => (
                    quote! { #error_type },
                    quote! { #resolve_statements ::std::result::Result::Ok(#call) },
                ),
            }
        }
        None => (
            quote! { ::std::convert::Infallible },
            quote! {
                let _ = injector;
                ::std::result::Result::Ok(::std::result::Result::Ok(
                    <Self as ::std::default::Default>::default()
                ))
            },
        ),
    };

    quote! {
        impl #impl_generics wirebox::provider::component::Component for #self_type #where_clause {
            type Constructed = #associated_type_constructed;

            type Error = #associated_type_error;

            fn construct<I>(injector: &I) -> ::std::result::Result<
                ::std::result::Result<Self, Self::Error>,
                wirebox::container::injector::InjectorError
            >
            where
                I: wirebox::container::injector::TypedInjector + ?Sized
            {
                #construct_body
            }

            fn post_process(self) -> Self::Constructed {
                #post_process_body
            }
        }
    }
}

fn expand_parameter(index: usize, parameter: &ParameterData) -> TokenStream {
    let dep = format_ident!("dep{index}");
    let ty = &parameter.ty;
    let name = &parameter.name;

    let key = match &parameter.qualifier {
        QualifierData::None => quote! { wirebox::key::of::<#ty>() },
        QualifierData::Named(name) => quote! { wirebox::key::named::<#ty>(#name) },
        QualifierData::Qualified(qualifier) => {
            quote! { wirebox::key::qualified::<#ty, _>(#qualifier) }
        }
    };
    let resolve = quote! {
        wirebox::container::injector::TypedInjector::make(injector, key).map_err(|err| {
            wirebox::container::injector::InjectorError::unresolvable_parameter(
                ::std::any::type_name::<Self>(),
                #name,
                err,
            )
        })?
    };

    let value = match &parameter.fallback {
        None => resolve,
        Some(fallback) => {
            let fallback = match fallback {
                FallbackData::Default => quote! { <#ty as ::std::default::Default>::default() },
                FallbackData::Expr(expr) => quote! { #expr },
            };
            quote! {
                if wirebox::container::injector::Injector::contains(injector, &key) {
                    #resolve
                } else {
                    #fallback
                }
            }
        }
    };

    quote! {
        let #dep: #ty = {
            let key = #key;
            #value
        };
    }
}
