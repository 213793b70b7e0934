//! `#[callback]` attribute.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    FnArg, Ident, ItemFn, LitStr, Pat, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[callback]` macro.
pub(crate) struct CallbackArgs {
    /// Explicit dispatch name.
    pub name: Option<LitStr>,
}

impl Parse for CallbackArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "callback name must not be empty"));
                    }
                    name = Some(lit);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(CallbackArgs { name })
    }
}

pub(crate) fn callback_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as CallbackArgs);
    let input = parse_macro_input!(item as ItemFn);

    match expand(args, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: CallbackArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;

    if !input.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.generics,
            "callback functions cannot be generic",
        ));
    }

    let dispatch_name = match args.name {
        Some(lit) => lit,
        None => LitStr::new(&fn_name.to_string(), fn_name.span()),
    };

    let mut decoded = Vec::new();
    let mut arg_names = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let pat_type = match arg {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "callback functions cannot take self",
                ));
            }
        };
        let ty = &pat_type.ty;
        let label = match &*pat_type.pat {
            Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
            _ => format!("arg{}", i),
        };
        let arg_name = format_ident!("__arg_{}", i);

        decoded.push(quote! {
            let #arg_name: #ty = match __decoder.decode(#label) {
                ::core::result::Result::Ok(value) => value,
                ::core::result::Result::Err(err) => {
                    return ::core::result::Result::Err(::pyscall::BoxError::from(err));
                }
            };
        });
        arg_names.push(arg_name);
    }

    let invoke = if input.sig.asyncness.is_some() {
        quote! { #fn_name(#(#arg_names),*).await }
    } else {
        quote! { #fn_name(#(#arg_names),*) }
    };

    let entry_name = format_ident!("__pyscall_callback_{}", fn_name);

    Ok(quote! {
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #entry_name(
            __args: ::std::vec::Vec<::pyscall::Value>,
        ) -> ::pyscall::__private::BoxFuture<'static, ::pyscall::CallResult> {
            ::std::boxed::Box::pin(async move {
                #[allow(unused_mut, unused_variables)]
                let mut __decoder = ::pyscall::__private::ArgDecoder::new(__args);
                #(#decoded)*
                ::pyscall::IntoCallbackOutput::into_output(#invoke)
            })
        }

        ::pyscall::inventory::submit! {
            ::pyscall::__private::CallbackRegistration::new(#dispatch_name, #entry_name)
        }
    })
}
