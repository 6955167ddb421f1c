use crate::derive_utils::{apply_derives, parse_bool};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Clone, (Debug 可控), Serialize, Deserialize, PartialEq
/// - 参数：
///   - `debug = true|false`，默认 true
///   - `eq = true|false`：追加 Eq + Hash，默认 false（浮点值对象不可用）
///   - `copy = true|false`：追加 Copy，默认 false
///   - `try_from = Inner`：仅用于单字段 tuple struct，反序列化经由 `TryFrom<Inner>`，
///     序列化经由 `From<Self> for Inner`（由宏生成），保证非法值无法绕过校验进入模型
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    if cfg.derive_copy.unwrap_or(false) {
        required.push(syn::parse_quote!(Copy));
    }
    if cfg.derive_eq.unwrap_or(false) {
        required.push(syn::parse_quote!(Eq));
        required.push(syn::parse_quote!(Hash));
    }

    match &mut input {
        Item::Struct(st) => {
            let Some(inner) = cfg.try_from else {
                apply_derives(&mut st.attrs, required, Vec::new());
                return TokenStream::from(quote! { #st });
            };

            let single_tuple = matches!(&st.fields, syn::Fields::Unnamed(f) if f.unnamed.len() == 1);
            if !single_tuple {
                return syn::Error::new(
                    st.span(),
                    "`try_from` requires a tuple struct with exactly one field",
                )
                .to_compile_error()
                .into();
            }

            let inner_str = inner.to_token_stream().to_string();
            let serde_attr: syn::Attribute =
                syn::parse_quote!(#[serde(try_from = #inner_str, into = #inner_str)]);
            apply_derives(&mut st.attrs, required, vec![serde_attr]);

            let ident = &st.ident;
            let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();
            TokenStream::from(quote! {
                #st

                impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner #where_clause {
                    fn from(value: #ident #ty_generics) -> Self { value.0 }
                }
            })
        }
        Item::Enum(en) => {
            if cfg.try_from.is_some() {
                return syn::Error::new(en.span(), "`try_from` is not supported on enums")
                    .to_compile_error()
                    .into();
            }
            apply_derives(&mut en.attrs, required, Vec::new());
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

#[derive(Default)]
struct ValueObjectAttrConfig {
    derive_debug: Option<bool>,
    derive_eq: Option<bool>,
    derive_copy: Option<bool>,
    try_from: Option<Type>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<ValueObjectAttrElem, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for elem in pairs {
            let (slot_taken, key) = match elem {
                ValueObjectAttrElem::Debug(b) => (cfg.derive_debug.replace(b).is_some(), "debug"),
                ValueObjectAttrElem::Eq(b) => (cfg.derive_eq.replace(b).is_some(), "eq"),
                ValueObjectAttrElem::Copy(b) => (cfg.derive_copy.replace(b).is_some(), "copy"),
                ValueObjectAttrElem::TryFrom(ty) => (cfg.try_from.replace(ty).is_some(), "try_from"),
            };
            if slot_taken {
                return Err(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
        }
        Ok(cfg)
    }
}

enum ValueObjectAttrElem {
    Debug(bool),
    Eq(bool),
    Copy(bool),
    TryFrom(Type),
}

impl Parse for ValueObjectAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        match key.to_string().as_str() {
            "debug" => Ok(Self::Debug(parse_bool(input.parse()?, "debug")?)),
            "eq" => Ok(Self::Eq(parse_bool(input.parse()?, "eq")?)),
            "copy" => Ok(Self::Copy(parse_bool(input.parse()?, "copy")?)),
            "try_from" => Ok(Self::TryFrom(input.parse()?)),
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug', 'eq', 'copy' or 'try_from'",
            )),
        }
    }
}
