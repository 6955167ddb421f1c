use crate::derive_utils::{apply_derives, parse_bool};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity_id] 宏实现
/// 仅支持单字段 tuple struct，并为包装类型：
/// - 合并/追加派生：Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord
/// - `#[serde(transparent)]`：在 JSON 中与内部值同形（`1`、`"978-..."`）
/// - 提供 new(value)、value()、Display、FromStr、AsRef、From 等便捷实现
/// - 参数：`copy = true` 追加 Copy（内部类型需为 Copy）
/// - 参数：`validated = true` 时改为 `#[serde(try_from = .., into = ..)]`，
///   且不生成 `new`、`FromStr` 与 `From<Inner>`，由类型自行提供带校验的版本
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityIdAttrConfig);
    let input = parse_macro_input!(item as Item);

    let st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity_id] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let inner_ty = match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => f.unnamed[0].ty.clone(),
        syn::Fields::Unnamed(f) => {
            return syn::Error::new(
                f.span(),
                "#[entity_id] requires a tuple struct with exactly one field",
            )
            .to_compile_error()
            .into();
        }
        _ => {
            return syn::Error::new(
                st.span(),
                "#[entity_id] supports only tuple struct, e.g., struct X(u32);",
            )
            .to_compile_error()
            .into();
        }
    };

    // 合并/规范 derive
    let mut st_out = st.clone();
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Debug),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(PartialOrd),
        syn::parse_quote!(Ord),
    ];
    if cfg.copy {
        required.push(syn::parse_quote!(Copy));
    }
    let serde_attr: syn::Attribute = if cfg.validated {
        let inner_str = quote!(#inner_ty).to_string();
        syn::parse_quote!(#[serde(try_from = #inner_str, into = #inner_str)])
    } else {
        syn::parse_quote!(#[serde(transparent)])
    };
    apply_derives(&mut st_out.attrs, required, vec![serde_attr]);

    let ident = &st_out.ident;
    let generics = st_out.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let unchecked = if cfg.validated {
        quote! {}
    } else {
        quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                pub fn new(value: #inner_ty) -> Self { Self(value) }
            }

            impl #impl_generics ::std::str::FromStr for #ident #ty_generics #where_clause
            where #inner_ty: ::std::str::FromStr
            {
                type Err = <#inner_ty as ::std::str::FromStr>::Err;
                fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                    let inner: #inner_ty = s.trim().parse()?;
                    ::std::result::Result::Ok(Self(inner))
                }
            }

            impl #impl_generics ::core::convert::From<#inner_ty> for #ident #ty_generics #where_clause {
                fn from(value: #inner_ty) -> Self { Self(value) }
            }
        }
    };

    let out = quote! {
        #st_out

        #unchecked

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn value(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause
        where #inner_ty: ::std::fmt::Display
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl #impl_generics ::core::convert::AsRef<#inner_ty> for #ident #ty_generics #where_clause {
            fn as_ref(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner_ty #where_clause {
            fn from(value: #ident #ty_generics) -> Self { value.0 }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

#[derive(Default)]
struct EntityIdAttrConfig {
    copy: bool,
    validated: bool,
}

impl Parse for EntityIdAttrConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }
        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;
        for nv in pairs {
            if nv.path.is_ident("copy") {
                cfg.copy = parse_bool(nv.value, "copy")?;
            } else if nv.path.is_ident("validated") {
                cfg.validated = parse_bool(nv.value, "validated")?;
            } else {
                return Err(syn::Error::new_spanned(
                    nv.path,
                    "unknown key in attribute; expected 'copy' or 'validated'",
                ));
            }
        }
        Ok(cfg)
    }
}
