//! Capability set construction
//!
//! - `caps!` - build capability set types

use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Token, Type,
};

/// Flag markers `caps!` resolves without an import.
const KNOWN_FLAGS: [&str; 3] = ["NoFailureTracking", "SharedMemory", "SharedInstance"];

// =============================================================================
// caps! Input Parser
// =============================================================================

pub struct CapsInput {
    pub types: Punctuated<Type, Token![,]>,
}

impl Parse for CapsInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let types = Punctuated::parse_terminated(input)?;
        Ok(CapsInput { types })
    }
}

/// Check for duplicate capabilities in the list
pub fn check_duplicates(types: &[Type]) -> syn::Result<()> {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    for ty in types {
        let ty_str = ty.to_token_stream().to_string().replace(' ', "");
        let key = ty_str.rsplit("::").next().unwrap_or(&ty_str).to_owned();
        if !seen.insert(key) {
            return Err(syn::Error::new_spanned(
                ty,
                format!(
                    "duplicate capability `{}`\n\
                     \n\
                     Each capability should appear only once in a capability set.",
                    ty_str
                ),
            ));
        }
    }
    Ok(())
}

/// Bare flag names resolve to the crate's markers; anything else is used as written.
fn resolve_flag(ty: &Type) -> TokenStream2 {
    if let Type::Path(path) = ty {
        if path.qself.is_none() {
            if let Some(ident) = path.path.get_ident() {
                if KNOWN_FLAGS.iter().any(|flag| ident == flag) {
                    return quote! { ::allocator_caps::#ident };
                }
            }
        }
    }
    ty.to_token_stream()
}

/// Build capset type: <<<Empty as With<A>>::Out as With<B>>::Out as With<C>>::Out
pub fn build_capset(types: &[Type]) -> TokenStream2 {
    let mut result = quote! {
        ::allocator_caps::Caps<::allocator_caps::Absent, ::allocator_caps::Absent, ::allocator_caps::Absent>
    };
    for ty in types {
        let flag = resolve_flag(ty);
        result = quote! { <#result as ::allocator_caps::With<#flag>>::Out };
    }
    result
}
