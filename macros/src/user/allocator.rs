//! `#[allocator]`: derive the `Allocator` impl from an inherent impl block.
//!
//! The block is inspected structurally. Methods named after one of the
//! thirteen operations become the allocator's operation set; everything
//! else is left alone. `#[untracked]` on an operation marks it exempt from
//! runtime failure tracking, and the allocator as a whole is untracked only
//! when every operation it implements is.
//!
//! The block must be written `unsafe impl`: the generated `Allocator` impl is
//! an `unsafe impl`, and the keyword is where the author takes on its
//! contract. It is stripped from the re-emitted inherent block.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{spanned::Spanned, ImplItem, ItemImpl, Type};

use crate::common::{is_shared_ref_receiver, return_type, take_flag_attr, typed_arity, Op};

struct Found {
    op: Op,
    arity: usize,
    untracked: bool,
}

pub fn expand_allocator(attr: TokenStream2, mut item: ItemImpl) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[allocator] takes no arguments"));
    }
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[allocator] goes on an inherent impl block, not a trait impl",
        ));
    }
    if item.unsafety.take().is_none() {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "#[allocator] requires `unsafe impl`: the block must uphold the `Allocator` safety contract",
        ));
    }

    let mut found: Vec<Found> = Vec::new();
    let mut span_ty: Option<Type> = None;

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else { continue };
        let untracked = take_flag_attr(&mut method.attrs, "untracked")?;
        let sig = &method.sig;

        let Some(op) = Op::from_ident(&sig.ident) else {
            if untracked {
                return Err(syn::Error::new_spanned(
                    &sig.ident,
                    "#[untracked] only applies to allocator operations",
                ));
            }
            continue;
        };

        if !is_shared_ref_receiver(sig) {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                format!("`{}` must take `&self`", op.name()),
            ));
        }
        if op.is_unsafe() != sig.unsafety.is_some() {
            let message = if op.is_unsafe() {
                format!("`{}` invalidates spans and must be declared `unsafe fn`", op.name())
            } else {
                format!("`{}` must not be declared `unsafe`", op.name())
            };
            return Err(syn::Error::new_spanned(&sig.ident, message));
        }
        if sig.asyncness.is_some() || !sig.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                format!("`{}` must be a plain, non-generic, synchronous method", op.name()),
            ));
        }
        let arity = typed_arity(sig);
        if !op.arity().contains(&arity) {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                format!("`{}` takes {:?} parameter(s) besides `&self`, found {}", op.name(), op.arity(), arity),
            ));
        }
        if op == Op::Allocate {
            match return_type(sig) {
                Some(ty) => span_ty = Some(ty.clone()),
                None => {
                    return Err(syn::Error::new_spanned(&sig.ident, "`allocate` must return a span type"));
                }
            }
        }
        if found.iter().any(|f| f.op == op) {
            return Err(syn::Error::new_spanned(&sig.ident, format!("duplicate operation `{}`", op.name())));
        }
        found.push(Found { op, arity, untracked });
    }

    let Some(span_ty) = span_ty else {
        return Err(syn::Error::new(
            item.self_ty.span(),
            "an allocator must implement `fn allocate(&self, size: usize, ...) -> Span`",
        ));
    };

    let krate = quote! { ::allocator_caps };
    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    let all_untracked = found.iter().all(|f| f.untracked);
    let untracked_ty = if all_untracked {
        quote! { #krate::Present }
    } else {
        quote! { #krate::Absent }
    };
    let operations = found.iter().map(|f| f.op.flag());
    let untracked = found.iter().filter(|f| f.untracked).map(|f| f.op.flag());
    let forwarders = found.iter().map(|f| f.op.forwarder(self_ty, f.arity));

    Ok(quote! {
        #item

        unsafe impl #impl_generics #krate::Allocator for #self_ty #where_clause {
            type Span = #span_ty;
            type Untracked = #untracked_ty;

            const OPERATIONS: #krate::Operations = #krate::Operations::empty()
                #(.union(#krate::Operations::#operations))*;
            const UNTRACKED: #krate::Operations = #krate::Operations::empty()
                #(.union(#krate::Operations::#untracked))*;

            #(#forwarders)*
        }
    })
}
