//! Common parsing utilities
//!
//! Shared parsing helpers for consistent syntax across macros.

use syn::{Attribute, FnArg, Signature, Type};

/// Remove every `#[name]` attribute from `attrs`, reporting whether one was
/// present. Arguments are rejected.
pub fn take_flag_attr(attrs: &mut Vec<Attribute>, name: &str) -> syn::Result<bool> {
    let mut found = false;
    let mut error = None;
    attrs.retain(|attr| {
        if !attr.path().is_ident(name) {
            return true;
        }
        if let Err(err) = attr.meta.require_path_only() {
            error.get_or_insert(err);
        }
        found = true;
        false
    });
    match error {
        Some(err) => Err(err),
        None => Ok(found),
    }
}

/// True when the receiver is exactly `&self`.
pub fn is_shared_ref_receiver(sig: &Signature) -> bool {
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => receiver.reference.is_some() && receiver.mutability.is_none(),
        _ => false,
    }
}

/// Parameter count, receiver excluded.
pub fn typed_arity(sig: &Signature) -> usize {
    sig.inputs.iter().filter(|arg| matches!(arg, FnArg::Typed(_))).count()
}

/// Return type, or `None` for `()`.
pub fn return_type(sig: &Signature) -> Option<&Type> {
    match &sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(ty),
    }
}
