//! The thirteen allocator operations as the macros see them.
//!
//! Mirrors `allocator_caps::Operation`; the two tables must list the same
//! operations in the same order.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Ident;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Allocate,
    Deallocate,
    AlignedAllocate,
    AllocateAll,
    Expand,
    Reallocate,
    AlignedReallocate,
    DeallocateAll,
    Alignment,
    GoodAllocSize,
    Owns,
    ResolveInternalPointer,
    Empty,
}

impl Op {
    pub const ALL: [Op; 13] = [
        Op::Allocate,
        Op::Deallocate,
        Op::AlignedAllocate,
        Op::AllocateAll,
        Op::Expand,
        Op::Reallocate,
        Op::AlignedReallocate,
        Op::DeallocateAll,
        Op::Alignment,
        Op::GoodAllocSize,
        Op::Owns,
        Op::ResolveInternalPointer,
        Op::Empty,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Op::Allocate => "allocate",
            Op::Deallocate => "deallocate",
            Op::AlignedAllocate => "aligned_allocate",
            Op::AllocateAll => "allocate_all",
            Op::Expand => "expand",
            Op::Reallocate => "reallocate",
            Op::AlignedReallocate => "aligned_reallocate",
            Op::DeallocateAll => "deallocate_all",
            Op::Alignment => "alignment",
            Op::GoodAllocSize => "good_alloc_size",
            Op::Owns => "owns",
            Op::ResolveInternalPointer => "resolve_internal_pointer",
            Op::Empty => "empty",
        }
    }

    pub fn from_ident(ident: &Ident) -> Option<Op> {
        let name = ident.to_string();
        Op::ALL.into_iter().find(|op| op.name() == name)
    }

    /// `Operations` constant name.
    pub fn flag(self) -> Ident {
        Ident::new(&self.name().to_uppercase(), proc_macro2::Span::call_site())
    }

    pub fn is_unsafe(self) -> bool {
        matches!(
            self,
            Op::Deallocate | Op::Expand | Op::Reallocate | Op::AlignedReallocate | Op::DeallocateAll
        )
    }

    /// Accepted parameter counts, receiver excluded.
    pub fn arity(self) -> &'static [usize] {
        match self {
            Op::Allocate => &[1, 2],
            Op::AllocateAll | Op::DeallocateAll | Op::Alignment | Op::Empty => &[0],
            Op::Deallocate | Op::GoodAllocSize | Op::Owns => &[1],
            Op::AlignedAllocate | Op::Expand | Op::Reallocate | Op::ResolveInternalPointer => &[2],
            Op::AlignedReallocate => &[3],
        }
    }

    /// Trait method forwarding to the inherent method on `self_ty`.
    ///
    /// `arity` is the inherent method's parameter count; only `allocate`
    /// has a choice (with or without the type tag).
    pub fn forwarder(self, self_ty: &syn::Type, arity: usize) -> TokenStream2 {
        let krate = quote! { ::allocator_caps };
        match self {
            Op::Allocate if arity == 1 => quote! {
                #[inline]
                fn allocate(&self, size: usize, _tag: ::core::option::Option<#krate::TypeTag>) -> Self::Span {
                    <#self_ty>::allocate(self, size)
                }
            },
            Op::Allocate => quote! {
                #[inline]
                fn allocate(&self, size: usize, tag: ::core::option::Option<#krate::TypeTag>) -> Self::Span {
                    <#self_ty>::allocate(self, size, tag)
                }
            },
            Op::Deallocate => quote! {
                #[inline]
                unsafe fn deallocate(&self, span: Self::Span) -> bool {
                    unsafe { <#self_ty>::deallocate(self, span) }
                }
            },
            Op::AlignedAllocate => quote! {
                #[inline]
                fn aligned_allocate(&self, size: usize, alignment: usize) -> Self::Span {
                    <#self_ty>::aligned_allocate(self, size, alignment)
                }
            },
            Op::AllocateAll => quote! {
                #[inline]
                fn allocate_all(&self) -> Self::Span {
                    <#self_ty>::allocate_all(self)
                }
            },
            Op::Expand => quote! {
                #[inline]
                unsafe fn expand(&self, span: &mut Self::Span, new_size: usize) -> bool {
                    unsafe { <#self_ty>::expand(self, span, new_size) }
                }
            },
            Op::Reallocate => quote! {
                #[inline]
                unsafe fn reallocate(&self, span: &mut Self::Span, new_size: usize) -> bool {
                    unsafe { <#self_ty>::reallocate(self, span, new_size) }
                }
            },
            Op::AlignedReallocate => quote! {
                #[inline]
                unsafe fn aligned_reallocate(&self, span: &mut Self::Span, new_size: usize, alignment: usize) -> bool {
                    unsafe { <#self_ty>::aligned_reallocate(self, span, new_size, alignment) }
                }
            },
            Op::DeallocateAll => quote! {
                #[inline]
                unsafe fn deallocate_all(&self) -> bool {
                    unsafe { <#self_ty>::deallocate_all(self) }
                }
            },
            Op::Alignment => quote! {
                #[inline]
                fn alignment(&self) -> usize {
                    <#self_ty>::alignment(self)
                }
            },
            Op::GoodAllocSize => quote! {
                #[inline]
                fn good_alloc_size(&self, size: usize) -> usize {
                    <#self_ty>::good_alloc_size(self, size)
                }
            },
            Op::Owns => quote! {
                #[inline]
                fn owns(&self, span: Self::Span) -> #krate::Ternary {
                    <#self_ty>::owns(self, span)
                }
            },
            Op::ResolveInternalPointer => quote! {
                #[inline]
                fn resolve_internal_pointer(&self, ptr: *const u8, out: &mut Self::Span) -> #krate::Ternary {
                    <#self_ty>::resolve_internal_pointer(self, ptr, out)
                }
            },
            Op::Empty => quote! {
                #[inline]
                fn empty(&self) -> #krate::Ternary {
                    <#self_ty>::empty(self)
                }
            },
        }
    }
}
