//! Byte spans.
//!
//! A span is a `(pointer, length)` pair naming a region handed out by an
//! allocator. A null pointer or a zero length is how every operation reports
//! failure; there is no separate error channel.
//!
//! The span type is also how the `SharedMemory` capability shows up in the
//! type system: `ByteSpan` is neither `Send` nor `Sync`, `SharedSpan` is both.
//! An allocator's span kind is read off the return type of its `allocate`.

use core::fmt;
use core::ptr;

/// Which memory discipline a span follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Memory owned by a single thread of control.
    Exclusive,
    /// Memory that may be accessed concurrently as shared memory.
    Shared,
}

impl SpanKind {
    /// Rust type used for spans of this kind.
    pub const fn type_name(self) -> &'static str {
        match self {
            SpanKind::Exclusive => "ByteSpan",
            SpanKind::Shared => "SharedSpan",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Exclusive => f.write_str("exclusive"),
            SpanKind::Shared => f.write_str("shared"),
        }
    }
}

/// Common surface of the two span types.
pub trait Span: Copy + Eq + fmt::Debug + 'static {
    /// Memory discipline of this span type.
    const KIND: SpanKind;

    /// Builds a span from raw parts. No validity is implied.
    fn from_raw_parts(ptr: *mut u8, len: usize) -> Self;

    /// The failure span.
    #[inline]
    fn null() -> Self {
        Self::from_raw_parts(ptr::null_mut(), 0)
    }

    /// Base address, possibly null.
    fn as_ptr(&self) -> *mut u8;

    /// Length in bytes.
    fn len(&self) -> usize;

    /// True when the span has zero length.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the span denotes failure: null base or zero length.
    #[inline]
    fn is_null(&self) -> bool {
        self.as_ptr().is_null() || self.len() == 0
    }

    /// One past the last byte of the span.
    #[inline]
    fn end(&self) -> *mut u8 {
        self.as_ptr().wrapping_add(self.len())
    }

    /// True when `addr` falls inside the span.
    #[inline]
    fn contains_addr(&self, addr: *const u8) -> bool {
        !self.is_null() && addr >= self.as_ptr().cast_const() && addr < self.end().cast_const()
    }

    /// Views the span as a byte slice.
    ///
    /// # Safety
    ///
    /// The span must be live, non-null, and not aliased mutably for `'a`.
    #[inline]
    unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Views the span as a mutable byte slice.
    ///
    /// # Safety
    ///
    /// The span must be live, non-null, and not aliased at all for `'a`.
    #[inline]
    unsafe fn as_bytes_mut<'a>(&self) -> &'a mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.as_ptr(), self.len()) }
    }
}

macro_rules! impl_span {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            ptr: *mut u8,
            len: usize,
        }

        impl $name {
            /// Builds a span from raw parts. No validity is implied.
            #[inline]
            pub const fn new(ptr: *mut u8, len: usize) -> Self {
                Self { ptr, len }
            }

            /// The failure span.
            pub const NULL: Self = Self::new(ptr::null_mut(), 0);
        }

        impl Span for $name {
            const KIND: SpanKind = SpanKind::$kind;

            #[inline]
            fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
                Self::new(ptr, len)
            }

            #[inline]
            fn as_ptr(&self) -> *mut u8 {
                self.ptr
            }

            #[inline]
            fn len(&self) -> usize {
                self.len
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NULL
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("ptr", &self.ptr)
                    .field("len", &self.len)
                    .finish()
            }
        }
    };
}

impl_span! {
    /// A span of exclusive (thread-confined) memory.
    ByteSpan => Exclusive
}

impl_span! {
    /// A span of memory usable concurrently as shared memory.
    SharedSpan => Shared
}

// SAFETY: a `SharedSpan` is only produced by allocators whose memory is
// declared usable from several threads at once.
unsafe impl Send for SharedSpan {}
// SAFETY: see above.
unsafe impl Sync for SharedSpan {}
