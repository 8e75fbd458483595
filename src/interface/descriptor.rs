//! Generated operation-surface descriptors.

use core::fmt;

use crate::caps::CapabilitySet;
use crate::primitives::SpanKind;

use super::operation::{Fallback, Operation, ParamKind, ReturnKind};

/// The operation-surface contract generated for one capability set.
///
/// A deterministic function of the set: two descriptors generated from equal
/// sets are equal, whatever allocator they end up describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceDescriptor {
    capabilities: CapabilitySet,
    span: SpanKind,
    untracked: bool,
    concurrent: bool,
}

impl InterfaceDescriptor {
    pub const fn generate(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            span: if capabilities.shared_memory() { SpanKind::Shared } else { SpanKind::Exclusive },
            untracked: capabilities.no_failure_tracking(),
            concurrent: capabilities.shared_instance(),
        }
    }

    pub const fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Span kind every operation traffics in.
    pub const fn span(&self) -> SpanKind {
        self.span
    }

    /// True when every operation is exempt from runtime failure tracking.
    pub const fn is_untracked(&self) -> bool {
        self.untracked
    }

    /// True when every operation may run concurrently on a shared instance.
    pub const fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    pub const fn signature(&self, operation: Operation) -> Signature {
        Signature { operation, descriptor: *self }
    }

    /// One signature per operation, in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        Operation::ALL.into_iter().map(|op| self.signature(op))
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "interface {} {{", self.capabilities)?;
        for signature in self.signatures() {
            writeln!(f, "    {signature};")?;
        }
        f.write_str("}")
    }
}

/// One operation as it appears in a generated interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    operation: Operation,
    descriptor: InterfaceDescriptor,
}

impl Signature {
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    pub const fn span(&self) -> SpanKind {
        self.descriptor.span
    }

    pub const fn is_untracked(&self) -> bool {
        self.descriptor.untracked
    }

    pub const fn is_concurrent(&self) -> bool {
        self.descriptor.concurrent
    }

    pub const fn fallback(&self) -> Fallback {
        self.operation.fallback()
    }

    pub const fn returns(&self) -> ReturnKind {
        self.operation.returns()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span().type_name();
        if self.operation.is_unsafe() {
            f.write_str("unsafe ")?;
        }
        write!(f, "fn {}(&self", self.operation.name())?;
        for (name, kind) in self.operation.params() {
            let ty = match kind {
                ParamKind::Usize => "usize",
                ParamKind::Tag => "Option<TypeTag>",
                ParamKind::Span => span,
                ParamKind::SpanMut => match self.span() {
                    SpanKind::Exclusive => "&mut ByteSpan",
                    SpanKind::Shared => "&mut SharedSpan",
                },
                ParamKind::Address => "*const u8",
            };
            write!(f, ", {name}: {ty}")?;
        }
        let ret = match self.returns() {
            ReturnKind::Span => span,
            ReturnKind::Bool => "bool",
            ReturnKind::Usize => "usize",
            ReturnKind::Ternary => "Ternary",
        };
        write!(f, ") -> {ret}")?;
        match (self.is_untracked(), self.is_concurrent()) {
            (false, false) => Ok(()),
            (true, false) => f.write_str(" [untracked]"),
            (false, true) => f.write_str(" [Send + Sync]"),
            (true, true) => f.write_str(" [untracked, Send + Sync]"),
        }
    }
}
