//! Runtime capability sets.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Guarantees an allocator interface may require.
    ///
    /// Purely descriptive: a set has no lifecycle and no behaviour of its own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u8 {
        /// Operations never rely on a runtime failure-tracking facility
        /// (unwinding, a collector, a panic hook). Failures are reported
        /// through return values only.
        const NO_FAILURE_TRACKING = 1 << 0;
        /// Spans are usable concurrently as shared memory.
        const SHARED_MEMORY = 1 << 1;
        /// The allocator object may be called from several threads at once
        /// without external locking.
        const SHARED_INSTANCE = 1 << 2;
    }
}

impl CapabilitySet {
    /// Every set the vocabulary can express, in bit order.
    pub const VARIANTS: [CapabilitySet; 8] = [
        CapabilitySet::from_bits_retain(0b000),
        CapabilitySet::from_bits_retain(0b001),
        CapabilitySet::from_bits_retain(0b010),
        CapabilitySet::from_bits_retain(0b011),
        CapabilitySet::from_bits_retain(0b100),
        CapabilitySet::from_bits_retain(0b101),
        CapabilitySet::from_bits_retain(0b110),
        CapabilitySet::from_bits_retain(0b111),
    ];

    /// Builds a set from one boolean per flag.
    pub const fn from_flags(no_failure_tracking: bool, shared_memory: bool, shared_instance: bool) -> Self {
        let mut bits = 0;
        if no_failure_tracking {
            bits |= Self::NO_FAILURE_TRACKING.bits();
        }
        if shared_memory {
            bits |= Self::SHARED_MEMORY.bits();
        }
        if shared_instance {
            bits |= Self::SHARED_INSTANCE.bits();
        }
        Self::from_bits_retain(bits)
    }

    /// True when every flag of `subset` is also set in `self`.
    pub const fn all_set(self, subset: CapabilitySet) -> bool {
        self.contains(subset)
    }

    pub const fn no_failure_tracking(self) -> bool {
        self.contains(Self::NO_FAILURE_TRACKING)
    }

    pub const fn shared_memory(self) -> bool {
        self.contains(Self::SHARED_MEMORY)
    }

    pub const fn shared_instance(self) -> bool {
        self.contains(Self::SHARED_INSTANCE)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::NO_FAILURE_TRACKING, "NoFailureTracking"),
            (Self::SHARED_MEMORY, "SharedMemory"),
            (Self::SHARED_INSTANCE, "SharedInstance"),
        ];
        f.write_str("{")?;
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str("}")
    }
}
