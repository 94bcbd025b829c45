// This module encapsulates the bitflags API
// so that we don't leak details that may
// affect semver later on.

use bitflags::bitflags;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct NodeBitFlags: u32 {
        const EMPTY = 0;
        const PRESERVE = 1 << 1;
    }
}

/// Per-node flags.
///
/// A preserved node is never removed from the
/// genealogy by [`crate::Genealogy::prune_upward`].
#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodeFlags(NodeBitFlags);

impl NodeFlags {
    pub fn preserve() -> Self {
        Self(NodeBitFlags::PRESERVE)
    }

    pub fn with_preserve(self) -> Self {
        Self(self.0 | NodeBitFlags::PRESERVE)
    }

    pub fn without_preserve(self) -> Self {
        Self(self.0 & !NodeBitFlags::PRESERVE)
    }

    pub fn is_preserved(&self) -> bool {
        self.0.contains(NodeBitFlags::PRESERVE)
    }
}
