use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for graph nodes.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index.wrapping_add(1)).expect("index+1 is nonzero"))
    }

    /// Create an Id from a `usize` position, failing when it does not fit.
    pub fn from_usize(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .filter(|&i| i < u32::MAX)
            .map(Self::from_index)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Grid and mesh nodes share one id space; the arena keeps them disjoint.
pub type NodeId = Id;
