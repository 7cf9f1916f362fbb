//! Plugin instance and delivery bookkeeping identifiers
//!
//! All identifiers are small Copy newtypes designed for O(1) array indexing.
//! `TaskId` and `AttemptId` are bounded to 14 bits because they travel packed
//! inside the low half of a manager-channel task word.

use std::fmt;

/// Identifier of a registered input instance
///
/// Assigned sequentially at registration; used as a dense array index by the
/// router and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u16);

impl InputId {
    /// Create a new input ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the numeric index of this input
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Get the index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input:{}", self.0)
    }
}

impl From<u16> for InputId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

/// Identifier of a registered output destination
///
/// Assigned sequentially during routing table compilation. `Copy`, 2 bytes,
/// fits in a register; the hot routing path only ever moves these around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(u16);

impl OutputId {
    /// Maximum number of outputs supported
    pub const MAX: u16 = u16::MAX;

    /// Create a new output ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the numeric index of this output
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Get the index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output:{}", self.0)
    }
}

impl From<u16> for OutputId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

/// Identifier of one in-flight delivery task
///
/// Bounded to 14 bits: the task word packs it at bits 14..28 of the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u16);

impl TaskId {
    /// Highest representable task ID (14 bits)
    pub const MAX: u16 = (1 << 14) - 1;

    /// Create a new task ID
    ///
    /// Values above `MAX` are masked to 14 bits; the task table never
    /// allocates outside that range.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id & Self::MAX)
    }

    /// Get the numeric value of this task ID
    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:{}", self.0)
    }
}

/// Identifier of one delivery attempt within a task
///
/// Unique per task, not globally. Bounded to 14 bits: the task word packs it
/// at bits 0..14 of the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u16);

impl AttemptId {
    /// Highest representable attempt ID (14 bits)
    pub const MAX: u16 = (1 << 14) - 1;

    /// Create a new attempt ID
    ///
    /// Values above `MAX` are masked to 14 bits.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id & Self::MAX)
    }

    /// Get the numeric value of this attempt ID
    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt:{}", self.0)
    }
}
