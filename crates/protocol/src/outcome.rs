//! Delivery attempt outcome
//!
//! The terminal status an output plugin reports for one flush of one chunk.
//! The numeric values are part of the manager-channel wire format (2 bits in
//! the task word) and must not change.

use std::fmt;

/// Terminal status of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushOutcome {
    /// Delivery failed permanently; the data for this destination is dropped
    Error,
    /// Delivery succeeded
    Ok,
    /// Delivery failed transiently; eligible for a scheduled retry
    Retry,
}

impl FlushOutcome {
    /// Encode to the 2-bit wire representation
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        match self {
            Self::Error => 0,
            Self::Ok => 1,
            Self::Retry => 2,
        }
    }

    /// Decode from the 2-bit wire representation
    ///
    /// Returns `None` for values outside the defined range.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::Error),
            1 => Some(Self::Ok),
            2 => Some(Self::Retry),
            _ => None,
        }
    }

    /// Check if this outcome is a success
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FlushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Ok => "ok",
            Self::Retry => "retry",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip() {
        for outcome in [FlushOutcome::Error, FlushOutcome::Ok, FlushOutcome::Retry] {
            assert_eq!(FlushOutcome::from_bits(outcome.to_bits()), Some(outcome));
        }
    }

    #[test]
    fn test_invalid_bits() {
        assert_eq!(FlushOutcome::from_bits(3), None);
        assert_eq!(FlushOutcome::from_bits(u32::MAX), None);
    }

    #[test]
    fn test_wire_values_are_stable() {
        // Wire contract: these values are packed into task words
        assert_eq!(FlushOutcome::Error.to_bits(), 0);
        assert_eq!(FlushOutcome::Ok.to_bits(), 1);
        assert_eq!(FlushOutcome::Retry.to_bits(), 2);
    }
}
