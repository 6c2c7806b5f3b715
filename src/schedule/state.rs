//! Cache state: which positions along the chain are resident.
//!
//! A [`CacheState`] is a fixed-width bit set. Bit `i` set means position `i`
//! is cached. Position 0 is the value about to be consumed by the sweep;
//! bits above the highest set bit are positions that do not exist.
//!
//! The textual notation prints position 0 first, `'x'` for resident and
//! `' '` for forgotten:
//!
//! ```text
//! "x x x x"  ==  0b1010101
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing the cache-state notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("Unexpected character {found:?} at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("Notation covers {len} positions, at most {max} are supported")]
    TooLong { len: usize, max: usize },
}

/// Set of resident positions along the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheState(u64);

impl CacheState {
    /// Maximum chain length a state can describe.
    pub const WIDTH: u32 = u64::BITS;

    /// The empty state: no positions remain in the chain.
    pub const EMPTY: CacheState = CacheState(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Build a state from resident position indices.
    ///
    /// Returns `None` if any position is outside `0..WIDTH`.
    pub fn from_positions(positions: impl IntoIterator<Item = usize>) -> Option<Self> {
        let mut bits = 0u64;
        for pos in positions {
            if pos >= Self::WIDTH as usize {
                return None;
            }
            bits |= 1 << pos;
        }
        Some(Self(bits))
    }

    /// Every position in `0..span` resident, clamped to [`CacheState::WIDTH`].
    pub fn full(span: u32) -> Self {
        match span {
            0 => Self::EMPTY,
            s if s >= Self::WIDTH => Self(u64::MAX),
            s => Self((1u64 << s) - 1),
        }
    }

    /// Number of resident positions.
    pub fn resident_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Number of missing positions before the first resident one.
    ///
    /// Equal to [`CacheState::WIDTH`] for the empty state.
    pub fn gap_length(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// Mark every position of the leading gap as resident.
    pub fn fill_low_gap(self) -> Self {
        match self.gap_length() {
            0 => self,
            g if g >= Self::WIDTH => Self(u64::MAX),
            g => Self(self.0 | ((1u64 << g) - 1)),
        }
    }

    /// Discard position 0 and renumber the rest down by one.
    pub fn drop_lowest(self) -> Self {
        Self(self.0 >> 1)
    }

    /// Inverse of [`drop_lowest`](Self::drop_lowest): shift up and set position 0.
    ///
    /// The highest position is lost if it was set.
    pub fn push_resident(self) -> Self {
        Self((self.0 << 1) | 1)
    }

    /// True when no further positions remain.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_resident(self, pos: u32) -> bool {
        pos < Self::WIDTH && (self.0 >> pos) & 1 == 1
    }

    /// Clear a single position.
    pub fn evict(self, pos: u32) -> Self {
        if pos >= Self::WIDTH {
            return self;
        }
        Self(self.0 & !(1u64 << pos))
    }

    /// Number of positions up to and including the highest resident one.
    pub fn span(self) -> u32 {
        Self::WIDTH - self.0.leading_zeros()
    }

    /// Resident positions, lowest first.
    pub fn positions(self) -> impl Iterator<Item = u32> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let pos = rest.trailing_zeros();
            rest &= rest - 1;
            Some(pos)
        })
    }
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.span() {
            let c = if self.is_resident(pos) { 'x' } else { ' ' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for CacheState {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len > Self::WIDTH as usize {
            return Err(NotationError::TooLong {
                len,
                max: Self::WIDTH as usize,
            });
        }

        let mut bits = 0u64;
        for (position, c) in s.chars().enumerate() {
            match c {
                'x' | 'X' => bits |= 1 << position,
                ' ' | '.' | '-' => {}
                found => return Err(NotationError::UnexpectedChar { position, found }),
            }
        }
        Ok(Self(bits))
    }
}

impl From<u64> for CacheState {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<CacheState> for u64 {
    fn from(state: CacheState) -> Self {
        state.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_length() {
        assert_eq!(CacheState::from_bits(0b100).gap_length(), 2);
        assert_eq!(CacheState::from_bits(0b1).gap_length(), 0);
        assert_eq!(CacheState::EMPTY.gap_length(), CacheState::WIDTH);
    }

    #[test]
    fn test_fill_low_gap() {
        let state = CacheState::from_bits(0b1010000);
        assert_eq!(state.fill_low_gap().bits(), 0b1011111);

        let resident = CacheState::from_bits(0b101);
        assert_eq!(resident.fill_low_gap(), resident);
    }

    #[test]
    fn test_drop_and_push() {
        let state = CacheState::from_bits(0b1011);
        assert_eq!(state.drop_lowest().bits(), 0b101);
        assert_eq!(state.drop_lowest().push_resident().bits(), 0b1011);
        assert!(CacheState::from_bits(1).drop_lowest().is_empty());
    }

    #[test]
    fn test_positions_and_span() {
        let state = CacheState::from_bits(0b1010101);
        assert_eq!(state.positions().collect::<Vec<_>>(), vec![0, 2, 4, 6]);
        assert_eq!(state.resident_count(), 4);
        assert_eq!(state.span(), 7);
        assert_eq!(CacheState::EMPTY.span(), 0);
    }

    #[test]
    fn test_notation() {
        let state: CacheState = "x x x x".parse().unwrap();
        assert_eq!(state.bits(), 85);
        assert_eq!(state.to_string(), "x x x x");

        // Trailing gaps are not printed.
        let trailing: CacheState = "xx  ".parse().unwrap();
        assert_eq!(trailing.to_string(), "xx");
        assert_eq!("x.-x".parse::<CacheState>().unwrap().bits(), 0b1001);
    }

    #[test]
    fn test_notation_errors() {
        assert_eq!(
            "x?x".parse::<CacheState>(),
            Err(NotationError::UnexpectedChar { position: 1, found: '?' })
        );

        let long = "x".repeat(65);
        assert!(matches!(
            long.parse::<CacheState>(),
            Err(NotationError::TooLong { len: 65, max: 64 })
        ));

        // Forgotten positions past the width count too.
        let padded = format!("x{}", " ".repeat(80));
        assert_eq!(
            padded.parse::<CacheState>(),
            Err(NotationError::TooLong { len: 81, max: 64 })
        );
        assert!(format!("x{}", ".".repeat(63)).parse::<CacheState>().is_ok());
    }

    #[test]
    fn test_full() {
        assert_eq!(CacheState::full(0), CacheState::EMPTY);
        assert_eq!(CacheState::full(4).bits(), 0b1111);
        assert_eq!(CacheState::full(64).bits(), u64::MAX);
        assert_eq!(CacheState::full(99).bits(), u64::MAX);
    }

    #[test]
    fn test_from_positions() {
        let state = CacheState::from_positions([0, 3]).unwrap();
        assert_eq!(state.bits(), 0b1001);
        assert!(CacheState::from_positions([64]).is_none());
    }
}
