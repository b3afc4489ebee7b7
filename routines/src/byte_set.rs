//! A fixed-size membership set over every possible byte value.

use std::fmt::Debug;
use std::ops::RangeInclusive;

/// Represents a set of byte values, used as the match rule of a charset
/// atom. Membership is stored as a 256-bit mask.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    /// Returns an empty set.
    pub const fn new() -> Self {
        Self([0; 4])
    }

    /// Returns a set containing exactly `byte`.
    pub fn single(byte: u8) -> Self {
        let mut set = Self::new();
        set.insert(byte);
        set
    }

    /// Returns a set containing every byte in the inclusive range
    /// `lower..=upper`. The set is empty when `lower > upper`.
    pub fn from_range(lower: u8, upper: u8) -> Self {
        let mut set = Self::new();
        set.fill_range(lower, upper, true);
        set
    }

    #[inline]
    const fn slot(byte: u8) -> (usize, u64) {
        ((byte >> 6) as usize, 1 << (byte & 0x3f))
    }

    pub fn insert(&mut self, byte: u8) {
        let (word, mask) = Self::slot(byte);
        self.0[word] |= mask;
    }

    pub fn remove(&mut self, byte: u8) {
        let (word, mask) = Self::slot(byte);
        self.0[word] &= !mask;
    }

    /// Adds `byte` to the set when `member` is true, otherwise removes it.
    pub fn set(&mut self, byte: u8, member: bool) {
        if member {
            self.insert(byte)
        } else {
            self.remove(byte)
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        let (word, mask) = Self::slot(byte);
        self.0[word] & mask != 0
    }

    /// Sets the membership of every byte in `lower..=upper`.
    pub fn fill_range(&mut self, lower: u8, upper: u8, member: bool) {
        for byte in lower..=upper {
            self.set(byte, member);
        }
    }

    /// Sets the membership of every byte in `bytes`.
    pub fn fill_bytes(&mut self, bytes: &[u8], member: bool) {
        for &byte in bytes {
            self.set(byte, member);
        }
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }

    /// Iterates the members of the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |byte| self.contains(*byte))
    }

    /// Collapses the members of the set into maximal ascending runs.
    ///
    /// # Example
    ///
    /// ```
    /// use regcc_routines::ByteSet;
    ///
    /// let mut set = ByteSet::from_range(b'a', b'c');
    /// set.insert(b'z');
    ///
    /// assert_eq!(vec![b'a'..=b'c', b'z'..=b'z'], set.ranges());
    /// ```
    pub fn ranges(&self) -> Vec<RangeInclusive<u8>> {
        let mut ranges: Vec<RangeInclusive<u8>> = Vec::new();

        for byte in self.iter() {
            match ranges.last_mut() {
                Some(last) if u16::from(*last.end()) + 1 == u16::from(byte) => {
                    *last = *last.start()..=byte
                }
                _ => ranges.push(byte..=byte),
            }
        }

        ranges
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::new();
        for byte in iter {
            set.insert(byte);
        }
        set
    }
}

impl Debug for ByteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (idx, range) in self.ranges().into_iter().enumerate() {
            if idx != 0 {
                write!(f, ", ")?;
            }

            if range.start() == range.end() {
                write!(f, "{:#04x}", range.start())?;
            } else {
                write!(f, "{:#04x}..={:#04x}", range.start(), range.end())?;
            }
        }
        write!(f, "}}")
    }
}
