use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A position inside a [`RingBuffer`](crate::RingBuffer), counted in logical
/// order from the front.
///
/// `begin()` is offset 0 and `end()` is offset `len()`. Stepping, offsetting
/// and comparing all work on the logical offset, so a cursor stays correct
/// when the live window wraps past the end of the backing storage.
///
/// A cursor does not borrow its buffer. Read through it with
/// [`RingBuffer::at`](crate::RingBuffer::at) and hand it to
/// [`insert`](crate::RingBuffer::insert) / [`remove`](crate::RingBuffer::remove).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub(crate) fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Logical offset from the front of the buffer.
    pub fn offset(self) -> usize {
        self.offset
    }

    /// The next position (pre-increment).
    pub fn next(self) -> Self {
        self + 1
    }

    /// The previous position. Saturates at `begin()`; use
    /// [`checked_prev`](Self::checked_prev) to detect stepping before it.
    pub fn prev(self) -> Self {
        self - 1
    }

    /// The previous position, or `None` when already at `begin()`.
    pub fn checked_prev(self) -> Option<Self> {
        self.checked_sub(1)
    }

    /// Step back `n` positions, or `None` if that would pass `begin()`.
    pub fn checked_sub(self, n: usize) -> Option<Self> {
        self.offset.checked_sub(n).map(Cursor::new)
    }

    /// Signed logical distance `self - other`.
    pub fn distance(self, other: Cursor) -> isize {
        self.offset as isize - other.offset as isize
    }
}

impl Add<usize> for Cursor {
    type Output = Cursor;

    fn add(self, n: usize) -> Cursor {
        Cursor::new(self.offset + n)
    }
}

impl Sub<usize> for Cursor {
    type Output = Cursor;

    fn sub(self, n: usize) -> Cursor {
        Cursor::new(self.offset.saturating_sub(n))
    }
}

impl Sub<Cursor> for Cursor {
    type Output = isize;

    fn sub(self, other: Cursor) -> isize {
        self.distance(other)
    }
}

impl AddAssign<usize> for Cursor {
    fn add_assign(&mut self, n: usize) {
        self.offset += n;
    }
}

impl SubAssign<usize> for Cursor {
    fn sub_assign(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }
}
