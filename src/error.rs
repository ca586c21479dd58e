use thiserror::Error;

/// Errors returned by fallible [`RingBuffer`](crate::RingBuffer) operations.
///
/// A failed operation never mutates the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Removal was attempted on an empty buffer.
    #[error("ring buffer is empty")]
    Underflow,
    /// A buffer cannot have zero slots.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,
    /// A cursor points outside the logical window.
    #[error("cursor offset {offset} is out of range for length {len}")]
    OutOfRange { offset: usize, len: usize },
}
