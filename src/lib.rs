//! A fixed-capacity, overwrite-on-full double-ended ring buffer with
//! cursor-based insertion and removal and in-place capacity changes.

pub mod cursor;
pub mod error;
pub mod ringbuf;

pub use cursor::Cursor;
pub use error::RingError;
pub use ringbuf::{Iter, IterMut, RingBuffer};
