use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut, Range};
use std::slice;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::RingError;

/// A fixed-capacity double-ended ring buffer.
///
/// Pushing onto a full buffer never fails: the element at the opposite end is
/// dropped and handed back to the caller. Logical element `i` lives in
/// physical slot `(head + i) % capacity`, and `tail == (head + len) % capacity`
/// holds after every operation (so a full buffer has `head == tail`).
/// Slots outside the logical window are vacant.
#[derive(Clone)]
pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer with `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`RingBuffer::try_new`] to get an
    /// error instead.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            slots: Self::allocate(capacity),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    fn allocate(capacity: usize) -> Box<[Option<T>]> {
        (0..capacity).map(|_| None).collect()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Physical slot of the front element.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Physical slot the next `push_back` writes to.
    pub fn tail(&self) -> usize {
        self.tail
    }

    fn slot(&self, index: usize) -> usize {
        (self.head + index) % self.capacity()
    }

    fn forward(&self, slot: usize) -> usize {
        (slot + 1) % self.capacity()
    }

    fn backward(&self, slot: usize) -> usize {
        (slot + self.capacity() - 1) % self.capacity()
    }

    fn take_live(&mut self, slot: usize) -> T {
        match self.slots[slot].take() {
            Some(value) => value,
            None => unreachable!("live slot {slot} is vacant"),
        }
    }

    /// Append at the back. On a full buffer the front element is dropped and
    /// returned.
    pub fn push_back(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() {
            let old = self.take_live(self.head);
            self.head = self.forward(self.head);
            debug!(capacity = self.capacity(), "push_back overwrote the front element");
            Some(old)
        } else {
            self.len += 1;
            None
        };
        self.slots[self.tail] = Some(value);
        self.tail = self.forward(self.tail);
        evicted
    }

    /// Prepend at the front. On a full buffer the back element is dropped and
    /// returned.
    pub fn push_front(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.tail = self.backward(self.tail);
            let old = self.take_live(self.tail);
            debug!(capacity = self.capacity(), "push_front overwrote the back element");
            Some(old)
        } else {
            self.len += 1;
            None
        };
        self.head = self.backward(self.head);
        self.slots[self.head] = Some(value);
        evicted
    }

    pub fn pop_back(&mut self) -> Result<T, RingError> {
        if self.is_empty() {
            return Err(RingError::Underflow);
        }
        self.tail = self.backward(self.tail);
        self.len -= 1;
        Ok(self.take_live(self.tail))
    }

    pub fn pop_front(&mut self) -> Result<T, RingError> {
        if self.is_empty() {
            return Err(RingError::Underflow);
        }
        let value = self.take_live(self.head);
        self.head = self.forward(self.head);
        self.len -= 1;
        Ok(value)
    }

    /// Element at logical index `index`, counted from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.slot(index)].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.slot(index);
        self.slots[slot].as_mut()
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Cursor at the front element.
    pub fn begin(&self) -> Cursor {
        Cursor::new(0)
    }

    /// Cursor one past the back element.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.len)
    }

    /// Dereference a cursor. `None` at or past `end()`.
    pub fn at(&self, cursor: Cursor) -> Option<&T> {
        self.get(cursor.offset())
    }

    pub fn at_mut(&mut self, cursor: Cursor) -> Option<&mut T> {
        self.get_mut(cursor.offset())
    }

    /// Insert `value` in front of the element `at` points to, shifting the
    /// elements behind it one slot toward the back.
    ///
    /// A full buffer makes room by dropping the element at whichever end lies
    /// farther from `at`: the front when `2 * offset >= len`, else the back.
    /// Inserting at `end()` therefore matches [`push_back`](Self::push_back)
    /// and inserting at `begin()` matches [`push_front`](Self::push_front).
    /// Returns the dropped element, if any.
    pub fn insert(&mut self, at: Cursor, value: T) -> Result<Option<T>, RingError> {
        let offset = at.offset();
        if offset > self.len {
            return Err(RingError::OutOfRange { offset, len: self.len });
        }
        if !self.is_full() {
            self.shift_in(offset, value);
            return Ok(None);
        }

        if offset * 2 >= self.len {
            let evicted = self.pop_front()?;
            debug!(offset, "insert into full buffer dropped the front element");
            // Everything before the insertion point moved one step forward.
            self.shift_in(offset - 1, value);
            Ok(Some(evicted))
        } else {
            let evicted = self.pop_back()?;
            debug!(offset, "insert into full buffer dropped the back element");
            self.shift_in(offset, value);
            Ok(Some(evicted))
        }
    }

    // Requires a free slot and `offset <= len`.
    fn shift_in(&mut self, offset: usize, value: T) {
        for index in (offset..self.len).rev() {
            let from = self.slot(index);
            let to = self.slot(index + 1);
            self.slots[to] = self.slots[from].take();
        }
        let slot = self.slot(offset);
        self.slots[slot] = Some(value);
        self.tail = self.forward(self.tail);
        self.len += 1;
        trace!(offset, slot, "inserted element");
    }

    /// Remove and return the element `at` points to, closing the gap by
    /// shifting the elements behind it one slot toward the front.
    pub fn remove(&mut self, at: Cursor) -> Result<T, RingError> {
        if self.is_empty() {
            return Err(RingError::Underflow);
        }
        let offset = at.offset();
        if offset >= self.len {
            return Err(RingError::OutOfRange { offset, len: self.len });
        }

        let slot = self.slot(offset);
        let value = self.take_live(slot);
        for index in offset + 1..self.len {
            let from = self.slot(index);
            let to = self.slot(index - 1);
            self.slots[to] = self.slots[from].take();
        }
        self.len -= 1;
        self.tail = self.backward(self.tail);
        trace!(offset, slot, "removed element");
        Ok(value)
    }

    /// Reallocate the backing storage with `new_capacity` slots.
    ///
    /// The first `min(len, new_capacity)` elements keep their logical order
    /// and start at slot 0. Elements that no longer fit are cut from the back
    /// and returned front to back.
    pub fn change_capacity(&mut self, new_capacity: usize) -> Result<Vec<T>, RingError> {
        if new_capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return Ok(Vec::new());
        }

        let kept = self.len.min(new_capacity);
        let mut slots = Self::allocate(new_capacity);
        let mut dropped = Vec::with_capacity(self.len - kept);
        for index in 0..self.len {
            let value = self.take_live(self.slot(index));
            if index < kept {
                slots[index] = Some(value);
            } else {
                dropped.push(value);
            }
        }

        self.slots = slots;
        self.head = 0;
        self.len = kept;
        self.tail = kept % new_capacity;
        debug!(old_capacity, new_capacity, dropped = dropped.len(), "changed capacity");
        Ok(dropped)
    }

    /// Drop every element and reset both indices to slot 0.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Rotate the storage so the front element sits in slot 0.
    /// Logical order is unchanged.
    pub fn make_contiguous(&mut self) {
        if self.head == 0 {
            return;
        }
        self.slots.rotate_left(self.head);
        self.head = 0;
        self.tail = self.len % self.capacity();
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    /// Sort the live elements in place (stable).
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.make_contiguous();
        self.slots[..self.len].sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => compare(a, b),
            _ => Ordering::Equal,
        });
    }

    // Physical ranges covering the live window, front part first.
    fn live_ranges(&self) -> (Range<usize>, Range<usize>) {
        let capacity = self.capacity();
        if self.head + self.len <= capacity {
            (self.head..self.head + self.len, 0..0)
        } else {
            (self.head..capacity, 0..self.head + self.len - capacity)
        }
    }

    /// Iterate from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.live_ranges();
        Iter {
            inner: self.slots[front].iter().chain(self.slots[back].iter()),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.live_ranges();
        let remaining = self.len;
        let (wrapped, rest) = self.slots.split_at_mut(front.start);
        IterMut {
            inner: rest[..front.len()].iter_mut().chain(wrapped[back].iter_mut()),
            remaining,
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len;
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for ring buffer of length {len}"),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for ring buffer of length {len}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("items", &self.iter().collect::<Vec<_>>())
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

/// Pushes each item at the back. Overwrites the oldest items if full.
impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

type SlotChain<I> = std::iter::Chain<I, I>;

/// Front-to-back iterator over a [`RingBuffer`].
pub struct Iter<'a, T> {
    inner: SlotChain<slice::Iter<'a, Option<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.inner.next()?.as_ref();
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back()?.as_ref();
        self.remaining -= 1;
        item
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

pub struct IterMut<'a, T> {
    inner: SlotChain<slice::IterMut<'a, Option<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let item = self.inner.next()?.as_mut();
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back()?.as_mut();
        self.remaining -= 1;
        item
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Op {
        PushBack(i32),
        PushFront(i32),
        PopBack,
        PopFront,
        Insert(usize, i32),
        Remove(usize),
        Resize(usize),
        Sort,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<i32>().prop_map(Op::PushBack),
            any::<i32>().prop_map(Op::PushFront),
            Just(Op::PopBack),
            Just(Op::PopFront),
            (0usize..10, any::<i32>()).prop_map(|(at, v)| Op::Insert(at, v)),
            (0usize..10).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Resize),
            Just(Op::Sort),
        ]
    }

    /// Apply `op` to both the ring and a `VecDeque` model of the same policy.
    fn apply(rb: &mut RingBuffer<i32>, model: &mut VecDeque<i32>, capacity: &mut usize, op: Op) {
        match op {
            Op::PushBack(v) => {
                let expected = if model.len() == *capacity { model.pop_front() } else { None };
                model.push_back(v);
                assert_eq!(rb.push_back(v), expected);
            }
            Op::PushFront(v) => {
                let expected = if model.len() == *capacity { model.pop_back() } else { None };
                model.push_front(v);
                assert_eq!(rb.push_front(v), expected);
            }
            Op::PopBack => assert_eq!(rb.pop_back().ok(), model.pop_back()),
            Op::PopFront => assert_eq!(rb.pop_front().ok(), model.pop_front()),
            Op::Insert(at, v) => {
                let len = model.len();
                let result = rb.insert(rb.begin() + at, v);
                if at > len {
                    assert_eq!(result, Err(RingError::OutOfRange { offset: at, len }));
                } else if len < *capacity {
                    model.insert(at, v);
                    assert_eq!(result, Ok(None));
                } else if at * 2 >= len {
                    let evicted = model.pop_front();
                    model.insert(at - 1, v);
                    assert_eq!(result, Ok(evicted));
                } else {
                    let evicted = model.pop_back();
                    model.insert(at, v);
                    assert_eq!(result, Ok(evicted));
                }
            }
            Op::Remove(at) => {
                let result = rb.remove(rb.begin() + at);
                if model.is_empty() {
                    assert_eq!(result, Err(RingError::Underflow));
                } else if at >= model.len() {
                    assert_eq!(result, Err(RingError::OutOfRange { offset: at, len: model.len() }));
                } else {
                    assert_eq!(result.ok(), model.remove(at));
                }
            }
            Op::Resize(n) => {
                let result = rb.change_capacity(n);
                if n == 0 {
                    assert_eq!(result, Err(RingError::ZeroCapacity));
                } else if n == *capacity {
                    assert_eq!(result, Ok(vec![]));
                } else {
                    let dropped: Vec<_> = model.split_off(model.len().min(n)).into();
                    assert_eq!(result, Ok(dropped));
                    *capacity = n;
                }
            }
            Op::Sort => {
                model.make_contiguous().sort();
                rb.sort();
            }
        }
    }

    fn check_invariants(rb: &RingBuffer<i32>, model: &VecDeque<i32>, capacity: usize) {
        assert_eq!(rb.capacity(), capacity);
        assert!(rb.len() <= rb.capacity());
        assert!(rb.head() < rb.capacity());
        assert_eq!(rb.tail(), (rb.head() + rb.len()) % rb.capacity());
        assert!(rb.iter().eq(model.iter()));
        assert!(rb.iter().rev().eq(model.iter().rev()));
        assert_eq!(rb.end().offset(), model.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_matches_model(capacity in 1usize..6, ops in prop::collection::vec(op(), 0..64)) {
            let mut rb = RingBuffer::new(capacity);
            let mut model = VecDeque::new();
            let mut capacity = capacity;
            for op in ops {
                apply(&mut rb, &mut model, &mut capacity, op);
                check_invariants(&rb, &model, capacity);
            }
        }

        #[test]
        fn prop_push_pop_back_is_noop(values in prop::collection::vec(any::<i32>(), 1..6), extra in any::<i32>()) {
            let mut rb = RingBuffer::new(values.len() + 1);
            rb.extend(values.iter().copied());
            rb.push_back(extra);
            prop_assert_eq!(rb.pop_back(), Ok(extra));
            prop_assert_eq!(rb.to_vec(), values.clone());

            rb.push_front(extra);
            prop_assert_eq!(rb.pop_front(), Ok(extra));
            prop_assert_eq!(rb.to_vec(), values);
        }

        #[test]
        fn prop_round_trip_in_push_order(capacity in 1usize..16, fill in 0usize..16) {
            let n = fill.min(capacity);
            let mut rb = RingBuffer::new(capacity);
            rb.extend(0..n as i32);
            for i in 0..n {
                prop_assert_eq!(rb[i], i as i32);
            }
        }

        #[test]
        fn prop_overwrite_drops_opposite_end(capacity in 1usize..8, v in any::<i32>(), at_back in any::<bool>()) {
            let mut rb = RingBuffer::new(capacity);
            rb.extend(0..capacity as i32);
            if at_back {
                prop_assert_eq!(rb.push_back(v), Some(0));
                prop_assert_eq!(rb.back(), Some(&v));
            } else {
                prop_assert_eq!(rb.push_front(v), Some(capacity as i32 - 1));
                prop_assert_eq!(rb.front(), Some(&v));
            }
            prop_assert!(rb.is_full());
        }
    }
}
