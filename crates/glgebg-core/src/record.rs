//! Typed view over `ByteBuffer`
//!
//! `RecordBuffer<T>` stores `Copy` values by value in a `ByteBuffer` whose
//! element size is `size_of::<T>()`. It keeps the byte buffer's growth and
//! resize/reserve semantics; only the byte arithmetic goes away.
//!
//! Values are read and written unaligned, so `T` may have any alignment.
//! Zero-sized records are never stored.

use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr;

use crate::buffer::{ByteBuffer, GrowthPolicy};
use crate::error::BufferResult;

/// Growable array of `Copy` records backed by a `ByteBuffer`
pub struct RecordBuffer<T: Copy> {
    inner: ByteBuffer,
    _marker: PhantomData<T>,
}

impl<T: Copy> RecordBuffer<T> {
    /// Buffer with the default minimum capacity
    pub fn new() -> Self {
        Self::from_inner(ByteBuffer::new(size_of::<T>()))
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::from_inner(ByteBuffer::with_policy(size_of::<T>(), policy))
    }

    /// Buffer with room for exactly `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_inner(ByteBuffer::with_capacity(size_of::<T>(), capacity))
    }

    /// Buffer holding a copy of `values`
    pub fn from_slice(values: &[T]) -> Self {
        let inner = if size_of::<T>() == 0 {
            ByteBuffer::empty(0, GrowthPolicy::default())
        } else {
            // Safety: the slice covers values.len() records of size_of::<T>() bytes
            unsafe { ByteBuffer::try_from_raw(size_of::<T>(), values.len(), values.as_ptr().cast()) }
                .unwrap_or_else(|_| ByteBuffer::empty(size_of::<T>(), GrowthPolicy::default()))
        };
        Self::from_inner(inner)
    }

    fn from_inner(inner: ByteBuffer) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Base address of the records, null when capacity is zero
    #[inline]
    pub fn data(&self) -> *mut T {
        self.inner.data().cast()
    }

    /// Record `index`, or `None` past the end
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len() {
            // Safety: index is in bounds; read_unaligned has no alignment needs
            Some(unsafe { ptr::read_unaligned(self.inner.element_ptr(index) as *const T) })
        } else {
            None
        }
    }

    /// Overwrite record `index`; returns false past the end
    pub fn set(&mut self, index: usize, value: T) -> bool {
        if index < self.len() {
            // Safety: as in `get`
            unsafe { ptr::write_unaligned(self.inner.element_ptr(index) as *mut T, value) };
            true
        } else {
            false
        }
    }

    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn push_back(&mut self, value: T) -> BufferResult<()> {
        // Safety: `value` lives on our stack for the duration of the copy
        unsafe { self.inner.push_back_raw((&value as *const T).cast()) }
    }

    pub fn push_front(&mut self, value: T) -> BufferResult<()> {
        // Safety: as in `push_back`
        unsafe { self.inner.push_front_raw((&value as *const T).cast()) }
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let value = self.last()?;
        self.inner.pop_back();
        Some(value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let value = self.first()?;
        self.inner.pop_front();
        Some(value)
    }

    /// See `ByteBuffer::resize`; new records are zero bytes
    pub fn resize(&mut self, len: usize) -> BufferResult<()> {
        self.inner.resize(len)
    }

    /// See `ByteBuffer::reserve`
    pub fn reserve(&mut self, capacity: usize) -> BufferResult<()> {
        self.inner.reserve(capacity)
    }

    pub fn erase(&mut self, index: usize) -> BufferResult<()> {
        self.inner.erase(index)
    }

    pub fn erase_range(&mut self, index: usize, count: usize) -> BufferResult<()> {
        self.inner.erase_range(index, count)
    }

    /// Release all storage
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Copy> Default for RecordBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + core::fmt::Debug> core::fmt::Debug for RecordBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    #[repr(C, packed)]
    struct Packed {
        tag: u8,
        value: u64,
    }

    #[test]
    fn test_push_and_get() {
        let mut buf = RecordBuffer::<u64>::new();
        for i in 0..10 {
            buf.push_back(i * i).unwrap();
        }
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.get(3), Some(9));
        assert_eq!(buf.get(10), None);
        assert_eq!(buf.last(), Some(81));
    }

    #[test]
    fn test_front_back_order() {
        let mut buf = RecordBuffer::<char>::new();
        buf.push_front('A').unwrap();
        buf.push_front('B').unwrap();
        buf.push_back('C').unwrap();
        assert_eq!(buf.to_vec(), vec!['B', 'A', 'C']);

        assert_eq!(buf.pop_front(), Some('B'));
        assert_eq!(buf.pop_back(), Some('C'));
        assert_eq!(buf.to_vec(), vec!['A']);
    }

    #[test]
    fn test_pop_empty() {
        let mut buf = RecordBuffer::<u32>::new();
        assert_eq!(buf.pop_back(), None);
        assert_eq!(buf.pop_front(), None);
    }

    #[test]
    fn test_unaligned_records() {
        let mut buf = RecordBuffer::<Packed>::new();
        buf.push_back(Packed { tag: 1, value: u64::MAX }).unwrap();
        buf.push_back(Packed { tag: 2, value: 7 }).unwrap();

        let second = buf.get(1).unwrap();
        assert_eq!({ second.tag }, 2);
        assert_eq!({ second.value }, 7);
    }

    #[test]
    fn test_set_and_erase() {
        let mut buf = RecordBuffer::from_slice(&[1i32, 2, 3, 4, 5]);
        assert!(buf.set(0, -1));
        assert!(!buf.set(5, 0));

        buf.erase_range(1, 2).unwrap();
        assert_eq!(buf.to_vec(), vec![-1, 4, 5]);
    }

    #[test]
    fn test_resize_zero_fills() {
        let mut buf = RecordBuffer::from_slice(&[9u16, 9]);
        buf.resize(4).unwrap();
        assert_eq!(buf.to_vec(), vec![9, 9, 0, 0]);

        buf.reserve(1).unwrap();
        assert_eq!(buf.to_vec(), vec![9]);
        assert_eq!(buf.capacity(), 1);
    }

    #[test]
    fn test_zero_sized_records_are_not_stored() {
        let mut buf = RecordBuffer::<()>::new();
        buf.push_back(()).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.pop_back(), None);
    }
}
