//! Untyped growable byte buffer
//!
//! `ByteBuffer` stores fixed-width records as raw bytes. The element width is
//! chosen at construction and never changes; all sizes are tracked in bytes.
//!
//! # Layout
//!
//! The struct is `#[repr(C)]` and starts with `byteCapacity`, `byteSize`,
//! `ptr`, `elementSize` so C code holding a `Vector*` can read the fields
//! directly. Trailing fields are private to Rust.
//!
//! ```text
//!  ptr
//!   │
//!   ▼
//!   ┌────────┬────────┬────────┬────────────────────────┐
//!   │ elem 0 │ elem 1 │ elem 2 │   spare capacity ...   │
//!   └────────┴────────┴────────┴────────────────────────┘
//!   ◄───────── byte_size ─────►
//!   ◄──────────────────── byte_capacity ────────────────►
//! ```
//!
//! # Growth
//!
//! - `push_back` doubles the capacity (an empty allocation grows to one element).
//! - `push_front` doubles too, but adds at most `front_max_growth` elements at a
//!   time, since every front insertion already pays an O(n) shift.
//! - `resize` and `reserve` reallocate to exactly the requested size.
//!
//! # Access
//!
//! Safe accessors (`get`, `erase`, `erase_range`) are bounds checked.
//! `element_ptr`, `get_unchecked` and `erase_unchecked` are the unchecked fast
//! path used by the C facade; their contract is only asserted in debug builds
//! or with the `checked-access` feature.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr;
use std::slice;

use crate::constants::{BUFFER_ALIGN, VECTOR_FRONT_MAX_GROWTH, VECTOR_MIN_ELEMENTS};
use crate::error::{BufferError, BufferResult};

macro_rules! contract_assert {
    ($cond:expr, $($arg:tt)*) => {
        if cfg!(any(debug_assertions, feature = "checked-access")) {
            assert!($cond, $($arg)*);
        }
    };
}

// ============================================================================
// Growth policy
// ============================================================================

/// Capacity growth factors for insertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    min_elements: usize,
    front_max_growth: usize,
}

impl GrowthPolicy {
    /// Create a policy; both values are clamped to at least one element
    pub const fn new(min_elements: usize, front_max_growth: usize) -> Self {
        Self {
            min_elements: if min_elements == 0 { 1 } else { min_elements },
            front_max_growth: if front_max_growth == 0 { 1 } else { front_max_growth },
        }
    }

    /// Elements allocated by `ByteBuffer::new`
    #[inline]
    pub fn min_elements(&self) -> usize {
        self.min_elements
    }

    /// Largest capacity increment, in elements, for `push_front`
    #[inline]
    pub fn front_max_growth(&self) -> usize {
        self.front_max_growth
    }

    /// Byte capacity after a back insertion found the buffer full
    fn grow_back(&self, byte_capacity: usize, element_size: usize) -> Option<usize> {
        if byte_capacity == 0 {
            Some(element_size)
        } else {
            byte_capacity.checked_mul(2)
        }
    }

    /// Byte capacity after a front insertion found the buffer full
    fn grow_front(&self, byte_capacity: usize, element_size: usize) -> Option<usize> {
        if byte_capacity == 0 {
            return Some(element_size);
        }
        let max_step = self.front_max_growth.checked_mul(element_size)?;
        match byte_capacity.checked_mul(2) {
            Some(doubled) if doubled - byte_capacity <= max_step => Some(doubled),
            _ => byte_capacity.checked_add(max_step),
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(VECTOR_MIN_ELEMENTS, VECTOR_FRONT_MAX_GROWTH)
    }
}

// ============================================================================
// Raw storage helpers
// ============================================================================

fn layout_for(bytes: usize) -> BufferResult<Layout> {
    Layout::from_size_align(bytes, BUFFER_ALIGN).map_err(|_| BufferError::CapacityOverflow)
}

/// Allocate `bytes` zeroed bytes; zero bytes yields a null pointer
fn allocate_zeroed(bytes: usize) -> BufferResult<*mut u8> {
    if bytes == 0 {
        return Ok(ptr::null_mut());
    }
    let layout = layout_for(bytes)?;
    // Safety: layout has non-zero size
    let p = unsafe { alloc::alloc_zeroed(layout) };
    if p.is_null() {
        Err(BufferError::AllocationFailed { bytes })
    } else {
        Ok(p)
    }
}

/// Free storage obtained from `allocate_zeroed`
///
/// # Safety
///
/// `p` must come from `allocate_zeroed(bytes)` and not be freed yet.
unsafe fn release(p: *mut u8, bytes: usize) {
    if !p.is_null() && bytes != 0 {
        // Layout was validated when the storage was allocated
        alloc::dealloc(p, Layout::from_size_align_unchecked(bytes, BUFFER_ALIGN));
    }
}

// ============================================================================
// ByteBuffer
// ============================================================================

/// Growable array of fixed-width raw records
#[repr(C)]
pub struct ByteBuffer {
    byte_capacity: usize,
    byte_size: usize,
    ptr: *mut u8,
    element_size: usize,
    policy: GrowthPolicy,
}

// Safety: ByteBuffer exclusively owns its storage; shared access is read-only
unsafe impl Send for ByteBuffer {}
unsafe impl Sync for ByteBuffer {}

impl ByteBuffer {
    /// Buffer with no storage
    pub const fn empty(element_size: usize, policy: GrowthPolicy) -> Self {
        Self {
            byte_capacity: 0,
            byte_size: 0,
            ptr: ptr::null_mut(),
            element_size,
            policy,
        }
    }

    /// Create a buffer with room for the default minimum number of elements
    ///
    /// If allocation fails the buffer has zero capacity.
    pub fn new(element_size: usize) -> Self {
        Self::with_policy(element_size, GrowthPolicy::default())
    }

    /// Like `new`, with explicit growth factors
    pub fn with_policy(element_size: usize, policy: GrowthPolicy) -> Self {
        Self::try_with_policy(element_size, policy).unwrap_or_else(|e| {
            crate::bg_debug!("ByteBuffer::new({}) left empty: {}", element_size, e);
            Self::empty(element_size, policy)
        })
    }

    /// Checked `new`
    pub fn try_new(element_size: usize) -> BufferResult<Self> {
        Self::try_with_policy(element_size, GrowthPolicy::default())
    }

    /// Checked `with_policy`
    pub fn try_with_policy(element_size: usize, policy: GrowthPolicy) -> BufferResult<Self> {
        let mut buf = Self::try_with_capacity(element_size, policy.min_elements)?;
        buf.policy = policy;
        Ok(buf)
    }

    /// Create a buffer with exactly `elements` zeroed elements of capacity and no
    /// elements in use
    ///
    /// If allocation fails the buffer has zero capacity.
    pub fn with_capacity(element_size: usize, elements: usize) -> Self {
        Self::try_with_capacity(element_size, elements).unwrap_or_else(|e| {
            crate::bg_debug!("ByteBuffer::with_capacity({}, {}) left empty: {}", element_size, elements, e);
            Self::empty(element_size, GrowthPolicy::default())
        })
    }

    /// Checked `with_capacity`
    pub fn try_with_capacity(element_size: usize, elements: usize) -> BufferResult<Self> {
        if element_size == 0 {
            return Err(BufferError::ZeroElementSize);
        }
        let mut buf = Self::empty(element_size, GrowthPolicy::default());
        let bytes = buf.bytes_for(elements)?;
        buf.ptr = allocate_zeroed(bytes)?;
        buf.byte_capacity = bytes;
        Ok(buf)
    }

    /// Create a buffer holding a copy of `data`; size and capacity both equal
    /// `data.len()`
    ///
    /// If `data` is not a whole number of elements or allocation fails, the
    /// buffer has zero capacity.
    pub fn from_bytes(element_size: usize, data: &[u8]) -> Self {
        Self::try_from_bytes(element_size, data).unwrap_or_else(|e| {
            crate::bg_debug!("ByteBuffer::from_bytes({}, {} bytes) left empty: {}", element_size, data.len(), e);
            Self::empty(element_size, GrowthPolicy::default())
        })
    }

    /// Checked `from_bytes`
    pub fn try_from_bytes(element_size: usize, data: &[u8]) -> BufferResult<Self> {
        if element_size == 0 {
            return Err(BufferError::ZeroElementSize);
        }
        if data.len() % element_size != 0 {
            return Err(BufferError::ElementSizeMismatch {
                expected: element_size,
                found: data.len(),
            });
        }
        // Safety: data is a valid slice of exactly len/element_size elements
        unsafe { Self::try_from_raw(element_size, data.len() / element_size, data.as_ptr()) }
    }

    /// Create a buffer from `elements * element_size` bytes at `data`
    ///
    /// # Safety
    ///
    /// `data` must be readable for `elements * element_size` bytes (it may be
    /// null when that product is zero).
    pub unsafe fn try_from_raw(element_size: usize, elements: usize, data: *const u8) -> BufferResult<Self> {
        if element_size == 0 {
            return Err(BufferError::ZeroElementSize);
        }
        let mut buf = Self::empty(element_size, GrowthPolicy::default());
        let bytes = buf.bytes_for(elements)?;
        buf.ptr = allocate_zeroed(bytes)?;
        if bytes > 0 {
            ptr::copy_nonoverlapping(data, buf.ptr, bytes);
        }
        buf.byte_capacity = bytes;
        buf.byte_size = bytes;
        Ok(buf)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    #[inline]
    pub fn byte_capacity(&self) -> usize {
        self.byte_capacity
    }

    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Replace the growth factors used by later insertions
    pub fn set_policy(&mut self, policy: GrowthPolicy) {
        self.policy = policy;
    }

    /// Number of elements in use
    #[inline]
    pub fn len(&self) -> usize {
        if self.element_size == 0 {
            0
        } else {
            self.byte_size / self.element_size
        }
    }

    /// Number of elements that fit without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        if self.element_size == 0 {
            0
        } else {
            self.byte_capacity / self.element_size
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.byte_size < self.element_size || self.element_size == 0
    }

    /// Base address of the storage, null when capacity is zero
    #[inline]
    pub fn data(&self) -> *mut u8 {
        self.ptr
    }

    /// Bytes currently in use
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            &[]
        } else {
            // Safety: storage is initialized (zeroed at allocation) up to capacity
            unsafe { slice::from_raw_parts(self.ptr, self.byte_size) }
        }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        if self.ptr.is_null() {
            &mut []
        } else {
            // Safety: as above, and &mut self guarantees exclusivity
            unsafe { slice::from_raw_parts_mut(self.ptr, self.byte_size) }
        }
    }

    /// Iterate over the elements as byte slices
    pub fn iter(&self) -> slice::ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.element_size.max(1))
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    /// Address of element `index`, without any bounds check
    ///
    /// Computing the address is always safe; dereferencing it is only valid
    /// for `index < self.capacity()`.
    #[inline]
    pub fn element_ptr(&self, index: usize) -> *mut u8 {
        self.ptr.wrapping_add(index.wrapping_mul(self.element_size))
    }

    /// Element `index`, or `None` past the logical size
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index < self.len() {
            // Safety: index checked against len
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index < self.len() {
            let es = self.element_size;
            // Safety: index checked against len
            Some(unsafe { slice::from_raw_parts_mut(self.element_ptr(index), es) })
        } else {
            None
        }
    }

    /// Element `index` without a bounds check
    ///
    /// # Safety
    ///
    /// `index` must be below `self.capacity()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &[u8] {
        contract_assert!(index < self.capacity(), "index {} past capacity {}", index, self.capacity());
        slice::from_raw_parts(self.element_ptr(index), self.element_size)
    }

    // ------------------------------------------------------------------------
    // Resize / reserve
    // ------------------------------------------------------------------------

    fn bytes_for(&self, elements: usize) -> BufferResult<usize> {
        elements
            .checked_mul(self.element_size)
            .ok_or(BufferError::CapacityOverflow)
    }

    /// Move the first `keep` bytes into fresh storage of `new_capacity` bytes.
    ///
    /// On error the buffer is left untouched.
    fn reallocate(&mut self, new_capacity: usize, keep: usize) -> BufferResult<()> {
        debug_assert!(keep <= new_capacity && keep <= self.byte_size);

        let new_ptr = allocate_zeroed(new_capacity)?;
        // Safety: keep fits both the old used range and the new allocation,
        // and the old storage is released exactly once
        unsafe {
            if keep > 0 {
                ptr::copy_nonoverlapping(self.ptr, new_ptr, keep);
            }
            release(self.ptr, self.byte_capacity);
        }
        self.ptr = new_ptr;
        self.byte_capacity = new_capacity;
        Ok(())
    }

    /// Set capacity and size to `elements`
    ///
    /// Bytes are preserved up to the smaller of the old and new size. A no-op
    /// when `elements` equals the current element count.
    pub fn resize(&mut self, elements: usize) -> BufferResult<()> {
        if elements == self.len() {
            return Ok(());
        }
        let new_capacity = self.bytes_for(elements)?;
        let keep = self.byte_size.min(new_capacity);
        self.reallocate(new_capacity, keep)?;
        self.byte_size = new_capacity;
        Ok(())
    }

    /// Set capacity to `elements`, clamping the size to the new capacity
    ///
    /// Never raises the size. A no-op when `elements` equals the current
    /// element count (not the capacity).
    pub fn reserve(&mut self, elements: usize) -> BufferResult<()> {
        if elements == self.len() {
            return Ok(());
        }
        let new_capacity = self.bytes_for(elements)?;
        let keep = self.byte_size.min(new_capacity);
        self.reallocate(new_capacity, keep)?;
        self.byte_size = keep;
        Ok(())
    }

    fn grow_for_one(&mut self, front: bool) -> BufferResult<()> {
        let needed = self
            .byte_size
            .checked_add(self.element_size)
            .ok_or(BufferError::CapacityOverflow)?;
        if self.byte_capacity >= needed {
            return Ok(());
        }
        let grown = if front {
            self.policy.grow_front(self.byte_capacity, self.element_size)
        } else {
            self.policy.grow_back(self.byte_capacity, self.element_size)
        }
        .ok_or(BufferError::CapacityOverflow)?;
        self.reallocate(grown.max(needed), self.byte_size)
    }

    /// True if `p` points into this buffer's storage
    fn owns_address(&self, p: *const u8) -> bool {
        let start = self.ptr as usize;
        let addr = p as usize;
        !self.ptr.is_null() && addr >= start && addr < start + self.byte_capacity
    }

    /// Copy one element from `value`, staging it first if it lives in our own
    /// storage (growth or shifting would otherwise clobber it)
    unsafe fn stage(&self, value: *const u8) -> Option<Vec<u8>> {
        if self.owns_address(value) {
            Some(slice::from_raw_parts(value, self.element_size).to_vec())
        } else {
            None
        }
    }

    // ------------------------------------------------------------------------
    // Insertion / removal
    // ------------------------------------------------------------------------

    /// Append one element
    ///
    /// `value` must be exactly one element wide. On allocation failure the
    /// buffer is unchanged.
    pub fn push_back(&mut self, value: &[u8]) -> BufferResult<()> {
        self.check_width(value)?;
        // Safety: value is exactly element_size readable bytes
        unsafe { self.push_back_raw(value.as_ptr()) }
    }

    /// Append one element read from `value`
    ///
    /// # Safety
    ///
    /// `value` must be readable for `element_size` bytes.
    pub unsafe fn push_back_raw(&mut self, value: *const u8) -> BufferResult<()> {
        if self.element_size == 0 {
            return Ok(());
        }
        let staged = self.stage(value);
        let src = staged.as_ref().map_or(value, |s| s.as_ptr());

        self.grow_for_one(false)?;
        ptr::copy(src, self.ptr.add(self.byte_size), self.element_size);
        self.byte_size += self.element_size;
        Ok(())
    }

    /// Insert one element before all others
    ///
    /// O(n): every existing element shifts right by one.
    pub fn push_front(&mut self, value: &[u8]) -> BufferResult<()> {
        self.check_width(value)?;
        // Safety: value is exactly element_size readable bytes
        unsafe { self.push_front_raw(value.as_ptr()) }
    }

    /// Insert one element read from `value` before all others
    ///
    /// # Safety
    ///
    /// `value` must be readable for `element_size` bytes.
    pub unsafe fn push_front_raw(&mut self, value: *const u8) -> BufferResult<()> {
        if self.element_size == 0 {
            return Ok(());
        }
        let staged = self.stage(value);
        let src = staged.as_ref().map_or(value, |s| s.as_ptr());

        self.grow_for_one(true)?;
        ptr::copy(self.ptr, self.ptr.add(self.element_size), self.byte_size);
        ptr::copy(src, self.ptr, self.element_size);
        self.byte_size += self.element_size;
        Ok(())
    }

    /// Append whole elements from `bytes`, growing by doubling until they fit
    pub fn append(&mut self, bytes: &[u8]) -> BufferResult<()> {
        if self.element_size == 0 {
            return Err(BufferError::ZeroElementSize);
        }
        if bytes.len() % self.element_size != 0 {
            return Err(BufferError::ElementSizeMismatch {
                expected: self.element_size,
                found: bytes.len(),
            });
        }
        if bytes.is_empty() {
            return Ok(());
        }

        let needed = self
            .byte_size
            .checked_add(bytes.len())
            .ok_or(BufferError::CapacityOverflow)?;
        if self.byte_capacity < needed {
            let mut grown = self.byte_capacity;
            while grown < needed {
                grown = self
                    .policy
                    .grow_back(grown, self.element_size)
                    .ok_or(BufferError::CapacityOverflow)?;
            }
            self.reallocate(grown, self.byte_size)?;
        }

        // Safety: capacity checked above; bytes cannot alias &mut self
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.add(self.byte_size), bytes.len());
        }
        self.byte_size = needed;
        Ok(())
    }

    /// Drop the last element; returns false if the buffer was empty
    pub fn pop_back(&mut self) -> bool {
        if self.element_size == 0 || self.byte_size < self.element_size {
            return false;
        }
        self.byte_size -= self.element_size;
        true
    }

    /// Drop the first element, shifting the rest left; returns false if the
    /// buffer was empty
    pub fn pop_front(&mut self) -> bool {
        if self.element_size == 0 || self.byte_size < self.element_size {
            return false;
        }
        if self.byte_size == self.element_size {
            self.byte_size = 0;
        } else {
            self.byte_size -= self.element_size;
            // Safety: both ranges lie within the used bytes
            unsafe {
                ptr::copy(self.ptr.add(self.element_size), self.ptr, self.byte_size);
            }
        }
        true
    }

    /// Release all storage; size and capacity become zero
    ///
    /// Capacity is not retained. Call `reserve` afterwards to pre-allocate again.
    pub fn clear(&mut self) {
        // Safety: ptr/byte_capacity describe our own allocation
        unsafe { release(self.ptr, self.byte_capacity) };
        self.ptr = ptr::null_mut();
        self.byte_capacity = 0;
        self.byte_size = 0;
    }

    /// Remove the element at `index`
    pub fn erase(&mut self, index: usize) -> BufferResult<()> {
        self.erase_range(index, 1)
    }

    /// Remove `count` elements starting at `index`
    pub fn erase_range(&mut self, index: usize, count: usize) -> BufferResult<()> {
        let len = self.len();
        let end = index
            .checked_add(count)
            .ok_or(BufferError::OutOfBounds { index, len })?;
        if end > len {
            let index = if index > len { index } else { end - 1 };
            return Err(BufferError::OutOfBounds { index, len });
        }
        // Safety: range checked above
        unsafe { self.erase_unchecked(index, count) };
        Ok(())
    }

    /// Remove `count` elements starting at `index` without a bounds check
    ///
    /// # Safety
    ///
    /// `index + count` must not exceed `self.len()`.
    pub unsafe fn erase_unchecked(&mut self, index: usize, count: usize) {
        contract_assert!(
            index.saturating_add(count) <= self.len(),
            "erase of {} elements at {} past length {}",
            count,
            index,
            self.len()
        );
        if count == 0 || self.element_size == 0 {
            return;
        }
        let start = index * self.element_size;
        let removed = count * self.element_size;
        let tail = self.byte_size - start - removed;
        ptr::copy(self.ptr.add(start + removed), self.ptr.add(start), tail);
        self.byte_size -= removed;
    }

    // ------------------------------------------------------------------------
    // Ownership transfer
    // ------------------------------------------------------------------------

    /// Move the storage out, leaving this buffer empty with the same element
    /// size and policy
    pub fn take(&mut self) -> ByteBuffer {
        let empty = Self::empty(self.element_size, self.policy);
        std::mem::replace(self, empty)
    }

    /// Exchange storage (and element sizes) with `other`
    pub fn swap(&mut self, other: &mut ByteBuffer) {
        std::mem::swap(self, other);
    }

    fn check_width(&self, value: &[u8]) -> BufferResult<()> {
        if value.len() != self.element_size {
            return Err(BufferError::ElementSizeMismatch {
                expected: self.element_size,
                found: value.len(),
            });
        }
        Ok(())
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("element_size", &self.element_size)
            .field("byte_size", &self.byte_size)
            .field("byte_capacity", &self.byte_capacity)
            .field("policy", &self.policy)
            .finish()
    }
}
