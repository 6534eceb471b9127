//! NUL-terminated byte string
//!
//! `BgString` is the string type handed across the C boundary. It is a byte
//! string (no UTF-8 requirement, interior NULs allowed) that always keeps a
//! trailing NUL so `c_str()` can be passed straight to C.
//!
//! Positions are byte offsets. Searches return `None` where the C facade
//! returns `NPOS`. Positions past the end are reported as
//! `StringError::OutOfRange` instead of being clamped.

use std::borrow::Cow;
use std::ffi::{c_char, CStr};
use std::fmt;

use crate::error::StringError;

/// Owned byte string with a maintained NUL terminator
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BgString {
    /// Content followed by exactly one terminating NUL
    bytes: Vec<u8>,
}

impl BgString {
    pub fn new() -> Self {
        Self { bytes: vec![0] }
    }

    pub fn from_bytes(content: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(content.len() + 1);
        bytes.extend_from_slice(content);
        bytes.push(0);
        Self { bytes }
    }

    pub fn from_cstr(content: &CStr) -> Self {
        Self {
            bytes: content.to_bytes_with_nul().to_vec(),
        }
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.bytes[..len]
    }

    /// Pointer to the NUL-terminated content
    #[inline]
    pub fn c_str(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }

    /// Mutable pointer to the content (still NUL-terminated)
    #[inline]
    pub fn data(&mut self) -> *mut c_char {
        self.bytes.as_mut_ptr().cast()
    }

    /// Content up to the first NUL as a `CStr`
    pub fn as_cstr(&self) -> &CStr {
        // A terminating NUL is always present
        CStr::from_bytes_until_nul(&self.bytes).unwrap_or_default()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Largest length this string could ever hold
    pub fn max_size(&self) -> usize {
        isize::MAX as usize - 1
    }

    /// Bytes that fit without reallocating
    pub fn capacity(&self) -> usize {
        self.bytes.capacity() - 1
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    fn check_pos(&self, pos: usize) -> Result<(), StringError> {
        if pos > self.len() {
            Err(StringError::OutOfRange { pos, len: self.len() })
        } else {
            Ok(())
        }
    }

    /// Byte at `index`
    pub fn at(&self, index: usize) -> Result<u8, StringError> {
        self.as_bytes()
            .get(index)
            .copied()
            .ok_or(StringError::OutOfRange { pos: index, len: self.len() })
    }

    pub fn front(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    pub fn back(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    // ------------------------------------------------------------------------
    // Capacity
    // ------------------------------------------------------------------------

    /// Make room for at least `size` bytes of content
    pub fn reserve(&mut self, size: usize) -> Result<(), StringError> {
        self.ensure_capacity(size)
    }

    /// Check `size` against `max_size()` and allocate room for it plus the NUL
    fn ensure_capacity(&mut self, size: usize) -> Result<(), StringError> {
        let max = self.max_size();
        if size > max {
            return Err(StringError::TooLong { requested: size, max });
        }
        let wanted = size + 1;
        if wanted > self.bytes.len() {
            self.bytes
                .try_reserve(wanted - self.bytes.len())
                .map_err(|_| StringError::TooLong { requested: size, max })?;
        }
        Ok(())
    }

    /// Room for the current content plus `extra` bytes
    fn ensure_extra(&mut self, extra: usize) -> Result<(), StringError> {
        let size = self.len().checked_add(extra).ok_or(StringError::TooLong {
            requested: usize::MAX,
            max: self.max_size(),
        })?;
        self.ensure_capacity(size)
    }

    pub fn shrink_to_fit(&mut self) {
        self.bytes.shrink_to_fit();
    }

    /// Set the length to `size`, padding with NUL bytes
    pub fn resize(&mut self, size: usize) -> Result<(), StringError> {
        self.ensure_capacity(size)?;
        self.bytes.pop();
        self.bytes.resize(size, 0);
        self.bytes.push(0);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bytes.push(0);
    }

    // ------------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------------

    /// Insert `count` copies of `ch` before position `idx`
    pub fn insert_repeat(&mut self, idx: usize, ch: u8, count: usize) -> Result<(), StringError> {
        self.check_pos(idx)?;
        self.ensure_extra(count)?;
        self.bytes
            .splice(idx..idx, std::iter::repeat(ch).take(count));
        Ok(())
    }

    /// Insert `content` before position `idx`
    pub fn insert_bytes(&mut self, idx: usize, content: &[u8]) -> Result<(), StringError> {
        self.check_pos(idx)?;
        self.bytes.splice(idx..idx, content.iter().copied());
        Ok(())
    }

    /// Remove everything from `idx` to the end
    pub fn erase_from(&mut self, idx: usize) -> Result<(), StringError> {
        self.check_pos(idx)?;
        self.bytes.truncate(idx);
        self.bytes.push(0);
        Ok(())
    }

    /// Remove up to `count` bytes starting at `idx`
    pub fn erase(&mut self, idx: usize, count: usize) -> Result<(), StringError> {
        self.check_pos(idx)?;
        let end = idx + count.min(self.len() - idx);
        self.bytes.drain(idx..end);
        Ok(())
    }

    pub fn push_back(&mut self, ch: u8) {
        let len = self.len();
        self.bytes.insert(len, ch);
    }

    /// Remove and return the last byte
    pub fn pop_back(&mut self) -> Option<u8> {
        let last = self.back()?;
        let len = self.len();
        self.bytes.remove(len - 1);
        Some(last)
    }

    pub fn append_repeat(&mut self, ch: u8, count: usize) -> Result<(), StringError> {
        self.ensure_extra(count)?;
        let len = self.len();
        self.bytes.splice(len..len, std::iter::repeat(ch).take(count));
        Ok(())
    }

    pub fn append_bytes(&mut self, content: &[u8]) {
        let len = self.len();
        self.bytes.splice(len..len, content.iter().copied());
    }

    /// Append the first `count` bytes of `content` (all of it if shorter)
    pub fn append_prefix(&mut self, content: &[u8], count: usize) {
        self.append_bytes(&content[..count.min(content.len())]);
    }

    fn replace_span(&self, pos: usize, len: usize) -> Result<std::ops::Range<usize>, StringError> {
        self.check_pos(pos)?;
        Ok(pos..pos + len.min(self.len() - pos))
    }

    /// Replace up to `len` bytes at `pos` with `count` copies of `ch`
    pub fn replace_repeat(&mut self, pos: usize, len: usize, count: usize, ch: u8) -> Result<(), StringError> {
        let span = self.replace_span(pos, len)?;
        // The replaced span is at most the current length, so this cannot underflow
        self.ensure_extra(count.saturating_sub(span.len()))?;
        self.bytes.splice(span, std::iter::repeat(ch).take(count));
        Ok(())
    }

    /// Replace up to `len` bytes at `pos` with `content`
    pub fn replace(&mut self, pos: usize, len: usize, content: &[u8]) -> Result<(), StringError> {
        let span = self.replace_span(pos, len)?;
        self.bytes.splice(span, content.iter().copied());
        Ok(())
    }

    /// Copy bytes from `pos` into `dest` (no terminator); returns the count copied
    pub fn copy_to(&self, dest: &mut [u8], pos: usize) -> Result<usize, StringError> {
        self.check_pos(pos)?;
        let n = dest.len().min(self.len() - pos);
        dest[..n].copy_from_slice(&self.as_bytes()[pos..pos + n]);
        Ok(n)
    }

    pub fn swap(&mut self, other: &mut BgString) {
        std::mem::swap(&mut self.bytes, &mut other.bytes);
    }

    /// Up to `len` bytes starting at `pos`
    pub fn substr(&self, pos: usize, len: usize) -> Result<BgString, StringError> {
        let span = self.replace_span(pos, len)?;
        Ok(BgString::from_bytes(&self.bytes[span]))
    }

    // ------------------------------------------------------------------------
    // Searching
    // ------------------------------------------------------------------------

    /// First occurrence of `needle` starting at or after `pos`
    pub fn find(&self, needle: &[u8], pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        if pos > hay.len() {
            return None;
        }
        if needle.is_empty() {
            return Some(pos);
        }
        hay[pos..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| i + pos)
    }

    /// Last occurrence of `needle` starting at or before `pos`
    pub fn rfind(&self, needle: &[u8], pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        if needle.len() > hay.len() {
            return None;
        }
        let last_start = pos.min(hay.len() - needle.len());
        (0..=last_start)
            .rev()
            .find(|&i| &hay[i..i + needle.len()] == needle)
    }

    /// First byte at or after `pos` contained in `set`
    pub fn find_first_of(&self, set: &[u8], pos: usize) -> Option<usize> {
        self.scan_forward(pos, |b| set.contains(&b))
    }

    /// First byte at or after `pos` not contained in `set`
    pub fn find_first_not_of(&self, set: &[u8], pos: usize) -> Option<usize> {
        self.scan_forward(pos, |b| !set.contains(&b))
    }

    /// Last byte at or before `pos` contained in `set`
    pub fn find_last_of(&self, set: &[u8], pos: usize) -> Option<usize> {
        self.scan_backward(pos, |b| set.contains(&b))
    }

    /// Last byte at or before `pos` not contained in `set`
    pub fn find_last_not_of(&self, set: &[u8], pos: usize) -> Option<usize> {
        self.scan_backward(pos, |b| !set.contains(&b))
    }

    fn scan_forward(&self, pos: usize, pred: impl Fn(u8) -> bool) -> Option<usize> {
        let hay = self.as_bytes();
        hay.get(pos..)?
            .iter()
            .position(|&b| pred(b))
            .map(|i| i + pos)
    }

    fn scan_backward(&self, pos: usize, pred: impl Fn(u8) -> bool) -> Option<usize> {
        let hay = self.as_bytes();
        if hay.is_empty() {
            return None;
        }
        let end = pos.min(hay.len() - 1);
        hay[..=end].iter().rposition(|&b| pred(b))
    }
}

impl Default for BgString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for BgString {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for BgString {
    fn from(s: String) -> Self {
        let mut bytes = s.into_bytes();
        bytes.push(0);
        Self { bytes }
    }
}

impl From<&[u8]> for BgString {
    fn from(b: &[u8]) -> Self {
        Self::from_bytes(b)
    }
}

impl fmt::Display for BgString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for BgString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> BgString {
        BgString::from(text)
    }

    #[test]
    fn test_terminator_is_maintained() {
        let mut st = s("abc");
        st.push_back(b'd');
        st.append_bytes(b"ef");
        st.erase(0, 1).unwrap();

        assert_eq!(st.as_bytes(), b"bcdef");
        assert_eq!(st.as_cstr().to_bytes(), b"bcdef");
        let raw = unsafe { CStr::from_ptr(st.c_str()) };
        assert_eq!(raw.to_bytes(), b"bcdef");
    }

    #[test]
    fn test_access() {
        let st = s("xyz");
        assert_eq!(st.at(1), Ok(b'y'));
        assert_eq!(st.at(3), Err(StringError::OutOfRange { pos: 3, len: 3 }));
        assert_eq!(st.front(), Some(b'x'));
        assert_eq!(st.back(), Some(b'z'));
        assert_eq!(BgString::new().front(), None);
    }

    #[test]
    fn test_insert_and_erase() {
        let mut st = s("hello");
        st.insert_repeat(0, b'>', 2).unwrap();
        st.insert_bytes(7, b" world").unwrap();
        assert_eq!(st.to_string(), ">>hello world");

        assert!(st.insert_bytes(100, b"x").is_err());

        st.erase(0, 2).unwrap();
        st.erase_from(5).unwrap();
        assert_eq!(st.to_string(), "hello");

        // count past the end is clamped
        st.erase(3, 99).unwrap();
        assert_eq!(st.to_string(), "hel");
        assert!(st.erase(4, 1).is_err());
    }

    #[test]
    fn test_append_variants() {
        let mut st = s("a");
        st.append_repeat(b'-', 3).unwrap();
        st.append_bytes(b"23");
        assert_eq!(st.to_string(), "a---23");
        st.append_prefix(b"xyz", 2);
        st.append_prefix(b"!", 5);
        assert_eq!(st.to_string(), "a---23xy!");
    }

    #[test]
    fn test_replace() {
        let mut st = s("the cat sat");
        st.replace(4, 3, b"dog").unwrap();
        assert_eq!(st.to_string(), "the dog sat");

        st.replace_repeat(0, 3, 1, b'a').unwrap();
        assert_eq!(st.to_string(), "a dog sat");

        st.replace(6, 100, b"ran away").unwrap();
        assert_eq!(st.to_string(), "a dog ran away");
    }

    #[test]
    fn test_pop_and_resize() {
        let mut st = s("ab");
        assert_eq!(st.pop_back(), Some(b'b'));
        assert_eq!(st.pop_back(), Some(b'a'));
        assert_eq!(st.pop_back(), None);

        st.resize(3).unwrap();
        assert_eq!(st.as_bytes(), &[0, 0, 0]);
        assert_eq!(st.len(), 3);
        st.clear();
        assert!(st.is_empty());
    }

    #[test]
    fn test_copy_and_substr() {
        let st = s("abcdef");
        let mut dest = [0u8; 4];
        assert_eq!(st.copy_to(&mut dest, 4), Ok(2));
        assert_eq!(&dest[..2], b"ef");

        assert_eq!(st.substr(1, 3).unwrap().to_string(), "bcd");
        assert_eq!(st.substr(6, 3).unwrap().to_string(), "");
        assert!(st.substr(7, 1).is_err());
    }

    #[test]
    fn test_find_family() {
        let st = s("abcabc");
        assert_eq!(st.find(b"bc", 0), Some(1));
        assert_eq!(st.find(b"bc", 2), Some(4));
        assert_eq!(st.find(b"zz", 0), None);
        assert_eq!(st.find(b"", 6), Some(6));
        assert_eq!(st.find(b"", 7), None);

        assert_eq!(st.rfind(b"bc", usize::MAX), Some(4));
        assert_eq!(st.rfind(b"bc", 3), Some(1));
        assert_eq!(st.rfind(b"c", 0), None);

        assert_eq!(st.find_first_of(b"cx", 0), Some(2));
        assert_eq!(st.find_first_not_of(b"ab", 0), Some(2));
        assert_eq!(st.find_last_of(b"a", usize::MAX), Some(3));
        assert_eq!(st.find_last_not_of(b"c", 4), Some(4));
        assert_eq!(st.find_first_of(b"a", 10), None);
        assert_eq!(BgString::new().find_last_of(b"a", 0), None);
    }

    #[test]
    fn test_swap_and_capacity() {
        let mut a = s("left");
        let mut b = s("right");
        a.swap(&mut b);
        assert_eq!(a.to_string(), "right");
        assert_eq!(b.to_string(), "left");

        a.reserve(64).unwrap();
        assert!(a.capacity() >= 64);
        a.shrink_to_fit();
        assert!(a.capacity() >= a.len());
        assert!(a.max_size() > 1 << 32);
    }

    #[test]
    fn test_oversized_requests_leave_string_intact() {
        let too_long = |r: Result<(), StringError>| matches!(r, Err(StringError::TooLong { .. }));
        let mut st = s("keep");

        assert!(too_long(st.reserve(usize::MAX)));
        assert!(too_long(st.reserve(st.max_size() + 1)));
        assert!(too_long(st.resize(usize::MAX)));
        assert!(too_long(st.insert_repeat(0, b'x', usize::MAX)));
        assert!(too_long(st.append_repeat(b'x', usize::MAX)));
        assert!(too_long(st.append_repeat(b'x', st.max_size())));
        assert!(too_long(st.replace_repeat(0, 1, usize::MAX, b'x')));

        assert_eq!(st.to_string(), "keep");
        assert_eq!(st.as_cstr().to_bytes(), b"keep");
    }

    #[test]
    fn test_replace_repeat_shrinking_needs_no_room() {
        let mut st = s("abcdef");
        st.replace_repeat(1, 4, 2, b'-').unwrap();
        assert_eq!(st.to_string(), "a--f");
    }
}
