//! `string_*`: the C view of `BgString`
//!
//! Positions past the end are logged and the call is ignored; searches that
//! find nothing return `NPOS`. Reading accessors on an empty string return 0.

use std::ffi::c_char;

use glgebg_core::constants::NPOS;
use glgebg_core::{bg_warn, BgString, StringError};

use super::{cstr_bytes, destroy, handle_mut, handle_ref, into_handle, report, to_usize};

fn npos(found: Option<usize>) -> u64 {
    found.map_or(NPOS, |i| i as u64)
}

/// Contents of another string handle, copied so the target may alias it
unsafe fn source_bytes(src: *const BgString, func: &str) -> Option<Vec<u8>> {
    handle_ref(src, func).map(|s| s.as_bytes().to_vec())
}

#[no_mangle]
pub extern "C" fn string_Create() -> *mut BgString {
    into_handle(BgString::new())
}

/// # Safety
///
/// `s` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn string_CreateFrom(s: *const c_char) -> *mut BgString {
    into_handle(BgString::from_bytes(cstr_bytes(s, "string_CreateFrom").unwrap_or_default()))
}

/// # Safety
///
/// `s` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_CreateCopy(s: *const BgString) -> *mut BgString {
    into_handle(handle_ref(s, "string_CreateCopy").cloned().unwrap_or_default())
}

/// # Safety
///
/// `s` must be null or come from a `string_*` constructor, and must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn string_Destroy(s: *mut BgString) {
    destroy(s);
}

// ----------------------------------------------------------------------------
// Access
// ----------------------------------------------------------------------------

/// Byte `i`, or 0 when out of range
///
/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Get(i: u64, str: *mut BgString) -> c_char {
    let Some(s) = handle_ref(str, "string_Get") else {
        return 0;
    };
    s.at(to_usize(i)).map_or_else(
        |e| {
            bg_warn!("string_Get: {}", e);
            0
        },
        |b| b as c_char,
    )
}

unsafe fn end_byte(str: *mut BgString, func: &str, pick: fn(&BgString) -> Option<u8>) -> c_char {
    let Some(s) = handle_ref(str, func) else {
        return 0;
    };
    match pick(s) {
        Some(b) => b as c_char,
        None => {
            bg_warn!("{}: {}", func, StringError::Empty);
            0
        }
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Front(str: *mut BgString) -> c_char {
    end_byte(str, "string_Front", BgString::front)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Back(str: *mut BgString) -> c_char {
    end_byte(str, "string_Back", BgString::back)
}

/// # Safety
///
/// `str` must be null or a live string. The pointer is invalidated by any
/// call that changes the string.
#[no_mangle]
pub unsafe extern "C" fn string_Data(str: *mut BgString) -> *mut c_char {
    handle_mut(str, "string_Data").map_or(std::ptr::null_mut(), |s| s.data())
}

/// # Safety
///
/// As for `string_Data`.
#[no_mangle]
pub unsafe extern "C" fn string_C_Str(str: *mut BgString) -> *const c_char {
    handle_ref(str, "string_C_Str").map_or(std::ptr::null(), |s| s.c_str())
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Empty(str: *mut BgString) -> bool {
    handle_ref(str, "string_Empty").map_or(true, |s| s.is_empty())
}

/// Misspelled name kept for existing C callers
///
/// # Safety
///
/// As for `string_Empty`.
#[no_mangle]
pub unsafe extern "C" fn string_Emtpy(str: *mut BgString) -> bool {
    string_Empty(str)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Size(str: *mut BgString) -> u64 {
    handle_ref(str, "string_Size").map_or(0, |s| s.len() as u64)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Length(str: *mut BgString) -> u64 {
    handle_ref(str, "string_Length").map_or(0, |s| s.len() as u64)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Max_size(str: *mut BgString) -> u64 {
    handle_ref(str, "string_Max_size").map_or(0, |s| s.max_size() as u64)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Capacity(str: *mut BgString) -> u64 {
    handle_ref(str, "string_Capacity").map_or(0, |s| s.capacity() as u64)
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Shrink_to_fit(str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Shrink_to_fit") {
        s.shrink_to_fit();
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Clear(str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Clear") {
        s.clear();
    }
}

// ----------------------------------------------------------------------------
// Modifiers
// ----------------------------------------------------------------------------

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_InsertChar(idx: u64, character: c_char, count: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_InsertChar") {
        report(
            "string_InsertChar",
            s.insert_repeat(to_usize(idx), character as u8, to_usize(count)),
        );
    }
}

/// # Safety
///
/// `str` must be null or a live string; `string` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn string_InsertCString(idx: u64, string: *const c_char, str: *mut BgString) {
    let Some(bytes) = cstr_bytes(string, "string_InsertCString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_InsertCString") {
        report("string_InsertCString", s.insert_bytes(to_usize(idx), bytes));
    }
}

/// # Safety
///
/// Both handles must be null or live strings; they may be the same string.
#[no_mangle]
pub unsafe extern "C" fn string_InsertString(idx: u64, insert: *mut BgString, str: *mut BgString) {
    let Some(bytes) = source_bytes(insert, "string_InsertString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_InsertString") {
        report("string_InsertString", s.insert_bytes(to_usize(idx), &bytes));
    }
}

/// Erase from `idx` to the end
///
/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Erase(idx: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Erase") {
        report("string_Erase", s.erase_from(to_usize(idx)));
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_EraseCount(idx: u64, count: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_EraseCount") {
        report("string_EraseCount", s.erase(to_usize(idx), to_usize(count)));
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Push_back(character: c_char, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Push_back") {
        s.push_back(character as u8);
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Pop_back(str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Pop_back") {
        if s.pop_back().is_none() {
            bg_warn!("string_Pop_back: {}", StringError::Empty);
        }
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_AppendChar(character: c_char, count: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_AppendChar") {
        report("string_AppendChar", s.append_repeat(character as u8, to_usize(count)));
    }
}

/// Append at most `count` bytes of `string`
///
/// # Safety
///
/// `str` must be null or a live string; `string` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn string_AppendCString(string: *const c_char, count: u64, str: *mut BgString) {
    let Some(bytes) = cstr_bytes(string, "string_AppendCString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_AppendCString") {
        s.append_prefix(bytes, to_usize(count));
    }
}

/// Append at most `count` bytes of `string`
///
/// This takes the first `count` bytes, like `string_AppendCString`. It is not
/// `std::string::append(str, pos)`, which appends the suffix starting at `pos`.
///
/// # Safety
///
/// Both handles must be null or live strings; they may be the same string.
#[no_mangle]
pub unsafe extern "C" fn string_AppendString(string: *mut BgString, count: u64, str: *mut BgString) {
    let Some(bytes) = source_bytes(string, "string_AppendString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_AppendString") {
        s.append_prefix(&bytes, to_usize(count));
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_ReplaceChar(
    pos: u64,
    len: u64,
    count: u64,
    character: c_char,
    str: *mut BgString,
) {
    if let Some(s) = handle_mut(str, "string_ReplaceChar") {
        report(
            "string_ReplaceChar",
            s.replace_repeat(to_usize(pos), to_usize(len), to_usize(count), character as u8),
        );
    }
}

/// # Safety
///
/// `str` must be null or a live string; `string` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn string_ReplaceCString(pos: u64, len: u64, string: *const c_char, str: *mut BgString) {
    let Some(bytes) = cstr_bytes(string, "string_ReplaceCString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_ReplaceCString") {
        report("string_ReplaceCString", s.replace(to_usize(pos), to_usize(len), bytes));
    }
}

/// # Safety
///
/// Both handles must be null or live strings; they may be the same string.
#[no_mangle]
pub unsafe extern "C" fn string_ReplaceString(pos: u64, len: u64, string: *mut BgString, str: *mut BgString) {
    let Some(bytes) = source_bytes(string, "string_ReplaceString") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_ReplaceString") {
        report("string_ReplaceString", s.replace(to_usize(pos), to_usize(len), &bytes));
    }
}

/// Copy up to `len` bytes from `pos` into `storage`, without a terminator
///
/// # Safety
///
/// `storage` must be writable for `len` bytes and must not overlap the string.
#[no_mangle]
pub unsafe extern "C" fn string_Copy(storage: *mut c_char, len: u64, pos: u64, str: *mut BgString) {
    let Some(s) = handle_ref(str, "string_Copy") else {
        return;
    };
    if storage.is_null() {
        bg_warn!("string_Copy: null storage");
        return;
    }
    let dest = std::slice::from_raw_parts_mut(storage.cast::<u8>(), to_usize(len));
    report("string_Copy", s.copy_to(dest, to_usize(pos)).map(drop));
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Reserve(size: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Reserve") {
        report("string_Reserve", s.reserve(to_usize(size)));
    }
}

/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Resize(size: u64, str: *mut BgString) {
    if let Some(s) = handle_mut(str, "string_Resize") {
        report("string_Resize", s.resize(to_usize(size)));
    }
}

/// # Safety
///
/// Both handles must be null or live strings.
#[no_mangle]
pub unsafe extern "C" fn string_Swap(string: *mut BgString, str: *mut BgString) {
    if std::ptr::eq(string, str) {
        return;
    }
    let Some(other) = handle_mut(string, "string_Swap") else {
        return;
    };
    if let Some(s) = handle_mut(str, "string_Swap") {
        s.swap(other);
    }
}

/// New string with up to `len` bytes from `pos`; null when `pos` is past the end
///
/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn string_Substring(pos: u64, len: u64, str: *mut BgString) -> *mut BgString {
    let Some(s) = handle_ref(str, "string_Substring") else {
        return std::ptr::null_mut();
    };
    match s.substr(to_usize(pos), to_usize(len)) {
        Ok(sub) => into_handle(sub),
        Err(e) => {
            bg_warn!("string_Substring: {}", e);
            std::ptr::null_mut()
        }
    }
}

// ----------------------------------------------------------------------------
// Searching
// ----------------------------------------------------------------------------

/// Expands one search method into its Char, CString and String entry points
macro_rules! search_fns {
    ($method:ident, $char_fn:ident, $cstr_fn:ident, $string_fn:ident) => {
        /// # Safety
        ///
        /// `str` must be null or a live string.
        #[no_mangle]
        pub unsafe extern "C" fn $char_fn(pos: u64, character: c_char, str: *mut BgString) -> u64 {
            match handle_ref(str, stringify!($char_fn)) {
                Some(s) => npos(s.$method(&[character as u8], to_usize(pos))),
                None => NPOS,
            }
        }

        /// # Safety
        ///
        /// `str` must be null or a live string; `string` null or NUL-terminated.
        #[no_mangle]
        pub unsafe extern "C" fn $cstr_fn(pos: u64, string: *const c_char, str: *mut BgString) -> u64 {
            let Some(needle) = cstr_bytes(string, stringify!($cstr_fn)) else {
                return NPOS;
            };
            match handle_ref(str, stringify!($cstr_fn)) {
                Some(s) => npos(s.$method(needle, to_usize(pos))),
                None => NPOS,
            }
        }

        /// # Safety
        ///
        /// Both handles must be null or live strings.
        #[no_mangle]
        pub unsafe extern "C" fn $string_fn(pos: u64, string: *mut BgString, str: *mut BgString) -> u64 {
            let (Some(needle), Some(s)) = (
                handle_ref(string, stringify!($string_fn)),
                handle_ref(str, stringify!($string_fn)),
            ) else {
                return NPOS;
            };
            npos(s.$method(needle.as_bytes(), to_usize(pos)))
        }
    };
}

search_fns!(find, string_FindChar, string_FindCString, string_FindString);
search_fns!(rfind, string_RFindChar, string_RFindCString, string_RFindString);
search_fns!(
    find_first_of,
    string_Find_first_ofChar,
    string_Find_first_ofCString,
    string_Find_first_ofString
);
search_fns!(
    find_first_not_of,
    string_Find_first_not_ofChar,
    string_Find_first_not_ofCString,
    string_Find_first_not_ofString
);
search_fns!(
    find_last_of,
    string_Find_last_ofChar,
    string_Find_last_ofCString,
    string_Find_last_ofString
);
search_fns!(
    find_last_not_of,
    string_Find_last_not_ofChar,
    string_Find_last_not_ofCString,
    string_Find_last_not_ofString
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn c(s: &CStr) -> *const c_char {
        s.as_ptr()
    }

    unsafe fn text(str: *mut BgString) -> String {
        CStr::from_ptr(string_C_Str(str)).to_string_lossy().into_owned()
    }

    #[test]
    fn test_build_and_read() {
        unsafe {
            let s = string_CreateFrom(c(c"hello"));
            string_Push_back(b'!' as c_char, s);
            string_InsertCString(0, c(c">> "), s);
            assert_eq!(text(s), ">> hello!");
            assert_eq!(string_Size(s), 9);
            assert_eq!(string_Length(s), 9);
            assert_eq!(string_Get(3, s), b'h' as c_char);
            assert_eq!(string_Front(s), b'>' as c_char);
            assert_eq!(string_Back(s), b'!' as c_char);
            assert!(!string_Emtpy(s));

            let copy = string_CreateCopy(s);
            string_Clear(s);
            assert!(string_Empty(s));
            assert_eq!(text(copy), ">> hello!");

            string_Destroy(s);
            string_Destroy(copy);
        }
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        unsafe {
            let s = string_CreateFrom(c(c"abc"));
            string_InsertChar(10, b'x' as c_char, 1, s);
            string_EraseCount(4, 1, s);
            assert_eq!(text(s), "abc");
            assert_eq!(string_Get(3, s), 0);
            assert!(string_Substring(4, 1, s).is_null());

            let empty = string_Create();
            assert_eq!(string_Front(empty), 0);
            string_Pop_back(empty);
            string_Destroy(empty);
            string_Destroy(s);
        }
    }

    #[test]
    fn test_self_append_and_replace() {
        unsafe {
            let s = string_CreateFrom(c(c"ab"));
            string_AppendString(s, 99, s);
            assert_eq!(text(s), "abab");

            string_ReplaceString(1, 2, s, s);
            assert_eq!(text(s), "aababb");

            string_AppendCString(c(c"xyz"), 1, s);
            string_AppendChar(b'-' as c_char, 2, s);
            assert_eq!(text(s), "aababbx--");

            string_ReplaceChar(0, 6, 1, b'#' as c_char, s);
            string_ReplaceCString(1, 1, c(c"Y"), s);
            assert_eq!(text(s), "#Y--");
            string_Destroy(s);
        }
    }

    #[test]
    fn test_erase_copy_substring() {
        unsafe {
            let s = string_CreateFrom(c(c"0123456789"));
            let mut buf = [0 as c_char; 4];
            string_Copy(buf.as_mut_ptr(), 4, 8, s);
            assert_eq!(buf[0], b'8' as c_char);
            assert_eq!(buf[1], b'9' as c_char);
            assert_eq!(buf[2], 0);

            let sub = string_Substring(2, 3, s);
            assert_eq!(text(sub), "234");

            string_Erase(5, s);
            assert_eq!(text(s), "01234");
            string_EraseCount(0, 2, s);
            assert_eq!(text(s), "234");

            string_Swap(sub, s);
            string_Swap(s, s);
            assert_eq!(text(s), "234");
            assert_eq!(string_Size(sub), 3);

            string_Destroy(sub);
            string_Destroy(s);
        }
    }

    #[test]
    fn test_oversized_counts_are_ignored() {
        unsafe {
            let s = string_CreateFrom(c(c"abc"));
            string_AppendChar(b'x' as c_char, u64::MAX, s);
            string_InsertChar(0, b'x' as c_char, u64::MAX, s);
            string_ReplaceChar(0, 1, u64::MAX, b'x' as c_char, s);
            string_Reserve(u64::MAX, s);
            string_Resize(u64::MAX, s);
            assert_eq!(text(s), "abc");
            assert_eq!(string_Size(s), 3);
            string_Destroy(s);
        }
    }

    #[test]
    fn test_capacity_calls() {
        unsafe {
            let s = string_Create();
            string_Reserve(100, s);
            assert!(string_Capacity(s) >= 100);
            string_Resize(3, s);
            assert_eq!(string_Size(s), 3);
            string_Shrink_to_fit(s);
            assert!(string_Max_size(s) > 0);
            assert!(!string_Data(s).is_null());
            string_Destroy(s);
        }
    }

    #[test]
    fn test_searches() {
        unsafe {
            let s = string_CreateFrom(c(c"hello world"));
            let needle = string_CreateFrom(c(c"o"));

            assert_eq!(string_FindChar(0, b'o' as c_char, s), 4);
            assert_eq!(string_FindCString(5, c(c"o"), s), 7);
            assert_eq!(string_FindString(0, needle, s), 4);
            assert_eq!(string_FindChar(0, b'z' as c_char, s), NPOS);

            assert_eq!(string_RFindChar(NPOS, b'o' as c_char, s), 7);
            assert_eq!(string_RFindString(6, needle, s), 4);

            assert_eq!(string_Find_first_ofCString(0, c(c"wr"), s), 6);
            assert_eq!(string_Find_first_not_ofCString(0, c(c"hel"), s), 4);
            assert_eq!(string_Find_last_ofChar(NPOS, b'l' as c_char, s), 9);
            assert_eq!(string_Find_last_not_ofCString(NPOS, c(c"dl"), s), 8);
            assert_eq!(string_Find_first_ofString(0, needle, s), 4);
            assert_eq!(string_Find_last_ofString(NPOS, needle, s), 7);
            assert_eq!(string_Find_first_not_ofChar(0, b'h' as c_char, s), 1);
            assert_eq!(string_Find_last_not_ofString(NPOS, needle, s), 10);

            assert_eq!(string_FindCString(0, std::ptr::null(), s), NPOS);

            string_Destroy(needle);
            string_Destroy(s);
        }
    }
}
