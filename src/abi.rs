//! Purpose: C ABI bridge for host bindings (libjunco).
//! Exports: C-callable document/value functions plus buffer/error helpers.
//! Role: Stable ABI surface for non-Rust bindings.
//! Invariants: Opaque handles; explicit free functions; one owner per
//! allocation crossing the boundary.
//! Invariants: Error kinds map 1:1 with `ParseErrorKind` codes; accessor
//! misses return -1 with no error object.
//! Invariants: Paths are (keys, len); a NULL keys pointer with len 0 means
//! "the value itself".

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use tracing::debug;

use crate::core::error::ParseError;
use crate::core::value::{Document, Kind, Value, ValueRef};

pub const JNC_TYPE_UNKNOWN: i32 = 0;
pub const JNC_TYPE_NULL: i32 = 1;
pub const JNC_TYPE_BOOL: i32 = 2;
pub const JNC_TYPE_NUMBER: i32 = 3;
pub const JNC_TYPE_STRING: i32 = 4;
pub const JNC_TYPE_ARRAY: i32 = 5;
pub const JNC_TYPE_OBJECT: i32 = 6;

/// Owns one parsed document. Freed with `jnc_doc_free`; freeing invalidates
/// every handle and borrowed view derived from it.
#[repr(C)]
pub struct jnc_doc {
    doc: Document,
}

/// Borrowed cursor over one node of a document. Caller-owned
/// (`jnc_value_free` / `jnc_value_list_free`); the node itself stays
/// document-owned.
#[repr(C)]
pub struct jnc_value {
    doc: *const jnc_doc,
    node: *const Value,
}

/// Owned byte buffer crossing the boundary. Freed with `jnc_buf_free`.
/// Transparent on the C side, so the fields are public.
#[repr(C)]
pub struct jnc_buf {
    pub data: *mut u8,
    pub len: usize,
}

/// Borrowed text view into the document buffer. Never freed by the caller;
/// valid only while the document lives.
#[repr(C)]
pub struct jnc_str {
    pub data: *const u8,
    pub len: usize,
}

/// Parse failure crossing the boundary. Freed with `jnc_error_free`.
#[repr(C)]
pub struct jnc_error {
    pub kind: i32,
    pub offset: u64,
    pub message: *mut c_char,
}

/// Parse `text` into a new document. Returns 0 with a non-NULL `*out_doc` on
/// success and -1 with a `jnc_error` on failure. A NULL `text` yields neither
/// a document nor an error (`*out_doc` is NULL, return 0): callers must
/// distinguish this case themselves. The input bytes are copied once; the
/// copy is decoded in place and owned by the document.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_doc_parse(
    text: *const c_char,
    out_doc: *mut *mut jnc_doc,
    out_err: *mut *mut jnc_error,
) -> i32 {
    if out_doc.is_null() {
        debug!("jnc_doc_parse: out_doc is null");
        return -1;
    }
    unsafe {
        *out_doc = ptr::null_mut();
    }
    if text.is_null() {
        return 0;
    }
    let bytes = unsafe { CStr::from_ptr(text) }.to_bytes().to_vec();
    match Document::parse(bytes) {
        Ok(doc) => {
            let handle = Box::new(jnc_doc { doc });
            unsafe {
                *out_doc = Box::into_raw(handle);
            }
            0
        }
        Err(err) => fail(out_err, err),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_doc_free(doc: *mut jnc_doc) {
    if doc.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(doc));
    }
}

/// Root value of a document as a caller-owned handle (`jnc_value_free`).
#[unsafe(no_mangle)]
pub extern "C" fn jnc_doc_root(doc: *const jnc_doc, out_value: *mut *mut jnc_value) -> i32 {
    if doc.is_null() || out_value.is_null() {
        return -1;
    }
    let document = unsafe { &(*doc).doc };
    let handle = make_handle(doc, document.root().node());
    unsafe {
        *out_value = handle;
    }
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_value_free(value: *mut jnc_value) {
    if value.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(value));
    }
}

/// Descend through object members. Returns 0 with a caller-owned handle, or
/// -1 when any step hits a non-object node or a missing member.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_get(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_value: *mut *mut jnc_value,
) -> i32 {
    if out_value.is_null() {
        return -1;
    }
    let Some(handle) = (unsafe { value.as_ref() }) else {
        return -1;
    };
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    unsafe {
        *out_value = make_handle(handle.doc, found.node());
    }
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_int(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_val: *mut i64,
) -> i32 {
    if out_val.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    match found.int_at(&[]) {
        Some(v) => {
            unsafe {
                *out_val = v;
            }
            0
        }
        None => -1,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_uint(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_val: *mut u64,
) -> i32 {
    if out_val.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    match found.uint_at(&[]) {
        Some(v) => {
            unsafe {
                *out_val = v;
            }
            0
        }
        None => -1,
    }
}

/// Boolean out-param is 0 for false, 1 for true.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_bool(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_val: *mut u8,
) -> i32 {
    if out_val.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    match found.bool_at(&[]) {
        Some(v) => {
            unsafe {
                *out_val = u8::from(v);
            }
            0
        }
        None => -1,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_double(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_val: *mut f64,
) -> i32 {
    if out_val.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    match found.double_at(&[]) {
        Some(v) => {
            unsafe {
                *out_val = v;
            }
            0
        }
        None => -1,
    }
}

/// Borrowed (pointer, length) view of a string value. The view shares memory
/// with the document and must not outlive it; the caller never frees it.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_string(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_str: *mut jnc_str,
) -> i32 {
    if out_str.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    match found.str_at(&[]) {
        Some(text) => {
            unsafe {
                (*out_str).data = text.as_ptr();
                (*out_str).len = text.len();
            }
            0
        }
        None => -1,
    }
}

/// Ordered child handles of an array value. The caller owns the handle list
/// (`jnc_value_list_free`); the nodes stay document-owned.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_array(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_items: *mut *mut *mut jnc_value,
    out_len: *mut usize,
) -> i32 {
    if out_items.is_null() || out_len.is_null() {
        return -1;
    }
    let Some(handle) = (unsafe { value.as_ref() }) else {
        return -1;
    };
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    let Some(items) = found.array_at(&[]) else {
        return -1;
    };
    let list: Vec<*mut jnc_value> = items
        .iter()
        .map(|item| make_handle(handle.doc, item.node()))
        .collect();
    let (ptr, len) = leak_list(list);
    unsafe {
        *out_items = ptr;
        *out_len = len;
    }
    0
}

/// Ordered member handles plus key-name copies of an object value, duplicates
/// included. Handles are freed with `jnc_value_list_free`, key copies with
/// `jnc_string_list_free`. A key containing an interior NUL crosses as NULL.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_get_object(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_members: *mut *mut *mut jnc_value,
    out_keys: *mut *mut *mut c_char,
    out_len: *mut usize,
) -> i32 {
    if out_members.is_null() || out_keys.is_null() || out_len.is_null() {
        return -1;
    }
    let Some(handle) = (unsafe { value.as_ref() }) else {
        return -1;
    };
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    let Some(members) = found.object_at(&[]) else {
        return -1;
    };
    let handles: Vec<*mut jnc_value> = members
        .iter()
        .map(|(_, member)| make_handle(handle.doc, member.node()))
        .collect();
    let names: Vec<*mut c_char> = members.iter().map(|(key, _)| to_c_string(key)).collect();
    let (member_ptr, len) = leak_list(handles);
    let (name_ptr, _) = leak_list(names);
    unsafe {
        *out_members = member_ptr;
        *out_keys = name_ptr;
        *out_len = len;
    }
    0
}

/// Free a handle list from `jnc_get_array`/`jnc_get_object`: each handle,
/// then the list container. Document-owned nodes are untouched.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_value_list_free(items: *mut *mut jnc_value, len: usize) {
    if items.is_null() {
        return;
    }
    unsafe {
        for idx in 0..len {
            let handle = *items.add(idx);
            if !handle.is_null() {
                drop(Box::from_raw(handle));
            }
        }
        if len != 0 {
            drop(Vec::from_raw_parts(items, len, len));
        }
    }
}

/// Free the key-name list from `jnc_get_object`.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_string_list_free(names: *mut *mut c_char, len: usize) {
    if names.is_null() {
        return;
    }
    unsafe {
        for idx in 0..len {
            let name = *names.add(idx);
            if !name.is_null() {
                drop(CString::from_raw(name));
            }
        }
        if len != 0 {
            drop(Vec::from_raw_parts(names, len, len));
        }
    }
}

/// Coarse category of the value at the path. `JNC_TYPE_UNKNOWN` (0) means the
/// path did not resolve; it is distinct from every real category.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_type(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
) -> i32 {
    match resolve(value, keys, keys_len) {
        Some(found) => kind_code(found.kind()),
        None => JNC_TYPE_UNKNOWN,
    }
}

/// Render the subtree at the path as compact JSON into an owned buffer
/// (`jnc_buf_free`). -1 with no output when the path does not resolve.
#[unsafe(no_mangle)]
pub extern "C" fn jnc_stringify(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
    out_buf: *mut jnc_buf,
) -> i32 {
    if out_buf.is_null() {
        return -1;
    }
    let Some(found) = resolve(value, keys, keys_len) else {
        return -1;
    };
    let Some(text) = found.stringify_at(&[]) else {
        return -1;
    };
    unsafe {
        let buf = &mut *out_buf;
        let mut data = text.into_bytes().into_boxed_slice();
        buf.len = data.len();
        buf.data = data.as_mut_ptr();
        std::mem::forget(data);
    }
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_buf_free(buf: *mut jnc_buf) {
    if buf.is_null() {
        return;
    }
    unsafe {
        let buf = &mut *buf;
        if !buf.data.is_null() && buf.len != 0 {
            drop(Vec::from_raw_parts(buf.data, buf.len, buf.len));
        }
        buf.data = ptr::null_mut();
        buf.len = 0;
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn jnc_error_free(err: *mut jnc_error) {
    if err.is_null() {
        return;
    }
    unsafe {
        let err = Box::from_raw(err);
        if !err.message.is_null() {
            drop(CString::from_raw(err.message));
        }
    }
}

fn resolve<'a>(
    value: *const jnc_value,
    keys: *const *const c_char,
    keys_len: usize,
) -> Option<ValueRef<'a>> {
    let handle = unsafe { value.as_ref() }?;
    if handle.doc.is_null() || handle.node.is_null() {
        return None;
    }
    let doc = unsafe { &(*handle.doc).doc };
    let node = unsafe { &*handle.node };
    let path = collect_path(keys, keys_len)?;
    let path_refs: Vec<&str> = path.iter().map(String::as_str).collect();
    ValueRef::from_parts(doc, node).get(&path_refs)
}

fn collect_path(keys: *const *const c_char, keys_len: usize) -> Option<Vec<String>> {
    if keys.is_null() {
        if keys_len == 0 {
            return Some(Vec::new());
        }
        return None;
    }
    let slice = unsafe { std::slice::from_raw_parts(keys, keys_len) };
    let mut path = Vec::with_capacity(keys_len);
    for &key in slice {
        if key.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(key) }.to_str().ok()?;
        path.push(text.to_string());
    }
    Some(path)
}

fn make_handle(doc: *const jnc_doc, node: &Value) -> *mut jnc_value {
    Box::into_raw(Box::new(jnc_value {
        doc,
        node: node as *const Value,
    }))
}

fn leak_list<T>(list: Vec<T>) -> (*mut T, usize) {
    let len = list.len();
    let mut slice = list.into_boxed_slice();
    let ptr = slice.as_mut_ptr();
    std::mem::forget(slice);
    (ptr, len)
}

fn fail(out_err: *mut *mut jnc_error, err: ParseError) -> i32 {
    debug!(
        offset = err.offset(),
        code = err.kind().code(),
        "jnc_doc_parse failed"
    );
    if out_err.is_null() {
        return -1;
    }
    let error = Box::new(jnc_error {
        kind: err.kind().code(),
        offset: err.offset() as u64,
        message: to_c_string(&err.to_string()),
    });
    unsafe {
        *out_err = Box::into_raw(error);
    }
    -1
}

fn to_c_string(input: &str) -> *mut c_char {
    CString::new(input)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

fn kind_code(kind: Kind) -> i32 {
    match kind {
        Kind::Null => JNC_TYPE_NULL,
        Kind::Bool => JNC_TYPE_BOOL,
        Kind::Number => JNC_TYPE_NUMBER,
        Kind::String => JNC_TYPE_STRING,
        Kind::Array => JNC_TYPE_ARRAY,
        Kind::Object => JNC_TYPE_OBJECT,
    }
}
