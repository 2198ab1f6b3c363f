//! Allocations handed across the C boundary / 跨边界传递的内存
//!
//! Both wrappers own their allocation until `into_raw`. From then on the
//! foreign caller owns it and must give it back exactly once through the
//! matching release function, which rebuilds the wrapper with `from_raw` and
//! drops it.

use std::ffi::{c_char, CString};
use std::ptr::NonNull;

use crate::error::TransferError;

/// `malloc`-backed byte buffer / 基于malloc的数据缓冲区
#[derive(Debug)]
pub struct TransferBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

impl TransferBuffer {
    /// Copy `data` into a fresh allocation. Zero-length input still yields a
    /// non-null pointer.
    pub(crate) fn copy_from(data: &[u8]) -> Result<Self, TransferError> {
        let size = data.len().max(1);
        // SAFETY: size is non-zero; the result is checked for null below.
        let raw = unsafe { libc::malloc(size) } as *mut u8;
        let ptr = NonNull::new(raw).ok_or(TransferError::OutOfMemory(size))?;
        // SAFETY: ptr points to at least data.len() writable bytes and cannot
        // overlap a borrowed slice.
        unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.as_ptr(), data.len()) };
        Ok(Self { ptr, len: data.len() })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for len initialized bytes while self is alive.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Give up ownership; the caller must release the pointer exactly once.
    pub(crate) fn into_raw(self) -> (*mut u8, usize) {
        let out = (self.ptr.as_ptr(), self.len);
        std::mem::forget(self);
        out
    }

    /// Re-adopt a pointer produced by [`TransferBuffer::into_raw`]. The length
    /// is not tracked after handoff, so the adopted value only supports drop.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `into_raw` and must not have been released yet.
    pub(crate) unsafe fn from_raw(ptr: *mut u8) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, len: 0 })
    }
}

impl Drop for TransferBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by libc::malloc and is freed only here.
        unsafe { libc::free(self.ptr.as_ptr() as *mut libc::c_void) };
    }
}

/// Error text handed to the caller, `""` on success / 错误信息文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorText(CString);

impl ErrorText {
    pub fn empty() -> Self {
        Self(CString::default())
    }

    /// Build from any message. Interior NULs are replaced so this never fails.
    pub fn new(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.contains('\0') {
            message = message.replace('\0', "\u{FFFD}");
        }
        // 已替换所有NUL，不会失败
        Self(CString::new(message).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }

    pub fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// # Safety
    ///
    /// `ptr` must come from [`ErrorText::into_raw`] and must not have been
    /// released yet.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(CString::from_raw(ptr)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_copy_is_exact() {
        let data: Vec<u8> = (0..=255u8).collect();
        let buf = TransferBuffer::copy_from(&data).unwrap();
        assert_eq!(buf.len(), 256);
        assert_eq!(buf.as_slice(), &data[..]);
    }

    #[test]
    fn test_empty_buffer_is_non_null() {
        let buf = TransferBuffer::copy_from(&[]).unwrap();
        assert!(buf.is_empty());
        let (ptr, len) = buf.into_raw();
        assert!(!ptr.is_null());
        assert_eq!(len, 0);
        drop(unsafe { TransferBuffer::from_raw(ptr) });
    }

    #[test]
    fn test_raw_round_trip_keeps_bytes() {
        let buf = TransferBuffer::copy_from(b"hello").unwrap();
        let (ptr, len) = buf.into_raw();
        let seen = unsafe { std::slice::from_raw_parts(ptr, len) };
        assert_eq!(seen, b"hello");
        let adopted = unsafe { TransferBuffer::from_raw(ptr) };
        assert!(adopted.is_some());
    }

    #[test]
    fn test_from_raw_null() {
        assert!(unsafe { TransferBuffer::from_raw(std::ptr::null_mut()) }.is_none());
        assert!(unsafe { ErrorText::from_raw(std::ptr::null_mut()) }.is_none());
    }

    #[test]
    fn test_error_text() {
        assert_eq!(ErrorText::empty().as_str(), "");
        let text = ErrorText::new("stat failed\0tail");
        assert_eq!(text.as_str(), "stat failed\u{FFFD}tail");

        let raw = ErrorText::new("bad minio env").into_raw();
        let seen = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_string();
        assert_eq!(seen, "bad minio env");
        drop(unsafe { ErrorText::from_raw(raw) });
    }
}
