//! C boundary / C接口
//!
//! # Safety
//!
//! - `minio_read_file` takes a NUL-terminated key and never unwinds. On
//!   success `err` is `""` and `data` is a non-null buffer of `len` bytes; on
//!   failure `err` is non-empty, `data` is null and `len` is 0. Callers check
//!   `err` first and must not touch `data` when it is non-empty.
//! - `data` is released exactly once with `minio_release_file`.
//! - Every `err` (including the empty one) and the text from
//!   `minio_stop_client` is released exactly once with `minio_release_string`.
//! - Releasing a pointer twice, or one not obtained from these functions, is
//!   undefined behavior.
//!
//! # Example (C)
//!
//! ```c
//! MinioReadResult r = minio_read_file("report.txt");
//! if (r.err[0] != '\0') {
//!     fprintf(stderr, "%s\n", r.err);
//! } else {
//!     fwrite(r.data, 1, r.len, stdout);
//!     minio_release_file(r.data);
//! }
//! minio_release_string(r.err);
//! ```

use std::any::Any;
use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use crate::drivers::minio::{build_client, MinioConfig};
use crate::error::{ClientError, ConfigError, Error};
use crate::logging;
use crate::reader::read_with_config;
use crate::storage::ObjectStore;
use crate::transfer::{ErrorText, TransferBuffer};

/// Return value of [`minio_read_file`] / 读取结果
#[repr(C)]
#[derive(Debug)]
pub struct MinioReadResult {
    pub data: *mut u8,
    pub len: usize,
    pub err: *mut c_char,
}

impl MinioReadResult {
    fn success(buffer: TransferBuffer) -> Self {
        let (data, len) = buffer.into_raw();
        Self {
            data,
            len,
            err: ErrorText::empty().into_raw(),
        }
    }

    fn failure(error: &Error) -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
            err: ErrorText::new(error.to_string()).into_raw(),
        }
    }
}

/// Read the object `key` from the bucket configured by `MINIO_*` variables.
///
/// # Safety
///
/// `key` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn minio_read_file(key: *const c_char) -> MinioReadResult {
    read_across_boundary(key, MinioConfig::from_env, build_client)
}

/// Release a buffer returned by [`minio_read_file`]. Null is ignored.
///
/// # Safety
///
/// `data` must come from a successful `minio_read_file` call and must not
/// have been released already.
#[no_mangle]
pub unsafe extern "C" fn minio_release_file(data: *mut u8) {
    drop(TransferBuffer::from_raw(data));
}

/// Release an error text or the text returned by [`minio_stop_client`].
///
/// # Safety
///
/// `text` must come from this library and must not have been released already.
#[no_mangle]
pub unsafe extern "C" fn minio_release_string(text: *mut c_char) {
    drop(ErrorText::from_raw(text));
}

/// Lifecycle hook kept for callers that expect one. No client outlives a
/// read call, so there is nothing to stop; always returns `""`.
#[no_mangle]
pub extern "C" fn minio_stop_client(_handle: usize) -> *mut c_char {
    ErrorText::empty().into_raw()
}

/// Boundary core: runs the pipeline, catches panics and flattens errors
pub(crate) unsafe fn read_across_boundary<S, R, B>(
    key: *const c_char,
    resolve: R,
    build: B,
) -> MinioReadResult
where
    S: ObjectStore,
    R: FnOnce() -> Result<MinioConfig, ConfigError>,
    B: FnOnce(&MinioConfig) -> Result<S, ClientError>,
{
    logging::init();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        // Config first: missing credentials win over a bad key
        let config = resolve()?;
        let key = key_from_ptr(key)?;
        let data = read_with_config(&key, config, build)?;
        TransferBuffer::copy_from(&data).map_err(Error::from)
    }));

    let result = match outcome {
        Ok(result) => result,
        Err(payload) => Err(Error::Panic(panic_message(payload))),
    };

    match result {
        Ok(buffer) => MinioReadResult::success(buffer),
        Err(e) => {
            tracing::warn!("minio_read_file failed: {}", e);
            MinioReadResult::failure(&e)
        }
    }
}

unsafe fn key_from_ptr(key: *const c_char) -> Result<String, Error> {
    if key.is_null() {
        return Err(Error::Key("null pointer".to_string()));
    }
    let key = CStr::from_ptr(key)
        .to_str()
        .map_err(|e| Error::Key(format!("not valid utf-8, {}", e)))?;
    Ok(key.to_string())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
