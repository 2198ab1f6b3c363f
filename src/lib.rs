//! Read MinIO objects into buffers owned by a foreign caller.
//!
//! The C entry points live in [`ffi`]; Rust callers can use
//! [`reader::read_object`] or [`fetch::fetch_object`] directly.

pub mod error;
pub mod fetch;
pub mod ffi;
pub mod logging;
pub mod reader;
pub mod storage;
pub mod transfer;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use error::{Error, Result};
pub use fetch::fetch_object;
pub use reader::read_object;
