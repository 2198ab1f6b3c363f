//! In-memory object store for tests / 测试用内存对象存储

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;

use super::{ObjectStat, ObjectStore, ObjectStream};
use crate::error::StoreError;

/// How `open` should misbehave for a key / 注入的故障
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// `open` itself fails / 打开失败
    Open,
    /// Stream fails after yielding this many chunks / 读取若干块后失败
    ReadAfter(usize),
}

#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), Bytes>>,
    faults: RwLock<HashMap<(String, String), Fault>>,
    chunk_size: usize,
    opens: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            chunk_size: 2,
            ..Default::default()
        }
    }

    pub fn with_object(self, bucket: &str, key: &str, data: impl Into<Bytes>) -> Self {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), data.into());
        self
    }

    pub fn with_fault(self, bucket: &str, key: &str, fault: Fault) -> Self {
        self.faults
            .write()
            .insert((bucket.to_string(), key.to_string()), fault);
        self
    }

    /// Number of successful `open` calls / 成功打开次数
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat, StoreError> {
        let data = self.get(bucket, key).ok_or(StoreError::NotFound)?;
        Ok(ObjectStat {
            size: Some(data.len() as u64),
            ..Default::default()
        })
    }

    async fn open(&self, bucket: &str, key: &str) -> Result<ObjectStream, StoreError> {
        let data = self.get(bucket, key).ok_or(StoreError::NotFound)?;
        let fault = self
            .faults
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .copied();
        if let Some(Fault::Open) = fault {
            return Err(StoreError::Status(503));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);

        let mut chunks: Vec<Result<Bytes, StoreError>> = data
            .chunks(self.chunk_size.max(1))
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if let Some(Fault::ReadAfter(n)) = fault {
            chunks.truncate(n);
            chunks.push(Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))));
        }
        Ok(stream::iter(chunks).boxed())
    }
}
