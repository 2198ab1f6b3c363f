//! Whole-object fetch pipeline / 整对象读取流程
//!
//! stat → open → drain, strictly in order, no retries. Any failure ends the
//! call and partially drained bytes are dropped.

use bytes::{Bytes, BytesMut};
use futures::StreamExt;

use crate::error::FetchError;
use crate::storage::ObjectStore;

/// Upper bound for pre-sizing from the reported length; beyond it the buffer grows
const MAX_PRESIZE: usize = 8 * 1024 * 1024; // 8MB

/// Read a whole object into memory / 读取整个对象到内存
pub async fn fetch_object<S>(store: &S, bucket: &str, key: &str) -> Result<Bytes, FetchError>
where
    S: ObjectStore + ?Sized,
{
    // 先检查对象是否存在，避免读取阶段才失败
    let stat = store.stat(bucket, key).await.map_err(|source| FetchError::Stat {
        key: key.to_string(),
        source,
    })?;
    tracing::debug!("{} stat ok: key={}, size={:?}", store.name(), key, stat.size);

    tracing::info!("reading file {} from bucket {}", key, bucket);

    let mut stream = store.open(bucket, key).await.map_err(|source| FetchError::Open {
        key: key.to_string(),
        source,
    })?;

    let mut buffer = BytesMut::with_capacity(initial_capacity(stat.size));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| FetchError::Read {
            key: key.to_string(),
            source,
        })?;
        buffer.extend_from_slice(&chunk);
    }

    tracing::debug!("{} drained: key={}, size={}", store.name(), key, buffer.len());
    Ok(buffer.freeze())
}

/// Reported sizes are not trusted beyond [`MAX_PRESIZE`] / 不完全信任服务端报告的大小
fn initial_capacity(reported: Option<u64>) -> usize {
    reported
        .map(|size| usize::try_from(size).unwrap_or(usize::MAX).min(MAX_PRESIZE))
        .unwrap_or(0)
}
