use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::StoreError;

/// Object body stream, yields chunks until the object is drained / 对象内容流
pub type ObjectStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// Object metadata returned by stat / 对象元信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectStat {
    /// Size in bytes, if the store reported one / 对象大小
    pub size: Option<u64>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
}

/// Object store interface (primitive read operations only) / 对象存储接口
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store name, used in logs / 存储名称
    fn name(&self) -> &str;

    /// Existence / metadata probe / 检查对象是否存在
    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat, StoreError>;

    /// Open a stream over the whole object body / 打开对象读取流
    async fn open(&self, bucket: &str, key: &str) -> Result<ObjectStream, StoreError>;
}

#[cfg(test)]
pub mod memory;
