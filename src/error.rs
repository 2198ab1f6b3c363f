//! Error types / 错误类型
//!
//! Each pipeline stage has its own error enum. They are only flattened to text
//! at the C boundary (see [`crate::ffi`]). / 各阶段保留结构化错误，只在边界处转为文本

use thiserror::Error;

use crate::drivers::minio::config::{ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY};

/// Configuration resolve error / 配置解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing access key, {} is not specified", ENV_ACCESS_KEY_ID)]
    MissingAccessKey,
    #[error("missing secret key, {} is not specified", ENV_SECRET_ACCESS_KEY)]
    MissingSecretKey,
}

/// Client construction error / 客户端创建错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("invalid credentials: {0}")]
    Credentials(String),
    #[error(transparent)]
    S3(#[from] s3::error::S3Error),
}

/// Failure reported by an object store / 对象存储返回的错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the specified key does not exist")]
    NotFound,
    #[error("unexpected status code {0}")]
    Status(u16),
    #[error(transparent)]
    S3(#[from] s3::error::S3Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fetch pipeline error, one variant per stage / 读取流程错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("stat failed, error of stating object {key}: {source}")]
    Stat { key: String, source: StoreError },
    #[error("open failed, error of opening object {key}: {source}")]
    Open { key: String, source: StoreError },
    #[error("read failed, error of reading object {key}: {source}")]
    Read { key: String, source: StoreError },
}

impl FetchError {
    /// The underlying store error / 底层存储错误
    pub fn store_error(&self) -> &StoreError {
        match self {
            FetchError::Stat { source, .. }
            | FetchError::Open { source, .. }
            | FetchError::Read { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("malloc of {0} bytes returned null")]
    OutOfMemory(usize),
}

/// Top level error of one boundary call / 单次边界调用的顶层错误
///
/// `Display` produces exactly the text handed to the foreign caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad object key: {0}")]
    Key(String),
    #[error("bad minio env: {0}")]
    Config(#[from] ConfigError),
    #[error("create minio client error, {0}")]
    Client(#[from] ClientError),
    #[error("create async runtime error, {0}")]
    Runtime(#[source] std::io::Error),
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("allocate transfer buffer error, {0}")]
    Transfer(#[from] TransferError),
    #[error("internal panic: {0}")]
    Panic(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
