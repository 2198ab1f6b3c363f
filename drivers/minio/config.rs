//! MinIO connection config resolved from environment / MinIO连接配置（从环境变量解析）

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// Endpoint override / 端点地址
pub const ENV_ENDPOINT: &str = "MINIO_ENDPOINT";
/// Externally reachable endpoint / 对外访问地址
pub const ENV_PUBLIC_ENDPOINT: &str = "PRESIGNED_MINIO_ENDPOINT";
/// Any non-empty value enables TLS / 任意非空值即启用TLS
pub const ENV_SECURE_SSL: &str = "MINIO_SECURE_SSL";
pub const ENV_BUCKET_NAME: &str = "MINIO_BUCKET_NAME";
pub const ENV_ACCESS_KEY_ID: &str = "MINIO_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "MINIO_SECRET_ACCESS_KEY";

pub const DEFAULT_ENDPOINT: &str = "localhost:9000";
pub const DEFAULT_BUCKET_NAME: &str = "md-tools";
/// Signing region, MinIO accepts any value / 签名区域
pub const DEFAULT_REGION: &str = "us-east-1";

/// MinIO配置
///
/// Built once per call and dropped after the client is created.
#[derive(Clone, Serialize)]
pub struct MinioConfig {
    /// host[:port], no scheme / 端点地址（不含协议）
    pub endpoint: String,
    /// 对外访问地址
    pub public_endpoint: String,
    pub use_ssl: bool,
    pub access_key_id: String,
    #[serde(skip_serializing)]
    pub secret_access_key: String,
    pub bucket_name: String,
}

impl MinioConfig {
    /// Resolve config from process environment / 从进程环境变量解析配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve config through an arbitrary variable lookup.
    /// Unset and empty values are treated the same.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let endpoint = var(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let public_endpoint =
            var(ENV_PUBLIC_ENDPOINT).unwrap_or_else(|| format!("http://{}", endpoint));
        // 只判断是否设置，不解析值（"false" 也会启用TLS）
        let use_ssl = var(ENV_SECURE_SSL).is_some();
        let bucket_name = var(ENV_BUCKET_NAME).unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string());

        let access_key_id = var(ENV_ACCESS_KEY_ID).ok_or(ConfigError::MissingAccessKey)?;
        let secret_access_key =
            var(ENV_SECRET_ACCESS_KEY).ok_or(ConfigError::MissingSecretKey)?;

        Ok(Self {
            endpoint,
            public_endpoint,
            use_ssl,
            access_key_id,
            secret_access_key,
            bucket_name,
        })
    }

    /// Endpoint with scheme picked by the TLS flag / 带协议的端点地址
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

impl fmt::Debug for MinioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinioConfig")
            .field("endpoint", &self.endpoint)
            .field("public_endpoint", &self.public_endpoint)
            .field("use_ssl", &self.use_ssl)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}
