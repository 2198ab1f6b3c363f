//! MinIO客户端工厂
//!
//! Builds a fresh client per call from a resolved [`MinioConfig`]. Nothing is
//! cached between calls.

use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;
use url::Url;

use super::config::{MinioConfig, DEFAULT_REGION};
use super::driver::MinioClient;
use crate::error::ClientError;

/// Bucket addressing style / 存储桶寻址方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketLookup {
    /// Pick by endpoint host / 根据端点自动选择
    Auto,
    /// `http://host/bucket/key`
    Path,
    /// `http://bucket.host/key`
    VirtualHost,
}

impl BucketLookup {
    /// Resolve `Auto` for a host; AWS and Aliyun hosts use virtual-host style,
    /// everything else (MinIO) uses path style.
    pub fn resolve(self, host: &str) -> BucketLookup {
        match self {
            BucketLookup::Auto => {
                let host = host.to_ascii_lowercase();
                if host.ends_with("amazonaws.com") || host.ends_with("aliyuncs.com") {
                    BucketLookup::VirtualHost
                } else {
                    BucketLookup::Path
                }
            }
            other => other,
        }
    }
}

/// Create a client with automatic bucket lookup / 创建MinIO客户端
pub fn build_client(config: &MinioConfig) -> Result<MinioClient, ClientError> {
    build_client_with_lookup(config, BucketLookup::Auto)
}

pub fn build_client_with_lookup(
    config: &MinioConfig,
    lookup: BucketLookup,
) -> Result<MinioClient, ClientError> {
    let host = endpoint_host(&config.endpoint)?;
    let lookup = lookup.resolve(&host);

    // 静态凭证，不使用session token
    let credentials = Credentials::new(
        Some(&config.access_key_id),
        Some(&config.secret_access_key),
        None,
        None,
        None,
    )
    .map_err(|e| ClientError::Credentials(e.to_string()))?;

    let region = Region::Custom {
        region: DEFAULT_REGION.to_string(),
        endpoint: config.endpoint_url(),
    };

    let bucket = Bucket::new(&config.bucket_name, region.clone(), credentials.clone())?;

    tracing::debug!(
        "MinIO client created: endpoint={}, ssl={}, lookup={:?}",
        config.endpoint,
        config.use_ssl,
        lookup
    );

    Ok(MinioClient::new(
        config.bucket_name.clone(),
        bucket,
        region,
        credentials,
        lookup,
    ))
}

/// Validate a `host[:port]` endpoint and return its host / 校验端点地址
fn endpoint_host(endpoint: &str) -> Result<String, ClientError> {
    let invalid = |reason: &str| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };

    if endpoint.contains("://") {
        return Err(invalid("endpoint must not contain a scheme"));
    }

    let url = Url::parse(&format!("http://{}", endpoint)).map_err(|e| invalid(&e.to_string()))?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("endpoint must not contain user info"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("endpoint url cannot have fully qualified paths"));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(invalid("endpoint has no host")),
    }
}
