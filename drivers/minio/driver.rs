//! MinIO客户端实现
//!
//! 只提供原语：stat 和 open（整体流式读取）

use async_trait::async_trait;
use futures::StreamExt;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;

use super::factory::BucketLookup;
use crate::error::StoreError;
use crate::storage::{ObjectStat, ObjectStore, ObjectStream};

/// MinIO client handle, bound to one config / MinIO客户端
#[derive(Debug)]
pub struct MinioClient {
    default_bucket: String,
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    lookup: BucketLookup,
}

impl MinioClient {
    pub(crate) fn new(
        default_bucket: String,
        bucket: Box<Bucket>,
        region: Region,
        credentials: Credentials,
        lookup: BucketLookup,
    ) -> Self {
        let bucket = Self::apply_lookup(bucket, lookup);
        Self {
            default_bucket,
            bucket,
            region,
            credentials,
            lookup,
        }
    }

    pub fn default_bucket(&self) -> &str {
        &self.default_bucket
    }

    /// Resolved addressing style / 实际寻址方式
    pub fn lookup(&self) -> BucketLookup {
        self.lookup
    }

    fn apply_lookup(bucket: Box<Bucket>, lookup: BucketLookup) -> Box<Bucket> {
        if lookup == BucketLookup::Path {
            bucket.with_path_style()
        } else {
            bucket
        }
    }

    /// Bucket handle for a name; the configured bucket is reused
    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StoreError> {
        if name == self.default_bucket {
            return Ok(self.bucket.clone());
        }
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        Ok(Self::apply_lookup(bucket, self.lookup))
    }
}

/// Map a non-success HTTP status / 将非成功状态码转换为错误
fn check_status(code: u16) -> Result<(), StoreError> {
    match code {
        200..=299 => Ok(()),
        404 => Err(StoreError::NotFound),
        code => Err(StoreError::Status(code)),
    }
}

fn map_s3_error(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(code, body) => {
            tracing::debug!("S3 request failed: code={}, body={}", code, body);
            match check_status(code) {
                Err(e) => e,
                Ok(()) => StoreError::Status(code),
            }
        }
        other => StoreError::S3(other),
    }
}

#[async_trait]
impl ObjectStore for MinioClient {
    fn name(&self) -> &str {
        "MinIO"
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat, StoreError> {
        let bucket = self.bucket(bucket)?;
        let (head, code) = bucket.head_object(key).await.map_err(map_s3_error)?;
        check_status(code)?;

        Ok(ObjectStat {
            size: head.content_length.and_then(|len| u64::try_from(len).ok()),
            etag: head.e_tag,
            last_modified: head.last_modified,
            content_type: head.content_type,
        })
    }

    async fn open(&self, bucket: &str, key: &str) -> Result<ObjectStream, StoreError> {
        let bucket = self.bucket(bucket)?;
        let response = bucket.get_object_stream(key).await.map_err(map_s3_error)?;
        check_status(response.status_code)?;

        Ok(response
            .bytes
            .map(|chunk| chunk.map_err(map_s3_error))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::minio::{build_client, MinioConfig};
    use crate::error::FetchError;
    use crate::fetch::fetch_object;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP server: one response per connection, keyed by the request method
    async fn serve(head: &'static str, get: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = if request.starts_with(b"HEAD") { head } else { get };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("127.0.0.1:{}", addr.port())
    }

    fn local_config(endpoint: String) -> MinioConfig {
        MinioConfig {
            public_endpoint: format!("http://{}", endpoint),
            endpoint,
            use_ssl: false,
            access_key_id: "minio".to_string(),
            secret_access_key: "minio123".to_string(),
            bucket_name: "md-tools".to_string(),
        }
    }

    const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    #[tokio::test]
    async fn test_stat_404_is_not_found() {
        let endpoint = serve(NOT_FOUND, NOT_FOUND).await;
        let client = build_client(&local_config(endpoint)).unwrap();

        let err = client.stat("md-tools", "missing.txt").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let err = fetch_object(&client, "md-tools", "missing.txt").await.unwrap_err();
        assert!(matches!(err, FetchError::Stat { .. }));
        assert!(matches!(err.store_error(), StoreError::NotFound));
        assert!(err.to_string().starts_with("stat failed"));
    }

    #[tokio::test]
    async fn test_fetch_over_http() {
        let endpoint = serve(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain\r\nETag: \"abc\"\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\nhello",
        )
        .await;
        let client = build_client(&local_config(endpoint)).unwrap();

        let stat = client.stat("md-tools", "hello.txt").await.unwrap();
        assert_eq!(stat.size, Some(5));
        assert_eq!(stat.content_type.as_deref(), Some("text/plain"));

        let data = fetch_object(&client, "md-tools", "hello.txt").await.unwrap();
        assert_eq!(&data[..], b"hello");
    }

    #[tokio::test]
    async fn test_open_error_status() {
        let endpoint = serve(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = build_client(&local_config(endpoint)).unwrap();

        let err = fetch_object(&client, "md-tools", "secret.txt").await.unwrap_err();
        assert!(matches!(err, FetchError::Open { .. }));
        assert!(matches!(err.store_error(), StoreError::Status(403)));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(206).is_ok());
        assert!(matches!(check_status(404), Err(StoreError::NotFound)));
        assert!(matches!(check_status(403), Err(StoreError::Status(403))));
        assert!(matches!(check_status(500), Err(StoreError::Status(500))));
    }

    #[test]
    fn test_map_http_failure() {
        let err = map_s3_error(S3Error::HttpFailWithBody(404, "NoSuchKey".to_string()));
        assert!(matches!(err, StoreError::NotFound));
        let err = map_s3_error(S3Error::HttpFailWithBody(403, "AccessDenied".to_string()));
        assert!(matches!(err, StoreError::Status(403)));
    }
}
