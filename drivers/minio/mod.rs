//! MinIO / S3 compatible object store / MinIO对象存储

pub mod config;
pub mod driver;
pub mod factory;

pub use config::MinioConfig;
pub use driver::MinioClient;
pub use factory::{build_client, build_client_with_lookup, BucketLookup};
