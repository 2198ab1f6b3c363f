//! Blocking read: resolve config → build client → fetch / 阻塞式读取
//!
//! Every call builds its own config, client and runtime and drops them before
//! returning.

use bytes::Bytes;

use crate::drivers::minio::{build_client, MinioConfig};
use crate::error::{ClientError, ConfigError, Error, Result};
use crate::fetch::fetch_object;
use crate::storage::ObjectStore;

/// Read a whole object from the bucket configured in the environment.
///
/// Must not be called from inside an async runtime.
pub fn read_object(key: &str) -> Result<Bytes> {
    read_object_with(key, MinioConfig::from_env, build_client)
}

/// Same pipeline with the resolver and client factory supplied by the caller
pub fn read_object_with<S, R, B>(key: &str, resolve: R, build: B) -> Result<Bytes>
where
    S: ObjectStore,
    R: FnOnce() -> std::result::Result<MinioConfig, ConfigError>,
    B: FnOnce(&MinioConfig) -> std::result::Result<S, ClientError>,
{
    let config = resolve()?;
    read_with_config(key, config, build)
}

/// Pipeline after config resolution; only the bucket name outlives client creation
pub fn read_with_config<S, B>(key: &str, config: MinioConfig, build: B) -> Result<Bytes>
where
    S: ObjectStore,
    B: FnOnce(&MinioConfig) -> std::result::Result<S, ClientError>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    let _guard = runtime.enter();

    let store = build(&config)?;
    let bucket = config.bucket_name;

    let data = runtime.block_on(fetch_object(&store, &bucket, key))?;
    Ok(data)
}
