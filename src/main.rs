use std::ffi::{CStr, CString};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use minio_rw::drivers::minio::MinioConfig;
use minio_rw::ffi;

/// Fetch one object from MinIO through the C boundary / 通过C接口读取MinIO对象
#[derive(Parser)]
#[command(
    name = "minio-fetch",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")")
)]
struct Cli {
    /// Object key in the configured bucket / 对象键
    #[arg(required_unless_present = "show_config")]
    key: Option<String>,

    /// Write the object here instead of stdout / 输出文件
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the resolved MINIO_* config as JSON (secret omitted)
    #[arg(long)]
    show_config: bool,
}

fn main() -> anyhow::Result<()> {
    minio_rw::logging::init();
    let cli = Cli::parse();

    if cli.show_config {
        let config = MinioConfig::from_env().context("bad minio env")?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    let Some(key) = cli.key else {
        return Ok(());
    };

    let data = read_via_boundary(&key)?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &data)
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {} bytes to {:?}", data.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Same sequence a foreign caller runs: read, check error text, copy, release
fn read_via_boundary(key: &str) -> anyhow::Result<Vec<u8>> {
    let key = CString::new(key).context("object key contains a NUL byte")?;

    let result = unsafe { ffi::minio_read_file(key.as_ptr()) };
    let err = unsafe { CStr::from_ptr(result.err) }
        .to_string_lossy()
        .into_owned();

    let data = if err.is_empty() {
        let bytes = unsafe { std::slice::from_raw_parts(result.data, result.len) }.to_vec();
        unsafe { ffi::minio_release_file(result.data) };
        Some(bytes)
    } else {
        None
    };
    unsafe { ffi::minio_release_string(result.err) };

    let stop = ffi::minio_stop_client(0);
    unsafe { ffi::minio_release_string(stop) };

    match data {
        Some(data) => Ok(data),
        None => bail!(err),
    }
}
