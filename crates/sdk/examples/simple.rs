//! Simple SDK Example
//!
//! Checks the service status, then downloads one read library.
//!
//! # Usage
//!
//! ```bash
//! READSUTILS_URL=https://ci.kbase.us/services/ReadsUtils \
//! KB_AUTH_TOKEN=... \
//!     cargo run --example simple -- 1234/5/6
//! ```

use readsutils_sdk::domain::{DownloadReadsParams, Tern};
use readsutils_sdk::{ClientConfig, ReadsUtilsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ReadsUtils SDK - Simple Example");
    println!("===============================\n");

    // 1. Connect
    let client = ReadsUtilsClient::connect(ClientConfig::from_env()?).await?;
    println!("1. Endpoint: {}", client.config().url());

    // 2. Status
    let status = client.status(None).await?;
    println!("2. Service state: {}", status.state.as_deref().unwrap_or("unknown"));
    println!("   Version: {}\n", status.version.as_deref().unwrap_or("unknown"));

    // 3. Download, deinterleaved
    let Some(reference) = std::env::args().nth(1) else {
        println!("3. No read library given, skipping download");
        return Ok(());
    };
    let params = DownloadReadsParams {
        interleaved: Some(Tern::False),
        ..DownloadReadsParams::new([reference])
    };
    params.validate()?;

    let out = client.download_reads(&params, None).await?;
    for (reference, lib) in out.files.unwrap_or_default() {
        let files = lib.files.unwrap_or_default();
        println!("3. {} ({})", reference, files.type_.as_deref().unwrap_or("?"));
        println!("   fwd: {}", files.fwd.as_deref().unwrap_or("-"));
        if let Some(rev) = files.rev {
            println!("   rev: {}", rev);
        }
    }

    Ok(())
}
