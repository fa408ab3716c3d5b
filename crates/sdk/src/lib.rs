//! ReadsUtils SDK - Rust Client Library
//!
//! Typed client for the ReadsUtils JSON-RPC service: upload, download,
//! export, convert and validate sequencing read libraries.
//!
//! # Example
//!
//! ```no_run
//! use readsutils_sdk::{ClientConfig, ReadsUtilsClient};
//! use readsutils_sdk::domain::ConvertReadLibraryParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReadsUtilsClient::connect(ClientConfig::from_env()?).await?;
//!
//!     let status = client.status(None).await?;
//!     println!("Service state: {:?}", status.state);
//!
//!     let out = client
//!         .convert_read_library_to_file(&ConvertReadLibraryParams::new(["ws/reads"]), None)
//!         .await?;
//!     for (reference, lib) in out.files.unwrap_or_default() {
//!         println!("{} -> {:?}", reference, lib.fwd);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::ReadsUtilsClient;
pub use config::{ClientConfig, Credentials};
pub use error::{Result, SdkError};

// Records and envelope types callers need alongside the client
pub use readsutils_core::domain;
pub use readsutils_core::envelope::CallStackEntry;
pub use readsutils_core::port::TransportError;
pub use readsutils_core::{RpcContext, RpcFault};
