// ReadsUtils Infrastructure - HTTP Adapter
// Implements: RpcTransport

pub mod http_transport;
pub mod streaming;

pub use http_transport::HttpTransport;
