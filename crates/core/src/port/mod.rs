// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod transport;

// Re-exports
pub use id_provider::IdProvider;
pub use transport::{
    Authorization, HttpRequest, HttpResponse, RequestBody, RpcTransport, TransportError,
    TransportOptions,
};
