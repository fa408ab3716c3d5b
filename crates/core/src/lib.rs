// ReadsUtils Core - Records, Call Envelope & Ports
// NO network code: transports live in adapter crates

pub mod domain;
pub mod envelope;
pub mod port;

pub use domain::DomainError;
pub use envelope::{DecodeError, RequestEnvelope, RpcContext, RpcFault};

/// Module name the remote service registers its functions under
pub const SERVICE_NAME: &str = "ReadsUtils";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
