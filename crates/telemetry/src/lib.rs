//! Observability for the Stand With Crypto backend: logging, metrics and audit samples.

pub mod audit;
pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::Metrics;
