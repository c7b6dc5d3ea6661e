//! Observability and logging infrastructure.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
