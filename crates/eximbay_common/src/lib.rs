// --- File: crates/eximbay_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities and the gateway transport
pub mod logging; // Logging utilities
pub mod models; // Shared gateway response shapes
pub mod services; // Transport abstraction

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, EximbayError,
    HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{
        create_client, GatewayClient, GatewayMethod, GatewayResult, TransportError,
        DEFAULT_TIMEOUT_SECS,
    },
    map_json_error, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};

pub use models::GatewayResponse;
pub use services::{BoxFuture, GatewayTransport};
