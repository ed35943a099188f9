// --- File: crates/eximbay_payment/src/lib.rs ---
// Declare modules within this crate
pub mod callback;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod rebill;
pub mod routes;

#[cfg(test)]
mod rebill_test;
#[cfg(test)]
mod test_support;

pub use error::PaymentError;
pub use logic::{
    build_rebill_payment, build_standard_payment, build_tokenized_payment, ready_payment,
    rebill_with_token,
};
pub use models::{CallbackView, FlowKind, GatewayCredential, OrderId, ReadyView, RebillView};
pub use rebill::{RebillFlow, RebillOutcome, RebillState};
pub use routes::routes;
