//! dealflow - CRM and deal-pipeline core for the M&A dashboard
//!
//! The dashboard frontend consumes this crate two ways: generated
//! TypeScript bindings (see the `generate_types` binary) and the
//! store/state facade over the remote CRM database.

pub mod cancel;
pub mod config;
pub mod logging;
pub mod overview;
pub mod pipeline;
pub mod state;
pub mod store;
pub mod types;
pub mod wizard;
