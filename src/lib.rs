pub mod cli;
pub mod configuration;
pub mod domain;
pub mod store;
pub mod sweep;
pub mod telemetry;
pub mod utils;
pub mod xrpc_client;
