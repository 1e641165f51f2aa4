#[cfg(feature = "cli")]
pub mod cli;
pub mod client_config;
