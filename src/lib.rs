pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::http::ReqwestTransport;
pub use adapters::session::{SessionStorage, SessionToken};
pub use config::client_config::{ApiPaths, ApiUrls, ClientConfig};
pub use core::client::ApiClient;
pub use core::request::{make_api_request, ResponseBody};
pub use utils::error::{ClientError, Result};
