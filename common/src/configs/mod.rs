mod database_config;
mod log_config;
mod registry_config;
mod server_config;

pub use database_config::*;
pub use log_config::*;
pub use registry_config::*;
pub use server_config::*;
