pub mod bootstrap;
pub mod config;
pub mod configs;
pub mod database;
pub mod error;
pub mod health;
pub mod identity;
pub mod logging;
pub mod service;
pub mod service_register_center;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
