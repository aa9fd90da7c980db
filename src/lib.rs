pub mod apis;
pub mod collector;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod merger;
pub mod table;
pub mod types;
