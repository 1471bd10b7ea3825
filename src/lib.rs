pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod pagination;
pub mod server;
pub mod tools;
