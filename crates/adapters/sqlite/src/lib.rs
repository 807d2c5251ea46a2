//! estoque-adapter-sqlite - 设备本地 SQLite 适配器

mod connection;
mod migration;
mod server_config;

pub use connection::*;
pub use migration::*;
pub use server_config::*;
