//! 库存服务 HTTP 适配器
//!
//! 基于 reqwest 实现 `InventoryGateway`：
//! - 登录
//! - 待交付销售单拉取
//! - 交付放行 / 货物放行

mod client;
mod config;
mod error;

pub use client::HttpInventoryGateway;
pub use config::InventoryClientConfig;
pub use error::{map_status_error, map_transport_error};
