//! ports - 抽象 trait 层
//!
//! 定义远端库存接口与本地配置存储的抽象，以及远端接口的传输模型

mod inventory_gateway;
mod server_config;
mod wire;

pub use inventory_gateway::*;
pub use server_config::*;
