//! estoque-bootstrap - 终端启动骨架
//!
//! 加载配置、初始化日志、打开本地库并组装远端客户端

mod infrastructure;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
