//! 库存服务客户端配置

use std::time::Duration;

/// 库存服务客户端配置
#[derive(Debug, Clone)]
pub struct InventoryClientConfig {
    /// 单次请求超时
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for InventoryClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: format!("controle-estoque/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl InventoryClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
