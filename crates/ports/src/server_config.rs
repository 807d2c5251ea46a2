//! 服务器配置存储 trait 定义

use async_trait::async_trait;
use estoque_common::ServerAddress;
use estoque_errors::AppResult;

/// 服务器配置存储
///
/// 本地最多保存一条记录，保存时覆盖旧记录
#[async_trait]
pub trait ServerConfigRepository: Send + Sync {
    /// 保存（替换）服务器地址
    async fn save(&self, address: &ServerAddress) -> AppResult<()>;

    /// 读取已保存的服务器地址
    async fn get(&self) -> AppResult<Option<ServerAddress>>;

    /// 删除已保存的服务器地址
    async fn delete(&self) -> AppResult<()>;
}
