//! 通用类型定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 销售单编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct SaleCode(pub i64);

/// 销售明细编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct SaleItemCode(pub i64);

/// 产品编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ProductCode(pub i64);

impl ProductCode {
    /// 与条码中解析出的产品编码比较（按十进制文本比较）
    pub fn matches_encoded(&self, encoded: &str) -> bool {
        self.0.to_string() == encoded
    }
}

/// 当前操作员
///
/// 由登录接口返回，每次提交状态变更时显式传入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
}

impl Operator {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 服务器地址错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerAddressError {
    #[error("server host must not be empty")]
    EmptyHost,
    #[error("server host contains whitespace: {0}")]
    InvalidHost(String),
    #[error("server port must be between 1 and 65535")]
    InvalidPort,
}

/// 服务器地址值对象
///
/// 业务规则:
/// - 主机名去除首尾空白后不能为空，且不含空白字符
/// - 端口不能为 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ServerAddressError> {
        let host = host.into().trim().to_string();

        if host.is_empty() {
            return Err(ServerAddressError::EmptyHost);
        }
        if host.chars().any(char::is_whitespace) {
            return Err(ServerAddressError::InvalidHost(host));
        }
        if port == 0 {
            return Err(ServerAddressError::InvalidPort);
        }

        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// 远端 API 基础地址
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let address = ServerAddress::new("  192.168.0.10 ", 3000).unwrap();
        assert_eq!(address.host(), "192.168.0.10");
        assert_eq!(address.base_url(), "http://192.168.0.10:3000");
        assert_eq!(address.to_string(), "192.168.0.10:3000");
    }

    #[test]
    fn test_empty_host() {
        assert_eq!(ServerAddress::new("   ", 80), Err(ServerAddressError::EmptyHost));
    }

    #[test]
    fn test_host_with_whitespace() {
        assert!(matches!(
            ServerAddress::new("my host", 80),
            Err(ServerAddressError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_zero_port() {
        assert_eq!(ServerAddress::new("localhost", 0), Err(ServerAddressError::InvalidPort));
    }

    #[test]
    fn test_product_code_matches_encoded() {
        let code = ProductCode(500);
        assert!(code.matches_encoded("500"));
        assert!(!code.matches_encoded("0500"));
        assert!(!code.matches_encoded(""));
    }

    #[test]
    fn test_codes_serialize_transparent() {
        let json = serde_json::to_string(&SaleItemCode(42)).unwrap();
        assert_eq!(json, "42");
    }
}
