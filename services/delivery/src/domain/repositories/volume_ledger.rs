//! 条码台账接口

use async_trait::async_trait;
use estoque_common::{ProductCode, SaleItemCode};
use estoque_errors::AppError;
use thiserror::Error;

use crate::domain::entities::VolumeReading;

/// 台账错误
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 条码已存在于台账（唯一约束冲突）
    #[error("barcode {0} has already been read")]
    DuplicateBarcode(String),

    #[error("ledger storage error: {0}")]
    Storage(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateBarcode(barcode) => {
                AppError::validation(format!("条码 {} 已读取", barcode))
            }
            LedgerError::Storage(msg) => AppError::storage(msg),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// 条码台账
///
/// 设备本地持久化的已读包裹记录，重启后仍然保留，不依赖网络
#[async_trait]
pub trait VolumeLedger: Send + Sync {
    /// 条码是否已被读取（任意明细）
    async fn has_been_read(&self, barcode: &str) -> LedgerResult<bool>;

    /// 记录一次读取，条码重复时返回 [`LedgerError::DuplicateBarcode`]
    async fn record_reading(
        &self,
        barcode: &str,
        product_code: ProductCode,
        sale_item_code: SaleItemCode,
    ) -> LedgerResult<VolumeReading>;

    /// 按采集时间升序列出明细的读取记录
    async fn list_readings(&self, sale_item_code: SaleItemCode) -> LedgerResult<Vec<VolumeReading>>;

    /// 清除明细的全部读取记录，返回删除条数
    async fn clear_readings(&self, sale_item_code: SaleItemCode) -> LedgerResult<u64>;
}
