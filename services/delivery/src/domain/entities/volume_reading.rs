//! 包裹读取记录

use chrono::{DateTime, Utc};
use estoque_common::{ProductCode, SaleItemCode};
use serde::{Deserialize, Serialize};

/// 台账中的一条包裹读取记录
///
/// 条码在整个台账内唯一；记录只新增或按明细整体删除，不做原地修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReading {
    /// 台账行号，采集时间相同时用于保持插入顺序
    pub id: i64,
    pub barcode: String,
    pub product_code: ProductCode,
    pub sale_item_code: SaleItemCode,
    /// 设备端采集时间
    pub read_at: DateTime<Utc>,
}
