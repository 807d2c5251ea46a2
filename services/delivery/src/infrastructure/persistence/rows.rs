//! 数据库行映射结构

use chrono::{DateTime, Utc};
use estoque_common::{ProductCode, SaleItemCode};
use sqlx::FromRow;

use crate::domain::entities::VolumeReading;

/// 台账数据库行
#[derive(Debug, FromRow)]
pub struct VolumeReadingRow {
    pub id: i64,
    pub barcode: String,
    pub product_code: i64,
    pub sale_item_code: i64,
    pub read_at: DateTime<Utc>,
}

impl From<VolumeReadingRow> for VolumeReading {
    fn from(row: VolumeReadingRow) -> Self {
        Self {
            id: row.id,
            barcode: row.barcode,
            product_code: ProductCode(row.product_code),
            sale_item_code: SaleItemCode(row.sale_item_code),
            read_at: row.read_at,
        }
    }
}
