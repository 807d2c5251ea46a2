//! SQLite 台账实现

use async_trait::async_trait;
use chrono::Utc;
use estoque_adapter_sqlite::is_unique_violation;
use estoque_common::{ProductCode, SaleItemCode};
use sqlx::SqlitePool;
use tracing::debug;

use crate::domain::entities::VolumeReading;
use crate::domain::repositories::{LedgerError, LedgerResult, VolumeLedger};

use super::rows::VolumeReadingRow;

pub struct SqliteVolumeLedger {
    pool: SqlitePool,
}

impl SqliteVolumeLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VolumeLedger for SqliteVolumeLedger {
    async fn has_been_read(&self, barcode: &str) -> LedgerResult<bool> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM volume_readings WHERE barcode = ?)")
                .bind(barcode)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| LedgerError::Storage(format!("查询条码失败: {}", e)))?;

        Ok(exists != 0)
    }

    async fn record_reading(
        &self,
        barcode: &str,
        product_code: ProductCode,
        sale_item_code: SaleItemCode,
    ) -> LedgerResult<VolumeReading> {
        let read_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO volume_readings (barcode, product_code, sale_item_code, read_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(barcode)
        .bind(product_code.0)
        .bind(sale_item_code.0)
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateBarcode(barcode.to_string())
            } else {
                LedgerError::Storage(format!("保存读取记录失败: {}", e))
            }
        })?;

        debug!(barcode, sale_item = %sale_item_code, "Volume reading recorded");

        Ok(VolumeReading {
            id: result.last_insert_rowid(),
            barcode: barcode.to_string(),
            product_code,
            sale_item_code,
            read_at,
        })
    }

    async fn list_readings(&self, sale_item_code: SaleItemCode) -> LedgerResult<Vec<VolumeReading>> {
        let rows = sqlx::query_as::<_, VolumeReadingRow>(
            r#"
            SELECT id, barcode, product_code, sale_item_code, read_at
            FROM volume_readings
            WHERE sale_item_code = ?
            ORDER BY read_at ASC, id ASC
            "#,
        )
        .bind(sale_item_code.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("查询读取记录失败: {}", e)))?;

        Ok(rows.into_iter().map(VolumeReading::from).collect())
    }

    async fn clear_readings(&self, sale_item_code: SaleItemCode) -> LedgerResult<u64> {
        let result = sqlx::query("DELETE FROM volume_readings WHERE sale_item_code = ?")
            .bind(sale_item_code.0)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Storage(format!("清除读取记录失败: {}", e)))?;

        debug!(sale_item = %sale_item_code, removed = result.rows_affected(), "Volume readings cleared");
        Ok(result.rows_affected())
    }
}
