//! SQLite 条码台账测试

mod common;

use std::path::PathBuf;

use delivery::{delivery_migrations, LedgerError, SqliteVolumeLedger, VolumeLedger};
use estoque_adapter_sqlite::{create_pool, MigrationManager, SqliteConfig};
use estoque_common::{ProductCode, SaleItemCode};
use sqlx::SqlitePool;

use common::ledger_pool;

/// 临时目录下的台账文件
struct LedgerFile(PathBuf);

impl LedgerFile {
    fn new(name: &str) -> Self {
        let file = format!("estoque-{}-{}.db", name, std::process::id());
        let file = Self(std::env::temp_dir().join(file));
        file.remove();
        file
    }

    async fn open(&self) -> SqlitePool {
        let config = SqliteConfig::new(format!("sqlite://{}", self.0.display())).with_max_connections(4);
        let pool = create_pool(&config).await.unwrap();
        MigrationManager::new(pool.clone())
            .migrate(&delivery_migrations())
            .await
            .unwrap();
        pool
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.0.display(), suffix));
        }
    }
}

impl Drop for LedgerFile {
    fn drop(&mut self) {
        self.remove();
    }
}

#[tokio::test]
async fn test_record_and_list_in_capture_order() {
    let ledger = SqliteVolumeLedger::new(ledger_pool().await);

    for barcode in ["50005042503", "50005042501", "50005042502"] {
        ledger
            .record_reading(barcode, ProductCode(500), SaleItemCode(11))
            .await
            .unwrap();
    }

    let readings = ledger.list_readings(SaleItemCode(11)).await.unwrap();
    let barcodes: Vec<_> = readings.iter().map(|r| r.barcode.as_str()).collect();
    assert_eq!(barcodes, ["50005042503", "50005042501", "50005042502"]);
    assert!(readings.iter().all(|r| r.product_code == ProductCode(500)));
}

#[tokio::test]
async fn test_has_been_read() {
    let ledger = SqliteVolumeLedger::new(ledger_pool().await);

    assert!(!ledger.has_been_read("50005042501").await.unwrap());
    ledger
        .record_reading("50005042501", ProductCode(500), SaleItemCode(11))
        .await
        .unwrap();
    assert!(ledger.has_been_read("50005042501").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_barcode_is_typed_error() {
    let ledger = SqliteVolumeLedger::new(ledger_pool().await);

    ledger
        .record_reading("50005042501", ProductCode(500), SaleItemCode(11))
        .await
        .unwrap();
    // 唯一约束跨明细生效
    let err = ledger
        .record_reading("50005042501", ProductCode(500), SaleItemCode(12))
        .await
        .unwrap_err();

    match err {
        LedgerError::DuplicateBarcode(barcode) => assert_eq!(barcode, "50005042501"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ledger.list_readings(SaleItemCode(12)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_unknown_item_is_empty() {
    let ledger = SqliteVolumeLedger::new(ledger_pool().await);
    assert!(ledger.list_readings(SaleItemCode(99)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_only_touches_item_and_is_idempotent() {
    let ledger = SqliteVolumeLedger::new(ledger_pool().await);

    ledger
        .record_reading("50005042501", ProductCode(500), SaleItemCode(11))
        .await
        .unwrap();
    ledger
        .record_reading("50005042502", ProductCode(500), SaleItemCode(11))
        .await
        .unwrap();
    ledger
        .record_reading("60005042501", ProductCode(600), SaleItemCode(12))
        .await
        .unwrap();

    assert_eq!(ledger.clear_readings(SaleItemCode(11)).await.unwrap(), 2);
    assert_eq!(ledger.clear_readings(SaleItemCode(11)).await.unwrap(), 0);

    assert!(ledger.list_readings(SaleItemCode(11)).await.unwrap().is_empty());
    assert_eq!(ledger.list_readings(SaleItemCode(12)).await.unwrap().len(), 1);
    // 清除后条码可再次读取
    assert!(!ledger.has_been_read("50005042501").await.unwrap());
}

#[tokio::test]
async fn test_readings_survive_reopen() {
    let file = LedgerFile::new("reopen");

    let pool = file.open().await;
    let ledger = SqliteVolumeLedger::new(pool.clone());
    for barcode in ["50005042502", "50005042501"] {
        ledger
            .record_reading(barcode, ProductCode(500), SaleItemCode(11))
            .await
            .unwrap();
    }
    pool.close().await;

    let ledger = SqliteVolumeLedger::new(file.open().await);
    let readings = ledger.list_readings(SaleItemCode(11)).await.unwrap();
    let barcodes: Vec<_> = readings.iter().map(|r| r.barcode.as_str()).collect();
    assert_eq!(barcodes, ["50005042502", "50005042501"]);
    assert!(ledger.has_been_read("50005042501").await.unwrap());
}

#[tokio::test]
async fn test_concurrent_record_of_same_barcode_accepts_one() {
    let file = LedgerFile::new("concurrent");
    let ledger = SqliteVolumeLedger::new(file.open().await);

    let (first, second) = tokio::join!(
        ledger.record_reading("50005042501", ProductCode(500), SaleItemCode(11)),
        ledger.record_reading("50005042501", ProductCode(500), SaleItemCode(12)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::DuplicateBarcode(b)) if b == "50005042501"))
            .count(),
        1
    );

    let total = ledger.list_readings(SaleItemCode(11)).await.unwrap().len()
        + ledger.list_readings(SaleItemCode(12)).await.unwrap().len();
    assert_eq!(total, 1);
}
