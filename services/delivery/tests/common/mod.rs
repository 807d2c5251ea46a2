//! 测试公共设施

#![allow(dead_code)]

use async_trait::async_trait;
use delivery::{delivery_migrations, SaleItem};
use estoque_adapter_sqlite::{create_pool, MigrationManager, SqliteConfig};
use estoque_common::{Operator, ProductCode, SaleItemCode};
use estoque_errors::AppResult;
use estoque_ports::{
    DeliveryRelease, GoodsRelease, InventoryGateway, LoginCredentials, PendingSale,
    ReleaseReceipt,
};
use mockall::mock;
use sqlx::SqlitePool;

mock! {
    pub Gateway {}

    #[async_trait]
    impl InventoryGateway for Gateway {
        async fn login(&self, credentials: &LoginCredentials) -> AppResult<Operator>;
        async fn pending_sales(&self) -> AppResult<Vec<PendingSale>>;
        async fn release_delivery(&self, request: &DeliveryRelease) -> AppResult<ReleaseReceipt>;
        async fn release_goods(&self, request: &GoodsRelease) -> AppResult<String>;
    }
}

/// 已迁移的内存台账库
pub async fn ledger_pool() -> SqlitePool {
    estoque_telemetry::init_test_tracing();

    let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
    MigrationManager::new(pool.clone())
        .migrate_strict(&delivery_migrations())
        .await
        .unwrap();
    pool
}

/// 产品 500，1 件 × 3 包裹
pub fn wardrobe_item() -> SaleItem {
    SaleItem::new(SaleItemCode(11), ProductCode(500), "Armario", 1, 3)
}

pub fn operator() -> Operator {
    Operator::new(7, "Carlos")
}

pub fn receipt(message: &str) -> ReleaseReceipt {
    ReleaseReceipt {
        message: message.to_string(),
    }
}
