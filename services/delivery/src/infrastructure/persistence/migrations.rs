//! 终端本地库迁移

use estoque_adapter_sqlite::{server_config_migration, Migration};

/// 台账表迁移版本
pub const VOLUME_READINGS_MIGRATION_VERSION: i64 = 2;

/// 台账表迁移
///
/// 条码唯一约束即重复检查，插入与检查天然原子
pub fn volume_readings_migration() -> Migration {
    Migration::new(
        VOLUME_READINGS_MIGRATION_VERSION,
        "create_volume_readings",
        r#"
        CREATE TABLE IF NOT EXISTS volume_readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            barcode TEXT NOT NULL UNIQUE,
            product_code INTEGER NOT NULL,
            sale_item_code INTEGER NOT NULL,
            read_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_volume_readings_sale_item
            ON volume_readings (sale_item_code);
        "#,
    )
}

/// 终端本地库的全部迁移
pub fn delivery_migrations() -> Vec<Migration> {
    vec![server_config_migration(), volume_readings_migration()]
}
