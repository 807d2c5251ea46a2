//! 送货核对服务
//!
//! 本地条码台账 + 按件核对引擎：扫描每一件包裹，件数齐全后向库存服务提交放行

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    PendingSalesHandler, Progress, ReconciliationEngine, ReconciliationReport,
    ScanOutcome,
};
pub use domain::entities::{Sale, SaleItem, VolumeReading};
pub use domain::enums::{EngineState, ReleaseStatus};
pub use domain::repositories::{LedgerError, LedgerResult, VolumeLedger};
pub use domain::value_objects::decode_product_code;
pub use infrastructure::persistence::{delivery_migrations, SqliteVolumeLedger};
