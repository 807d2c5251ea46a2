//! 仓储接口模块

mod volume_ledger;

pub use volume_ledger::{LedgerError, LedgerResult, VolumeLedger};
