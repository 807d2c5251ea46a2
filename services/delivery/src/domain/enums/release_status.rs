//! 放行状态

use serde::{Deserialize, Serialize};

/// 销售明细的送货放行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleaseStatus {
    #[default]
    Pending,
    Released,
}

impl ReleaseStatus {
    pub fn is_released(self) -> bool {
        matches!(self, Self::Released)
    }
}
