//! 放行结果

use std::fmt;

/// 单次商品放行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoodsReleaseOutcome {
    Released { barcode: String, message: String },
    /// 远端拒绝或网络失败
    Rejected { barcode: String, reason: String },
    /// 扫描器未开启或已锁定
    Ignored,
}

impl GoodsReleaseOutcome {
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Released { .. } => "released",
            Self::Rejected { .. } => "rejected",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for GoodsReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Released { barcode, message } => write!(f, "{}: {}", barcode, message),
            Self::Rejected { barcode, reason } => write!(f, "{} 未放行: {}", barcode, reason),
            Self::Ignored => f.write_str("扫描已忽略"),
        }
    }
}
