//! 扫描结果与进度

use std::fmt;

use estoque_common::{ProductCode, SaleItemCode};

/// 单次扫描的结果
///
/// 产品不符与重复读取是可恢复的校验结果，不作为错误返回
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 条码中的产品编码与所选明细不符，未记录
    ProductMismatch { expected: ProductCode, got: String },
    /// 条码已读取过，未记录
    DuplicateForItem { barcode: String },
    /// 已记录；`target_reached` 在每次选择明细后只出现一次
    Recorded {
        count: u32,
        expected: u32,
        target_reached: bool,
    },
    /// 扫描器未开启或已锁定，解码事件被丢弃
    Ignored,
}

impl ScanOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    pub fn target_reached(&self) -> bool {
        matches!(
            self,
            Self::Recorded {
                target_reached: true,
                ..
            }
        )
    }

    /// 指标标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductMismatch { .. } => "product_mismatch",
            Self::DuplicateForItem { .. } => "duplicate",
            Self::Recorded { .. } => "recorded",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductMismatch { expected, got } if got.is_empty() => {
                write!(f, "条码无效，应为产品 {}", expected)
            }
            Self::ProductMismatch { expected, got } => {
                write!(f, "产品不符: 应为 {}，读到 {}", expected, got)
            }
            Self::DuplicateForItem { barcode } => write!(f, "条码 {} 已读取", barcode),
            Self::Recorded {
                count,
                expected,
                target_reached: true,
            } => write!(f, "已读取 {}/{}，包裹已扫齐", count, expected),
            Self::Recorded { count, expected, .. } => write!(f, "已读取 {}/{}", count, expected),
            Self::Ignored => f.write_str("扫描已忽略"),
        }
    }
}

/// 所选明细的扫描进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub count: u32,
    pub expected: u32,
}

impl Progress {
    pub fn new(count: usize, expected: u32) -> Self {
        Self {
            count: u32::try_from(count).unwrap_or(u32::MAX),
            expected,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.expected
    }

    pub fn remaining(&self) -> u32 {
        self.expected.saturating_sub(self.count)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.count, self.expected)
    }
}

/// 启动核对结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// 远端已放行、清除了残留台账的明细及删除条数
    pub cleared: Vec<(SaleItemCode, u64)>,
    /// 台账已齐、可再次提交放行的明细
    pub ready: Vec<SaleItemCode>,
    /// 扫描进行中的明细
    pub in_progress: Vec<(SaleItemCode, Progress)>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.cleared.is_empty() && self.ready.is_empty() && self.in_progress.is_empty()
    }
}
