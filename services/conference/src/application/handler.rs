//! 收货核验流程

use std::sync::Arc;

use chrono::Utc;
use estoque_common::{Operator, ScanLatch};
use estoque_errors::{AppError, AppResult};
use estoque_ports::{GoodsRelease, InventoryGateway};
use metrics::counter;
use tracing::{debug, info, warn};

use crate::domain::GoodsReleaseOutcome;

pub struct GoodsConference {
    gateway: Arc<dyn InventoryGateway>,
    scanner_open: bool,
    latch: ScanLatch,
    last_scanned: Option<String>,
}

impl GoodsConference {
    pub fn new(gateway: Arc<dyn InventoryGateway>) -> Self {
        Self {
            gateway,
            scanner_open: false,
            latch: ScanLatch::new(),
            last_scanned: None,
        }
    }

    pub fn is_scanner_open(&self) -> bool {
        self.scanner_open
    }

    pub fn is_latched(&self) -> bool {
        self.latch.is_held()
    }

    /// 最近一次被接受的条码，恢复扫描后清空
    pub fn last_scanned(&self) -> Option<&str> {
        self.last_scanned.as_deref()
    }

    pub fn open_scanner(&mut self) {
        self.scanner_open = true;
        self.latch.release();
        debug!("Conference scanner opened");
    }

    /// 提交一次解码结果，每个锁周期只接受一次
    ///
    /// 远端拒绝与网络失败作为结果返回；其余错误（如未配置服务器）原样返回
    pub async fn submit_scan(
        &mut self,
        raw: &str,
        operator: &Operator,
    ) -> AppResult<GoodsReleaseOutcome> {
        if !self.scanner_open || !self.latch.try_acquire() {
            counter!("conference_scan_outcomes_total", "outcome" => "ignored").increment(1);
            return Ok(GoodsReleaseOutcome::Ignored);
        }
        self.last_scanned = Some(raw.to_string());

        let request = GoodsRelease::new(raw, operator, Utc::now());
        let outcome = match self.gateway.release_goods(&request).await {
            Ok(message) => GoodsReleaseOutcome::Released {
                barcode: raw.to_string(),
                message,
            },
            Err(e) if e.is_remote() => {
                warn!(barcode = raw, error = %e, "Goods release refused");
                GoodsReleaseOutcome::Rejected {
                    barcode: raw.to_string(),
                    reason: match e {
                        AppError::Rejected(reason) => reason,
                        other => other.to_string(),
                    },
                }
            }
            Err(e) => return Err(e),
        };

        counter!("conference_scan_outcomes_total", "outcome" => outcome.label()).increment(1);
        info!(barcode = raw, operator_id = operator.id, outcome = outcome.label(), "Goods scan processed");
        Ok(outcome)
    }

    /// 用户确认结果后恢复扫描
    pub fn resume_scanning(&mut self) {
        self.latch.release();
        self.last_scanned = None;
    }

    pub fn close_scanner(&mut self) {
        self.scanner_open = false;
        self.latch.release();
        self.last_scanned = None;
        debug!("Conference scanner closed");
    }
}
