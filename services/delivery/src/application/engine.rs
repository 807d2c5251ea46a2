//! 送货核对引擎
//!
//! 扫描流程（按顺序检查，首个失败即返回）:
//! 1. 解析条码中的产品编码，与所选明细比对
//! 2. 在该明细最新的台账记录中查重
//! 3. 写入台账（唯一约束冲突同样视为重复）
//! 4. 返回进度，件数达到应扫总数时给出一次性的扫齐信号

use std::sync::Arc;

use estoque_common::{Operator, ScanLatch};
use estoque_errors::{AppError, AppResult};
use estoque_ports::{DeliveryRelease, InventoryGateway, ReleaseReceipt};
use metrics::counter;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Sale, SaleItem, VolumeReading};
use crate::domain::enums::EngineState;
use crate::domain::repositories::{LedgerError, VolumeLedger};
use crate::domain::value_objects::decode_product_code;

use super::outcome::{Progress, ReconciliationReport, ScanOutcome};

/// 当前所选明细的会话状态
#[derive(Debug)]
struct ItemSession {
    item: SaleItem,
    readings: Vec<VolumeReading>,
    state: EngineState,
    scanner_open: bool,
    latch: ScanLatch,
    /// 本次选择内是否已发出扫齐信号
    target_signalled: bool,
}

impl ItemSession {
    fn progress(&self) -> Progress {
        Progress::new(self.readings.len(), self.item.total_volumes_expected)
    }
}

pub struct ReconciliationEngine {
    ledger: Arc<dyn VolumeLedger>,
    gateway: Arc<dyn InventoryGateway>,
    session: Option<ItemSession>,
}

impl ReconciliationEngine {
    pub fn new(ledger: Arc<dyn VolumeLedger>, gateway: Arc<dyn InventoryGateway>) -> Self {
        Self {
            ledger,
            gateway,
            session: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.session
            .as_ref()
            .map_or(EngineState::Idle, |session| session.state)
    }

    pub fn selected_item(&self) -> Option<&SaleItem> {
        self.session.as_ref().map(|session| &session.item)
    }

    /// 所选明细的台账记录（按采集时间升序）
    pub fn readings(&self) -> &[VolumeReading] {
        self.session
            .as_ref()
            .map(|session| session.readings.as_slice())
            .unwrap_or(&[])
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session.as_ref().map(ItemSession::progress)
    }

    pub fn is_latched(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.latch.is_held())
    }

    /// 选择明细并载入台账，丢弃之前的选择
    ///
    /// 远端已放行但本地仍有台账的明细，残留记录在此清除
    pub async fn select_item(&mut self, item: SaleItem) -> AppResult<Progress> {
        self.session = None;

        let mut readings = self.ledger.list_readings(item.code).await?;
        if item.is_released() && !readings.is_empty() {
            warn!(
                sale_item = %item.code,
                stale = readings.len(),
                "Released item still has ledger entries, clearing"
            );
            self.ledger.clear_readings(item.code).await?;
            readings.clear();
        }

        let state = if item.is_released() {
            EngineState::Released
        } else if item.is_complete(readings.len()) {
            EngineState::ReadyToRelease
        } else {
            EngineState::ItemSelected
        };

        let session = ItemSession {
            target_signalled: state == EngineState::ReadyToRelease,
            item,
            readings,
            state,
            scanner_open: false,
            latch: ScanLatch::new(),
        };
        let progress = session.progress();

        info!(
            sale_item = %session.item.code,
            product = %session.item.product_code,
            progress = %progress,
            state = %state,
            "Sale item selected"
        );

        self.session = Some(session);
        Ok(progress)
    }

    /// 回到明细列表
    pub fn deselect(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(sale_item = %session.item.code, "Sale item deselected");
        }
    }

    /// 打开扫描器，已放行或已扫齐的明细拒绝扫描
    pub fn open_scanner(&mut self) -> AppResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::validation("未选择销售明细"))?;

        match session.state {
            EngineState::ItemSelected | EngineState::Scanning => {}
            EngineState::Released => {
                return Err(AppError::validation(format!(
                    "明细 {} 已放行，无需扫描",
                    session.item.code
                )));
            }
            EngineState::ReadyToRelease => {
                return Err(AppError::validation(format!(
                    "明细 {} 的包裹已全部读取",
                    session.item.code
                )));
            }
            EngineState::Idle | EngineState::Releasing => {
                return Err(AppError::validation(format!(
                    "当前状态无法扫描: {}",
                    session.state
                )));
            }
        }

        session.scanner_open = true;
        session.latch.release();
        session.state = EngineState::Scanning;
        debug!(sale_item = %session.item.code, "Scanner opened");
        Ok(())
    }

    /// 提交一次解码结果
    ///
    /// 接受后锁定扫描器，直到调用 [`Self::resume_scanning`]；锁定期间的解码返回 `Ignored`。
    /// 台账写入失败（重复除外）以存储错误返回
    pub async fn submit_scan(&mut self, raw: &str) -> AppResult<ScanOutcome> {
        let Some(session) = self.session.as_mut() else {
            debug!(barcode = raw, "Decode ignored, no item selected");
            return Ok(Self::ignored());
        };

        if session.state != EngineState::Scanning || !session.latch.try_acquire() {
            debug!(barcode = raw, state = %session.state, "Decode ignored");
            return Ok(Self::ignored());
        }
        session.state = EngineState::ItemSelected;

        let result = Self::check_and_record(self.ledger.as_ref(), session, raw).await;
        match &result {
            Ok(outcome) => {
                counter!("delivery_scan_outcomes_total", "outcome" => outcome.label()).increment(1);
                info!(
                    sale_item = %session.item.code,
                    barcode = raw,
                    outcome = outcome.label(),
                    progress = %session.progress(),
                    "Scan processed"
                );
            }
            Err(e) => {
                counter!("delivery_scan_outcomes_total", "outcome" => "storage_error").increment(1);
                error!(sale_item = %session.item.code, barcode = raw, error = %e, "Scan failed");
            }
        }
        result
    }

    async fn check_and_record(
        ledger: &dyn VolumeLedger,
        session: &mut ItemSession,
        raw: &str,
    ) -> AppResult<ScanOutcome> {
        let item_code = session.item.code;
        let product_code = session.item.product_code;

        let decoded = decode_product_code(raw);
        if !product_code.matches_encoded(&decoded) {
            return Ok(ScanOutcome::ProductMismatch {
                expected: product_code,
                got: decoded,
            });
        }

        session.readings = ledger.list_readings(item_code).await?;
        if session.readings.iter().any(|r| r.barcode == raw) {
            return Ok(ScanOutcome::DuplicateForItem {
                barcode: raw.to_string(),
            });
        }

        let reading = match ledger.record_reading(raw, product_code, item_code).await {
            Ok(reading) => reading,
            Err(LedgerError::DuplicateBarcode(barcode)) => {
                return Ok(ScanOutcome::DuplicateForItem { barcode });
            }
            Err(e) => return Err(e.into()),
        };
        session.readings.push(reading);

        let progress = session.progress();
        let mut target_reached = false;
        if progress.is_complete() {
            session.state = EngineState::ReadyToRelease;
            session.scanner_open = false;
            session.latch.release();
            target_reached = !session.target_signalled;
            session.target_signalled = true;
        }

        Ok(ScanOutcome::Recorded {
            count: progress.count,
            expected: progress.expected,
            target_reached,
        })
    }

    fn ignored() -> ScanOutcome {
        counter!("delivery_scan_outcomes_total", "outcome" => "ignored").increment(1);
        ScanOutcome::Ignored
    }

    /// 用户确认结果后恢复扫描
    pub fn resume_scanning(&mut self) -> EngineState {
        if let Some(session) = self.session.as_mut() {
            session.latch.release();
            if session.scanner_open && session.state == EngineState::ItemSelected {
                session.state = EngineState::Scanning;
            }
        }
        self.state()
    }

    /// 关闭扫描器，丢弃未处理的解码
    pub fn close_scanner(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.latch.release();
            session.scanner_open = false;
            if session.state == EngineState::Scanning {
                session.state = EngineState::ItemSelected;
            }
            debug!(sale_item = %session.item.code, state = %session.state, "Scanner closed");
        }
    }

    /// 提交送货放行
    ///
    /// 远端调用只发生一次；成功后清除台账并标记明细已放行，
    /// 失败时台账保持不变，由用户决定是否重试
    pub async fn release_item(&mut self, operator: &Operator) -> AppResult<ReleaseReceipt> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::validation("未选择销售明细"))?;

        match session.state {
            // Releasing 只在上次放行的 future 被丢弃后可见，按可重试处理
            EngineState::ReadyToRelease | EngineState::Releasing => {}
            EngineState::Released => {
                return Err(AppError::validation(format!(
                    "明细 {} 已放行",
                    session.item.code
                )));
            }
            _ => {
                return Err(AppError::validation(format!(
                    "包裹未扫齐: {}",
                    session.progress()
                )));
            }
        }

        let item_code = session.item.code;
        session.readings = self.ledger.list_readings(item_code).await?;
        if !session.progress().is_complete() {
            // 台账在外部被清除
            session.state = EngineState::ItemSelected;
            session.target_signalled = false;
            return Err(AppError::validation(format!(
                "包裹未扫齐: {}",
                session.progress()
            )));
        }

        let barcodes = session.readings.iter().map(|r| r.barcode.clone()).collect();
        let request = DeliveryRelease::new(item_code, operator, barcodes);
        session.state = EngineState::Releasing;

        let receipt = match self.gateway.release_delivery(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                session.state = EngineState::ReadyToRelease;
                counter!("delivery_releases_total", "result" => e.kind().as_str()).increment(1);
                warn!(
                    sale_item = %item_code,
                    error = %e,
                    kind = %e.kind(),
                    "Delivery release failed, ledger kept for retry"
                );
                return Err(e);
            }
        };

        if let Err(e) = self.ledger.clear_readings(item_code).await {
            // 远端已放行，重试依赖远端按明细幂等
            session.state = EngineState::ReadyToRelease;
            error!(sale_item = %item_code, error = %e, "Ledger not cleared after release");
            return Err(e.into());
        }

        session.readings.clear();
        session.item.mark_released();
        session.state = EngineState::Released;
        counter!("delivery_releases_total", "result" => "released").increment(1);
        info!(
            sale_item = %item_code,
            operator_id = operator.id,
            volumes = request.barcodes.len(),
            "Delivery released"
        );

        Ok(receipt)
    }

    /// 启动核对：清除远端已放行明细的残留台账，报告可再次提交的明细
    pub async fn reconcile(&self, sales: &[Sale]) -> AppResult<ReconciliationReport> {
        let mut report = ReconciliationReport::default();

        for item in sales.iter().flat_map(|sale| sale.items.iter()) {
            let readings = self.ledger.list_readings(item.code).await?;
            if readings.is_empty() {
                continue;
            }

            if item.is_released() {
                let removed = self.ledger.clear_readings(item.code).await?;
                warn!(sale_item = %item.code, removed, "Stale ledger of released item cleared");
                report.cleared.push((item.code, removed));
            } else if item.is_complete(readings.len()) {
                report.ready.push(item.code);
            } else {
                report
                    .in_progress
                    .push((item.code, Progress::new(readings.len(), item.total_volumes_expected)));
            }
        }

        info!(
            cleared = report.cleared.len(),
            ready = report.ready.len(),
            in_progress = report.in_progress.len(),
            "Ledger reconciled"
        );
        Ok(report)
    }
}
