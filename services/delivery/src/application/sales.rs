//! 待送货销售单查询

use std::sync::Arc;

use estoque_common::{SaleCode, SaleItemCode};
use estoque_errors::{AppError, AppResult};
use estoque_ports::InventoryGateway;
use tracing::info;

use crate::domain::entities::{Sale, SaleItem};

pub struct PendingSalesHandler {
    gateway: Arc<dyn InventoryGateway>,
}

impl PendingSalesHandler {
    pub fn new(gateway: Arc<dyn InventoryGateway>) -> Self {
        Self { gateway }
    }

    /// 拉取全部待送货销售单
    pub async fn fetch(&self) -> AppResult<Vec<Sale>> {
        let sales: Vec<Sale> = self
            .gateway
            .pending_sales()
            .await?
            .into_iter()
            .map(Sale::from)
            .collect();

        info!(
            sales = sales.len(),
            items = sales.iter().map(|s| s.items.len()).sum::<usize>(),
            "Pending sales loaded"
        );
        Ok(sales)
    }

    /// 在已拉取的销售单中查找明细
    pub fn find_item(
        sales: &[Sale],
        sale_code: SaleCode,
        item_code: SaleItemCode,
    ) -> AppResult<SaleItem> {
        let sale = sales
            .iter()
            .find(|s| s.code == sale_code)
            .ok_or_else(|| AppError::not_found(format!("销售单 {} 不存在", sale_code)))?;

        sale.find_item(item_code).cloned().ok_or_else(|| {
            AppError::not_found(format!("销售单 {} 中不存在明细 {}", sale_code, item_code))
        })
    }
}
