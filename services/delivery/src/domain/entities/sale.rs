//! 销售单与销售明细

use estoque_common::{ProductCode, SaleCode, SaleItemCode};
use estoque_ports::{PendingSale, PendingSaleItem};
use serde::{Deserialize, Serialize};

use crate::domain::enums::ReleaseStatus;

/// 销售明细（远端数据的本地只读投影）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub code: SaleItemCode,
    pub product_code: ProductCode,
    pub product_name: String,
    pub quantity: u32,
    pub volumes_per_unit: u32,
    /// 应扫包裹总数 = 数量 × 每件包裹数
    pub total_volumes_expected: u32,
    pub release_status: ReleaseStatus,
}

impl SaleItem {
    pub fn new(
        code: SaleItemCode,
        product_code: ProductCode,
        product_name: impl Into<String>,
        quantity: u32,
        volumes_per_unit: u32,
    ) -> Self {
        Self {
            code,
            product_code,
            product_name: product_name.into(),
            quantity,
            volumes_per_unit,
            total_volumes_expected: quantity.saturating_mul(volumes_per_unit),
            release_status: ReleaseStatus::Pending,
        }
    }

    pub fn is_released(&self) -> bool {
        self.release_status.is_released()
    }

    pub fn mark_released(&mut self) {
        self.release_status = ReleaseStatus::Released;
    }

    /// 给定已读件数时是否已扫齐
    pub fn is_complete(&self, count: usize) -> bool {
        count >= self.total_volumes_expected as usize
    }
}

impl From<PendingSaleItem> for SaleItem {
    fn from(item: PendingSaleItem) -> Self {
        // 远端未给出总数时按数量 × 每件包裹数计算
        let total = if item.total_volumes_expected > 0 {
            item.total_volumes_expected
        } else {
            item.quantity.saturating_mul(item.volumes_per_unit)
        };

        let release_status = if item.is_released() {
            ReleaseStatus::Released
        } else {
            ReleaseStatus::Pending
        };

        Self {
            code: item.code,
            product_code: item.product_code,
            product_name: item.product_name,
            quantity: item.quantity,
            volumes_per_unit: item.volumes_per_unit,
            total_volumes_expected: total,
            release_status,
        }
    }
}

/// 待送货销售单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub code: SaleCode,
    pub customer_name: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// 送货地址，如 `Av. Brasil, 100 - Centro`
    pub fn address_line(&self) -> String {
        let mut line = self.street.clone();
        if !self.number.is_empty() {
            line.push_str(", ");
            line.push_str(&self.number);
        }
        if !self.district.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.district);
        }
        line
    }

    pub fn find_item(&self, code: SaleItemCode) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.code == code)
    }

    /// 所有明细是否均已放行
    pub fn is_fully_released(&self) -> bool {
        self.items.iter().all(SaleItem::is_released)
    }
}

impl From<PendingSale> for Sale {
    fn from(sale: PendingSale) -> Self {
        Self {
            code: sale.code,
            customer_name: sale.customer_name,
            street: sale.street,
            number: sale.number,
            district: sale.district,
            items: sale.items.into_iter().map(SaleItem::from).collect(),
        }
    }
}
