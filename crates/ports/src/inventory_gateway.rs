//! 远端库存服务接口定义

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estoque_common::{Operator, ProductCode, SaleCode, SaleItemCode};
use estoque_errors::AppResult;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::wire::lenient_text;

/// 远端标记"已放行"的取值
const RELEASED_FLAG: &str = "SIM";

/// 登录凭据
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub name: String,
    pub password: Secret<String>,
}

impl LoginCredentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: Secret::new(password.into()),
        }
    }
}

/// 待交付销售单（`GET /vendas-pendentes`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSale {
    #[serde(rename = "codigo")]
    pub code: SaleCode,
    #[serde(rename = "clienteNome", default, deserialize_with = "lenient_text")]
    pub customer_name: String,
    #[serde(rename = "logradouro", default, deserialize_with = "lenient_text")]
    pub street: String,
    #[serde(rename = "numero", default, deserialize_with = "lenient_text")]
    pub number: String,
    #[serde(rename = "bairro", default, deserialize_with = "lenient_text")]
    pub district: String,
    #[serde(rename = "itens", default)]
    pub items: Vec<PendingSaleItem>,
}

/// 待交付销售明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSaleItem {
    #[serde(rename = "codigo")]
    pub code: SaleItemCode,
    #[serde(rename = "produto_codigo")]
    pub product_code: ProductCode,
    #[serde(rename = "produtoNome", default, deserialize_with = "lenient_text")]
    pub product_name: String,
    #[serde(rename = "quantidade", default)]
    pub quantity: u32,
    #[serde(rename = "volumesPorUnidade", default)]
    pub volumes_per_unit: u32,
    #[serde(rename = "totalVolumesEsperados", default)]
    pub total_volumes_expected: u32,
    #[serde(rename = "libEntrega", default)]
    pub delivery_release: Option<String>,
}

impl PendingSaleItem {
    /// 远端是否已放行交付
    pub fn is_released(&self) -> bool {
        self.delivery_release
            .as_deref()
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case(RELEASED_FLAG))
    }
}

/// 交付放行请求（`POST /liberar-entrega`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRelease {
    #[serde(rename = "itemVendaCodigo")]
    pub sale_item_code: SaleItemCode,
    #[serde(rename = "usuarioId")]
    pub operator_id: i64,
    #[serde(rename = "usuarioNome")]
    pub operator_name: String,
    /// 按采集时间排序的条码
    #[serde(rename = "codigosBarras")]
    pub barcodes: Vec<String>,
}

impl DeliveryRelease {
    pub fn new(sale_item_code: SaleItemCode, operator: &Operator, barcodes: Vec<String>) -> Self {
        Self {
            sale_item_code,
            operator_id: operator.id,
            operator_name: operator.name.clone(),
            barcodes,
        }
    }
}

/// 远端放行回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReceipt {
    pub message: String,
}

/// 货物放行请求（`POST /liberar-mercadoria`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoodsRelease {
    #[serde(rename = "codigoBarras")]
    pub barcode: String,
    #[serde(rename = "usuarioId")]
    pub operator_id: i64,
    #[serde(rename = "usuarioNome")]
    pub operator_name: String,
    pub timestamp: DateTime<Utc>,
}

impl GoodsRelease {
    pub fn new(barcode: impl Into<String>, operator: &Operator, timestamp: DateTime<Utc>) -> Self {
        Self {
            barcode: barcode.into(),
            operator_id: operator.id,
            operator_name: operator.name.clone(),
            timestamp,
        }
    }
}

/// 远端库存服务
///
/// 所有调用都从本地保存的服务器配置解析基础地址，
/// 未配置时返回 `AppError::Configuration`
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// 登录，401 返回 `AppError::Unauthenticated`
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<Operator>;

    /// 拉取全部待交付销售单
    async fn pending_sales(&self) -> AppResult<Vec<PendingSale>>;

    /// 放行交付，远端以 `success: false` 拒绝时返回 `AppError::Rejected`
    async fn release_delivery(&self, request: &DeliveryRelease) -> AppResult<ReleaseReceipt>;

    /// 放行货物，返回远端消息
    async fn release_goods(&self, request: &GoodsRelease) -> AppResult<String>;
}
