//! 库存服务客户端实现

use std::sync::Arc;

use async_trait::async_trait;
use estoque_common::Operator;
use estoque_errors::{AppError, AppResult};
use estoque_ports::{
    DeliveryRelease, GoodsRelease, InventoryGateway, LoginCredentials, PendingSale,
    ReleaseReceipt, ServerConfigRepository,
};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::InventoryClientConfig;
use crate::error::{map_status_error, map_transport_error};

const LOGIN_PATH: &str = "/login";
const PENDING_SALES_PATH: &str = "/vendas-pendentes";
const RELEASE_DELIVERY_PATH: &str = "/liberar-entrega";
const RELEASE_GOODS_PATH: &str = "/liberar-mercadoria";

#[derive(Serialize)]
struct LoginBody<'a> {
    nome: &'a str,
    senha: &'a str,
}

/// 登录响应，操作员编号可能是 `id` 或 `codigo`
#[derive(Deserialize)]
struct OperatorBody {
    id: Option<i64>,
    codigo: Option<i64>,
    #[serde(default)]
    nome: Option<String>,
}

#[derive(Deserialize)]
struct DeliveryReleaseBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, Default)]
struct GoodsReleaseBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// 库存服务 HTTP 客户端
///
/// 每次调用都从本地配置解析服务器地址，配置变更无需重建客户端
pub struct HttpInventoryGateway {
    client: Client,
    servers: Arc<dyn ServerConfigRepository>,
}

impl HttpInventoryGateway {
    pub fn new(
        config: InventoryClientConfig,
        servers: Arc<dyn ServerConfigRepository>,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, servers })
    }

    /// 解析接口完整地址
    async fn endpoint(&self, path: &str) -> AppResult<String> {
        let address = self.servers.get().await?.ok_or_else(|| {
            AppError::configuration("Server not configured. Configure host and port first.")
        })?;
        Ok(format!("{}{}", address.base_url(), path))
    }

    async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> AppResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| map_transport_error(e, context))
    }
}

#[async_trait]
impl InventoryGateway for HttpInventoryGateway {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<Operator> {
        let url = self.endpoint(LOGIN_PATH).await?;
        debug!(url = %url, name = %credentials.name, "Logging in");

        let response = self
            .client
            .post(&url)
            .json(&LoginBody {
                nome: &credentials.name,
                senha: credentials.password.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| map_transport_error(e, "Login"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), name = %credentials.name, "Login refused");
            return Err(map_status_error(status, None, "Login"));
        }

        let body: OperatorBody = Self::read_json(response, "Login").await?;
        let id = body
            .id
            .or(body.codigo)
            .ok_or_else(|| AppError::network("Login: response without operator id"))?;
        let name = body.nome.unwrap_or_else(|| credentials.name.clone());

        info!(operator_id = id, operator = %name, "Operator logged in");
        Ok(Operator::new(id, name))
    }

    async fn pending_sales(&self) -> AppResult<Vec<PendingSale>> {
        let url = self.endpoint(PENDING_SALES_PATH).await?;
        debug!(url = %url, "Fetching pending sales");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "Pending sales"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status, None, "Pending sales"));
        }

        let sales: Vec<PendingSale> = Self::read_json(response, "Pending sales").await?;
        info!(count = sales.len(), "Pending sales received");
        Ok(sales)
    }

    async fn release_delivery(&self, request: &DeliveryRelease) -> AppResult<ReleaseReceipt> {
        let url = self.endpoint(RELEASE_DELIVERY_PATH).await?;
        info!(
            sale_item = %request.sale_item_code,
            operator_id = request.operator_id,
            volumes = request.barcodes.len(),
            "Releasing delivery"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "Release delivery"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, "Release delivery"))?;
        let body = serde_json::from_str::<DeliveryReleaseBody>(&text).ok();

        if !status.is_success() {
            let detail = body
                .and_then(|b| b.message)
                .unwrap_or(text);
            return Err(map_status_error(status, Some(&detail), "Release delivery"));
        }

        match body {
            Some(DeliveryReleaseBody {
                success: true,
                message,
            }) => Ok(ReleaseReceipt {
                message: message.unwrap_or_else(|| "Delivery released".to_string()),
            }),
            Some(DeliveryReleaseBody { message, .. }) => {
                let reason = message.unwrap_or_else(|| text.clone());
                warn!(sale_item = %request.sale_item_code, reason = %reason, "Delivery release rejected");
                Err(AppError::rejected(reason))
            }
            None => Err(AppError::network(format!(
                "Release delivery: invalid response body: {}",
                text
            ))),
        }
    }

    async fn release_goods(&self, request: &GoodsRelease) -> AppResult<String> {
        let url = self.endpoint(RELEASE_GOODS_PATH).await?;
        info!(barcode = %request.barcode, operator_id = request.operator_id, "Releasing goods");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "Release goods"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, "Release goods"))?;
        let body = serde_json::from_str::<GoodsReleaseBody>(&text).unwrap_or_default();

        if status.is_success() {
            Ok(body
                .message
                .unwrap_or_else(|| "Goods released".to_string()))
        } else {
            let reason = body
                .error
                .or(body.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(barcode = %request.barcode, reason = %reason, "Goods release rejected");
            Err(AppError::rejected(reason))
        }
    }
}
